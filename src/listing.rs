use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ToolError;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff"];
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// Case-insensitive suffix match on the file name, e.g. `scan.JPG`.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_lowercase();
    extensions
        .iter()
        .any(|ext| name.ends_with(&format!(".{}", ext)))
}

/// Regular files directly inside `folder` whose extension matches, ordered
/// by lowercased file name. The order is the page order of the output.
pub fn candidates<P: AsRef<Path>>(folder: P, extensions: &[&str]) -> Result<Vec<PathBuf>, ToolError> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(ToolError::InvalidFolder {
            path: folder.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(folder).to_path_buf();
            ToolError::io(path, e.into())
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    sort_by_name(&mut files);
    Ok(files)
}

/// Lowercased name first; the original name breaks ties so `A.pdf` and
/// `a.pdf` always come out the same way round.
pub fn sort_by_name(files: &mut [PathBuf]) {
    files.sort_by_cached_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (name.to_lowercase(), name)
    });
}
