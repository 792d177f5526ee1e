use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::ToolError;

/// Rasterization resolution for every page.
pub const DPI: u32 = 300;

/// Where a resolved `pdftoppm` came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The user's Poppler directory (or its `bin` subfolder).
    Override(PathBuf),
    SearchPath,
}

/// A located `pdftoppm` executable.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    program: PathBuf,
    origin: Origin,
}

impl Rasterizer {
    pub fn new(program: PathBuf, origin: Origin) -> Self {
        Rasterizer { program, origin }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Render every page of `pdf` into `out_dir` as PPM files.
    ///
    /// Returns the generated files sorted by path. pdftoppm zero-pads the
    /// page number to a fixed width, so this is page order.
    pub fn render(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ToolError> {
        let prefix = Uuid::new_v4().simple().to_string();
        let root = out_dir.join(&prefix);

        info!(pdf = %pdf.display(), dpi = DPI, program = %self.program.display(), "rasterizing");
        let output = Command::new(&self.program)
            .arg("-r")
            .arg(DPI.to_string())
            .arg(pdf)
            .arg(&root)
            .output()
            .map_err(|source| ToolError::RasterizerSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolError::RasterizerFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let mut pages = Vec::new();
        for entry in WalkDir::new(out_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ToolError::io(out_dir, e.into()))?;
            let name = entry.file_name().to_string_lossy();
            if name.starts_with(&prefix) && name.ends_with(".ppm") {
                pages.push(entry.into_path());
            }
        }

        if pages.is_empty() {
            return Err(ToolError::NothingRendered {
                path: pdf.to_path_buf(),
            });
        }

        pages.sort();
        debug!(pages = pages.len(), "rasterized");
        Ok(pages)
    }
}
