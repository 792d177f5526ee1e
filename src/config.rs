use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ToolError;
use crate::raster::{Origin, Rasterizer};

/// File name of the Poppler rasterizer on this platform.
pub const PDFTOPPM: &str = if cfg!(windows) {
    "pdftoppm.exe"
} else {
    "pdftoppm"
};

/// Session settings shared by every tool.
///
/// The only setting is where to find Poppler. It lives for the lifetime of
/// the process and is never changed by a tool itself.
#[derive(Debug, Clone, Default)]
pub struct Config {
    poppler_dir: Option<PathBuf>,
}

impl Config {
    pub fn new(poppler_dir: Option<PathBuf>) -> Self {
        let mut config = Config::default();
        config.set_poppler_dir(poppler_dir);
        config
    }

    pub fn poppler_dir(&self) -> Option<&Path> {
        self.poppler_dir.as_deref()
    }

    /// Blank input clears the override.
    pub fn set_poppler_dir(&mut self, dir: Option<PathBuf>) {
        self.poppler_dir = dir.filter(|d| !d.as_os_str().to_string_lossy().trim().is_empty());
    }

    /// Locate `pdftoppm` using the override first and then `PATH`.
    pub fn rasterizer(&self) -> Option<Rasterizer> {
        self.rasterizer_with_search_path(std::env::var_os("PATH").as_deref())
    }

    /// Resolution order: `<dir>/pdftoppm`, then `<dir>/bin/pdftoppm`, then
    /// the search path.
    pub fn rasterizer_with_search_path(&self, search_path: Option<&OsStr>) -> Option<Rasterizer> {
        if let Some(dir) = &self.poppler_dir {
            for candidate_dir in [dir.clone(), dir.join("bin")] {
                let program = candidate_dir.join(PDFTOPPM);
                if program.is_file() {
                    debug!(program = %program.display(), "using pdftoppm from override");
                    return Some(Rasterizer::new(program, Origin::Override(candidate_dir)));
                }
            }
            debug!(dir = %dir.display(), "override does not contain pdftoppm");
        }

        let program = search_path.and_then(find_in_search_path)?;
        debug!(program = %program.display(), "using pdftoppm from PATH");
        Some(Rasterizer::new(program, Origin::SearchPath))
    }

    pub fn require_rasterizer(&self) -> Result<Rasterizer, ToolError> {
        self.rasterizer().ok_or_else(|| ToolError::RasterizerMissing {
            help: missing_rasterizer_help(),
        })
    }
}

fn find_in_search_path(search_path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(PDFTOPPM))
        .find(|program| program.is_file())
}

/// Short hint shown next to the Poppler setting in the shell.
pub fn poppler_hint() -> String {
    let mut lines = vec!["If Poppler is not on PATH, set the folder containing pdftoppm."];
    match std::env::consts::OS {
        "windows" => {
            lines.push("Windows tip: this is usually the ...\\poppler-xx\\Library\\bin folder.")
        }
        "macos" => {
            lines.push(
                "macOS tip: if installed via Homebrew, Poppler is typically on PATH already.",
            );
            lines.push("Otherwise, point this to the directory containing pdftoppm.");
        }
        _ => lines.push(
            "Linux tip: install poppler-utils via your package manager, or set the bin folder here.",
        ),
    }
    lines.join("\n")
}

/// Full remediation text for when `pdftoppm` cannot be found.
pub fn missing_rasterizer_help() -> String {
    let mut lines = vec![
        "pdftoppm not found.",
        "Fix: either set the Poppler bin directory (folder with pdftoppm) or add Poppler to your PATH.",
        "Download Poppler: https://poppler.freedesktop.org/.",
    ];
    match std::env::consts::OS {
        "windows" => {
            lines.push("On Windows, the correct folder is usually ...\\poppler-XX\\Library\\bin.")
        }
        "macos" => lines.push(
            "On macOS, try: brew install poppler (then restart the app) or set the folder containing pdftoppm.",
        ),
        _ => lines.push("On Linux, install poppler-utils via your package manager."),
    }
    lines.join("\n")
}
