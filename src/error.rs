//! Error type shared by the three conversion tools.
//!
//! Every failure falls into one of three buckets (see [`ErrorKind`]): bad
//! input that stops a tool before it starts, a missing `pdftoppm`, or a
//! runtime failure while decoding, encoding or writing. All of them are
//! terminal for the current action only; the shell keeps running.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use crate::jpeg::JpegError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong file, wrong folder. Reported before anything runs.
    InvalidInput,
    /// The folder was fine but held nothing to work on.
    NothingToDo,
    /// `pdftoppm` could not be located.
    MissingEngine,
    /// Decode/encode/merge/save failure.
    Runtime,
}

#[derive(Debug, Error)]
pub enum ToolError {
    // ── Input errors ──────────────────────────────────────────────────────
    #[error("Please select a valid PDF file.")]
    InvalidPdf { path: PathBuf },

    #[error("Please select a valid folder.")]
    InvalidFolder { path: PathBuf },

    #[error("No compatible images found in the selected folder.")]
    NoImages { folder: PathBuf },

    #[error("No PDF files found in the selected folder.")]
    NoPdfs { folder: PathBuf },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// Carries the full, platform-specific remediation text.
    #[error("{help}")]
    RasterizerMissing { help: String },

    #[error("Failed to run '{}': {source}", program.display())]
    RasterizerSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pdftoppm failed ({status}): {stderr}")]
    RasterizerFailed { status: ExitStatus, stderr: String },

    #[error("pdftoppm produced no images for '{}'", path.display())]
    NothingRendered { path: PathBuf },

    // ── Runtime errors ────────────────────────────────────────────────────
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read image '{}': {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Cannot encode JPEG for '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: JpegError,
    },

    #[error("{}: {source}", path.display())]
    Pdf {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn pdf(path: impl Into<PathBuf>, source: lopdf::Error) -> Self {
        ToolError::Pdf {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::InvalidPdf { .. } | ToolError::InvalidFolder { .. } => {
                ErrorKind::InvalidInput
            }
            ToolError::NoImages { .. } | ToolError::NoPdfs { .. } => ErrorKind::NothingToDo,
            ToolError::RasterizerMissing { .. } => ErrorKind::MissingEngine,
            _ => ErrorKind::Runtime,
        }
    }

    /// Heading for the message shown to the user. Runtime failures are
    /// titled by the tool that hit them, so the caller passes that in.
    pub fn title(&self, runtime_title: &'static str) -> &'static str {
        match self {
            ToolError::InvalidPdf { .. } => "Invalid file",
            ToolError::InvalidFolder { .. } => "Invalid folder",
            ToolError::NoImages { .. } => "No images",
            ToolError::NoPdfs { .. } => "No PDFs",
            ToolError::RasterizerMissing { .. } => "Poppler required",
            _ => runtime_title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_folders_are_not_input_errors() {
        let e = ToolError::NoPdfs {
            folder: PathBuf::from("/tmp"),
        };
        assert_eq!(e.kind(), ErrorKind::NothingToDo);
        assert_eq!(e.title("Merge failed"), "No PDFs");
        assert_eq!(e.to_string(), "No PDF files found in the selected folder.");
    }

    #[test]
    fn runtime_errors_take_the_tool_title() {
        let e = ToolError::io(
            "/nowhere/out.pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(e.kind(), ErrorKind::Runtime);
        assert_eq!(e.title("Conversion failed"), "Conversion failed");
        assert!(e.to_string().contains("/nowhere/out.pdf"), "got: {e}");
    }

    #[test]
    fn missing_engine_message_is_the_help_text() {
        let e = ToolError::RasterizerMissing {
            help: "pdftoppm not found.".into(),
        };
        assert_eq!(e.kind(), ErrorKind::MissingEngine);
        assert_eq!(e.title("Conversion failed"), "Poppler required");
        assert_eq!(e.to_string(), "pdftoppm not found.");
    }
}
