pub mod check;
pub mod images_to_pdf;
pub mod merge;
pub mod pdf_to_images;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;

use crate::error::{ErrorKind, ToolError};
use crate::ui::{with_default_extension, Level, Ui};

/// How one user action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    /// Empty folder; a warning was shown and nothing was written.
    NothingToDo,
    /// The save prompt was dismissed.
    Cancelled,
    Failed,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Failed => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        }
    }
}

/// Report an error raised before any work started.
fn rejected(ui: &mut dyn Ui, err: &ToolError, runtime_title: &'static str) -> Outcome {
    let title = err.title(runtime_title);
    match err.kind() {
        ErrorKind::NothingToDo => {
            ui.notify(Level::Warning, title, &err.to_string());
            Outcome::NothingToDo
        }
        _ => {
            ui.notify(Level::Error, title, &err.to_string());
            Outcome::Failed
        }
    }
}

/// Report an error raised while the tool was running.
fn failed(
    ui: &mut dyn Ui,
    err: &ToolError,
    runtime_title: &'static str,
    status: &str,
) -> Outcome {
    warn!(error = %err, "{}", runtime_title);
    ui.status(status);
    ui.notify(Level::Error, err.title(runtime_title), &err.to_string());
    Outcome::Failed
}

/// Use the preset output path if there is one, otherwise ask.
fn destination(
    ui: &mut dyn Ui,
    preset: Option<&Path>,
    title: &str,
    default_name: &str,
) -> std::io::Result<Option<PathBuf>> {
    match preset {
        Some(path) => Ok(Some(with_default_extension(path.to_path_buf()))),
        None => ui.ask_save_path(title, default_name),
    }
}
