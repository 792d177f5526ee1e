use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{destination, failed, rejected, Outcome};
use crate::error::ToolError;
use crate::listing::{candidates, PDF_EXTENSIONS};
use crate::pdf::merge::Merger;
use crate::pdf::PdfDocument;
use crate::ui::{Level, Ui};

pub const DEFAULT_NAME: &str = "merged.pdf";
pub const SAVE_TITLE: &str = "Save merged PDF as";
pub const RUNNING_STATUS: &str = "Merging PDFs...";
const FAILED_STATUS: &str = "Error during merge.";
const FAILED_TITLE: &str = "Merge failed";

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub files: usize,
    pub pages: usize,
    pub output: PathBuf,
}

/// The PDFs found in a folder, in concatenation order.
#[derive(Debug)]
pub struct MergePdfs {
    inputs: Vec<PathBuf>,
}

impl MergePdfs {
    pub fn prepare<P: AsRef<Path>>(folder: P) -> Result<Self, ToolError> {
        let folder = folder.as_ref();
        let inputs = candidates(folder, PDF_EXTENSIONS)?;
        if inputs.is_empty() {
            return Err(ToolError::NoPdfs {
                folder: folder.to_path_buf(),
            });
        }
        Ok(MergePdfs { inputs })
    }

    pub fn run<P: AsRef<Path>>(&self, output: P) -> Result<MergeReport, ToolError> {
        let output = output.as_ref();

        // Everything is loaded before the output is opened, so the
        // destination may be one of the inputs.
        let mut merger = Merger::new();
        for input in &self.inputs {
            let doc = PdfDocument::open(input)?;
            let pages = merger
                .append(doc.into_inner())
                .map_err(|e| ToolError::pdf(input, e))?;
            debug!(input = %input.display(), pages, "queued for merge");
        }

        let pages = merger.page_count();
        let mut merged = merger.finish();
        PdfDocument::save(&mut merged, output)?;

        info!(
            files = self.inputs.len(),
            pages,
            output = %output.display(),
            "merged PDFs"
        );
        Ok(MergeReport {
            files: self.inputs.len(),
            pages,
            output: output.to_path_buf(),
        })
    }
}

pub fn run<P: AsRef<Path>>(folder: P, output: Option<&Path>, ui: &mut dyn Ui) -> Outcome {
    let job = match MergePdfs::prepare(folder) {
        Ok(job) => job,
        Err(e) => return rejected(ui, &e, FAILED_TITLE),
    };

    let output = match destination(ui, output, SAVE_TITLE, DEFAULT_NAME) {
        Ok(Some(path)) => path,
        Ok(None) => return Outcome::Cancelled,
        Err(e) => return failed(ui, &ToolError::io("<stdin>", e), FAILED_TITLE, FAILED_STATUS),
    };

    ui.status(RUNNING_STATUS);
    match job.run(&output) {
        Ok(report) => {
            ui.status(&format!(
                "Merged {} PDF(s) to: {}",
                report.files,
                report.output.display()
            ));
            ui.notify(
                Level::Info,
                "Completed",
                &format!(
                    "Merged {} file(s).\n{}",
                    report.files,
                    report.output.display()
                ),
            );
            Outcome::Succeeded
        }
        Err(e) => failed(ui, &e, FAILED_TITLE, FAILED_STATUS),
    }
}
