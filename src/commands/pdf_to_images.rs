use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{failed, rejected, Outcome};
use crate::config::Config;
use crate::error::ToolError;
use crate::jpeg::JpegSettings;
use crate::listing::{has_extension, PDF_EXTENSIONS};
use crate::raster::Rasterizer;
use crate::ui::{Level, Ui};

pub const RUNNING_STATUS: &str = "Converting at 300 DPI...";
const FAILED_STATUS: &str = "Error during conversion.";
const FAILED_TITLE: &str = "Conversion failed";

#[derive(Debug, Clone, Serialize)]
pub struct PdfToImagesReport {
    pub pages: usize,
    pub output_dir: PathBuf,
    pub images: Vec<PathBuf>,
}

/// A validated PDF → JPEG conversion, ready to run.
#[derive(Debug)]
pub struct PdfToImages {
    pdf: PathBuf,
    stem: String,
    output_dir: PathBuf,
    rasterizer: Rasterizer,
}

impl PdfToImages {
    /// Check the input and locate pdftoppm. Nothing is written yet.
    pub fn prepare<P: AsRef<Path>>(pdf: P, config: &Config) -> Result<Self, ToolError> {
        let pdf = pdf.as_ref();
        validate_pdf(pdf)?;
        Ok(Self::with_rasterizer(pdf, config.require_rasterizer()?))
    }

    fn with_rasterizer(pdf: &Path, rasterizer: Rasterizer) -> Self {
        let stem = pdf
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output_dir = pdf
            .parent()
            .unwrap_or(Path::new(""))
            .join(format!("{}_images", stem));
        PdfToImages {
            pdf: pdf.to_path_buf(),
            stem,
            output_dir,
            rasterizer,
        }
    }

    /// Rasterize, then re-encode page `i` as `<stem>[i].jpeg`.
    ///
    /// The intermediate PPM files are removed once converted unless
    /// `keep_intermediate` is set. A failure part-way leaves whatever was
    /// already written.
    pub fn run(&self, keep_intermediate: bool) -> Result<PdfToImagesReport, ToolError> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ToolError::io(&self.output_dir, e))?;

        let rendered = self.rasterizer.render(&self.pdf, &self.output_dir)?;

        let mut images = Vec::with_capacity(rendered.len());
        for (index, ppm) in rendered.iter().enumerate() {
            let jpeg = self
                .output_dir
                .join(format!("{}[{}].jpeg", self.stem, index));
            reencode(ppm, &jpeg)?;
            debug!(page = index, jpeg = %jpeg.display(), "wrote page");

            if !keep_intermediate {
                if let Err(e) = std::fs::remove_file(ppm) {
                    warn!(path = %ppm.display(), error = %e, "could not remove intermediate file");
                }
            }
            images.push(jpeg);
        }

        info!(pages = images.len(), output_dir = %self.output_dir.display(), "converted PDF to JPEG");
        Ok(PdfToImagesReport {
            pages: images.len(),
            output_dir: self.output_dir.clone(),
            images,
        })
    }
}

fn validate_pdf(path: &Path) -> Result<(), ToolError> {
    if path.is_file() && has_extension(path, PDF_EXTENSIONS) {
        Ok(())
    } else {
        Err(ToolError::InvalidPdf {
            path: path.to_path_buf(),
        })
    }
}

fn reencode(ppm: &Path, jpeg: &Path) -> Result<(), ToolError> {
    let img = image::open(ppm).map_err(|source| ToolError::Image {
        path: ppm.to_path_buf(),
        source,
    })?;
    let bytes = JpegSettings::PAGE
        .encode_rgb(&img.to_rgb8())
        .map_err(|source| ToolError::Encode {
            path: ppm.to_path_buf(),
            source,
        })?;
    std::fs::write(jpeg, bytes).map_err(|e| ToolError::io(jpeg, e))
}

pub fn run<P: AsRef<Path>>(
    pdf: P,
    config: &Config,
    keep_intermediate: bool,
    ui: &mut dyn Ui,
) -> Outcome {
    let job = match PdfToImages::prepare(pdf, config) {
        Ok(job) => job,
        Err(e) => return rejected(ui, &e, FAILED_TITLE),
    };
    execute(&job, keep_intermediate, ui)
}

fn execute(job: &PdfToImages, keep_intermediate: bool, ui: &mut dyn Ui) -> Outcome {
    ui.status(RUNNING_STATUS);
    match job.run(keep_intermediate) {
        Ok(report) => {
            ui.status(&format!(
                "Done. Saved {} JPEG(s) to: {}",
                report.pages,
                report.output_dir.display()
            ));
            ui.notify(
                Level::Info,
                "Completed",
                &format!(
                    "Converted {} page(s).\nFolder: {}",
                    report.pages,
                    report.output_dir.display()
                ),
            );
            Outcome::Succeeded
        }
        Err(e) => failed(ui, &e, FAILED_TITLE, FAILED_STATUS),
    }
}
