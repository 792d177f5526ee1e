use image::{ColorType, DynamicImage, ImageReader};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{destination, failed, rejected, Outcome};
use crate::error::ToolError;
use crate::jpeg::JpegSettings;
use crate::listing::{candidates, IMAGE_EXTENSIONS};
use crate::pdf::writer::{ColorSpace, ImagePage, ImagePdfWriter};
use crate::pdf::PdfDocument;
use crate::ui::{Level, Ui};

/// Resolution tag for generated pages.
pub const RESOLUTION: f32 = 300.0;
pub const DEFAULT_NAME: &str = "output.pdf";
pub const SAVE_TITLE: &str = "Save PDF as";
pub const RUNNING_STATUS: &str = "Building PDF...";
const FAILED_STATUS: &str = "Error during conversion.";
const FAILED_TITLE: &str = "Conversion failed";

#[derive(Debug, Clone, Serialize)]
pub struct ImagesToPdfReport {
    pub images: usize,
    pub output: PathBuf,
}

/// The images found in a folder, in output page order.
#[derive(Debug)]
pub struct ImagesToPdf {
    images: Vec<PathBuf>,
}

impl ImagesToPdf {
    pub fn prepare<P: AsRef<Path>>(folder: P) -> Result<Self, ToolError> {
        let folder = folder.as_ref();
        let images = candidates(folder, IMAGE_EXTENSIONS)?;
        if images.is_empty() {
            return Err(ToolError::NoImages {
                folder: folder.to_path_buf(),
            });
        }
        debug!(count = images.len(), folder = %folder.display(), "found images");
        Ok(ImagesToPdf { images })
    }

    /// Decode every image first, then write the PDF in one go.
    pub fn run<P: AsRef<Path>>(&self, output: P) -> Result<ImagesToPdfReport, ToolError> {
        let output = output.as_ref();
        let pages = self
            .images
            .iter()
            .map(|path| load_page(path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut doc = ImagePdfWriter::new(RESOLUTION)
            .build(pages)
            .map_err(|e| ToolError::pdf(output, e))?;
        PdfDocument::save(&mut doc, output)?;

        info!(images = self.images.len(), output = %output.display(), "created PDF from images");
        Ok(ImagesToPdfReport {
            images: self.images.len(),
            output: output.to_path_buf(),
        })
    }
}

fn load_page(path: &Path) -> Result<ImagePage, ToolError> {
    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| ToolError::io(path, e))?
        .decode()
        .map_err(|source| ToolError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    encode_page(&img).map_err(|source| ToolError::Encode {
        path: path.to_path_buf(),
        source,
    })
}

/// Grayscale stays gray. Everything else, palette and alpha images
/// included, is flattened to 8-bit RGB.
fn encode_page(img: &DynamicImage) -> Result<ImagePage, crate::jpeg::JpegError> {
    let (width, height) = (img.width(), img.height());
    let (color, jpeg) = match img.color() {
        ColorType::L8 | ColorType::L16 => (
            ColorSpace::Gray,
            JpegSettings::EMBEDDED.encode_gray(&img.to_luma8())?,
        ),
        _ => (
            ColorSpace::Rgb,
            JpegSettings::EMBEDDED.encode_rgb(&img.to_rgb8())?,
        ),
    };
    Ok(ImagePage {
        width,
        height,
        color,
        jpeg,
    })
}

/// Interactive flow: list, ask where to save, build.
pub fn run<P: AsRef<Path>>(folder: P, output: Option<&Path>, ui: &mut dyn Ui) -> Outcome {
    let job = match ImagesToPdf::prepare(folder) {
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
            ui.status(&format!("Saved PDF: {}", report.output.display()));
            ui.notify(
                Level::Info,
                "Completed",
                &format!(
                    "Created PDF from {} image(s).\n{}",
                    report.images,
                    report.output.display()
                ),
            );
            Outcome::Succeeded
        }
        Err(e) => failed(ui, &e, FAILED_TITLE, FAILED_STATUS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::RecordingUi;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use lopdf::Document;
    use tempfile::TempDir;

    fn write_fixtures(dir: &Path) {
        RgbImage::from_pixel(30, 20, Rgb([255, 0, 0]))
            .save(dir.join("b.jpg"))
            .unwrap();
        RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 128]))
            .save(dir.join("A.png"))
            .unwrap();
        GrayImage::from_pixel(12, 8, Luma([90]))
            .save(dir.join("c.bmp"))
            .unwrap();
        std::fs::write(dir.join("readme.txt"), "not an image").unwrap();
    }

    #[test]
    fn test_page_per_recognised_image() {
        let tmp = TempDir::new().unwrap();
        write_fixtures(tmp.path());
        let output = tmp.path().join("out.pdf");

        let report = ImagesToPdf::prepare(tmp.path())
            .unwrap()
            .run(&output)
            .unwrap();
        assert_eq!(report.images, 3);

        let doc = Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_sorted_by_lowercase_name() {
        let tmp = TempDir::new().unwrap();
        write_fixtures(tmp.path());

        let job = ImagesToPdf::prepare(tmp.path()).unwrap();
        let names: Vec<_> = job
            .images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.png", "b.jpg", "c.bmp"]);
    }

    #[test]
    fn test_alpha_flattened_and_gray_kept() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4])));
        assert_eq!(encode_page(&rgba).unwrap().color, ColorSpace::Rgb);

        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([7])));
        assert_eq!(encode_page(&gray).unwrap().color, ColorSpace::Gray);
    }

    #[test]
    fn test_empty_folder_warns_without_prompting() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let mut ui = RecordingUi::default();
        assert_eq!(run(tmp.path(), None, &mut ui), Outcome::NothingToDo);
        assert!(ui.prompts.is_empty());
        let (level, title, message) = ui.last_message();
        assert_eq!(*level, Level::Warning);
        assert_eq!(title, "No images");
        assert_eq!(message, "No compatible images found in the selected folder.");
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_cancelled_prompt_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        write_fixtures(tmp.path());

        let mut ui = RecordingUi::answering(None);
        assert_eq!(run(tmp.path(), None, &mut ui), Outcome::Cancelled);
        assert_eq!(
            ui.prompts,
            vec![(SAVE_TITLE.to_string(), DEFAULT_NAME.to_string())]
        );
        assert!(ui.messages.is_empty());
        assert!(ui.statuses.is_empty());
    }

    #[test]
    fn test_prompted_destination_is_used() {
        let tmp = TempDir::new().unwrap();
        write_fixtures(tmp.path());
        let dest = tmp.path().join("album.pdf");

        let mut ui = RecordingUi::answering(Some(dest.clone()));
        assert_eq!(run(tmp.path(), None, &mut ui), Outcome::Succeeded);
        assert!(dest.is_file());
        assert_eq!(ui.statuses[0], RUNNING_STATUS);
        let (_, _, message) = ui.last_message();
        assert!(message.starts_with("Created PDF from 3 image(s).\n"), "got: {message}");
    }

    #[test]
    fn test_undecodable_image_fails() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("broken.png"), b"definitely not a png").unwrap();
        let dest = tmp.path().join("out.pdf");

        let mut ui = RecordingUi::default();
        assert_eq!(run(tmp.path(), Some(&dest), &mut ui), Outcome::Failed);
        assert!(!dest.exists());
        let (level, title, _) = ui.last_message();
        assert_eq!(*level, Level::Error);
        assert_eq!(title, "Conversion failed");
    }
}
