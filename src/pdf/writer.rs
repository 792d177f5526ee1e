//! Build a PDF with one full-page image per page.
//!
//! Each image is embedded as a DCT (JPEG) XObject. The page size comes
//! from the pixel size and the resolution tag, so a 2480x3508 scan at 300
//! DPI gives an A4 page.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
}

impl ColorSpace {
    fn pdf_name(self) -> &'static str {
        match self {
            ColorSpace::Gray => "DeviceGray",
            ColorSpace::Rgb => "DeviceRGB",
        }
    }
}

/// One page worth of JPEG data.
#[derive(Debug, Clone)]
pub struct ImagePage {
    pub width: u32,
    pub height: u32,
    pub color: ColorSpace,
    pub jpeg: Vec<u8>,
}

pub struct ImagePdfWriter {
    resolution: f32,
}

impl ImagePdfWriter {
    pub fn new(resolution: f32) -> Self {
        ImagePdfWriter { resolution }
    }

    /// Page size in points for an image of the given pixel size.
    pub fn page_size(&self, width: u32, height: u32) -> (f32, f32) {
        let scale = 72.0 / self.resolution;
        (width as f32 * scale, height as f32 * scale)
    }

    pub fn build(&self, pages: Vec<ImagePage>) -> Result<Document, lopdf::Error> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

        for page in pages {
            let (w, h) = self.page_size(page.width, page.height);

            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => page.width as i64,
                    "Height" => page.height as i64,
                    "ColorSpace" => page.color.pdf_name(),
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                page.jpeg,
            )
            .with_compression(false));

            // Scale the unit square to the full page and paint the image.
            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            Object::Real(w),
                            0.into(),
                            0.into(),
                            Object::Real(h),
                            0.into(),
                            0.into(),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), Object::Real(w), Object::Real(h)],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        "Im0" => image_id,
                    },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jpeg::JpegSettings;
    use image::{Rgb, RgbImage};

    fn page(width: u32, height: u32) -> ImagePage {
        let img = RgbImage::from_pixel(width, height, Rgb([0, 128, 255]));
        ImagePage {
            width,
            height,
            color: ColorSpace::Rgb,
            jpeg: JpegSettings::EMBEDDED.encode_rgb(&img).unwrap(),
        }
    }

    #[test]
    fn test_page_size_from_resolution() {
        let writer = ImagePdfWriter::new(300.0);
        let (w, h) = writer.page_size(600, 300);
        assert!((w - 144.0).abs() < 1e-3);
        assert!((h - 72.0).abs() < 1e-3);
    }

    #[test]
    fn test_one_page_per_image() {
        let writer = ImagePdfWriter::new(300.0);
        let mut doc = writer.build(vec![page(30, 20), page(10, 40), page(5, 5)]).unwrap();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 3);
    }

    #[test]
    fn test_pages_keep_input_order() {
        let writer = ImagePdfWriter::new(300.0);
        let doc = writer.build(vec![page(300, 30), page(30, 300)]).unwrap();

        let pages = doc.get_pages();
        let first = doc.get_dictionary(pages[&1]).unwrap();
        let media_box = first.get(b"MediaBox").unwrap().as_array().unwrap();
        assert!((media_box[2].as_float().unwrap() - 72.0).abs() < 1e-3);
    }
}
