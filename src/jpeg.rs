//! JPEG encoding via `jpeg-encoder`, which (unlike `image`'s encoder) can
//! write progressive scans with optimized Huffman tables.

use image::{GrayImage, RgbImage};
use jpeg_encoder::{ColorType, Encoder, EncodingError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JpegError {
    #[error("{width}x{height} exceeds the JPEG limit of 65535 pixels per side")]
    TooLarge { width: u32, height: u32 },

    #[error(transparent)]
    Encode(#[from] EncodingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegSettings {
    pub quality: u8,
    pub progressive: bool,
    pub optimize: bool,
}

impl JpegSettings {
    /// Rasterized PDF pages.
    pub const PAGE: JpegSettings = JpegSettings {
        quality: 92,
        progressive: true,
        optimize: true,
    };

    /// Images embedded in a generated PDF. Baseline, so every viewer's
    /// DCT decoder copes.
    pub const EMBEDDED: JpegSettings = JpegSettings {
        quality: 75,
        progressive: false,
        optimize: false,
    };

    pub fn encode_rgb(&self, img: &RgbImage) -> Result<Vec<u8>, JpegError> {
        self.encode(img.as_raw(), img.width(), img.height(), ColorType::Rgb)
    }

    pub fn encode_gray(&self, img: &GrayImage) -> Result<Vec<u8>, JpegError> {
        self.encode(img.as_raw(), img.width(), img.height(), ColorType::Luma)
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        color: ColorType,
    ) -> Result<Vec<u8>, JpegError> {
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(JpegError::TooLarge { width, height });
        };

        let mut buf = Vec::new();
        let mut encoder = Encoder::new(&mut buf, self.quality);
        encoder.set_progressive(self.progressive);
        encoder.set_optimized_huffman_tables(self.optimize);
        encoder.encode(data, w, h, color)?;
        Ok(buf)
    }
}
