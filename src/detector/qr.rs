use log::trace;
use rqrr::PreparedImage;

use super::BarcodeDetector;
use crate::error::DetectError;
use crate::models::{RasterImage, Symbol};
use crate::utils::grayscale::to_gray_image;

/// Symbology name reported for QR symbols
pub const QR_SYMBOLOGY: &str = "QRCODE";

/// QR detector built on `rqrr`
///
/// Color views are reduced to luminance first; every grid that decodes is
/// returned in the order `rqrr` found it.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrDetector;

impl QrDetector {
    /// Create a new detector
    pub fn new() -> Self {
        Self
    }
}

impl BarcodeDetector for QrDetector {
    fn detect(&mut self, image: &RasterImage) -> Result<Vec<Symbol>, DetectError> {
        if image.is_empty() {
            return Err(DetectError::Dimensions {
                width: image.width(),
                height: image.height(),
            });
        }

        let gray = to_gray_image(image);
        let (width, height) = (gray.width() as usize, gray.height() as usize);
        let pixels = gray.as_raw();
        let mut prepared =
            PreparedImage::prepare_from_greyscale(width, height, |x, y| pixels[y * width + x]);

        let mut symbols = Vec::new();
        for (idx, grid) in prepared.detect_grids().iter().enumerate() {
            let mut payload = Vec::new();
            match grid.decode_to(&mut payload) {
                Ok(_) => symbols.push(Symbol::new(payload, QR_SYMBOLOGY)),
                Err(err) => trace!("grid {idx} failed to decode: {err}"),
            }
        }
        Ok(symbols)
    }
}
