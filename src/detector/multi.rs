use log::trace;
use rxing::BarcodeFormat;
use rxing::helpers::detect_multiple_in_luma;

use super::BarcodeDetector;
use crate::error::DetectError;
use crate::models::{RasterImage, Symbol};
use crate::utils::grayscale::to_gray_image;

/// Linear and 2D detector built on `rxing`
///
/// Covers the retail and logistics symbologies (EAN/UPC, Code 128/39/93,
/// ITF, Codabar, DataBar) as well as QR, Data Matrix, Aztec and PDF417.
/// Symbologies are named the way zbar names them (`EAN13`, `UPCA`,
/// `CODE128`, `I25`, `QRCODE`, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiFormatDetector;

impl MultiFormatDetector {
    /// Create a new detector
    pub fn new() -> Self {
        Self
    }
}

impl BarcodeDetector for MultiFormatDetector {
    fn detect(&mut self, image: &RasterImage) -> Result<Vec<Symbol>, DetectError> {
        if image.is_empty() {
            return Err(DetectError::Dimensions {
                width: image.width(),
                height: image.height(),
            });
        }

        let gray = to_gray_image(image);
        let (width, height) = gray.dimensions();
        // rxing reports "nothing here" as an error, like zbar returning zero symbols
        let results = match detect_multiple_in_luma(gray.into_raw(), width, height) {
            Ok(results) => results,
            Err(err) => {
                trace!("no symbol in {width}x{height} view: {err:?}");
                return Ok(Vec::new());
            }
        };

        Ok(results
            .iter()
            .map(|r| Symbol::new(r.getText(), symbology_name(r.getBarcodeFormat())))
            .collect())
    }
}

/// zbar-style name for an rxing barcode format
pub fn symbology_name(format: &BarcodeFormat) -> String {
    match format {
        BarcodeFormat::ITF => "I25".to_string(),
        BarcodeFormat::RSS_14 => "DATABAR".to_string(),
        BarcodeFormat::RSS_EXPANDED => "DATABAR_EXP".to_string(),
        other => format!("{other:?}").replace('_', ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_symbology_names_follow_zbar() {
        assert_eq!(symbology_name(&BarcodeFormat::EAN_13), "EAN13");
        assert_eq!(symbology_name(&BarcodeFormat::EAN_8), "EAN8");
        assert_eq!(symbology_name(&BarcodeFormat::UPC_A), "UPCA");
        assert_eq!(symbology_name(&BarcodeFormat::UPC_E), "UPCE");
        assert_eq!(symbology_name(&BarcodeFormat::CODE_128), "CODE128");
        assert_eq!(symbology_name(&BarcodeFormat::QR_CODE), "QRCODE");
        assert_eq!(symbology_name(&BarcodeFormat::ITF), "I25");
        assert_eq!(symbology_name(&BarcodeFormat::RSS_14), "DATABAR");
    }

    #[test]
    fn test_blank_image_has_no_symbols() {
        let image = RasterImage::Gray(GrayImage::from_pixel(64, 64, Luma([255])));
        let symbols = MultiFormatDetector::new().detect(&image).unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let image = RasterImage::Gray(GrayImage::new(0, 0));
        assert!(matches!(
            MultiFormatDetector::new().detect(&image),
            Err(DetectError::Dimensions { width: 0, height: 0 })
        ));
    }
}
