//! Barcode detector capability
//!
//! The cascade never decodes symbologies itself. It hands each view to a
//! [`BarcodeDetector`] and only looks at the first symbol returned:
//! - [`multi::MultiFormatDetector`] is the default backend, covering linear
//!   and 2D symbologies (feature `rxing`)
//! - [`qr::QrDetector`] is a QR-only backend (feature `qr`)
//! - [`scripted::ScriptedDetector`] and [`FnDetector`] are scripted fakes
//!   for exercising cascade policy without real symbols

use crate::error::DetectError;
use crate::models::{RasterImage, Symbol};

/// Linear and 2D backend
#[cfg(feature = "rxing")]
pub mod multi;
/// QR-only backend
#[cfg(feature = "qr")]
pub mod qr;
/// Scripted detectors for policy tests
pub mod scripted;

/// Something that finds and decodes barcodes in a raster
pub trait BarcodeDetector {
    /// Scan one view and return every decoded symbol in the backend's own order
    fn detect(&mut self, image: &RasterImage) -> Result<Vec<Symbol>, DetectError>;
}

impl<D: BarcodeDetector + ?Sized> BarcodeDetector for &mut D {
    fn detect(&mut self, image: &RasterImage) -> Result<Vec<Symbol>, DetectError> {
        (**self).detect(image)
    }
}

impl<D: BarcodeDetector + ?Sized> BarcodeDetector for Box<D> {
    fn detect(&mut self, image: &RasterImage) -> Result<Vec<Symbol>, DetectError> {
        (**self).detect(image)
    }
}

/// Detector backed by a closure
pub struct FnDetector<F>(F);

/// Wrap a closure as a detector
pub fn from_fn<F>(f: F) -> FnDetector<F>
where
    F: FnMut(&RasterImage) -> Result<Vec<Symbol>, DetectError>,
{
    FnDetector(f)
}

impl<F> BarcodeDetector for FnDetector<F>
where
    F: FnMut(&RasterImage) -> Result<Vec<Symbol>, DetectError>,
{
    fn detect(&mut self, image: &RasterImage) -> Result<Vec<Symbol>, DetectError> {
        (self.0)(image)
    }
}

/// The detector compiled into this build, if any
///
/// Prefers the multi-format backend and falls back to QR-only.
pub fn default_detector() -> Option<Box<dyn BarcodeDetector>> {
    #[cfg(feature = "rxing")]
    return Some(Box::new(multi::MultiFormatDetector::new()));
    #[cfg(all(feature = "qr", not(feature = "rxing")))]
    return Some(Box::new(qr::QrDetector::new()));
    #[cfg(not(any(feature = "qr", feature = "rxing")))]
    None
}
