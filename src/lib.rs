//! barcode_cascade - recover barcodes that a first detection pass misses
//!
//! Runs an external barcode detector over a fixed, ordered cascade of views
//! derived from one still image: the original, seven photometric variants,
//! and the four quarter-turn rotations with their own photometric variants.
//! The first view on which the detector reports a symbol wins, and its label
//! is returned as the `method` of the outcome.
//!
//! ```no_run
//! use barcode_cascade::{Cascade, ImageCrateCodec, detector::scripted::ScriptedDetector};
//!
//! let bytes = std::fs::read("label.png").unwrap();
//! let mut cascade = Cascade::new(ScriptedDetector::new());
//! let outcome = cascade.decode_bytes(&ImageCrateCodec::new(), &bytes);
//! println!("{}", outcome.to_json().unwrap());
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Cascade controller: search order and short-circuiting scan
pub mod cascade;
/// Image codec capability
pub mod codec;
/// Runtime configuration
pub mod config;
/// Barcode detector capability and backends
pub mod detector;
/// Error types
pub mod error;
/// Core data structures (RasterImage, View, Symbol, DecodeOutcome)
pub mod models;
/// Helpers shared by the binaries (input sources, dataset walking)
pub mod tools;
/// Transform generator: photometric views and rotations
pub mod transforms;
/// Pixel-level image operations (grayscale, binarization, filters, CLAHE)
pub mod utils;

pub use cascade::{Cascade, CascadeReport, Hit, Phase, Step, ViewSource, plan};
pub use codec::{ImageCodec, ImageCrateCodec};
pub use config::CascadeConfig;
pub use detector::BarcodeDetector;
pub use error::{CascadeError, DetectError};
pub use models::{DecodeOutcome, RasterImage, Symbol, View};
pub use transforms::{Photometric, Rotation, photometric_views, rotations};

/// Decode encoded image bytes with the built-in codec and detector
///
/// Returns `None` when this build carries no detector backend.
pub fn decode_bytes(bytes: &[u8]) -> Option<DecodeOutcome> {
    let detector = detector::default_detector()?;
    let codec = ImageCrateCodec::with_config(&CascadeConfig::from_env());
    Some(Cascade::new(detector).decode_bytes(&codec, bytes))
}
