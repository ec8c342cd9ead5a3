//! Utility functions for image processing
//!
//! This module provides the pixel-level operations behind the photometric views:
//! - Grayscale conversion (RGB to luminance)
//! - Binarization (Otsu's method and Gaussian-adaptive)
//! - Gaussian smoothing and border handling
//! - Morphology (dilate, erode, close)
//! - Contrast-limited adaptive histogram equalization

pub mod binarization;
pub mod clahe;
pub mod filter;
pub mod grayscale;
pub mod morphology;
