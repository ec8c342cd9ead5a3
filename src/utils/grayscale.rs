//! Convert RGB image to grayscale
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fast integer arithmetic: Y = (77*R + 150*G + 29*B) >> 8
//!
//! The weights sum to 256 so pure white maps to 255 and pure black to 0.

use image::GrayImage;

use crate::models::RasterImage;

/// Coefficients for grayscale conversion: Y = (77*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 77;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8) as u8
}

/// Convert interleaved RGB bytes to a luminance buffer
///
/// Converts at most `width * height` pixels; a short buffer yields a
/// correspondingly short result and a trailing partial pixel is ignored.
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width.saturating_mul(height);
    let rgb = &rgb[..pixel_count.saturating_mul(3).min(rgb.len())];
    let mut gray = Vec::with_capacity(rgb.len() / 3);

    // Process 8 pixels per iteration to help the optimizer vectorize
    let mut chunks = rgb.chunks_exact(24);
    for chunk in &mut chunks {
        for px in chunk.chunks_exact(3) {
            gray.push(luminance(px[0], px[1], px[2]));
        }
    }
    for px in chunks.remainder().chunks_exact(3) {
        gray.push(luminance(px[0], px[1], px[2]));
    }

    gray
}

/// Derive the single-channel view of any raster
///
/// Grayscale input is copied through unchanged into a new buffer.
pub fn to_gray_image(image: &RasterImage) -> GrayImage {
    match image {
        RasterImage::Gray(gray) => gray.clone(),
        RasterImage::Color(rgb) => {
            let (width, height) = rgb.dimensions();
            let gray = rgb_to_grayscale(rgb.as_raw(), width as usize, height as usize);
            // Length always equals width * height, so this cannot fail
            GrayImage::from_raw(width, height, gray).unwrap_or_else(|| GrayImage::new(width, height))
        }
    }
}
