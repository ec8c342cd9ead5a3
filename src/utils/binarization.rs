use image::GrayImage;

use super::filter::{Border, gaussian_blur};

/// Convert grayscale image to binary using Otsu's thresholding method
/// Returns an image where foreground (above threshold) = 255, background = 0
pub fn otsu_binarize(gray: &GrayImage) -> GrayImage {
    let threshold = calculate_otsu_threshold(gray.as_raw());
    threshold_binarize(gray, threshold)
}

/// Calculate Otsu's optimal threshold
///
/// Pixels `<= threshold` form the dark class. The first threshold reaching
/// the maximal between-class variance wins; a flat histogram yields 0.
pub fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    // Build histogram
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = gray.len() as f64;
    if total_pixels == 0.0 {
        return 0;
    }
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 0u8;
    let mut class1_pixels = 0.0f64;
    let mut class1_sum = 0.0f64;

    for threshold in 0..255usize {
        class1_pixels += histogram[threshold] as f64;
        class1_sum += (threshold as u64 * histogram[threshold]) as f64;

        let class2_pixels = total_pixels - class1_pixels;
        if class1_pixels == 0.0 || class2_pixels == 0.0 {
            continue;
        }

        let class1_mean = class1_sum / class1_pixels;
        let class2_mean = (total_sum - class1_sum) / class2_pixels;

        let weight1 = class1_pixels / total_pixels;
        let weight2 = class2_pixels / total_pixels;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization: `v > threshold` becomes 255
pub fn threshold_binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    let mut binary = gray.clone();
    for pixel in binary.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > threshold { 255 } else { 0 };
    }
    binary
}

/// Locally adaptive binarization against a Gaussian-weighted mean
///
/// Each pixel is compared with the Gaussian mean of its `block_size`
/// neighbourhood (replicated border) minus `offset`.
pub fn adaptive_binarize(gray: &GrayImage, block_size: usize, offset: i32) -> GrayImage {
    let mean = gaussian_blur(gray, block_size, Border::Replicate);
    let mut binary = gray.clone();
    for (pixel, m) in binary.pixels_mut().zip(mean.pixels()) {
        let diff = pixel.0[0] as i32 - m.0[0] as i32;
        pixel.0[0] = if diff > -offset { 255 } else { 0 };
    }
    binary
}
