//! Grayscale morphology with a square structuring element
//!
//! Windows are clipped at the image edge, so out-of-range samples never take
//! part in the min/max.

use image::GrayImage;

fn rank_filter(gray: &GrayImage, radius: usize, pick: fn(u8, u8) -> u8, init: u8) -> GrayImage {
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let src = gray.as_raw();

    // Separable: a square window is a row pass followed by a column pass
    let mut rows = vec![0u8; width * height];
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(width - 1);
            rows[y * width + x] = row[lo..=hi].iter().fold(init, |acc, &v| pick(acc, v));
        }
    }

    let mut out = vec![0u8; width * height];
    for y in 0..height {
        let lo = y.saturating_sub(radius);
        let hi = (y + radius).min(height - 1);
        for x in 0..width {
            out[y * width + x] = (lo..=hi).fold(init, |acc, sy| pick(acc, rows[sy * width + x]));
        }
    }

    GrayImage::from_raw(gray.width(), gray.height(), out)
        .unwrap_or_else(|| GrayImage::new(gray.width(), gray.height()))
}

/// Local maximum over a `(2 * radius + 1)` square window
pub fn dilate(gray: &GrayImage, radius: usize) -> GrayImage {
    rank_filter(gray, radius, u8::max, u8::MIN)
}

/// Local minimum over a `(2 * radius + 1)` square window
pub fn erode(gray: &GrayImage, radius: usize) -> GrayImage {
    rank_filter(gray, radius, u8::min, u8::MAX)
}

/// Morphological closing: dilation followed by erosion
///
/// Fills dark gaps narrower than the window, e.g. print voids inside bars.
pub fn close(gray: &GrayImage, radius: usize) -> GrayImage {
    erode(&dilate(gray, radius), radius)
}
