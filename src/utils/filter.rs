//! Separable Gaussian smoothing on 8-bit grayscale images

use image::GrayImage;

/// How samples outside the image are synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    /// `aaa|abcd|ddd`
    Replicate,
    /// `dcb|abcd|cba`
    Reflect101,
}

/// Map a possibly out-of-range coordinate back into `0..len`
pub fn border_index(i: isize, len: usize, border: Border) -> usize {
    if len <= 1 {
        return 0;
    }
    let last = len as isize - 1;
    match border {
        Border::Replicate => i.clamp(0, last) as usize,
        Border::Reflect101 => {
            let mut i = i;
            while i < 0 || i > last {
                if i < 0 {
                    i = -i;
                }
                if i > last {
                    i = 2 * last - i;
                }
            }
            i as usize
        }
    }
}

/// Normalized 1D Gaussian kernel for an odd `ksize`
///
/// Sizes up to 7 use the fixed binomial taps; larger sizes derive
/// sigma = 0.3 * ((ksize - 1) * 0.5 - 1) + 0.8.
pub fn gaussian_kernel(ksize: usize) -> Vec<f32> {
    match ksize {
        1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
        _ => {
            let sigma = 0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8;
            let half = (ksize / 2) as isize;
            let scale = -0.5 / (sigma * sigma);
            let mut kernel: Vec<f32> = (-half..=half)
                .map(|x| ((x * x) as f32 * scale).exp())
                .collect();
            let sum: f32 = kernel.iter().sum();
            for k in kernel.iter_mut() {
                *k /= sum;
            }
            kernel
        }
    }
}

/// Blur a grayscale image with a `ksize`×`ksize` Gaussian kernel
pub fn gaussian_blur(gray: &GrayImage, ksize: usize, border: Border) -> GrayImage {
    let smoothed = gaussian_smooth(gray, ksize, border);
    let (width, height) = gray.dimensions();
    let data = smoothed
        .into_iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Gaussian-weighted local mean, kept at full precision
pub(crate) fn gaussian_smooth(gray: &GrayImage, ksize: usize, border: Border) -> Vec<f32> {
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let src = gray.as_raw();
    let kernel = gaussian_kernel(ksize);
    let half = (ksize / 2) as isize;

    // Horizontal pass
    let mut horiz = vec![0.0f32; width * height];
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = border_index(x as isize + k as isize - half, width, border);
                acc += w * row[sx] as f32;
            }
            horiz[y * width + x] = acc;
        }
    }

    // Vertical pass
    let mut out = vec![0.0f32; width * height];
    for y in 0..height {
        for (k, &w) in kernel.iter().enumerate() {
            let sy = border_index(y as isize + k as isize - half, height, border);
            let src_row = &horiz[sy * width..(sy + 1) * width];
            let dst_row = &mut out[y * width..(y + 1) * width];
            for (d, &s) in dst_row.iter_mut().zip(src_row) {
                *d += w * s;
            }
        }
    }

    out
}
