//! Contrast-limited adaptive histogram equalization (CLAHE)
//!
//! The image is split into a `tiles × tiles` grid. Each tile gets its own
//! equalization LUT built from a clipped histogram, and every output pixel is
//! bilinearly interpolated between the LUTs of the four nearest tile centers.
//! Images whose size is not a multiple of the grid are padded with a
//! reflect-101 border for the histogram pass only.

use image::GrayImage;

use super::filter::{Border, border_index};

/// Tuning for [`clahe`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaheParams {
    /// Histogram clip limit, relative to a uniform histogram
    pub clip_limit: f32,
    /// Number of tiles along each axis
    pub tiles: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles: 8,
        }
    }
}

/// Equalize local contrast of a grayscale image
pub fn clahe(gray: &GrayImage, params: ClaheParams) -> GrayImage {
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let tiles = params.tiles.max(1);
    if width == 0 || height == 0 {
        return gray.clone();
    }

    let tile_w = width.div_ceil(tiles);
    let tile_h = height.div_ceil(tiles);
    let tile_area = tile_w * tile_h;
    let clip = ((params.clip_limit * tile_area as f32 / 256.0) as usize).max(1);

    let src = gray.as_raw();
    let luts: Vec<[u8; 256]> = (0..tiles * tiles)
        .map(|t| {
            let (tx, ty) = (t % tiles, t / tiles);
            let mut hist = [0usize; 256];
            for y in ty * tile_h..(ty + 1) * tile_h {
                let sy = border_index(y as isize, height, Border::Reflect101);
                for x in tx * tile_w..(tx + 1) * tile_w {
                    let sx = border_index(x as isize, width, Border::Reflect101);
                    hist[src[sy * width + sx] as usize] += 1;
                }
            }
            clip_histogram(&mut hist, clip);
            build_lut(&hist, tile_area)
        })
        .collect();

    let inv_tw = 1.0 / tile_w as f32;
    let inv_th = 1.0 / tile_h as f32;
    let last = tiles as isize - 1;

    let mut out = vec![0u8; width * height];
    for y in 0..height {
        let tyf = y as f32 * inv_th - 0.5;
        let ty1 = tyf.floor() as isize;
        let ya = tyf - ty1 as f32;
        let (ty1, ty2) = (ty1.max(0) as usize, (ty1 + 1).min(last) as usize);

        for x in 0..width {
            let txf = x as f32 * inv_tw - 0.5;
            let tx1 = txf.floor() as isize;
            let xa = txf - tx1 as f32;
            let (tx1, tx2) = (tx1.max(0) as usize, (tx1 + 1).min(last) as usize);

            let v = src[y * width + x] as usize;
            let lut = |tx: usize, ty: usize| luts[ty * tiles + tx][v] as f32;
            let top = lut(tx1, ty1) * (1.0 - xa) + lut(tx2, ty1) * xa;
            let bottom = lut(tx1, ty2) * (1.0 - xa) + lut(tx2, ty2) * xa;
            let res = top * (1.0 - ya) + bottom * ya;
            out[y * width + x] = res.round().clamp(0.0, 255.0) as u8;
        }
    }

    GrayImage::from_raw(gray.width(), gray.height(), out)
        .unwrap_or_else(|| GrayImage::new(gray.width(), gray.height()))
}

/// Cap every bin at `clip` and spread the excess over the whole range
fn clip_histogram(hist: &mut [usize; 256], clip: usize) {
    let mut clipped = 0usize;
    for bin in hist.iter_mut() {
        if *bin > clip {
            clipped += *bin - clip;
            *bin = clip;
        }
    }

    let batch = clipped / 256;
    let mut residual = clipped - batch * 256;
    for bin in hist.iter_mut() {
        *bin += batch;
    }

    if residual > 0 {
        let step = (256 / residual).max(1);
        let mut i = 0;
        while i < 256 && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

fn build_lut(hist: &[usize; 256], tile_area: usize) -> [u8; 256] {
    let scale = 255.0 / tile_area as f32;
    let mut lut = [0u8; 256];
    let mut sum = 0usize;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
        sum += count;
        *entry = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_clip_histogram_preserves_mass() {
        let mut hist = [0usize; 256];
        hist[10] = 500;
        hist[200] = 100;
        clip_histogram(&mut hist, 20);
        assert_eq!(hist.iter().sum::<usize>(), 600);
        assert!(hist[10] <= 20 + 3);
    }

    #[test]
    fn test_lut_is_monotonic() {
        let mut hist = [0usize; 256];
        hist[40] = 32;
        hist[41] = 32;
        let lut = build_lut(&hist, 64);
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn test_flat_image_stays_flat() {
        let gray = GrayImage::from_pixel(64, 48, Luma([120]));
        let out = clahe(&gray, ClaheParams::default());
        let first = out.get_pixel(0, 0).0[0];
        assert!(out.pixels().all(|p| p.0[0] == first));
    }

    #[test]
    fn test_stretches_low_contrast() {
        // 16 gray levels (100..=115) repeated across a 256x256 image
        let gray = GrayImage::from_fn(256, 256, |x, _| Luma([100 + (x % 16) as u8]));
        let out = clahe(&gray, ClaheParams::default());
        let (min, max) = out
            .pixels()
            .fold((255u8, 0u8), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
        assert!(max - min > 15, "range {min}..{max} not stretched");
    }

    #[test]
    fn test_small_and_odd_sizes() {
        for (w, h) in [(1, 1), (3, 5), (13, 9)] {
            let gray = GrayImage::from_fn(w, h, |x, y| Luma([(x * 17 + y * 31) as u8]));
            let out = clahe(&gray, ClaheParams::default());
            assert_eq!(out.dimensions(), (w, h));
        }
    }
}
