#![allow(dead_code)]

use barcode_cascade::utils::grayscale::to_gray_image;
use barcode_cascade::{DetectError, RasterImage, Symbol};
use image::{GrayImage, ImageOutputFormat, Luma, Rgb, RgbImage};
use std::io::Cursor;

pub const DARK: u8 = 30;
pub const LIGHT: u8 = 220;
pub const QUIET: u32 = 16;
pub const BAR: u32 = 4;
pub const BARS: usize = 5;

/// Width of a bar pattern including both quiet zones
pub fn pattern_len() -> u32 {
    2 * QUIET + BARS as u32 * BAR + (BARS as u32 - 1) * BAR
}

/// Whether offset `t` along the pattern falls on a bar
fn on_bar(t: u32) -> bool {
    if t < QUIET || t >= pattern_len() - QUIET {
        return false;
    }
    ((t - QUIET) / BAR) % 2 == 0
}

/// Vertical bars across the full height
pub fn vertical_bars(height: u32, bar: u8, space: u8) -> RgbImage {
    RgbImage::from_fn(pattern_len(), height, |x, _| {
        let v = if on_bar(x) { bar } else { space };
        Rgb([v, v, v])
    })
}

/// Horizontal bars across the full width
pub fn horizontal_bars(width: u32, bar: u8, space: u8) -> RgbImage {
    RgbImage::from_fn(width, pattern_len(), |_, y| {
        let v = if on_bar(y) { bar } else { space };
        Rgb([v, v, v])
    })
}

/// Encode an image as PNG bytes
pub fn png_bytes(image: &RgbImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut buf, ImageOutputFormat::Png)
        .expect("png encoding failed");
    buf.into_inner()
}

/// A solid image with nothing to find
pub fn solid(width: u32, height: u32, value: u8) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([value, value, value]))
}

pub fn gray(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([value]))
}

/// Minimal linear reader: scans the middle row for `BARS` dark bars
/// between bright quiet zones
///
/// Stands in for a real symbology decoder so cascade behaviour can be
/// checked on real pixels.
pub fn bar_reader(image: &RasterImage) -> Result<Vec<Symbol>, DetectError> {
    let gray = to_gray_image(image);
    if gray.width() < 2 * QUIET || gray.height() == 0 {
        return Ok(Vec::new());
    }
    let y = gray.height() / 2;
    let row: Vec<u8> = (0..gray.width()).map(|x| gray.get_pixel(x, y).0[0]).collect();

    let quiet = QUIET as usize / 2;
    let bright = |v: &u8| *v >= 200;
    if !row[..quiet].iter().all(bright) || !row[row.len() - quiet..].iter().all(bright) {
        return Ok(Vec::new());
    }

    let mut runs = Vec::new();
    let mut current = 0usize;
    for &v in &row {
        if v < 128 {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }

    let width_ok = |w: &usize| (BAR as usize - 1..=BAR as usize + 1).contains(w);
    if runs.len() == BARS && runs.iter().all(width_ok) {
        Ok(vec![Symbol::new(format!("BARS-{BARS}"), "TOY")])
    } else {
        Ok(Vec::new())
    }
}

/// EAN-13 left-hand odd-parity (L) digit patterns; G and R derive from these
const EAN_L: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011", "0110001", "0101111", "0111011",
    "0110111", "0001011",
];

/// L/G parity of the six left digits, selected by the leading digit
const EAN_PARITY: [&str; 10] = [
    "LLLLLL", "LLGLGG", "LLGGLG", "LLGGGL", "LGLLGG", "LGGLLG", "LGGGLG", "LGLGLG", "LGLGGL",
    "LGGLGL",
];

/// Module string (`1` = bar) of a 13-digit EAN, guards included, no quiet zone
pub fn ean13_modules(code: &str) -> String {
    let digits: Vec<usize> = code
        .chars()
        .map(|c| c.to_digit(10).expect("digit") as usize)
        .collect();
    assert_eq!(digits.len(), 13, "EAN-13 needs 13 digits");

    let l = |d: usize| EAN_L[d].to_string();
    let r = |d: usize| -> String {
        EAN_L[d]
            .chars()
            .map(|c| if c == '1' { '0' } else { '1' })
            .collect()
    };
    let g = |d: usize| r(d).chars().rev().collect::<String>();

    let mut modules = String::from("101");
    for (i, parity) in EAN_PARITY[digits[0]].chars().enumerate() {
        let d = digits[i + 1];
        modules.push_str(&if parity == 'L' { l(d) } else { g(d) });
    }
    modules.push_str("01010");
    for &d in &digits[7..] {
        modules.push_str(&r(d));
    }
    modules.push_str("101");
    modules
}

/// Black-on-white EAN-13 with a 15-module quiet zone on each side
pub fn ean13_image(code: &str, module: u32, height: u32) -> RgbImage {
    const QUIET_MODULES: u32 = 15;
    let modules: Vec<bool> = ean13_modules(code).chars().map(|c| c == '1').collect();
    let width = (modules.len() as u32 + 2 * QUIET_MODULES) * module;
    RgbImage::from_fn(width, height, |x, _| {
        let m = (x / module) as i64 - QUIET_MODULES as i64;
        let bar = m >= 0 && (m as usize) < modules.len() && modules[m as usize];
        let v = if bar { 0 } else { 255 };
        Rgb([v, v, v])
    })
}
