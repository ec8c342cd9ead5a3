//! Photometric and geometric views of an input image
//!
//! The photometric list and the rotation set are fixed and ordered. Their
//! names end up in the `method` field of a successful outcome, so reordering
//! or renaming anything here changes observable behaviour.

use std::fmt;

use image::{GrayImage, imageops};

use crate::models::{RasterImage, View};
use crate::utils::binarization::{adaptive_binarize, otsu_binarize};
use crate::utils::clahe::{ClaheParams, clahe};
use crate::utils::filter::{Border, gaussian_blur};
use crate::utils::grayscale::to_gray_image;
use crate::utils::morphology::close;

/// Label of the untouched input image
pub const ORIGINAL: &str = "original";

/// Neighbourhood size of the adaptive threshold
pub const ADAPTIVE_BLOCK_SIZE: usize = 11;
/// Offset subtracted from the local mean before comparing
pub const ADAPTIVE_OFFSET: i32 = 2;
/// Kernel size of the pre-threshold blur
pub const BLUR_KERNEL_SIZE: usize = 5;
/// Half-width of the 3×3 closing element
pub const MORPH_RADIUS: usize = 1;
/// CLAHE clip limit
pub const CLAHE_CLIP_LIMIT: f32 = 2.0;
/// CLAHE tile grid size along each axis
pub const CLAHE_TILES: usize = 8;

/// A photometric transform applied to the grayscale derivative of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Photometric {
    /// Single-channel luminance
    Grayscale,
    /// Otsu global binarization
    Threshold,
    /// Gaussian-adaptive binarization
    Adaptive,
    /// 5×5 Gaussian blur then Otsu binarization
    BlurThreshold,
    /// 3×3 closing (dilate then erode)
    Morphological,
    /// CLAHE local contrast equalization
    Enhanced,
    /// Light/dark inversion
    Inverted,
}

impl Photometric {
    /// Search order of the photometric views
    pub const ALL: [Photometric; 7] = [
        Photometric::Grayscale,
        Photometric::Threshold,
        Photometric::Adaptive,
        Photometric::BlurThreshold,
        Photometric::Morphological,
        Photometric::Enhanced,
        Photometric::Inverted,
    ];

    /// Name used in view labels
    pub fn name(self) -> &'static str {
        match self {
            Photometric::Grayscale => "grayscale",
            Photometric::Threshold => "threshold",
            Photometric::Adaptive => "adaptive",
            Photometric::BlurThreshold => "blur_threshold",
            Photometric::Morphological => "morphological",
            Photometric::Enhanced => "enhanced",
            Photometric::Inverted => "inverted",
        }
    }

    /// Look a transform up by its label name
    pub fn from_name(name: &str) -> Option<Photometric> {
        Photometric::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Apply the transform to a grayscale image, producing a new buffer
    pub fn apply(self, gray: &GrayImage) -> GrayImage {
        match self {
            Photometric::Grayscale => gray.clone(),
            Photometric::Threshold => otsu_binarize(gray),
            Photometric::Adaptive => adaptive_binarize(gray, ADAPTIVE_BLOCK_SIZE, ADAPTIVE_OFFSET),
            Photometric::BlurThreshold => {
                otsu_binarize(&gaussian_blur(gray, BLUR_KERNEL_SIZE, Border::Reflect101))
            }
            Photometric::Morphological => close(gray, MORPH_RADIUS),
            Photometric::Enhanced => clahe(
                gray,
                ClaheParams {
                    clip_limit: CLAHE_CLIP_LIMIT,
                    tiles: CLAHE_TILES,
                },
            ),
            Photometric::Inverted => {
                let mut inverted = gray.clone();
                imageops::invert(&mut inverted);
                inverted
            }
        }
    }
}

impl fmt::Display for Photometric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clockwise quarter-turn rotation of the full image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation
    Deg0,
    /// 90° clockwise
    Deg90,
    /// 180°
    Deg180,
    /// 270° clockwise (90° counter-clockwise)
    Deg270,
}

impl Rotation {
    /// Search order of the rotations
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Angle in degrees as used in labels
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Look a rotation up by its angle in degrees
    pub fn from_degrees(degrees: u16) -> Option<Rotation> {
        Rotation::ALL.into_iter().find(|r| r.degrees() == degrees)
    }

    /// Rotate an image into a newly allocated raster
    pub fn apply(self, image: &RasterImage) -> RasterImage {
        match (self, image) {
            (Rotation::Deg0, img) => img.clone(),
            (Rotation::Deg90, RasterImage::Color(img)) => imageops::rotate90(img).into(),
            (Rotation::Deg90, RasterImage::Gray(img)) => imageops::rotate90(img).into(),
            (Rotation::Deg180, RasterImage::Color(img)) => imageops::rotate180(img).into(),
            (Rotation::Deg180, RasterImage::Gray(img)) => imageops::rotate180(img).into(),
            (Rotation::Deg270, RasterImage::Color(img)) => imageops::rotate270(img).into(),
            (Rotation::Deg270, RasterImage::Gray(img)) => imageops::rotate270(img).into(),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// All photometric views of `image`, labelled by transform name
///
/// Grayscale is derived once and shared by every transform.
pub fn photometric_views(image: &RasterImage) -> Vec<View> {
    let gray = to_gray_image(image);
    Photometric::ALL
        .into_iter()
        .map(|t| View::new(t.name(), RasterImage::Gray(t.apply(&gray))))
        .collect()
}

/// The four rotations of `image`, each an independent raster
pub fn rotations(image: &RasterImage) -> [(Rotation, RasterImage); 4] {
    Rotation::ALL.map(|r| (r, r.apply(image)))
}
