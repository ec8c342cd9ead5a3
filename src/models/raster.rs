use image::{GrayImage, RgbImage};

/// Owned, immutable pixel grid handed between the codec, transforms and detector
///
/// Every transform produces a fresh `RasterImage`; nothing in the crate hands
/// out mutable access to the pixel buffer once an image exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterImage {
    /// 3-channel RGB image
    Color(RgbImage),
    /// 1-channel luminance or binary image
    Gray(GrayImage),
}

impl RasterImage {
    /// Image width in pixels
    pub fn width(&self) -> usize {
        match self {
            RasterImage::Color(img) => img.width() as usize,
            RasterImage::Gray(img) => img.width() as usize,
        }
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        match self {
            RasterImage::Color(img) => img.height() as usize,
            RasterImage::Gray(img) => img.height() as usize,
        }
    }

    /// Number of interleaved channels (3 or 1)
    pub fn channels(&self) -> usize {
        match self {
            RasterImage::Color(_) => 3,
            RasterImage::Gray(_) => 1,
        }
    }

    /// Raw interleaved pixel bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RasterImage::Color(img) => img.as_raw(),
            RasterImage::Gray(img) => img.as_raw(),
        }
    }

    /// True when the image has no pixels
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Borrow the single-channel buffer if this image is already grayscale
    pub fn as_gray(&self) -> Option<&GrayImage> {
        match self {
            RasterImage::Gray(img) => Some(img),
            RasterImage::Color(_) => None,
        }
    }
}

impl From<RgbImage> for RasterImage {
    fn from(img: RgbImage) -> Self {
        RasterImage::Color(img)
    }
}

impl From<GrayImage> for RasterImage {
    fn from(img: GrayImage) -> Self {
        RasterImage::Gray(img)
    }
}
