use super::RasterImage;

/// A derived image paired with the label describing how it was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Provenance label, e.g. `preprocessing-adaptive` or `rotation-90-threshold`
    pub label: String,
    /// Pixel data owned by this view alone
    pub image: RasterImage,
}

impl View {
    /// Pair a label with an image
    pub fn new(label: impl Into<String>, image: RasterImage) -> Self {
        Self {
            label: label.into(),
            image,
        }
    }
}
