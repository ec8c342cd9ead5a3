//! Image codec capability
//!
//! Turns encoded bytes (PNG, JPEG, ...) into a [`RasterImage`]. Unparseable
//! input is reported as `None`, never as an error.

use image::GenericImageView;
use image::imageops::FilterType;
use log::{debug, warn};

use crate::config::CascadeConfig;
use crate::models::RasterImage;

/// Decodes encoded image bytes
pub trait ImageCodec {
    /// Decode `bytes`, or `None` if they are not a readable image
    fn decode(&self, bytes: &[u8]) -> Option<RasterImage>;
}

/// Codec backed by the `image` crate
///
/// Always yields a 3-channel image, whatever the source format stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateCodec {
    max_dim: Option<u32>,
}

impl ImageCrateCodec {
    /// Codec with no downscaling
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec honouring the limits in `config`
    pub fn with_config(config: &CascadeConfig) -> Self {
        Self {
            max_dim: config.max_dim,
        }
    }
}

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, bytes: &[u8]) -> Option<RasterImage> {
        let img = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(err) => {
                warn!("failed to decode {} input bytes: {err}", bytes.len());
                return None;
            }
        };

        let (orig_w, orig_h) = img.dimensions();
        let rgb = match self.max_dim {
            Some(max_dim) if orig_w.max(orig_h) > max_dim => {
                let resized = img.resize(max_dim, max_dim, FilterType::Triangle);
                debug!(
                    "downscaled {orig_w}x{orig_h} to {}x{}",
                    resized.width(),
                    resized.height()
                );
                resized.to_rgb8()
            }
            _ => img.to_rgb8(),
        };

        Some(RasterImage::Color(rgb))
    }
}
