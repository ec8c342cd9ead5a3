/// Detector symbols and the final outcome
pub mod outcome;
/// Owned pixel buffers
pub mod raster;
/// Labelled derived images
pub mod view;

pub use outcome::{DecodeOutcome, EXHAUSTED, LOAD_FAILED, Symbol};
pub use raster::RasterImage;
pub use view::View;
