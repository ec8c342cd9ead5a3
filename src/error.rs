//! Error types for the cascade and its capabilities
//!
//! Only failures that abort a run live here. "Failed to load image" and
//! "no barcode found" are ordinary outcomes, see [`crate::DecodeOutcome`].

use thiserror::Error;

/// Failure raised by a detector backend while scanning one view
#[derive(Debug, Error)]
pub enum DetectError {
    /// The view has dimensions the backend cannot handle
    #[error("unsupported image dimensions {width}x{height}")]
    Dimensions {
        /// View width
        width: usize,
        /// View height
        height: usize,
    },
    /// Backend-specific failure
    #[error("{0}")]
    Backend(String),
}

/// Failure that aborts a cascade run
#[derive(Debug, Error)]
pub enum CascadeError {
    /// Base64 input text was malformed
    #[error("{0}")]
    Base64(#[from] base64::DecodeError),
    /// The detector failed on the named view
    #[error("detector failed on view '{label}': {source}")]
    Detector {
        /// Label of the view being scanned
        label: String,
        /// Underlying detector failure
        #[source]
        source: DetectError,
    },
    /// The winning symbol's payload is not valid UTF-8
    #[error("{0}")]
    Payload(#[from] std::string::FromUtf8Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CascadeError>;
