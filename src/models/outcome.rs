use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::CascadeError;

/// Message reported when the input bytes do not decode into an image
pub const LOAD_FAILED: &str = "Failed to load image";

/// Message reported when every view of the cascade was tried without a hit
pub const EXHAUSTED: &str = "No barcode detected after all preprocessing attempts";

/// One barcode as reported by a detector backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Raw decoded payload bytes
    pub payload: Vec<u8>,
    /// Symbology name, e.g. `QRCODE` or `CODE128`
    pub symbology: String,
}

impl Symbol {
    /// Create a symbol from payload bytes and a symbology name
    pub fn new(payload: impl Into<Vec<u8>>, symbology: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            symbology: symbology.into(),
        }
    }
}

/// Final result of a cascade run
///
/// Serializes to exactly one of
/// `{"success":true,"barcode":..,"type":..,"method":..}` or
/// `{"success":false,"error":..}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A detector produced a symbol on some view
    Decoded {
        /// Payload decoded as UTF-8 text
        barcode: String,
        /// Symbology reported by the detector
        symbology: String,
        /// Label of the view that produced the hit
        method: String,
    },
    /// No symbol was produced, or the run was aborted
    Failed {
        /// Human readable reason
        error: String,
    },
}

impl DecodeOutcome {
    /// Outcome for input that could not be decoded into an image
    pub fn load_failed() -> Self {
        DecodeOutcome::Failed {
            error: LOAD_FAILED.to_string(),
        }
    }

    /// Outcome for a cascade that tried every view without a hit
    pub fn exhausted() -> Self {
        DecodeOutcome::Failed {
            error: EXHAUSTED.to_string(),
        }
    }

    /// Outcome for a run aborted by an error
    pub fn from_error(err: &CascadeError) -> Self {
        DecodeOutcome::Failed {
            error: format!("Decoding error: {err}"),
        }
    }

    /// Whether a barcode was decoded
    pub fn is_success(&self) -> bool {
        matches!(self, DecodeOutcome::Decoded { .. })
    }

    /// Method label of the winning view, if any
    pub fn method(&self) -> Option<&str> {
        match self {
            DecodeOutcome::Decoded { method, .. } => Some(method),
            DecodeOutcome::Failed { .. } => None,
        }
    }

    /// Render as a single line of JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for DecodeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodeOutcome::Decoded {
                barcode,
                symbology,
                method,
            } => {
                let mut state = serializer.serialize_struct("DecodeOutcome", 4)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("barcode", barcode)?;
                state.serialize_field("type", symbology)?;
                state.serialize_field("method", method)?;
                state.end()
            }
            DecodeOutcome::Failed { error } => {
                let mut state = serializer.serialize_struct("DecodeOutcome", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}
