use std::collections::HashMap;

use super::BarcodeDetector;
use crate::cascade::plan;
use crate::error::DetectError;
use crate::models::{RasterImage, Symbol};

/// Shape of a view the detector was asked to scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observed {
    /// View width
    pub width: usize,
    /// View height
    pub height: usize,
    /// View channel count
    pub channels: usize,
}

#[derive(Debug, Clone)]
enum Reply {
    Symbols(Vec<Symbol>),
    Fail(String),
}

/// Detector that answers from a script keyed by call number
///
/// Calls are numbered from 0 in the order the cascade makes them, so call `n`
/// scans the view of `plan()[n]`. Unscripted calls return no symbols. Every
/// call is recorded for later inspection.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDetector {
    replies: HashMap<usize, Reply>,
    calls: Vec<Observed>,
}

impl ScriptedDetector {
    /// A detector that never finds anything
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `symbols` on call number `call`
    pub fn hit_at(mut self, call: usize, symbols: Vec<Symbol>) -> Self {
        self.replies.insert(call, Reply::Symbols(symbols));
        self
    }

    /// Return `symbols` for the view carrying `label`
    ///
    /// Unknown labels leave the script unchanged.
    pub fn hit_on(self, label: &str, symbols: Vec<Symbol>) -> Self {
        match call_index(label) {
            Some(call) => self.hit_at(call, symbols),
            None => self,
        }
    }

    /// Fail with `message` on call number `call`
    pub fn fail_at(mut self, call: usize, message: impl Into<String>) -> Self {
        self.replies.insert(call, Reply::Fail(message.into()));
        self
    }

    /// Fail with `message` on the view carrying `label`
    pub fn fail_on(self, label: &str, message: impl Into<String>) -> Self {
        match call_index(label) {
            Some(call) => self.fail_at(call, message),
            None => self,
        }
    }

    /// Every view scanned so far, in call order
    pub fn calls(&self) -> &[Observed] {
        &self.calls
    }

    /// Number of detector invocations so far
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }
}

/// Position of `label` in the cascade order
pub fn call_index(label: &str) -> Option<usize> {
    plan().iter().position(|step| step.label() == label)
}

impl BarcodeDetector for ScriptedDetector {
    fn detect(&mut self, image: &RasterImage) -> Result<Vec<Symbol>, DetectError> {
        let call = self.calls.len();
        self.calls.push(Observed {
            width: image.width(),
            height: image.height(),
            channels: image.channels(),
        });
        match self.replies.get(&call) {
            Some(Reply::Symbols(symbols)) => Ok(symbols.clone()),
            Some(Reply::Fail(message)) => Err(DetectError::Backend(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}
