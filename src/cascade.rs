//! Cascade controller
//!
//! The search order is a flat list of [`Step`]s built by [`plan`]:
//!
//! 1. `original`
//! 2. `preprocessing-<name>` for each photometric transform
//! 3. for each rotation: `rotation-<deg>`, then `rotation-<deg>-<name>`
//!
//! [`ViewSource`] materializes those steps lazily, so nothing past the winning
//! view is ever computed, and [`Cascade`] scans them with a detector until the
//! first non-empty result.

use std::fmt;

use image::GrayImage;
use log::{debug, info, warn};

use crate::codec::ImageCodec;
use crate::detector::BarcodeDetector;
use crate::error::{CascadeError, Result};
use crate::models::{DecodeOutcome, RasterImage, Symbol, View};
use crate::transforms::{ORIGINAL, Photometric, Rotation};
use crate::utils::grayscale::to_gray_image;

/// Which part of the search a step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// The untouched input
    Original,
    /// Photometric views of the input
    Photometric,
    /// Rotated input and its photometric views
    Rotation,
}

/// One view in the search order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    /// Rotation applied first, if any
    pub rotation: Option<Rotation>,
    /// Photometric transform applied to the (rotated) grayscale, if any
    pub transform: Option<Photometric>,
}

impl Step {
    /// The untouched input image
    pub const ORIGINAL: Step = Step {
        rotation: None,
        transform: None,
    };

    /// Phase of the search this step belongs to
    pub fn phase(&self) -> Phase {
        match (self.rotation, self.transform) {
            (None, None) => Phase::Original,
            (None, Some(_)) => Phase::Photometric,
            (Some(_), _) => Phase::Rotation,
        }
    }

    /// Method label reported when this step produces the hit
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.rotation, self.transform) {
            (None, None) => f.write_str(ORIGINAL),
            (None, Some(t)) => write!(f, "preprocessing-{t}"),
            (Some(r), None) => write!(f, "rotation-{r}"),
            (Some(r), Some(t)) => write!(f, "rotation-{r}-{t}"),
        }
    }
}

/// The full search order: 1 + 7 + 4 × (1 + 7) = 40 steps
pub fn plan() -> Vec<Step> {
    let mut steps = vec![Step::ORIGINAL];
    steps.extend(Photometric::ALL.into_iter().map(|t| Step {
        rotation: None,
        transform: Some(t),
    }));
    for r in Rotation::ALL {
        steps.push(Step {
            rotation: Some(r),
            transform: None,
        });
        steps.extend(Photometric::ALL.into_iter().map(|t| Step {
            rotation: Some(r),
            transform: Some(t),
        }));
    }
    steps
}

/// Lazily materializes the views of [`plan`] for one input image
///
/// The grayscale derivative of the current base image (input or rotation) is
/// computed once and reused by every photometric step on that base.
pub struct ViewSource<'a> {
    source: &'a RasterImage,
    steps: std::vec::IntoIter<Step>,
    rotated: Option<(Rotation, RasterImage)>,
    gray: Option<(Option<Rotation>, GrayImage)>,
}

impl<'a> ViewSource<'a> {
    /// Start a fresh pass over `source`
    pub fn new(source: &'a RasterImage) -> Self {
        Self {
            source,
            steps: plan().into_iter(),
            rotated: None,
            gray: None,
        }
    }

    fn base(&mut self, rotation: Option<Rotation>) -> &RasterImage {
        let Some(r) = rotation else {
            return self.source;
        };
        let entry = match self.rotated.take() {
            Some(entry) if entry.0 == r => entry,
            _ => (r, r.apply(self.source)),
        };
        &self.rotated.insert(entry).1
    }

    fn gray(&mut self, rotation: Option<Rotation>) -> &GrayImage {
        let entry = match self.gray.take() {
            Some(entry) if entry.0 == rotation => entry,
            _ => (rotation, to_gray_image(self.base(rotation))),
        };
        &self.gray.insert(entry).1
    }

    fn materialize(&mut self, step: Step) -> View {
        let image = match step.transform {
            None => self.base(step.rotation).clone(),
            Some(t) => RasterImage::Gray(t.apply(self.gray(step.rotation))),
        };
        View::new(step.label(), image)
    }
}

impl Iterator for ViewSource<'_> {
    type Item = (Step, View);

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.steps.next()?;
        let view = self.materialize(step);
        Some((step, view))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.steps.size_hint()
    }
}

impl ExactSizeIterator for ViewSource<'_> {}

/// The winning view and the detector's first symbol on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// Step that produced the symbol
    pub step: Step,
    /// First symbol the detector reported
    pub symbol: Symbol,
}

/// What a cascade run found and how much of the search it used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    /// The first successful view, if any
    pub hit: Option<Hit>,
    /// Number of detector invocations made
    pub attempts: usize,
}

impl CascadeReport {
    /// Convert into the public outcome shape
    ///
    /// Fails only when the winning payload is not valid UTF-8.
    pub fn into_outcome(self) -> Result<DecodeOutcome> {
        match self.hit {
            Some(hit) => Ok(DecodeOutcome::Decoded {
                barcode: String::from_utf8(hit.symbol.payload)?,
                symbology: hit.symbol.symbology,
                method: hit.step.label(),
            }),
            None => Ok(DecodeOutcome::exhausted()),
        }
    }
}

/// Drives a detector over the search order of one image at a time
pub struct Cascade<D> {
    detector: D,
}

impl<D: BarcodeDetector> Cascade<D> {
    /// Build a cascade around a detector
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    /// Borrow the detector
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Take the detector back
    pub fn into_detector(self) -> D {
        self.detector
    }

    /// Scan views in order until the detector reports a symbol
    ///
    /// A detector error aborts the run at the view that raised it.
    pub fn run(&mut self, image: &RasterImage) -> Result<CascadeReport> {
        let mut attempts = 0;
        for (step, view) in ViewSource::new(image) {
            attempts += 1;
            debug!(
                "attempt {attempts}: {} ({}x{}x{})",
                view.label,
                view.image.width(),
                view.image.height(),
                view.image.channels()
            );

            let symbols = self
                .detector
                .detect(&view.image)
                .map_err(|source| CascadeError::Detector {
                    label: view.label.clone(),
                    source,
                })?;

            if let Some(symbol) = symbols.into_iter().next() {
                info!("decoded {} symbol via {}", symbol.symbology, view.label);
                return Ok(CascadeReport {
                    hit: Some(Hit { step, symbol }),
                    attempts,
                });
            }
        }

        debug!("no symbol after {attempts} views");
        Ok(CascadeReport {
            hit: None,
            attempts,
        })
    }

    /// Run on an already-loaded image, folding every failure into the outcome
    ///
    /// `None` stands for an image that failed to load; the detector is not
    /// called in that case.
    pub fn decode(&mut self, image: Option<&RasterImage>) -> DecodeOutcome {
        let Some(image) = image else {
            warn!("input did not decode into an image");
            return DecodeOutcome::load_failed();
        };

        match self.run(image).and_then(CascadeReport::into_outcome) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("cascade aborted: {err}");
                DecodeOutcome::from_error(&err)
            }
        }
    }

    /// Decode encoded image bytes with `codec`, then run the cascade
    pub fn decode_bytes<C>(&mut self, codec: &C, bytes: &[u8]) -> DecodeOutcome
    where
        C: ImageCodec + ?Sized,
    {
        let image = codec.decode(bytes);
        self.decode(image.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::scripted::ScriptedDetector;
    use image::{Rgb, RgbImage};

    fn sample() -> RasterImage {
        RgbImage::from_fn(12, 8, |x, y| Rgb([(x * 20) as u8, (y * 30) as u8, 90])).into()
    }

    #[test]
    fn test_plan_layout() {
        let steps = plan();
        assert_eq!(steps.len(), 40);
        assert_eq!(steps[0].label(), "original");
        assert_eq!(steps[1].label(), "preprocessing-grayscale");
        assert_eq!(steps[7].label(), "preprocessing-inverted");
        assert_eq!(steps[8].label(), "rotation-0");
        assert_eq!(steps[9].label(), "rotation-0-grayscale");
        assert_eq!(steps[16].label(), "rotation-90");
        assert_eq!(steps[39].label(), "rotation-270-inverted");
    }

    #[test]
    fn test_phases_are_monotonic() {
        let phases: Vec<Phase> = plan().iter().map(Step::phase).collect();
        assert!(phases.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(phases.iter().filter(|p| **p == Phase::Original).count(), 1);
        assert_eq!(phases.iter().filter(|p| **p == Phase::Photometric).count(), 7);
        assert_eq!(phases.iter().filter(|p| **p == Phase::Rotation).count(), 32);
    }

    #[test]
    fn test_view_source_labels_match_plan() {
        let image = sample();
        let labels: Vec<String> = ViewSource::new(&image).map(|(_, v)| v.label).collect();
        let expected: Vec<String> = plan().iter().map(Step::label).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_view_source_shapes() {
        let image = sample();
        let views: Vec<(Step, View)> = ViewSource::new(&image).collect();
        assert_eq!(views[0].1.image, image);
        assert_eq!(views[0].1.image.channels(), 3);
        assert_eq!(views[1].1.image.channels(), 1);
        // rotation-90 and its photometric views are transposed
        assert_eq!((views[16].1.image.width(), views[16].1.image.height()), (8, 12));
        assert_eq!((views[20].1.image.width(), views[20].1.image.height()), (8, 12));
        assert_eq!(views[16].1.image.channels(), 3);
    }

    #[test]
    fn test_original_hit_stops_immediately() {
        let detector = ScriptedDetector::new().hit_at(0, vec![Symbol::new("123", "EAN13")]);
        let mut cascade = Cascade::new(detector);
        let report = cascade.run(&sample()).unwrap();
        assert_eq!(report.attempts, 1);
        assert_eq!(report.hit.unwrap().step, Step::ORIGINAL);
    }

    #[test]
    fn test_exhaustion_uses_every_view() {
        let mut cascade = Cascade::new(ScriptedDetector::new());
        let report = cascade.run(&sample()).unwrap();
        assert_eq!(report.attempts, 40);
        assert!(report.hit.is_none());
        assert_eq!(cascade.detector().call_count(), 40);
    }

    #[test]
    fn test_detector_error_aborts() {
        let detector =
            ScriptedDetector::new().fail_on("preprocessing-adaptive", "backend crashed");
        let mut cascade = Cascade::new(detector);
        let outcome = cascade.decode(Some(&sample()));
        assert_eq!(
            outcome,
            DecodeOutcome::Failed {
                error: "Decoding error: detector failed on view 'preprocessing-adaptive': \
                        backend crashed"
                    .to_string()
            }
        );
        assert_eq!(cascade.detector().call_count(), 4);
    }

    #[test]
    fn test_non_utf8_payload_is_a_decoding_error() {
        let detector =
            ScriptedDetector::new().hit_at(0, vec![Symbol::new(vec![0xff, 0x00], "CODE128")]);
        let mut cascade = Cascade::new(detector);
        match cascade.decode(Some(&sample())) {
            DecodeOutcome::Failed { error } => assert!(error.starts_with("Decoding error: ")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_missing_image_skips_detector() {
        let mut cascade = Cascade::new(ScriptedDetector::new());
        assert_eq!(cascade.decode(None), DecodeOutcome::load_failed());
        assert_eq!(cascade.detector().call_count(), 0);
    }
}
