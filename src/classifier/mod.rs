//! Classifier boundary: anything that can put a label and a confidence on
//! a group of strokes.
//!
//! The pipeline never lets a classifier failure escape: [`classify_or_minimum`]
//! logs it and substitutes a minimum-confidence result.

pub mod annotated;

pub use annotated::AnnotatedClassifier;

use crate::geometry::TraceGroup;
use crate::symbols::Label;

/// Confidence reported for groups that cannot be a symbol.
pub const MIN_CONFIDENCE: f64 = 0.0;

/// Label used when a classifier fails outright.
pub const FALLBACK_LABEL: Label = Label::VerticalLine;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Label,
    /// Probability in `[0, 1]`.
    pub confidence: f64,
}

impl Classification {
    pub fn new(label: Label, confidence: f64) -> Self {
        Self { label, confidence }
    }

    pub fn minimum(label: Label) -> Self {
        Self::new(label, MIN_CONFIDENCE)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier rejected the strokes: {0}")]
    Rejected(String),

    #[error("classifier failed: {0}")]
    Internal(String),
}

/// Trait for stroke classifiers.
pub trait Classifier {
    /// Label `group`. `context` holds surrounding strokes for classifiers
    /// that use them.
    fn classify(
        &self,
        group: &TraceGroup,
        context: Option<&TraceGroup>,
    ) -> Result<Classification, ClassifierError>;
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn classify(
        &self,
        group: &TraceGroup,
        context: Option<&TraceGroup>,
    ) -> Result<Classification, ClassifierError> {
        (**self).classify(group, context)
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(
        &self,
        group: &TraceGroup,
        context: Option<&TraceGroup>,
    ) -> Result<Classification, ClassifierError> {
        (**self).classify(group, context)
    }
}

/// Classify `group`, turning any failure into a logged minimum-confidence
/// result. Out-of-range confidences are clamped to `[0, 1]`.
pub fn classify_or_minimum<C: Classifier + ?Sized>(
    classifier: &C,
    group: &TraceGroup,
) -> Classification {
    match classifier.classify(group, None) {
        Ok(c) if c.confidence.is_nan() => {
            log::warn!("classifier returned NaN confidence for {}", c.label);
            Classification::minimum(c.label)
        }
        Ok(c) => Classification::new(c.label, c.confidence.clamp(MIN_CONFIDENCE, 1.0)),
        Err(e) => {
            log::warn!("{e}; treating {} stroke(s) as unrecognized", group.len());
            Classification::minimum(FALLBACK_LABEL)
        }
    }
}
