//! Classifier backed by ground-truth annotations.
//!
//! Ink documents may say which strokes form which symbol. This classifier
//! answers from those annotations, which makes the rest of the pipeline
//! usable (and testable) without a trained model.

use crate::classifier::{Classification, Classifier, ClassifierError, MIN_CONFIDENCE};
use crate::geometry::TraceGroup;
use crate::symbols::Label;

/// One annotated symbol: its label and its strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub label: Label,
    pub group: TraceGroup,
}

#[derive(Debug, Clone, Default)]
pub struct AnnotatedClassifier {
    annotations: Vec<Annotation>,
}

impl AnnotatedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: Label, group: TraceGroup) -> Self {
        self.add(label, group);
        self
    }

    pub fn add(&mut self, label: Label, group: TraceGroup) {
        self.annotations.push(Annotation { label, group });
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl Classifier for AnnotatedClassifier {
    /// An exact stroke-set match scores 1. A strict part of one annotated
    /// symbol scores half its share of that symbol's strokes. Anything that
    /// straddles symbols scores the minimum under the first touched label.
    fn classify(
        &self,
        group: &TraceGroup,
        _context: Option<&TraceGroup>,
    ) -> Result<Classification, ClassifierError> {
        if group.is_empty() {
            return Err(ClassifierError::Rejected("empty stroke group".into()));
        }
        let mut touched = None;
        for a in &self.annotations {
            let shared = group.iter().filter(|t| a.group.contains(t)).count();
            if shared == 0 {
                continue;
            }
            touched.get_or_insert(a.label);
            if shared < group.len() {
                continue;
            }
            if group.len() == a.group.len() {
                return Ok(Classification::new(a.label, 1.0));
            }
            let share = group.len() as f64 / a.group.len() as f64;
            return Ok(Classification::new(a.label, 0.5 * share));
        }
        match touched {
            Some(label) => Ok(Classification::new(label, MIN_CONFIDENCE)),
            None => Err(ClassifierError::Rejected(format!(
                "{} stroke(s) match no annotated symbol",
                group.len()
            ))),
        }
    }
}
