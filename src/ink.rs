//! Ink documents: strokes plus optional symbol annotations, read from JSON.
//!
//! ```json
//! {
//!   "strokes": [[[0, 0], [0, 30]], "10 12, 25 12"],
//!   "symbols": [{ "label": "ONE", "strokes": [0] }, { "label": "MINUS", "strokes": [1] }]
//! }
//! ```
//!
//! A stroke is either a list of `[x, y]` pairs or trace text in the
//! `"x y, x y"` form.

use serde::{Deserialize, Serialize};

use crate::classifier::AnnotatedClassifier;
use crate::error::{EngineError, Result};
use crate::geometry::{Point, Trace, TraceGroup};
use crate::partitioner;
use crate::symbols::Label;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stroke {
    Points(Vec<[f64; 2]>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolAnnotation {
    pub label: String,
    pub strokes: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InkDocument {
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub symbols: Vec<SymbolAnnotation>,
}

impl InkDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Every stroke as a trace, in document order.
    pub fn traces(&self) -> Result<TraceGroup> {
        let group = self
            .strokes
            .iter()
            .map(|s| match s {
                Stroke::Points(points) => Ok(Trace::from_points(
                    points.iter().map(|&[x, y]| Point::new(x, y)).collect(),
                )),
                Stroke::Text(text) => parse_trace_text(text),
            })
            .collect::<Result<TraceGroup>>()?;
        partitioner::validate(&group)?;
        Ok(group)
    }

    /// Classifier answering from the document's annotations.
    pub fn classifier(&self) -> Result<AnnotatedClassifier> {
        if self.symbols.is_empty() && !self.strokes.is_empty() {
            return Err(EngineError::InvalidInput(
                "document has strokes but no symbol annotations".into(),
            ));
        }
        let traces = self.traces()?;
        let mut classifier = AnnotatedClassifier::new();
        for (n, annotation) in self.symbols.iter().enumerate() {
            if annotation.label.trim().is_empty() {
                return Err(EngineError::InvalidInput(format!("symbol {n} has an empty label")));
            }
            if annotation.strokes.is_empty() {
                return Err(EngineError::InvalidInput(format!("symbol {n} has no strokes")));
            }
            if let Some(&bad) = annotation.strokes.iter().find(|&&i| i >= traces.len()) {
                return Err(EngineError::InvalidInput(format!(
                    "symbol {n} refers to stroke {bad}, but there are {} strokes",
                    traces.len()
                )));
            }
            let label: Label = annotation.label.trim().parse()?;
            classifier.add(label, traces.sub_group(&annotation.strokes));
        }
        Ok(classifier)
    }
}

/// Parse `"x y, x y, …"` into a trace. Extra columns per point (such as a
/// timestamp) are ignored.
pub fn parse_trace_text(text: &str) -> Result<Trace> {
    let mut trace = Trace::new();
    for (n, item) in text.split(',').enumerate() {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let mut fields = item.split_whitespace();
        let (Some(x), Some(y)) = (fields.next(), fields.next()) else {
            return Err(EngineError::InvalidInput(format!(
                "point {n} '{item}' needs two coordinates"
            )));
        };
        let coord = |s: &str| {
            s.parse::<f64>()
                .map_err(|_| EngineError::InvalidInput(format!("point {n}: '{s}' is not a number")))
        };
        trace.push(Point::new(coord(x)?, coord(y)?));
    }
    Ok(trace)
}
