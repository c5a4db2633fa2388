//! ink-equations: handwritten math strokes to a LaTeX-like equation.
//!
//! Pipeline: strokes → partitioner (MST + classifier) → symbols →
//! grammar parser → equation string.
//!
//! Modules:
//!   geometry      Point, Trace, TraceGroup
//!   graph         Kruskal MST, unique-path enumeration
//!   symbols       labels, slot tables, ambiguous resolution, symbol arena
//!   classifier    Classifier trait, annotation-backed classifier
//!   partitioner   strokes → symbols
//!   parsers       symbols → tree → equation
//!   recognizer    incremental session over the two stages
//!   ink           JSON ink documents

pub mod classifier;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod ink;
pub mod parsers;
pub mod partitioner;
pub mod recognizer;
pub mod symbols;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use recognizer::Recognizer;

use ink::InkDocument;

/// Recognize a JSON ink document, classifying strokes from its annotations.
pub fn recognize_json(text: &str, config: &EngineConfig) -> Result<String> {
    Ok(recognize_document(text, config)?.equation().to_string())
}

/// Like [`recognize_json`] but returns the whole session.
pub fn recognize_document(
    text: &str,
    config: &EngineConfig,
) -> Result<Recognizer<classifier::AnnotatedClassifier>> {
    let doc = InkDocument::from_json(text)?;
    let classifier = doc.classifier()?;
    let strokes = doc.traces()?;
    let mut recognizer = Recognizer::new(classifier, config.clone());
    recognizer.append(&strokes)?;
    Ok(recognizer)
}
