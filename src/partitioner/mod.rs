//! Partitioners: group raw strokes into classified symbols.

pub mod atomic;
pub mod mst;

pub use mst::MstPartitioner;

use crate::error::{EngineError, Result};
use crate::geometry::TraceGroup;
use crate::symbols::Symbol;

/// Trait for stroke partitioners.
///
/// Every symbol handed back is detached: no parent, siblings or children.
pub trait Partitioner {
    /// Split a whole expression into symbols.
    fn partition(&self, expression: &TraceGroup) -> Result<Vec<Symbol>>;

    /// Add strokes to an already partitioned expression.
    fn append(&self, symbols: Vec<Symbol>, strokes: &TraceGroup) -> Result<Vec<Symbol>>;

    /// Take strokes out of an already partitioned expression.
    fn remove(&self, symbols: Vec<Symbol>, strokes: &TraceGroup) -> Vec<Symbol>;
}

/// Reject strokes the geometry cannot work with.
pub fn validate(strokes: &TraceGroup) -> Result<()> {
    for (i, trace) in strokes.iter().enumerate() {
        if trace.is_empty() {
            return Err(EngineError::InvalidInput(format!("stroke {i} has no points")));
        }
        if !trace.points().iter().all(|p| p.is_finite()) {
            return Err(EngineError::InvalidInput(format!(
                "stroke {i} has a non-finite coordinate"
            )));
        }
    }
    Ok(())
}
