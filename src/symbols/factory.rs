//! Label → symbol construction.

use crate::geometry::TraceGroup;
use crate::symbols::arena::Symbol;
use crate::symbols::types::Label;

/// Build the symbol for `label` over a copy of `group`.
pub fn create(label: Label, group: &TraceGroup, confidence: f64) -> Symbol {
    Symbol::new(label, group.clone(), confidence)
}
