//! Geometry primitives: points, strokes and stroke groups.

pub mod point;
pub mod trace;
pub mod trace_group;

pub use point::Point;
pub use trace::{Bounds, Trace};
pub use trace_group::TraceGroup;
