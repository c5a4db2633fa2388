//! Symbol model: vocabulary, per-kind tables, ambiguity resolution and
//! the linked symbol arena the grammar works on.

pub mod ambiguous;
pub mod arena;
pub mod factory;
pub mod kinds;
pub mod types;

pub use ambiguous::AmbiguousKind;
pub use arena::{AMBIGUOUS_MARKER, Identity, Links, Resolution, Symbol, SymbolArena, SymbolId, Variant};
pub use types::{ArgumentType, Class, Criterion, Label, Position};
