//! Grammar rules: decide how two neighbouring symbols relate.

use log::trace;

use crate::config::GRAMMAR_AREA_RATIO;
use crate::symbols::{ArgumentType, SymbolArena, SymbolId};

// ─── Grammar trait ────────────────────────────────────────────────────────────

/// Trait for spatial grammars.
pub trait Grammar {
    /// Relate `first` and `second` (in left-to-right order), updating the
    /// arena's links.
    fn parse(&self, arena: &mut SymbolArena, first: SymbolId, second: SymbolId) -> ArgumentType;
}

// ─── GeometricalGrammar ───────────────────────────────────────────────────────

/// Relates symbols purely by where they sit relative to each other.
///
/// The first symbol is offered the second at their relative position. If
/// it has no use for it, the offer climbs to its parent. When nothing takes
/// the second symbol and the first is clearly the smaller one, the pair is
/// tried the other way round.
#[derive(Debug, Clone)]
pub struct GeometricalGrammar {
    area_ratio: f64,
}

impl Default for GeometricalGrammar {
    fn default() -> Self {
        Self::new(GRAMMAR_AREA_RATIO)
    }
}

impl GeometricalGrammar {
    pub fn new(area_ratio: f64) -> Self {
        Self { area_ratio }
    }

    /// Offer `secondary` to `primary`, then to its ancestors.
    fn attach(&self, arena: &mut SymbolArena, primary: SymbolId, secondary: SymbolId) -> ArgumentType {
        if arena.is_ancestor(secondary, primary) {
            return ArgumentType::None;
        }
        let position = arena.relative_position(primary, secondary);
        let outcome = arena.set_argument(primary, position, secondary);
        trace!(
            "{primary} {} -> {secondary} {}: {position} {outcome:?}",
            arena[primary].label(),
            arena[secondary].label()
        );
        match outcome {
            ArgumentType::Child => arena.set_parent(secondary, Some(primary)),
            ArgumentType::NextSymbol => {
                if let Some(parent) = arena[primary].parent() {
                    if arena.is_ancestor(secondary, parent) {
                        return outcome;
                    }
                    let position = arena.relative_position(parent, secondary);
                    match arena.set_argument(parent, position, secondary) {
                        ArgumentType::Child => arena.set_parent(secondary, Some(parent)),
                        ArgumentType::NextSymbol => arena.set_next(primary, None),
                        ArgumentType::None => {}
                    }
                }
            }
            ArgumentType::None => {
                if let Some(parent) = arena[primary].parent() {
                    return self.attach(arena, parent, secondary);
                }
            }
        }
        outcome
    }
}

impl Grammar for GeometricalGrammar {
    fn parse(&self, arena: &mut SymbolArena, first: SymbolId, second: SymbolId) -> ArgumentType {
        let parents = (arena[first].parent(), arena[second].parent());
        let outcome = self.attach(arena, first, second);
        if outcome != ArgumentType::None
            || (arena[first].parent(), arena[second].parent()) != parents
        {
            return outcome;
        }
        let first_area = arena[first].group().area();
        let second_area = arena[second].group().area();
        if first_area < self.area_ratio * second_area {
            return self.attach(arena, second, first);
        }
        outcome
    }
}
