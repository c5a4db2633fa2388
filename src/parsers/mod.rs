//! Grammar parser: turn a flat list of classified symbols into a tree and
//! render it as an equation.
//!
//! Symbols are ordered by their left edge and neighbouring pairs are fed to
//! a [`Grammar`] until the links stop changing. Each child slot is then
//! parsed the same way on its own.

pub mod grammar;

pub use grammar::{GeometricalGrammar, Grammar};

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, warn};

use crate::config::{DiagnosticsConfig, EngineConfig, GrammarConfig, OverlapConfig};
use crate::geometry::{Trace, TraceGroup};
use crate::symbols::{SymbolArena, SymbolId};

// ─── GrammarParser ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GrammarParser<G = GeometricalGrammar> {
    grammar: G,
    config: GrammarConfig,
    overlap: OverlapConfig,
    diagnostics: DiagnosticsConfig,
}

impl GrammarParser<GeometricalGrammar> {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_grammar(GeometricalGrammar::new(config.grammar.area_ratio), config)
    }
}

impl<G: Grammar> GrammarParser<G> {
    pub fn with_grammar(grammar: G, config: &EngineConfig) -> Self {
        Self {
            grammar,
            config: config.grammar.clone(),
            overlap: config.partitioner.overlap.clone(),
            diagnostics: config.diagnostics.clone(),
        }
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Discover the links between every symbol of `arena`. Existing links
    /// are dropped first, and every ambiguous symbol is committed on return.
    pub fn parse(&self, arena: &mut SymbolArena) {
        arena.reset_all();
        let ids: Vec<SymbolId> = arena.ids().collect();
        self.parse_level(arena, ids, 0);
        for id in sorted_by_left(arena, arena.ids().collect()) {
            arena.re_evaluate(id, true);
        }
    }

    /// Parse one level (the whole expression, or one child slot) and return
    /// its symbols in left-to-right order.
    fn parse_level(&self, arena: &mut SymbolArena, ids: Vec<SymbolId>, depth: usize) -> Vec<SymbolId> {
        let ids = sorted_by_left(arena, ids);
        if ids.len() <= 1 || depth > arena.len() {
            return ids;
        }

        let pairs = self.pairs(arena, &ids);
        if self.diagnostics.verbose {
            let listed: Vec<String> = pairs.iter().map(|(a, b)| format!("({a}, {b})")).collect();
            debug!("depth {depth}: pairs {}", listed.join(" "));
        }

        self.run_pairs(arena, &pairs);
        for &id in &ids {
            arena.re_evaluate(id, false);
        }

        let cap = self.config.max_passes.max(pairs.len() + 1);
        let mut passes = 1;
        loop {
            let before = arena.state_hash();
            self.run_pairs(arena, &pairs);
            passes += 1;
            if arena.state_hash() == before {
                break;
            }
            if passes >= cap {
                warn!("grammar did not settle after {passes} passes at depth {depth}");
                break;
            }
        }
        if self.diagnostics.verbose {
            debug!("depth {depth}: settled after {passes} passes");
        }

        for &id in &ids {
            let slots: Vec<_> = arena[id]
                .slots()
                .into_iter()
                .filter(|(_, children)| !children.is_empty())
                .map(|(position, children)| (position, children.to_vec()))
                .collect();
            for (position, children) in slots {
                let ordered = self.parse_level(arena, children, depth + 1);
                arena.retain_children(id, position, &ordered);
            }
        }
        ids
    }

    fn run_pairs(&self, arena: &mut SymbolArena, pairs: &[(SymbolId, SymbolId)]) {
        for &(first, second) in pairs {
            self.grammar.parse(arena, first, second);
        }
    }

    /// Neighbouring pairs of `ids` (already sorted by left edge), ordered by
    /// the left-to-right rank of their members. When a third symbol crosses
    /// the segment joining a pair, that symbol is paired with each side
    /// instead.
    fn pairs(&self, arena: &SymbolArena, ids: &[SymbolId]) -> Vec<(SymbolId, SymbolId)> {
        let rank: HashMap<SymbolId, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut unique: BTreeMap<(usize, usize), (SymbolId, SymbolId)> = BTreeMap::new();
        for window in ids.windows(2) {
            for (a, b) in self.process_path(arena, ids, window[0], window[1]) {
                let (ra, rb) = (rank[&a], rank[&b]);
                unique.entry((ra.min(rb), ra.max(rb))).or_insert((a, b));
            }
        }
        let mut pairs: Vec<_> = unique.into_values().collect();
        pairs.sort_by_key(|&(a, b)| (rank[&a], rank[&b]));
        pairs
    }

    /// The pair `(a, b)`, or, when the closest-point segment between them
    /// crosses another symbol, the first such symbol paired with each side.
    fn process_path(
        &self,
        arena: &SymbolArena,
        ids: &[SymbolId],
        a: SymbolId,
        b: SymbolId,
    ) -> Vec<(SymbolId, SymbolId)> {
        let Some((p, q)) = TraceGroup::closest_points(arena[a].group(), arena[b].group()) else {
            return vec![(a, b)];
        };
        let connector = Trace::from_points(vec![p, q]);
        let crossing = ids
            .iter()
            .copied()
            .filter(|&i| i != a && i != b)
            .find(|&i| arena[i].group().is_overlapped_by(&connector, &self.overlap));
        let Some(i) = crossing else {
            return vec![(a, b)];
        };
        let left = |id: SymbolId| arena[id].group().bounds().min_x;
        let ordered = |other: SymbolId| {
            if left(i) < left(other) {
                (i, other)
            } else {
                (other, i)
            }
        };
        vec![ordered(a), ordered(b)]
    }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

/// Render the parsed expression, starting from its leftmost top-level symbol
/// and following the next-symbol chain. Empty arenas render as "".
pub fn equation(arena: &SymbolArena) -> String {
    let sorted = sorted_by_left(arena, arena.ids().collect());
    let Some(&start) = sorted.iter().find(|&&id| arena[id].parent().is_none()) else {
        return String::new();
    };
    let mut out = arena.build_expression(start);
    let mut rendered = HashSet::from([start]);
    for id in sorted {
        let Some(next) = arena[id].next() else {
            continue;
        };
        if arena[next].parent().is_none() && rendered.insert(next) {
            out.push_str(&arena.build_expression(next));
        }
    }
    out
}

fn sorted_by_left(arena: &SymbolArena, mut ids: Vec<SymbolId>) -> Vec<SymbolId> {
    ids.sort_by(|&a, &b| {
        let (la, lb) = (arena[a].group().bounds().min_x, arena[b].group().bounds().min_x);
        la.total_cmp(&lb)
    });
    ids
}
