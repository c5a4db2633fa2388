//! Recognizer session: the strokes written so far, their symbols and the
//! equation they spell.
//!
//! Every mutation re-partitions incrementally and re-parses the whole
//! expression, so [`Recognizer::equation`] is always current.

use std::fmt::Write as _;

use log::debug;

use crate::classifier::Classifier;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::geometry::TraceGroup;
use crate::parsers::{self, GrammarParser};
use crate::partitioner::{self, MstPartitioner, Partitioner};
use crate::symbols::{AMBIGUOUS_MARKER, SymbolArena, SymbolId};

pub struct Recognizer<C> {
    partitioner: MstPartitioner<C>,
    parser: GrammarParser,
    arena: SymbolArena,
    equation: String,
}

impl<C: Classifier> Recognizer<C> {
    pub fn new(classifier: C, config: EngineConfig) -> Self {
        Self {
            partitioner: MstPartitioner::new(classifier, &config),
            parser: GrammarParser::new(&config),
            arena: SymbolArena::new(),
            equation: String::new(),
        }
    }

    /// Add strokes. On error the session is left unchanged.
    pub fn append(&mut self, strokes: &TraceGroup) -> Result<()> {
        partitioner::validate(strokes)?;
        let symbols = self.arena.clone().into_symbols();
        let symbols = if symbols.is_empty() {
            self.partitioner.partition(strokes)?
        } else {
            self.partitioner.append(symbols, strokes)?
        };
        self.rebuild(symbols.into_iter().collect());
        Ok(())
    }

    /// Take strokes out. Strokes that were never added are ignored.
    pub fn remove(&mut self, strokes: &TraceGroup) {
        let symbols = std::mem::take(&mut self.arena).into_symbols();
        let symbols = self.partitioner.remove(symbols, strokes);
        self.rebuild(symbols.into_iter().collect());
    }

    pub fn reset(&mut self) {
        self.arena = SymbolArena::new();
        self.equation.clear();
    }

    /// The current equation. Anything still undecided makes the whole
    /// equation read [`AMBIGUOUS_MARKER`].
    pub fn equation(&self) -> &str {
        &self.equation
    }

    pub fn symbols(&self) -> &SymbolArena {
        &self.arena
    }

    pub fn set_max_traces_in_symbol(&mut self, max: usize) {
        self.partitioner.set_max_traces_in_symbol(max);
    }

    /// One line per symbol: label, confidence, links and filled slots.
    pub fn tree(&self) -> String {
        let mut out = String::new();
        for (id, symbol) in self.arena.iter() {
            let links = symbol.links();
            let _ = write!(
                out,
                "{id} {} {:.2} parent={} previous={} next={}",
                symbol.label(),
                symbol.confidence(),
                show(links.parent),
                show(links.previous),
                show(links.next),
            );
            for (position, children) in symbol.slots() {
                if children.is_empty() {
                    continue;
                }
                let listed: Vec<String> = children.iter().map(ToString::to_string).collect();
                let _ = write!(out, " {position}=[{}]", listed.join(" "));
            }
            out.push('\n');
        }
        out
    }

    fn rebuild(&mut self, mut arena: SymbolArena) {
        self.parser.parse(&mut arena);
        let text = parsers::equation(&arena);
        self.equation = if text.contains(AMBIGUOUS_MARKER) {
            AMBIGUOUS_MARKER.to_string()
        } else {
            text
        };
        debug!("{} symbols -> {}", arena.len(), self.equation);
        self.arena = arena;
    }
}

fn show(link: Option<SymbolId>) -> String {
    link.map_or_else(|| "-".to_string(), |id| id.to_string())
}
