//! Symbol arena: every classified symbol of an expression plus the
//! parent/child and previous/next links between them.
//!
//! Links are plain [`SymbolId`] indices into the arena. All link mutation
//! goes through [`SymbolArena`] so both ends of a link are always updated
//! together.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use crate::geometry::{Bounds, Point, TraceGroup};
use crate::symbols::ambiguous::{self, AmbiguousKind, Neighbour};
use crate::symbols::kinds::{self, NEXT_SYMBOL_POSITION, PositionRule};
use crate::symbols::types::{ArgumentType, Class, Label, Position};

/// Rendering of a symbol whose identity is still open.
pub const AMBIGUOUS_MARKER: &str = "AMBIGUOUS";

// ─── Identity ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A concrete identity and its filled slots, parallel to the kind's slot table.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct Variant {
    pub label: Label,
    pub children: Vec<Vec<SymbolId>>,
}

impl Variant {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            children: vec![Vec::new(); kinds::spec(label).slots.len()],
        }
    }

    pub fn has_children(&self) -> bool {
        self.children.iter().any(|c| !c.is_empty())
    }

    fn clear(&mut self) {
        for slot in &mut self.children {
            slot.clear();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Hash)]
pub enum Resolution {
    /// Candidate variants, in broadcast order. They never hold children.
    Undecided(Vec<Variant>),
    Committed(Variant),
}

#[derive(Debug, Clone, PartialEq, Hash)]
pub enum Identity {
    Concrete(Variant),
    Ambiguous {
        kind: AmbiguousKind,
        resolution: Resolution,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Links {
    pub parent: Option<SymbolId>,
    pub previous: Option<SymbolId>,
    pub next: Option<SymbolId>,
}

// ─── Symbol ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Symbol {
    group: TraceGroup,
    confidence: f64,
    identity: Identity,
    links: Links,
}

impl Symbol {
    /// A symbol for `label`; ambiguous labels start out undecided.
    pub fn new(label: Label, group: TraceGroup, confidence: f64) -> Self {
        let identity = match AmbiguousKind::from_label(label) {
            Some(kind) => Identity::Ambiguous {
                kind,
                resolution: Resolution::Undecided(
                    kind.candidates().iter().map(|&l| Variant::new(l)).collect(),
                ),
            },
            None => Identity::Concrete(Variant::new(label)),
        };
        Self {
            group,
            confidence,
            identity,
            links: Links::default(),
        }
    }

    pub fn group(&self) -> &TraceGroup {
        &self.group
    }

    pub fn group_mut(&mut self) -> &mut TraceGroup {
        &mut self.group
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence = confidence;
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn links(&self) -> Links {
        self.links
    }

    pub fn parent(&self) -> Option<SymbolId> {
        self.links.parent
    }

    pub fn previous(&self) -> Option<SymbolId> {
        self.links.previous
    }

    pub fn next(&self) -> Option<SymbolId> {
        self.links.next
    }

    /// The variant in effect: the concrete one, or the committed one.
    pub fn variant(&self) -> Option<&Variant> {
        match &self.identity {
            Identity::Concrete(v)
            | Identity::Ambiguous {
                resolution: Resolution::Committed(v),
                ..
            } => Some(v),
            Identity::Ambiguous { .. } => None,
        }
    }

    fn variant_mut(&mut self) -> Option<&mut Variant> {
        match &mut self.identity {
            Identity::Concrete(v)
            | Identity::Ambiguous {
                resolution: Resolution::Committed(v),
                ..
            } => Some(v),
            Identity::Ambiguous { .. } => None,
        }
    }

    /// Kind of an ambiguous symbol that has not committed yet.
    pub fn undecided_kind(&self) -> Option<AmbiguousKind> {
        match &self.identity {
            Identity::Ambiguous {
                kind,
                resolution: Resolution::Undecided(_),
            } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_undecided(&self) -> bool {
        self.undecided_kind().is_some()
    }

    /// Effective label; an undecided symbol reports its ambiguous label.
    pub fn label(&self) -> Label {
        match (&self.identity, self.variant()) {
            (_, Some(v)) => v.label,
            (Identity::Ambiguous { kind, .. }, None) => kind.label(),
            (Identity::Concrete(v), None) => v.label,
        }
    }

    pub fn class(&self) -> Class {
        self.label().class()
    }

    /// Children in the slot at `position`, empty if there is no such slot.
    pub fn children(&self, position: Position) -> &[SymbolId] {
        let Some(variant) = self.variant() else {
            return &[];
        };
        match kinds::spec(variant.label).slot_index(position) {
            Some(i) => &variant.children[i],
            None => &[],
        }
    }

    /// Every slot of the effective variant with its children.
    pub fn slots(&self) -> Vec<(Position, &[SymbolId])> {
        match self.variant() {
            Some(v) => kinds::spec(v.label)
                .slots
                .iter()
                .zip(&v.children)
                .map(|(s, c)| (s.position, c.as_slice()))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        self.variant().is_some_and(Variant::has_children)
    }

    /// Relabel after reclassification; links and children are dropped.
    pub(crate) fn reclassify(&mut self, label: Label, confidence: f64) {
        *self = Symbol::new(label, std::mem::take(&mut self.group), confidence);
    }

    /// Drop all links and children; ambiguous symbols become undecided again.
    /// Inside an arena use [`SymbolArena::reset_all`] so no link dangles.
    pub fn reset(&mut self) {
        self.links = Links::default();
        match &mut self.identity {
            Identity::Concrete(v) => v.clear(),
            Identity::Ambiguous { kind, resolution } => {
                *resolution = Resolution::Undecided(
                    kind.candidates().iter().map(|&l| Variant::new(l)).collect(),
                );
            }
        }
    }
}

/// Outcome of offering a candidate to one variant.
enum Offer {
    Slot(usize),
    Next,
    Reject,
}

fn offer(label: Label, position: Position, own: &Bounds, candidate: &Symbol) -> Offer {
    let spec = kinds::spec(label);
    if let Some(slot) = spec.slot_index(position) {
        let cand_bounds = candidate.group.bounds();
        return match spec.slots[slot].criterion_for(candidate.class()) {
            Some(c) if c.accepts(own, &cand_bounds, candidate.label()) => Offer::Slot(slot),
            _ => Offer::Reject,
        };
    }
    if position == NEXT_SYMBOL_POSITION {
        Offer::Next
    } else {
        Offer::Reject
    }
}

// ─── Relative position ────────────────────────────────────────────────────────

fn grid_position(x: i8, y: i8, own: &Bounds, other_area: f64) -> Position {
    match (x, y) {
        (-1, 1) => Position::AboveLeft,
        (0, 1) => Position::Above,
        (1, 1) => Position::AboveRight,
        (-1, 0) => Position::Left,
        (1, 0) => Position::Right,
        (-1, _) => Position::BelowLeft,
        (0, _) => Position::Below,
        (1, _) => Position::BelowRight,
        _ if other_area > own.area() => Position::Outside,
        _ => Position::Inside,
    }
}

fn box_row(own: &Bounds, c: Point) -> i8 {
    if c.y < own.min_y {
        -1
    } else if c.y <= own.max_y {
        0
    } else {
        1
    }
}

fn box_column(own: &Bounds, c: Point) -> i8 {
    if c.x < own.min_x {
        -1
    } else if c.x <= own.max_x {
        0
    } else {
        1
    }
}

/// Where `other` sits relative to `own` under `rule`, before any remap.
pub fn raw_position(rule: PositionRule, own: &TraceGroup, other: &TraceGroup) -> Position {
    let b = own.bounds();
    let c = other.center_of_mass();
    let other_area = other.area();
    match rule {
        PositionRule::Grid => grid_position(box_column(&b, c), box_row(&b, c), &b, other_area),
        PositionRule::Angled => {
            let x = box_column(&b, c);
            let y = match x {
                -1 => {
                    let dx = c.x - b.min_x;
                    if c.y < dx + b.min_y {
                        -1
                    } else if c.y <= -dx + b.max_y {
                        0
                    } else {
                        1
                    }
                }
                0 => box_row(&b, c),
                // Everything right of the box is the next symbol.
                _ => return Position::Right,
            };
            grid_position(x, y, &b, other_area)
        }
        PositionRule::LeftRight => {
            if c.x < own.center_of_mass().x {
                Position::Left
            } else {
                Position::Right
            }
        }
    }
}

// ─── Arena ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SymbolArena {
    nodes: Vec<Symbol>,
}

impl Index<SymbolId> for SymbolArena {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.nodes[id.0]
    }
}

impl FromIterator<Symbol> for SymbolArena {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, symbol: Symbol) -> SymbolId {
        self.nodes.push(symbol);
        SymbolId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.nodes.len()).map(SymbolId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.nodes.iter().enumerate().map(|(i, s)| (SymbolId(i), s))
    }

    pub fn into_symbols(self) -> Vec<Symbol> {
        self.nodes
    }

    fn node_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.nodes[id.0]
    }

    // ── Links ───────────────────────────────────────────────────────────

    /// Re-parent `child`, detaching it from its previous parent's slots.
    pub fn set_parent(&mut self, child: SymbolId, parent: Option<SymbolId>) {
        let old = self[child].links.parent;
        if let Some(old) = old {
            if Some(old) != parent {
                self.remove_child(old, child);
            }
        }
        self.node_mut(child).links.parent = parent;
    }

    /// Link `next` after `id`, unlinking whatever either side pointed at before.
    pub fn set_next(&mut self, id: SymbolId, next: Option<SymbolId>) {
        if next == Some(id) {
            return;
        }
        let old = self[id].links.next;
        if old == next {
            return;
        }
        if let Some(old) = old {
            if self[old].links.previous == Some(id) {
                self.node_mut(old).links.previous = None;
            }
        }
        if let Some(n) = next {
            if let Some(p) = self[n].links.previous {
                if p != id {
                    self.node_mut(p).links.next = None;
                }
            }
            self.node_mut(n).links.previous = Some(id);
        }
        self.node_mut(id).links.next = next;
    }

    pub fn set_previous(&mut self, id: SymbolId, previous: Option<SymbolId>) {
        match previous {
            Some(p) => self.set_next(p, Some(id)),
            None => {
                if let Some(p) = self[id].links.previous {
                    self.set_next(p, None);
                }
            }
        }
    }

    /// Take `child` out of `parent`'s slots. A sibling whose next link
    /// pointed at it loses that link. Returns false if it was not a child.
    pub fn remove_child(&mut self, parent: SymbolId, child: SymbolId) -> bool {
        let mut unlink = None;
        let mut removed = false;
        if let Some(variant) = self.node_mut(parent).variant_mut() {
            for slot in &mut variant.children {
                if let Some(i) = slot.iter().position(|&c| c == child) {
                    slot.remove(i);
                    removed = true;
                    if i > 0 {
                        unlink = Some(slot[i - 1]);
                    }
                    break;
                }
            }
        }
        if let Some(sibling) = unlink {
            if self[sibling].links.next == Some(child) {
                self.set_next(sibling, None);
            }
        }
        removed
    }

    /// Replace the slot at `position` with `ordered`, dropping any symbol
    /// whose parent is no longer `parent`.
    pub fn retain_children(&mut self, parent: SymbolId, position: Position, ordered: &[SymbolId]) {
        let kept: Vec<SymbolId> = ordered
            .iter()
            .copied()
            .filter(|&c| self[c].links.parent == Some(parent))
            .collect();
        let Some(variant) = self.node_mut(parent).variant_mut() else {
            return;
        };
        if let Some(slot) = kinds::spec(variant.label).slot_index(position) {
            variant.children[slot] = kept;
        }
    }

    /// True if `ancestor` is `id` or one of its parents.
    pub fn is_ancestor(&self, ancestor: SymbolId, id: SymbolId) -> bool {
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self[c].links.parent;
        }
        false
    }

    // ── Relations ───────────────────────────────────────────────────────

    /// Position of `other` relative to `id`, after the kind's remap.
    pub fn relative_position(&self, id: SymbolId, other: SymbolId) -> Position {
        let label = self[id].label();
        let spec = kinds::spec(label);
        let raw = raw_position(spec.rule, &self[id].group, &self[other].group);
        spec.remap(raw)
    }

    /// Offer `candidate` to `id` at `position`.
    ///
    /// A slot that takes the candidate's class and whose criterion passes
    /// gains it as a child. Otherwise a candidate to the right becomes the
    /// next symbol. An undecided symbol offers the candidate to each of its
    /// variants and commits to the first one that takes it as a child.
    pub fn set_argument(
        &mut self,
        id: SymbolId,
        position: Position,
        candidate: SymbolId,
    ) -> ArgumentType {
        if id == candidate {
            return ArgumentType::None;
        }
        let own = self[id].group.bounds();
        let labels: Vec<Label> = match &self[id].identity {
            Identity::Ambiguous {
                kind,
                resolution: Resolution::Undecided(_),
            } => kind.candidates().to_vec(),
            _ => vec![self[id].label()],
        };

        let mut next = false;
        for label in labels {
            match offer(label, position, &own, &self[candidate]) {
                Offer::Slot(slot) => {
                    self.commit(id, label);
                    if let Some(variant) = self.node_mut(id).variant_mut() {
                        if !variant.children[slot].contains(&candidate) {
                            variant.children[slot].push(candidate);
                        }
                    }
                    return ArgumentType::Child;
                }
                Offer::Next => next = true,
                Offer::Reject => {}
            }
        }
        if next {
            self.set_next(id, Some(candidate));
            ArgumentType::NextSymbol
        } else {
            ArgumentType::None
        }
    }

    // ── Ambiguity ───────────────────────────────────────────────────────

    /// Commit an undecided symbol to `label`. No-op for concrete or
    /// already committed symbols, or if `label` is not a candidate.
    pub fn commit(&mut self, id: SymbolId, label: Label) {
        if let Identity::Ambiguous { resolution, .. } = &mut self.node_mut(id).identity {
            if let Resolution::Undecided(candidates) = resolution {
                if let Some(i) = candidates.iter().position(|v| v.label == label) {
                    let chosen = candidates.swap_remove(i);
                    *resolution = Resolution::Committed(chosen);
                }
            }
        }
    }

    fn neighbour(&self, id: SymbolId, offset: isize) -> Neighbour {
        let mut current = Some(id);
        for _ in 0..offset.unsigned_abs() {
            current = current.and_then(|c| {
                if offset < 0 {
                    self[c].links.previous
                } else {
                    self[c].links.next
                }
            });
        }
        match current {
            Some(c) => match self[c].undecided_kind() {
                Some(kind) => Neighbour::Undecided(kind),
                None => Neighbour::Definite(self[c].label()),
            },
            None => Neighbour::Missing,
        }
    }

    /// Let an undecided symbol settle from its siblings. Returns true if it
    /// committed.
    pub fn re_evaluate(&mut self, id: SymbolId, force: bool) -> bool {
        let Some(kind) = self[id].undecided_kind() else {
            return false;
        };
        match ambiguous::decide(kind, |offset| self.neighbour(id, offset), force) {
            Some(label) => {
                log::trace!("{id} {} resolved to {label}", kind.label());
                self.commit(id, label);
                true
            }
            None => false,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    /// Render `id` with its slots filled from its children.
    pub fn build_expression(&self, id: SymbolId) -> String {
        self.build_at(id, 0)
    }

    fn build_at(&self, id: SymbolId, depth: usize) -> String {
        if depth > self.nodes.len() {
            return String::new();
        }
        let Some(variant) = self[id].variant() else {
            return AMBIGUOUS_MARKER.to_string();
        };
        let spec = kinds::spec(variant.label);
        let mut out = kinds::template(variant.label);
        for (slot, children) in spec.slots.iter().zip(&variant.children) {
            let Some(&first) = children.first() else {
                continue;
            };
            let mut value = self.build_at(first, depth + 1);
            for j in 0..children.len() - 1 {
                let follower = self[children[j]].links.next.unwrap_or(children[j + 1]);
                value.push_str(&self.build_at(follower, depth + 1));
            }
            out = out.replace(&slot.position.marker(), &format!("{{{value}}}"));
        }
        kinds::clear_placeholders(&out, spec.clear)
    }

    // ── Bookkeeping ─────────────────────────────────────────────────────

    pub fn reset(&mut self, id: SymbolId) {
        self.node_mut(id).reset();
    }

    pub fn reset_all(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    /// Hash of every link and identity; equal hashes between two grammar
    /// passes mean nothing moved.
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for node in &self.nodes {
            node.links.hash(&mut hasher);
            node.identity.hash(&mut hasher);
        }
        hasher.finish()
    }
}
