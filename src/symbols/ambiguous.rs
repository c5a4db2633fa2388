//! Ambiguous shapes and the context tables that settle them.
//!
//! A stroke shaped like a circle may be the letter `o` or the digit `0`;
//! which one depends on its neighbours along the sibling chain. Each kind
//! lists its candidate labels, a set of word patterns, and the label to
//! fall back on when no pattern applies.

use crate::symbols::types::Label;

// ─── Kinds ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmbiguousKind {
    Circle,
    CLike,
    GLike,
    SLike,
    VerticalLine,
    HorizontalLine,
}

/// `letter` wins when every `(offset, label)` neighbour matches.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub letter: Label,
    pub pattern: &'static [(isize, Label)],
}

const CIRCLE_RULES: &[Rule] = &[
    Rule {
        letter: Label::LowerO,
        pattern: &[(-1, Label::LowerC), (1, Label::LowerS)],
    },
    Rule {
        letter: Label::LowerO,
        pattern: &[(-1, Label::LowerC), (1, Label::LowerT)],
    },
    Rule {
        letter: Label::LowerO,
        pattern: &[(-1, Label::LowerL), (1, Label::LowerG)],
    },
];

const C_LIKE_RULES: &[Rule] = &[Rule {
    letter: Label::LowerC,
    pattern: &[(1, Label::LowerO)],
}];

const G_LIKE_RULES: &[Rule] = &[Rule {
    letter: Label::LowerG,
    pattern: &[(-1, Label::LowerO)],
}];

const S_LIKE_RULES: &[Rule] = &[
    Rule {
        letter: Label::LowerS,
        pattern: &[(1, Label::LowerI), (2, Label::LowerN)],
    },
    Rule {
        letter: Label::LowerS,
        pattern: &[(-1, Label::LowerO), (-2, Label::LowerC)],
    },
];

const VERTICAL_LINE_RULES: &[Rule] = &[
    Rule {
        letter: Label::LowerL,
        pattern: &[(1, Label::LowerO), (2, Label::LowerG)],
    },
    Rule {
        letter: Label::LowerI,
        pattern: &[(-1, Label::LowerS), (1, Label::LowerN)],
    },
];

impl AmbiguousKind {
    pub fn from_label(label: Label) -> Option<Self> {
        match label {
            Label::Circle => Some(AmbiguousKind::Circle),
            Label::CLike => Some(AmbiguousKind::CLike),
            Label::GLike => Some(AmbiguousKind::GLike),
            Label::SLike => Some(AmbiguousKind::SLike),
            Label::VerticalLine => Some(AmbiguousKind::VerticalLine),
            Label::HorizontalLine => Some(AmbiguousKind::HorizontalLine),
            _ => None,
        }
    }

    pub fn label(self) -> Label {
        match self {
            AmbiguousKind::Circle => Label::Circle,
            AmbiguousKind::CLike => Label::CLike,
            AmbiguousKind::GLike => Label::GLike,
            AmbiguousKind::SLike => Label::SLike,
            AmbiguousKind::VerticalLine => Label::VerticalLine,
            AmbiguousKind::HorizontalLine => Label::HorizontalLine,
        }
    }

    /// Concrete labels this shape may turn out to be, in broadcast order.
    pub fn candidates(self) -> &'static [Label] {
        match self {
            AmbiguousKind::Circle => &[Label::LowerO, Label::Zero],
            AmbiguousKind::CLike => &[Label::LowerC, Label::LeftParenthesis],
            AmbiguousKind::GLike => &[Label::LowerG, Label::Nine],
            AmbiguousKind::SLike => &[Label::LowerS, Label::Five],
            AmbiguousKind::VerticalLine => &[Label::LowerI, Label::LowerL, Label::One],
            AmbiguousKind::HorizontalLine => &[Label::Minus, Label::FractionLine],
        }
    }

    pub fn default_label(self) -> Label {
        match self {
            AmbiguousKind::Circle => Label::Zero,
            AmbiguousKind::CLike => Label::LeftParenthesis,
            AmbiguousKind::GLike => Label::Nine,
            AmbiguousKind::SLike => Label::Five,
            AmbiguousKind::VerticalLine => Label::One,
            AmbiguousKind::HorizontalLine => Label::Minus,
        }
    }

    pub fn rules(self) -> &'static [Rule] {
        match self {
            AmbiguousKind::Circle => CIRCLE_RULES,
            AmbiguousKind::CLike => C_LIKE_RULES,
            AmbiguousKind::GLike => G_LIKE_RULES,
            AmbiguousKind::SLike => S_LIKE_RULES,
            AmbiguousKind::VerticalLine => VERTICAL_LINE_RULES,
            AmbiguousKind::HorizontalLine => &[],
        }
    }

    pub fn could_be(self, label: Label) -> bool {
        self.candidates().contains(&label)
    }
}

// ─── Decision ─────────────────────────────────────────────────────────────────

/// What sits at a given offset along the sibling chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbour {
    Missing,
    Definite(Label),
    Undecided(AmbiguousKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    No,
    Tentative,
    Definite,
}

fn match_neighbour(neighbour: Neighbour, wanted: Label) -> Match {
    match neighbour {
        Neighbour::Definite(label) if label == wanted => Match::Definite,
        Neighbour::Undecided(kind) if kind.could_be(wanted) => Match::Tentative,
        _ => Match::No,
    }
}

/// Label `kind` should commit to given its neighbours, or `None` to stay
/// undecided. `lookup(offset)` reports the sibling at that offset.
///
/// Rules are tried in order. A rule whose neighbours all match definitely
/// commits its letter; one that only matches tentatively commits when
/// `force` is set and otherwise leaves the symbol undecided. When no rule
/// matches the kind's default is committed.
pub fn decide<F>(kind: AmbiguousKind, lookup: F, force: bool) -> Option<Label>
where
    F: Fn(isize) -> Neighbour,
{
    for rule in kind.rules() {
        let mut tentative = false;
        let mut matched = true;
        for &(offset, wanted) in rule.pattern {
            match match_neighbour(lookup(offset), wanted) {
                Match::Definite => {}
                Match::Tentative => tentative = true,
                Match::No => {
                    matched = false;
                    break;
                }
            }
        }
        if !matched {
            continue;
        }
        if !tentative || force {
            return Some(rule.letter);
        }
        return None;
    }
    Some(kind.default_label())
}
