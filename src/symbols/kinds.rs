//! Per-kind tables: child slots, render templates, relative-position rules.
//!
//! Every concrete label maps to one [`KindSpec`]. Behaviour that used to
//! live in per-symbol overrides is expressed here as data and interpreted
//! by the arena.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::symbols::types::{Class, Criterion, Label, Position};

// ─── Table types ──────────────────────────────────────────────────────────────

/// One child slot: its position and the classes it takes, each with the
/// criterion the candidate must pass.
#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    pub position: Position,
    pub accepts: &'static [(Class, Criterion)],
}

impl SlotSpec {
    pub fn criterion_for(&self, class: Class) -> Option<Criterion> {
        self.accepts
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, criterion)| *criterion)
    }
}

/// How the 3×3 neighbourhood around a symbol is carved up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionRule {
    /// Plain bounding-box grid, INSIDE/OUTSIDE decided by area.
    Grid,
    /// Grid whose left and right columns are split by 45° rays from the
    /// box corners; anything right of the box collapses to RIGHT.
    Angled,
    /// Only LEFT or RIGHT, by center of mass.
    LeftRight,
}

/// What happens to unfilled slot markers when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearRule {
    /// `^{P}`, `_{P}` and `{P}` all disappear.
    Strip,
    /// `^{P}` and `_{P}` disappear, a bare `{P}` becomes `{}`.
    EmptyBraces,
}

#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub slots: &'static [SlotSpec],
    /// Appended to the label's glyph to form the render template.
    pub suffix: &'static str,
    pub rule: PositionRule,
    /// Applied to the rule's raw result, first match wins.
    pub remap: &'static [(Position, Position)],
    pub clear: ClearRule,
}

impl KindSpec {
    pub fn slot_index(&self, position: Position) -> Option<usize> {
        self.slots.iter().position(|s| s.position == position)
    }

    pub fn remap(&self, position: Position) -> Position {
        self.remap
            .iter()
            .find(|(from, _)| *from == position)
            .map(|(_, to)| *to)
            .unwrap_or(position)
    }
}

/// Only RIGHT ever links a candidate as the next symbol.
pub const NEXT_SYMBOL_POSITION: Position = Position::Right;

// ─── Slot tables ──────────────────────────────────────────────────────────────

const EXPONENT: &[(Class, Criterion)] = &[
    (Class::Number, Criterion::Size),
    (Class::Letter, Criterion::Size),
    (Class::Operator, Criterion::WidthSizeExceptSqrtFractionLine),
    (Class::Ambiguous, Criterion::SizeWidth),
    (Class::Variable, Criterion::Size),
];

const SUBSCRIPT: &[(Class, Criterion)] = &[
    (Class::Number, Criterion::Size),
    (Class::Letter, Criterion::Size),
];

const ANYTHING: &[(Class, Criterion)] = &[
    (Class::Number, Criterion::All),
    (Class::Operator, Criterion::All),
    (Class::Letter, Criterion::All),
    (Class::Ambiguous, Criterion::All),
    (Class::Variable, Criterion::All),
];

const SMALLER: &[(Class, Criterion)] = &[
    (Class::Number, Criterion::Size),
    (Class::Operator, Criterion::Size),
    (Class::Letter, Criterion::Size),
    (Class::Ambiguous, Criterion::Size),
    (Class::Variable, Criterion::Size),
];

// ─── Kinds ────────────────────────────────────────────────────────────────────

const NUMBER: KindSpec = KindSpec {
    slots: &[SlotSpec {
        position: Position::AboveRight,
        accepts: EXPONENT,
    }],
    suffix: "^{ABOVE_RIGHT}",
    rule: PositionRule::Grid,
    remap: &[
        (Position::Above, Position::AboveRight),
        (Position::BelowRight, Position::Right),
    ],
    clear: ClearRule::Strip,
};

const LETTER: KindSpec = KindSpec {
    slots: &[],
    suffix: "",
    rule: PositionRule::Grid,
    remap: &[],
    clear: ClearRule::Strip,
};

const VARIABLE: KindSpec = KindSpec {
    slots: &[
        SlotSpec {
            position: Position::AboveRight,
            accepts: EXPONENT,
        },
        SlotSpec {
            position: Position::BelowRight,
            accepts: SUBSCRIPT,
        },
    ],
    suffix: "^{ABOVE_RIGHT}_{BELOW_RIGHT}",
    rule: PositionRule::Grid,
    remap: &[
        (Position::Above, Position::AboveRight),
        (Position::Below, Position::BelowRight),
    ],
    clear: ClearRule::Strip,
};

const INFIX: KindSpec = KindSpec {
    slots: &[],
    suffix: "",
    rule: PositionRule::Grid,
    remap: &[
        (Position::AboveRight, Position::Right),
        (Position::BelowRight, Position::Right),
    ],
    clear: ClearRule::Strip,
};

const FLAT: KindSpec = KindSpec {
    slots: &[],
    suffix: "",
    rule: PositionRule::Angled,
    remap: &[],
    clear: ClearRule::Strip,
};

const FRACTION_LINE: KindSpec = KindSpec {
    slots: &[
        SlotSpec {
            position: Position::Above,
            accepts: ANYTHING,
        },
        SlotSpec {
            position: Position::Below,
            accepts: ANYTHING,
        },
    ],
    suffix: "{ABOVE}{BELOW}",
    rule: PositionRule::Angled,
    remap: &[],
    clear: ClearRule::EmptyBraces,
};

const SQUARE_ROOT: KindSpec = KindSpec {
    slots: &[
        SlotSpec {
            position: Position::Inside,
            accepts: SMALLER,
        },
        SlotSpec {
            position: Position::AboveRight,
            accepts: SMALLER,
        },
    ],
    suffix: "{INSIDE}^{ABOVE_RIGHT}",
    rule: PositionRule::Grid,
    remap: &[(Position::BelowRight, Position::Right)],
    clear: ClearRule::EmptyBraces,
};

const LEFT_PARENTHESIS: KindSpec = KindSpec {
    slots: &[],
    suffix: "",
    rule: PositionRule::Grid,
    remap: &[
        (Position::Inside, Position::Right),
        (Position::AboveRight, Position::Right),
        (Position::BelowRight, Position::Right),
    ],
    clear: ClearRule::Strip,
};

const RIGHT_PARENTHESIS: KindSpec = KindSpec {
    slots: &[SlotSpec {
        position: Position::AboveRight,
        accepts: ANYTHING,
    }],
    suffix: "^{ABOVE_RIGHT}",
    rule: PositionRule::Grid,
    remap: &[
        (Position::Inside, Position::Left),
        (Position::BelowRight, Position::Left),
        (Position::Above, Position::AboveRight),
    ],
    clear: ClearRule::Strip,
};

const DOT: KindSpec = KindSpec {
    slots: &[],
    suffix: "",
    rule: PositionRule::LeftRight,
    remap: &[],
    clear: ClearRule::Strip,
};

/// Unresolved ambiguous symbols: no slots, rendered as a bare marker.
const UNDECIDED: KindSpec = LETTER;

const UNDECIDED_LINE: KindSpec = FLAT;

/// Table entry for `label`.
pub fn spec(label: Label) -> &'static KindSpec {
    use Label::*;
    match label {
        Zero | One | Two | Three | Four | Five | Six | Seven | Eight | Nine => &NUMBER,
        LowerA | LowerC | LowerE | LowerG | LowerI | LowerL | LowerN | LowerO | LowerS
        | LowerT => &LETTER,
        LowerX | LowerY => &VARIABLE,
        Plus | LessThan | GreaterThan => &INFIX,
        Minus | Equals => &FLAT,
        FractionLine => &FRACTION_LINE,
        SquareRoot => &SQUARE_ROOT,
        LeftParenthesis => &LEFT_PARENTHESIS,
        RightParenthesis => &RIGHT_PARENTHESIS,
        Dot => &DOT,
        HorizontalLine => &UNDECIDED_LINE,
        SLike | GLike | CLike | Circle | VerticalLine => &UNDECIDED,
    }
}

/// Render template of `label` with its slot markers still in place.
pub fn template(label: Label) -> String {
    format!("{}{}", label.glyph(), spec(label).suffix)
}

// ─── Placeholders ─────────────────────────────────────────────────────────────

static PLACEHOLDER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"([\^_]?)\{(ABOVE_RIGHT|BELOW_RIGHT|ABOVE_LEFT|BELOW_LEFT|ABOVE|BELOW|RIGHT|LEFT|INSIDE|OUTSIDE)\}",
    )
    .ok()
});

/// Remove the slot markers left unfilled after substitution.
pub fn clear_placeholders(text: &str, rule: ClearRule) -> String {
    let Some(re) = PLACEHOLDER.as_ref() else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &Captures| match rule {
        ClearRule::EmptyBraces if caps[1].is_empty() => "{}",
        _ => "",
    })
    .into_owned()
}
