//! Symbol vocabulary: labels, classes, relative positions, argument types
//! and child-acceptance criteria.

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::geometry::Bounds;

// ─── Class ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Number,
    Letter,
    Variable,
    Operator,
    Ambiguous,
}

impl Class {
    pub const ALL: [Class; 5] = [
        Class::Number,
        Class::Letter,
        Class::Variable,
        Class::Operator,
        Class::Ambiguous,
    ];
}

// ─── Label ────────────────────────────────────────────────────────────────────

/// Every identity a classified stroke group can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    LowerA,
    LowerC,
    LowerE,
    LowerG,
    LowerI,
    LowerL,
    LowerN,
    LowerO,
    LowerS,
    LowerT,
    LowerX,
    LowerY,
    Plus,
    Equals,
    Minus,
    SquareRoot,
    LeftParenthesis,
    RightParenthesis,
    FractionLine,
    GreaterThan,
    LessThan,
    Dot,
    SLike,
    GLike,
    CLike,
    Circle,
    HorizontalLine,
    VerticalLine,
}

impl Label {
    pub const ALL: [Label; 38] = [
        Label::Zero,
        Label::One,
        Label::Two,
        Label::Three,
        Label::Four,
        Label::Five,
        Label::Six,
        Label::Seven,
        Label::Eight,
        Label::Nine,
        Label::LowerA,
        Label::LowerC,
        Label::LowerE,
        Label::LowerG,
        Label::LowerI,
        Label::LowerL,
        Label::LowerN,
        Label::LowerO,
        Label::LowerS,
        Label::LowerT,
        Label::LowerX,
        Label::LowerY,
        Label::Plus,
        Label::Equals,
        Label::Minus,
        Label::SquareRoot,
        Label::LeftParenthesis,
        Label::RightParenthesis,
        Label::FractionLine,
        Label::GreaterThan,
        Label::LessThan,
        Label::Dot,
        Label::SLike,
        Label::GLike,
        Label::CLike,
        Label::Circle,
        Label::HorizontalLine,
        Label::VerticalLine,
    ];

    pub fn class(self) -> Class {
        use Label::*;
        match self {
            Zero | One | Two | Three | Four | Five | Six | Seven | Eight | Nine => Class::Number,
            LowerA | LowerC | LowerE | LowerG | LowerI | LowerL | LowerN | LowerO | LowerS
            | LowerT => Class::Letter,
            LowerX | LowerY => Class::Variable,
            Plus | Equals | Minus | SquareRoot | LeftParenthesis | RightParenthesis
            | FractionLine | GreaterThan | LessThan | Dot => Class::Operator,
            SLike | GLike | CLike | Circle | HorizontalLine | VerticalLine => Class::Ambiguous,
        }
    }

    /// Upper-snake identifier, e.g. `FRACTION_LINE`.
    pub fn name(self) -> &'static str {
        use Label::*;
        match self {
            Zero => "ZERO",
            One => "ONE",
            Two => "TWO",
            Three => "THREE",
            Four => "FOUR",
            Five => "FIVE",
            Six => "SIX",
            Seven => "SEVEN",
            Eight => "EIGHT",
            Nine => "NINE",
            LowerA => "LOWER_A",
            LowerC => "LOWER_C",
            LowerE => "LOWER_E",
            LowerG => "LOWER_G",
            LowerI => "LOWER_I",
            LowerL => "LOWER_L",
            LowerN => "LOWER_N",
            LowerO => "LOWER_O",
            LowerS => "LOWER_S",
            LowerT => "LOWER_T",
            LowerX => "LOWER_X",
            LowerY => "LOWER_Y",
            Plus => "PLUS",
            Equals => "EQUALS",
            Minus => "MINUS",
            SquareRoot => "SQUARE_ROOT",
            LeftParenthesis => "LEFT_PARENTHESIS",
            RightParenthesis => "RIGHT_PARENTHESIS",
            FractionLine => "FRACTION_LINE",
            GreaterThan => "GREATER_THAN",
            LessThan => "LESS_THAN",
            Dot => "DOT",
            SLike => "S_LIKE",
            GLike => "G_LIKE",
            CLike => "C_LIKE",
            Circle => "CIRCLE",
            HorizontalLine => "HORIZONTAL_LINE",
            VerticalLine => "VERTICAL_LINE",
        }
    }

    /// Literal text the symbol renders as, before any slot markers.
    /// Unresolved ambiguous labels render as `AMBIGUOUS`.
    pub fn glyph(self) -> &'static str {
        use Label::*;
        match self {
            Zero => "0",
            One => "1",
            Two => "2",
            Three => "3",
            Four => "4",
            Five => "5",
            Six => "6",
            Seven => "7",
            Eight => "8",
            Nine => "9",
            LowerA => "a",
            LowerC => "c",
            LowerE => "e",
            LowerG => "g",
            LowerI => "i",
            LowerL => "l",
            LowerN => "n",
            LowerO => "o",
            LowerS => "s",
            LowerT => "t",
            LowerX => "x",
            LowerY => "y",
            Plus => "+",
            Equals => "=",
            Minus => "-",
            SquareRoot => "\\sqrt",
            LeftParenthesis => "(",
            RightParenthesis => ")",
            FractionLine => "\\frac",
            GreaterThan => ">",
            LessThan => "<",
            Dot => ".",
            SLike | GLike | CLike | Circle | HorizontalLine | VerticalLine => "AMBIGUOUS",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Label {
    type Err = EngineError;

    /// Accepts the upper-snake name (case-insensitive) or, for concrete
    /// single-character symbols, the glyph itself (`"x"`, `"+"`, `"7"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::UnknownLabel(s.to_string()));
        }
        let upper = trimmed.to_ascii_uppercase();
        if let Some(label) = Label::ALL.iter().find(|l| l.name() == upper) {
            return Ok(*label);
        }
        Label::ALL
            .iter()
            .find(|l| l.class() != Class::Ambiguous && l.glyph() == trimmed)
            .copied()
            .ok_or_else(|| EngineError::UnknownLabel(s.to_string()))
    }
}

// ─── Position ─────────────────────────────────────────────────────────────────

/// Where one symbol sits relative to another's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Above,
    AboveRight,
    Right,
    BelowRight,
    Below,
    BelowLeft,
    Left,
    AboveLeft,
    Inside,
    Outside,
}

impl Position {
    /// Placeholder name used inside symbol templates.
    pub fn name(self) -> &'static str {
        match self {
            Position::Above => "ABOVE",
            Position::AboveRight => "ABOVE_RIGHT",
            Position::Right => "RIGHT",
            Position::BelowRight => "BELOW_RIGHT",
            Position::Below => "BELOW",
            Position::BelowLeft => "BELOW_LEFT",
            Position::Left => "LEFT",
            Position::AboveLeft => "ABOVE_LEFT",
            Position::Inside => "INSIDE",
            Position::Outside => "OUTSIDE",
        }
    }

    /// Placeholder as it appears in a template, e.g. `{ABOVE_RIGHT}`.
    pub fn marker(self) -> String {
        format!("{{{}}}", self.name())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── ArgumentType ─────────────────────────────────────────────────────────────

/// Outcome of offering a candidate symbol to another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentType {
    None,
    Child,
    NextSymbol,
}

// ─── Criterion ────────────────────────────────────────────────────────────────

/// Per-slot, per-class test a candidate child must pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Parent area more than twice the child's.
    Size,
    /// `Size` and parent width more than twice the child's.
    SizeWidth,
    /// Parent width more than twice the child's.
    Width,
    All,
    /// Square roots and fraction lines always pass; anything else needs `SizeWidth`.
    WidthSizeExceptSqrtFractionLine,
}

impl Criterion {
    pub fn accepts(self, parent: &Bounds, child: &Bounds, child_label: Label) -> bool {
        let size = parent.area() > 2.0 * child.area();
        let width = parent.width() > 2.0 * child.width();
        match self {
            Criterion::Size => size,
            Criterion::SizeWidth => size && width,
            Criterion::Width => width,
            Criterion::All => true,
            Criterion::WidthSizeExceptSqrtFractionLine => {
                matches!(child_label, Label::SquareRoot | Label::FractionLine) || (size && width)
            }
        }
    }
}
