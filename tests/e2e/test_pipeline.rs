//! Library-level scenarios: strokes in, equation out.
//!
//! Strokes are hand-placed in y-up coordinates and classified from
//! annotations, so each test pins the partitioner and grammar behaviour
//! rather than a model.

use ink_equations::classifier::AnnotatedClassifier;
use ink_equations::geometry::{Trace, TraceGroup};
use ink_equations::symbols::{Label, Position};
use ink_equations::{EngineConfig, EngineError, Recognizer, recognize_json};

fn stroke(points: &[(f64, f64)]) -> Trace {
    Trace::from(points.to_vec())
}

fn group(traces: &[&Trace]) -> TraceGroup {
    traces.iter().map(|&t| t.clone()).collect()
}

/// Annotate each listed symbol and return the recognizer plus all strokes.
fn session(symbols: &[(Label, Vec<Trace>)]) -> (Recognizer<AnnotatedClassifier>, TraceGroup) {
    let mut classifier = AnnotatedClassifier::new();
    let mut all = TraceGroup::new();
    for (label, traces) in symbols {
        classifier.add(*label, traces.iter().cloned().collect());
        for t in traces {
            all.add(t.clone());
        }
    }
    (Recognizer::new(classifier, EngineConfig::default()), all)
}

// ─── Partitioning ───────────────────────────────────────────────────────────

#[test]
fn test_three_strokes_make_one_digit() {
    let strokes = vec![
        stroke(&[(0.0, 0.0), (0.0, 8.0)]),
        stroke(&[(0.0, 12.0), (0.0, 20.0)]),
        stroke(&[(0.0, 24.0), (0.0, 32.0)]),
    ];
    let (mut rec, all) = session(&[(Label::One, strokes)]);
    rec.append(&all).unwrap();

    assert_eq!(rec.symbols().len(), 1);
    let (_, one) = rec.symbols().iter().next().unwrap();
    assert_eq!(one.label(), Label::One);
    assert!(one.confidence() > 0.0);
    assert_eq!(rec.equation(), "1");
}

#[test]
fn test_equals_sign_stays_together() {
    let one = stroke(&[(0.0, 0.0), (0.0, 15.0), (0.0, 30.0)]);
    let top = stroke(&[(10.0, 18.0), (20.0, 18.0), (30.0, 18.0)]);
    let bottom = stroke(&[(10.0, 10.0), (20.0, 10.0), (30.0, 10.0)]);
    let two = stroke(&[(40.0, 30.0), (55.0, 25.0), (40.0, 0.0), (55.0, 0.0)]);
    let (mut rec, all) = session(&[
        (Label::One, vec![one]),
        (Label::Equals, vec![top.clone(), bottom.clone()]),
        (Label::Two, vec![two]),
    ]);
    rec.append(&all).unwrap();

    let equals: Vec<_> = rec
        .symbols()
        .iter()
        .filter(|(_, s)| s.label() == Label::Equals)
        .collect();
    assert_eq!(equals.len(), 1);
    let strokes = equals[0].1.group();
    assert_eq!(strokes.len(), 2);
    assert!(strokes.contains(&top) && strokes.contains(&bottom));
    assert_eq!(rec.equation(), "1=2");
}

#[test]
fn test_dot_stays_alone() {
    let one = stroke(&[(0.0, 0.0), (0.0, 15.0), (0.0, 30.0)]);
    let dot = stroke(&[(8.0, 0.0)]);
    let five = stroke(&[(25.0, 30.0), (15.0, 30.0), (15.0, 18.0), (25.0, 10.0), (15.0, 0.0)]);
    let (mut rec, mut all) = session(&[(Label::One, vec![one]), (Label::Five, vec![five])]);
    all.add(dot);
    rec.append(&all).unwrap();

    assert_eq!(rec.symbols().len(), 3);
    assert_eq!(rec.equation(), "1.5");
    assert!(rec.symbols().iter().any(|(_, s)| s.label() == Label::Dot && s.group().len() == 1));
}

// ─── Structures ─────────────────────────────────────────────────────────────

fn fraction() -> Vec<(Label, Vec<Trace>)> {
    vec![
        (
            Label::HorizontalLine,
            vec![stroke(&[(0.0, 50.0), (30.0, 50.0), (60.0, 50.0)])],
        ),
        (
            Label::Seven,
            vec![stroke(&[(20.0, 90.0), (35.0, 90.0), (25.0, 60.0)])],
        ),
        (
            Label::Three,
            vec![stroke(&[
                (22.0, 40.0),
                (37.0, 33.0),
                (25.0, 25.0),
                (37.0, 17.0),
                (22.0, 10.0),
            ])],
        ),
    ]
}

#[test]
fn test_horizontal_line_between_digits_is_a_fraction() {
    let (mut rec, all) = session(&fraction());
    rec.append(&all).unwrap();

    let (line, symbol) = rec
        .symbols()
        .iter()
        .find(|(_, s)| s.label() == Label::FractionLine)
        .unwrap();
    assert_eq!(symbol.children(Position::Above).len(), 1);
    assert_eq!(symbol.children(Position::Below).len(), 1);
    for (id, s) in rec.symbols().iter() {
        if id != line {
            assert_eq!(s.parent(), Some(line));
        }
    }
    assert_eq!(rec.equation(), "\\frac{7}{3}");
}

#[test]
fn test_removing_denominator() {
    let symbols = fraction();
    let denominator = symbols[2].1[0].clone();
    let (mut rec, all) = session(&symbols);
    rec.append(&all).unwrap();
    rec.remove(&group(&[&denominator]));

    assert_eq!(rec.symbols().len(), 2);
    assert_eq!(rec.equation(), "\\frac{7}{}");
}

#[test]
fn test_variable_with_exponent() {
    let (mut rec, all) = session(&[
        (
            Label::LowerX,
            vec![
                stroke(&[(0.0, 0.0), (20.0, 20.0)]),
                stroke(&[(0.0, 20.0), (20.0, 0.0)]),
            ],
        ),
        (
            Label::Two,
            vec![stroke(&[(24.0, 36.0), (30.0, 34.0), (24.0, 26.0), (30.0, 26.0)])],
        ),
    ]);
    rec.append(&all).unwrap();
    assert_eq!(rec.equation(), "x^{2}");
}

// ─── Ambiguity ──────────────────────────────────────────────────────────────

#[test]
fn test_cos_from_ambiguous_shapes() {
    let (mut rec, all) = session(&[
        (Label::CLike, vec![stroke(&[(10.0, 10.0), (0.0, 5.0), (10.0, 0.0)])]),
        (
            Label::Circle,
            vec![stroke(&[(20.0, 0.0), (25.0, 5.0), (20.0, 10.0), (15.0, 5.0), (20.0, 0.0)])],
        ),
        (
            Label::SLike,
            vec![stroke(&[(40.0, 10.0), (30.0, 8.0), (40.0, 2.0), (30.0, 0.0)])],
        ),
    ]);
    rec.append(&all).unwrap();
    assert_eq!(rec.equation(), "cos");
    assert!(rec.symbols().iter().all(|(_, s)| !s.is_undecided()));
}

#[test]
fn test_lone_circle_is_zero() {
    let (mut rec, all) = session(&[(
        Label::Circle,
        vec![stroke(&[(5.0, 0.0), (10.0, 5.0), (5.0, 10.0), (0.0, 5.0), (5.0, 0.0)])],
    )]);
    rec.append(&all).unwrap();
    assert_eq!(rec.equation(), "0");
}

// ─── JSON entry point ───────────────────────────────────────────────────────

#[test]
fn test_recognize_json_fraction() {
    let doc = r#"{
        "strokes": [
            "0 50, 30 50, 60 50",
            [[20, 90], [35, 90], [25, 60]],
            [[22, 40], [37, 33], [25, 25], [37, 17], [22, 10]]
        ],
        "symbols": [
            { "label": "HORIZONTAL_LINE", "strokes": [0] },
            { "label": "7", "strokes": [1] },
            { "label": "THREE", "strokes": [2] }
        ]
    }"#;
    assert_eq!(
        recognize_json(doc, &EngineConfig::default()).unwrap(),
        "\\frac{7}{3}"
    );
}

#[test]
fn test_recognize_json_rejects_bad_input() {
    let err = recognize_json(r#"{ "strokes": [[]] , "symbols": [] }"#, &EngineConfig::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}
