//! Stroke pairs that must land in the same symbol or in different ones,
//! never split across a candidate path.
//!
//! Two kinds: strokes that physically touch, and the two bars of an
//! equals sign.

use crate::classifier::{Classifier, classify_or_minimum};
use crate::config::{OverlapConfig, PartitionerConfig};
use crate::geometry::{Trace, TraceGroup};
use crate::symbols::Label;

/// Index pairs `(i, j)`, `i < j`, of touching strokes. Dots are skipped.
pub fn overlap_pairs(expression: &TraceGroup, cfg: &OverlapConfig) -> Vec<(usize, usize)> {
    let traces = expression.traces();
    let mut pairs = Vec::new();
    for i in 0..traces.len() {
        if traces[i].is_dot() {
            continue;
        }
        for j in i + 1..traces.len() {
            if !traces[j].is_dot() && Trace::are_overlapped(&traces[i], &traces[j], cfg) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Index pairs `(i, j)`, `i < j`, that look like the two bars of `=`.
pub fn equals_pairs<C: Classifier + ?Sized>(
    expression: &TraceGroup,
    classifier: &C,
    cfg: &PartitionerConfig,
) -> Vec<(usize, usize)> {
    let n = expression.len();
    let mut pairs = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            if is_equals_pair(expression, i, j, classifier, cfg) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Both strokes are flat, stacked over each other, similar in width and
/// close together; no other stroke runs between them; and the classifier
/// reads the pair as `=`.
pub fn is_equals_pair<C: Classifier + ?Sized>(
    expression: &TraceGroup,
    i: usize,
    j: usize,
    classifier: &C,
    cfg: &PartitionerConfig,
) -> bool {
    let (Some(a), Some(b)) = (expression.get(i), expression.get(j)) else {
        return false;
    };
    if a.is_dot() || b.is_dot() || !is_flat_pair(a, b, cfg) {
        return false;
    }
    if is_blocked(expression, i, j, &cfg.overlap) {
        return false;
    }
    let pair = TraceGroup::new().with(a.clone()).with(b.clone());
    let c = classify_or_minimum(classifier, &pair);
    c.label == Label::Equals && c.confidence > cfg.equals.min_confidence
}

fn is_flat_pair(a: &Trace, b: &Trace, cfg: &PartitionerConfig) -> bool {
    let h = &cfg.equals;
    let (wa, wb) = (a.width(), b.width());
    let min_width = wa.min(wb);
    a.bounds().overlaps_x(&b.bounds())
        && a.height() <= h.max_height_ratio * wa
        && b.height() <= h.max_height_ratio * wb
        && a.slope().abs() <= h.max_slope
        && b.slope().abs() <= h.max_slope
        && Trace::minimum_distance(a, b) < h.distance_factor * min_width
        && (wa - wb).abs() < h.width_difference_factor * min_width
}

/// True if some third stroke crosses a connector drawn from a point of the
/// narrower stroke to its nearest point on the wider one.
fn is_blocked(expression: &TraceGroup, i: usize, j: usize, cfg: &OverlapConfig) -> bool {
    let (Some(a), Some(b)) = (expression.get(i), expression.get(j)) else {
        return false;
    };
    let (narrow, wide) = if a.width() > b.width() { (b, a) } else { (a, b) };
    for p in narrow.points() {
        let Some(q) = wide.closest_point(p) else {
            continue;
        };
        let connector = Trace::from_points(vec![*p, q]);
        let crossed = expression
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != i && *k != j)
            .any(|(_, t)| Trace::are_overlapped(&connector, t, cfg));
        if crossed {
            return true;
        }
    }
    false
}

/// True if `path` holds exactly one stroke of some pair.
pub fn splits_pair(path: &[usize], pairs: &[(usize, usize)]) -> bool {
    pairs
        .iter()
        .any(|&(a, b)| path.contains(&a) != path.contains(&b))
}
