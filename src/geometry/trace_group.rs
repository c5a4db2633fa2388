//! TraceGroup: the strokes of one symbol, or of a whole expression.
//!
//! Copies are deep: cloning a group clones its traces, so mutating one group
//! never shows up in another.

use serde::{Deserialize, Serialize};

use crate::config::OverlapConfig;
use crate::geometry::point::Point;
use crate::geometry::trace::{Bounds, Trace};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceGroup {
    traces: Vec<Trace>,
}

impl TraceGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_traces(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    /// Append a trace; returns `self` for chaining.
    pub fn add(&mut self, trace: Trace) -> &mut Self {
        self.traces.push(trace);
        self
    }

    /// Append every trace of `other`.
    pub fn extend(&mut self, other: &TraceGroup) -> &mut Self {
        self.traces.extend(other.traces.iter().cloned());
        self
    }

    /// Builder form of [`TraceGroup::add`].
    pub fn with(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    /// Remove the first trace equal to `trace`. Returns false if absent.
    pub fn remove(&mut self, trace: &Trace) -> bool {
        match self.traces.iter().position(|t| t == trace) {
            Some(i) => {
                self.traces.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, trace: &Trace) -> bool {
        self.traces.iter().any(|t| t == trace)
    }

    pub fn get(&self, i: usize) -> Option<&Trace> {
        self.traces.get(i)
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trace> {
        self.traces.iter()
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Total number of points over all traces.
    pub fn point_count(&self) -> usize {
        self.traces.iter().map(Trace::len).sum()
    }

    /// New group made of copies of the traces at `indices`; out-of-range
    /// indices are skipped.
    pub fn sub_group(&self, indices: &[usize]) -> TraceGroup {
        TraceGroup::from_traces(
            indices
                .iter()
                .filter_map(|&i| self.traces.get(i).cloned())
                .collect(),
        )
    }

    // ── Derived geometry ────────────────────────────────────────────────

    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for t in &self.traces {
            b.merge(&t.bounds());
        }
        b
    }

    pub fn top_left_corner(&self) -> Point {
        self.bounds().top_left()
    }

    pub fn bottom_right_corner(&self) -> Point {
        self.bounds().bottom_right()
    }

    pub fn width(&self) -> f64 {
        self.bounds().width()
    }

    pub fn height(&self) -> f64 {
        self.bounds().height()
    }

    pub fn area(&self) -> f64 {
        self.bounds().area()
    }

    pub fn centroid(&self) -> Point {
        self.bounds().centroid()
    }

    /// Point-count-weighted mean of the traces' centers of mass.
    pub fn center_of_mass(&self) -> Point {
        let total = self.point_count();
        if total == 0 {
            return Point::default();
        }
        let sum = self.traces.iter().fold(Point::default(), |acc, t| {
            acc + t.center_of_mass() * t.len() as f64
        });
        sum * (1.0 / total as f64)
    }

    // ── Proximity ───────────────────────────────────────────────────────

    /// Nearest pair of points between two groups.
    pub fn closest_points(a: &TraceGroup, b: &TraceGroup) -> Option<(Point, Point)> {
        let mut best: Option<(Point, Point, f64)> = None;
        for ta in &a.traces {
            for tb in &b.traces {
                if let Some((pa, pb)) = Trace::closest_points(ta, tb) {
                    let d = pa.distance(&pb);
                    if best.is_none_or(|(_, _, bd)| d < bd) {
                        best = Some((pa, pb, d));
                    }
                }
            }
        }
        best.map(|(pa, pb, _)| (pa, pb))
    }

    pub fn minimum_distance(a: &TraceGroup, b: &TraceGroup) -> f64 {
        match TraceGroup::closest_points(a, b) {
            Some((pa, pb)) => pa.distance(&pb),
            None => f64::INFINITY,
        }
    }

    /// True if `trace` touches any trace of this group.
    pub fn is_overlapped_by(&self, trace: &Trace, cfg: &OverlapConfig) -> bool {
        self.traces
            .iter()
            .any(|t| Trace::are_overlapped(t, trace, cfg))
    }

    // ── Transforms ──────────────────────────────────────────────────────

    pub fn subtract(&mut self, offset: &Point) {
        for t in &mut self.traces {
            t.subtract(offset);
        }
    }

    pub fn multiply_by(&mut self, factor: &Point) {
        for t in &mut self.traces {
            t.multiply_by(factor);
        }
    }
}

impl FromIterator<Trace> for TraceGroup {
    fn from_iter<I: IntoIterator<Item = Trace>>(iter: I) -> Self {
        TraceGroup::from_traces(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TraceGroup {
    type Item = &'a Trace;
    type IntoIter = std::slice::Iter<'a, Trace>;

    fn into_iter(self) -> Self::IntoIter {
        self.traces.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Trace {
        Trace::from(vec![(x0, y0), (x1, y1)])
    }

    #[test]
    fn test_aggregated_corners() {
        let g = TraceGroup::new()
            .with(line(0.0, 0.0, 2.0, 1.0))
            .with(line(5.0, -3.0, 6.0, 4.0));
        assert_eq!(g.top_left_corner(), Point::new(0.0, 4.0));
        assert_eq!(g.bottom_right_corner(), Point::new(6.0, -3.0));
        assert_eq!(g.width(), 6.0);
        assert_eq!(g.height(), 7.0);
        assert_eq!(g.area(), 42.0);
    }

    #[test]
    fn test_center_of_mass_is_point_weighted() {
        // Three points at x=0, one at x=8: weighted mean is 2, not 4.
        let g = TraceGroup::new()
            .with(Trace::from(vec![(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]))
            .with(Trace::from(vec![(8.0, 0.0)]));
        assert_eq!(g.center_of_mass(), Point::new(2.0, 0.0));
        assert_eq!(g.centroid(), Point::new(4.0, 0.0));
    }

    #[test]
    fn test_corners_recomputed_after_removal() {
        let a = line(0.0, 0.0, 1.0, 1.0);
        let b = line(10.0, 10.0, 11.0, 11.0);
        let mut g = TraceGroup::new().with(a.clone()).with(b.clone());
        assert_eq!(g.width(), 11.0);
        assert!(g.remove(&b));
        assert_eq!(g.width(), 1.0);
        assert!(!g.remove(&b));
        assert!(g.contains(&a));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut g = TraceGroup::new().with(line(0.0, 0.0, 1.0, 1.0));
        let copy = g.clone();
        g.subtract(&Point::new(1.0, 1.0));
        assert_eq!(copy.top_left_corner(), Point::new(0.0, 1.0));
        assert_eq!(g.top_left_corner(), Point::new(-1.0, 0.0));
    }

    #[test]
    fn test_sub_group() {
        let g: TraceGroup = (0..4)
            .map(|i| line(i as f64, 0.0, i as f64 + 0.5, 0.0))
            .collect();
        let sub = g.sub_group(&[3, 1, 9]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.get(0), g.get(3));
        assert_eq!(sub.get(1), g.get(1));
    }

    #[test]
    fn test_closest_points_between_groups() {
        let a = TraceGroup::new().with(line(0.0, 0.0, 1.0, 0.0));
        let b = TraceGroup::new()
            .with(line(10.0, 0.0, 11.0, 0.0))
            .with(line(1.0, 2.0, 1.0, 3.0));
        assert_eq!(
            TraceGroup::closest_points(&a, &b),
            Some((Point::new(1.0, 0.0), Point::new(1.0, 2.0)))
        );
        assert_eq!(TraceGroup::minimum_distance(&a, &b), 2.0);
        assert_eq!(TraceGroup::minimum_distance(&a, &TraceGroup::new()), f64::INFINITY);
    }

    #[test]
    fn test_is_overlapped_by() {
        let cfg = OverlapConfig::default();
        let g = TraceGroup::new().with(line(0.0, 0.0, 10.0, 0.0));
        assert!(g.is_overlapped_by(&line(5.0, -5.0, 5.0, 5.0), &cfg));
        assert!(!g.is_overlapped_by(&line(5.0, 5.0, 5.0, 9.0), &cfg));
    }

    #[test]
    fn test_empty_group() {
        let g = TraceGroup::new();
        assert_eq!(g.area(), 0.0);
        assert_eq!(g.center_of_mass(), Point::default());
        assert!(g.is_empty());
    }
}
