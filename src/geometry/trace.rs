//! Trace: a single pen stroke, plus the bounding-box and proximity maths
//! shared with `TraceGroup`.

use serde::{Deserialize, Serialize};

use crate::config::OverlapConfig;
use crate::geometry::point::Point;

// ─── Bounds ───────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in y-up coordinates.
///
/// An empty box has inverted extremes; its width, height and area are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include(&mut self, p: &Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn merge(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// `(min_x, max_y)`.
    pub fn top_left(&self) -> Point {
        if self.is_empty() {
            return Point::default();
        }
        Point::new(self.min_x, self.max_y)
    }

    /// `(max_x, min_y)`.
    pub fn bottom_right(&self) -> Point {
        if self.is_empty() {
            return Point::default();
        }
        Point::new(self.max_x, self.min_y)
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_x - self.min_x }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_y - self.min_y }
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Centre of the box.
    pub fn centroid(&self) -> Point {
        if self.is_empty() {
            return Point::default();
        }
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// True if the x-ranges of the two boxes intersect (touching counts).
    pub fn overlaps_x(&self, other: &Bounds) -> bool {
        !self.is_empty() && !other.is_empty() && other.max_x >= self.min_x && other.min_x <= self.max_x
    }
}

// ─── Trace ────────────────────────────────────────────────────────────────────

/// Ordered sequence of points captured between pen-down and pen-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    points: Vec<Point>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A stroke made of a single point (a pen tap).
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for p in &self.points {
            b.include(p);
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

    pub fn centroid(&self) -> Point {
        self.bounds().centroid()
    }

    /// Mean of the stroke's points.
    pub fn center_of_mass(&self) -> Point {
        if self.points.is_empty() {
            return Point::default();
        }
        let sum = self
            .points
            .iter()
            .fold(Point::default(), |acc, p| acc + *p);
        sum * (1.0 / self.points.len() as f64)
    }

    /// Leftmost point (first one wins on ties).
    pub fn outer_left_point(&self) -> Option<Point> {
        self.points
            .iter()
            .copied()
            .reduce(|best, p| if p.x < best.x { p } else { best })
    }

    /// Rightmost point (first one wins on ties).
    pub fn outer_right_point(&self) -> Option<Point> {
        self.points
            .iter()
            .copied()
            .reduce(|best, p| if p.x > best.x { p } else { best })
    }

    /// Angle (radians) of the line through the outer left and right points.
    ///
    /// A vertical stroke yields π/2; an empty or single-point stroke yields 0.
    pub fn slope(&self) -> f64 {
        match (self.outer_left_point(), self.outer_right_point()) {
            (Some(l), Some(r)) if r.x > l.x => ((r.y - l.y) / (r.x - l.x)).atan(),
            (Some(_), Some(_)) if self.height() > 0.0 => std::f64::consts::FRAC_PI_2,
            _ => 0.0,
        }
    }

    /// Vertex of this stroke nearest to `p`.
    pub fn closest_point(&self, p: &Point) -> Option<Point> {
        self.points.iter().copied().min_by(|a, b| {
            a.distance(p)
                .partial_cmp(&b.distance(p))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Pair of vertices, one from each stroke, with the smallest distance.
    pub fn closest_points(a: &Trace, b: &Trace) -> Option<(Point, Point)> {
        let mut best: Option<(Point, Point, f64)> = None;
        for pa in &a.points {
            for pb in &b.points {
                let d = pa.distance(pb);
                if best.is_none_or(|(_, _, bd)| d < bd) {
                    best = Some((*pa, *pb, d));
                }
            }
        }
        best.map(|(pa, pb, _)| (pa, pb))
    }

    /// Smallest vertex-to-vertex distance; infinite if either stroke is empty.
    pub fn minimum_distance(a: &Trace, b: &Trace) -> f64 {
        match Trace::closest_points(a, b) {
            Some((pa, pb)) => pa.distance(&pb),
            None => f64::INFINITY,
        }
    }

    /// Segments of the polyline; a single point yields one degenerate segment.
    pub fn segments(&self) -> Vec<(Point, Point)> {
        match self.points.len() {
            0 => Vec::new(),
            1 => vec![(self.points[0], self.points[0])],
            _ => self.points.windows(2).map(|w| (w[0], w[1])).collect(),
        }
    }

    /// Smallest distance between the two polylines (0 if they cross).
    pub fn polyline_distance(a: &Trace, b: &Trace) -> f64 {
        let sa = a.segments();
        let sb = b.segments();
        let mut best = f64::INFINITY;
        for (p1, p2) in &sa {
            for (q1, q2) in &sb {
                best = best.min(segment_distance(p1, p2, q1, q2));
                if best == 0.0 {
                    return best;
                }
            }
        }
        best
    }

    /// True if the two drawn strokes touch.
    pub fn are_overlapped(a: &Trace, b: &Trace, cfg: &OverlapConfig) -> bool {
        if a.is_empty() || b.is_empty() {
            return false;
        }
        let mut reach = cfg.tolerance;
        if a.is_dot() {
            reach += cfg.dot_radius;
        }
        if b.is_dot() {
            reach += cfg.dot_radius;
        }
        Trace::polyline_distance(a, b) <= reach
    }

    /// Translate every point by `-offset`.
    pub fn subtract(&mut self, offset: &Point) {
        for p in &mut self.points {
            *p = *p - *offset;
        }
    }

    /// Scale every point per axis.
    pub fn multiply_by(&mut self, factor: &Point) {
        for p in &mut self.points {
            *p = p.multiply_by(factor);
        }
    }
}

impl From<Vec<(f64, f64)>> for Trace {
    fn from(pairs: Vec<(f64, f64)>) -> Self {
        Trace::from_points(pairs.into_iter().map(Point::from).collect())
    }
}

// ─── Segment maths ────────────────────────────────────────────────────────────

fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn on_segment(a: &Point, b: &Point, p: &Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

pub(crate) fn segments_intersect(p1: &Point, p2: &Point, q1: &Point, q2: &Point) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

pub(crate) fn point_segment_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    let ab = *b - *a;
    let len2 = ab.x * ab.x + ab.y * ab.y;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let ap = *p - *a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len2).clamp(0.0, 1.0);
    p.distance(&(*a + ab * t))
}

fn segment_distance(p1: &Point, p2: &Point, q1: &Point, q2: &Point) -> f64 {
    if segments_intersect(p1, p2, q1, q2) {
        return 0.0;
    }
    point_segment_distance(p1, q1, q2)
        .min(point_segment_distance(p2, q1, q2))
        .min(point_segment_distance(q1, p1, p2))
        .min(point_segment_distance(q2, p1, p2))
}
