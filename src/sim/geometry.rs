//! Axis-aligned rectangles and line segments
//!
//! Screen coordinates: x grows right, y grows down. A rectangle's `y` is its
//! top edge.

use serde::{Deserialize, Serialize};

use crate::{Vector2, cross};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A line segment from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Vector2,
    pub end: Vector2,
}

impl Line {
    pub fn new(start: Vector2, end: Vector2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn direction(&self) -> Vector2 {
        self.end - self.start
    }
}

/// True if the rectangles overlap on both axes. Touching edges do not count.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.right() > b.left() && a.left() < b.right() && a.bottom() > b.top() && a.top() < b.bottom()
}

/// Exact intersection point of two segments
///
/// Solves `v.start + t·b = u.start + w·d` for the segment directions `b` and
/// `d`. Returns `None` for parallel segments or when either parameter leaves
/// [0, 1].
pub fn segment_intersection(v: &Line, u: &Line) -> Option<Vector2> {
    let b = v.direction();
    let d = u.direction();
    let bxd = cross(b, d);

    if bxd == 0.0 {
        return None;
    }

    let c = u.start - v.start;
    let t = cross(c, d) / bxd;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let w = cross(c, b) / bxd;
    if !(0.0..=1.0).contains(&w) {
        return None;
    }

    Some(v.start + b * t)
}

/// The four edges of a rectangle, always in the order top, bottom, left, right
pub fn rectangle_edges(r: &Rect) -> [Line; 4] {
    let top_left = Vector2::new(r.left(), r.top());
    let top_right = Vector2::new(r.right(), r.top());
    let bottom_left = Vector2::new(r.left(), r.bottom());
    let bottom_right = Vector2::new(r.right(), r.bottom());

    [
        Line::new(top_left, top_right),
        Line::new(bottom_left, bottom_right),
        Line::new(top_left, bottom_left),
        Line::new(top_right, bottom_right),
    ]
}

/// Distance from `origin` to the nearest point where `beam` crosses an edge of `rect`
pub fn nearest_hit(beam: &Line, rect: &Rect, origin: Vector2) -> Option<f64> {
    rectangle_edges(rect)
        .iter()
        .filter_map(|edge| segment_intersection(beam, edge))
        .map(|point| origin.distance(point))
        .min_by(f64::total_cmp)
}
