//! Geometry primitives
//!
//! Plain 2D helpers shared by snapping, arc fitting and junction resolution.
//! Coordinates are canvas units with the y axis pointing down.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A 2D coordinate on the canvas
pub type Point = DVec2;

/// Denominator below which two segments are treated as parallel
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// An axis-aligned box given by two opposite corners in any order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBox {
    /// First corner (e.g. where a drag started)
    pub start: Point,
    /// Opposite corner
    pub end: Point,
}

impl AxisBox {
    /// Create a box from two opposite corners
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Smallest corner
    pub fn min(&self) -> Point {
        self.start.min(self.end)
    }

    /// Largest corner
    pub fn max(&self) -> Point {
        self.start.max(self.end)
    }

    /// Check whether a point lies inside the box (bounds inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point_in_box(point, self)
    }

    /// The four edges, clockwise on screen starting from the top edge
    pub fn edges(&self) -> [(Point, Point); 4] {
        let min = self.min();
        let max = self.max();
        let top_right = Point::new(max.x, min.y);
        let bottom_left = Point::new(min.x, max.y);
        [
            (min, top_right),
            (top_right, max),
            (max, bottom_left),
            (bottom_left, min),
        ]
    }
}

/// Check whether a point lies inside an axis-aligned box, bounds inclusive
pub fn point_in_box(point: Point, bounds: &AxisBox) -> bool {
    let min = bounds.min();
    let max = bounds.max();
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

/// Check whether the segment `a`-`b` touches an axis-aligned box.
///
/// True if either endpoint is inside or the segment crosses one of the edges.
/// A segment lying exactly on an edge line is parallel to it and is only
/// reported through its endpoints; collinear overlap is not detected.
pub fn segment_intersects_box(a: Point, b: Point, bounds: &AxisBox) -> bool {
    let min = bounds.min();
    let max = bounds.max();

    // Both endpoints strictly beyond the same side
    if (a.x < min.x && b.x < min.x)
        || (a.x > max.x && b.x > max.x)
        || (a.y < min.y && b.y < min.y)
        || (a.y > max.y && b.y > max.y)
    {
        return false;
    }

    if point_in_box(a, bounds) || point_in_box(b, bounds) {
        return true;
    }

    bounds
        .edges()
        .iter()
        .any(|&(c, d)| segment_intersection(a, b, c, d).is_some())
}

/// Intersection point of segments `p1`-`p2` and `p3`-`p4`.
///
/// Uses the parametric form; both parameters must lie in `[0, 1]`.
/// Returns `None` for parallel (or collinear) segments.
pub fn segment_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denominator = d2.y * d1.x - d2.x * d1.y;
    if denominator.abs() < PARALLEL_EPSILON {
        return None;
    }

    let offset = p1 - p3;
    let ua = (d2.x * offset.y - d2.y * offset.x) / denominator;
    let ub = (d1.x * offset.y - d1.y * offset.x) / denominator;

    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(p1 + d1 * ua)
    } else {
        None
    }
}

/// Closest point to `point` on the segment `a`-`b`
pub fn closest_point_on_segment(point: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }

    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `point` to the segment `a`-`b`
pub fn distance_point_to_segment(point: Point, a: Point, b: Point) -> f64 {
    point.distance(closest_point_on_segment(point, a, b))
}

/// Even-odd ray casting test
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    let Some(mut j) = polygon.len().checked_sub(1) else {
        return false;
    };

    for (i, pi) in polygon.iter().enumerate() {
        let pj = polygon[j];
        let crosses = (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Normalize an angle in degrees to `[0, 360)`
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Angle of `point` around `center` in degrees, `[0, 360)`
pub fn angle_degrees(center: Point, point: Point) -> f64 {
    let offset = point - center;
    normalize_degrees(offset.y.atan2(offset.x).to_degrees())
}

/// Average of a set of points
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Point::ZERO, |acc, p| acc + *p);
    Some(sum / points.len() as f64)
}
