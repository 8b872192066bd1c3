//! Three-point arc fitting
//!
//! Arc walls are drawn by clicking a start point, a point the arc must pass
//! through, and an end point. This module finds the circle through those
//! points and the signed sweep that visits them in order.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, angle_degrees, normalize_degrees};

/// Determinant below which three points are considered collinear
pub const COLLINEAR_EPSILON: f64 = 1e-6;

/// Slack when testing whether an angle falls inside a sweep (degrees)
const ANGLE_TOLERANCE_DEG: f64 = 1e-9;

/// A circular arc fitted through three points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleFit {
    /// Circle center
    pub center: Point,
    /// Circle radius
    pub radius: f64,
    /// Angle of the start point around the center, degrees in `[0, 360)`
    pub start_angle_deg: f64,
    /// Signed angular extent from the start angle, degrees.
    ///
    /// Positive values run towards increasing angles, which appears clockwise
    /// on a y-down canvas. The magnitude may exceed 180.
    pub sweep_angle_deg: f64,
    /// Whether the three points run clockwise on screen
    pub clockwise: bool,
}

/// Fit a circle through `start`, `through` and `end`.
///
/// Returns `None` when the points are collinear (or coincide), since no
/// finite circle passes through them.
pub fn fit_circle(start: Point, through: Point, end: Point) -> Option<CircleFit> {
    let (p1, p2, p3) = (start, through, end);

    let temp = p2.length_squared();
    let bc = (p1.length_squared() - temp) / 2.0;
    let cd = (temp - p3.length_squared()) / 2.0;
    let det = (p1.x - p2.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p2.y);

    if !det.is_finite() || det.abs() < COLLINEAR_EPSILON {
        return None;
    }

    let center = Point::new(
        (bc * (p2.y - p3.y) - cd * (p1.y - p2.y)) / det,
        ((p1.x - p2.x) * cd - (p2.x - p3.x) * bc) / det,
    );
    let radius = p1.distance(center);

    let start_angle_deg = angle_degrees(center, p1);
    let through_angle_deg = angle_degrees(center, p2);
    let end_angle_deg = angle_degrees(center, p3);

    let cross = (p2 - p1).perp_dot(p3 - p1);
    let clockwise = cross > 0.0;

    let mut sweep_angle_deg = if clockwise {
        normalize_degrees(end_angle_deg - start_angle_deg)
    } else {
        -normalize_degrees(start_angle_deg - end_angle_deg)
    };

    // Fall back to the other way round the circle if the middle point was missed
    if !sweep_contains(start_angle_deg, sweep_angle_deg, through_angle_deg) {
        sweep_angle_deg -= 360.0_f64.copysign(sweep_angle_deg);
    }

    Some(CircleFit {
        center,
        radius,
        start_angle_deg,
        sweep_angle_deg,
        clockwise,
    })
}

/// Check whether `angle` (degrees) is visited when sweeping `sweep` from `start`
fn sweep_contains(start: f64, sweep: f64, angle: f64) -> bool {
    let offset = if sweep >= 0.0 {
        normalize_degrees(angle - start)
    } else {
        normalize_degrees(start - angle)
    };
    offset <= sweep.abs() + ANGLE_TOLERANCE_DEG
}

impl CircleFit {
    /// Angle of the arc's end point, degrees in `[0, 360)`
    pub fn end_angle_deg(&self) -> f64 {
        normalize_degrees(self.start_angle_deg + self.sweep_angle_deg)
    }

    /// Point on the circle at the given angle (degrees)
    pub fn point_at_angle(&self, angle_deg: f64) -> Point {
        let radians = angle_deg.to_radians();
        self.center + Point::new(radians.cos(), radians.sin()) * self.radius
    }

    /// Point along the arc, `t = 0` at the start and `t = 1` at the end
    pub fn point_at(&self, t: f64) -> Point {
        self.point_at_angle(self.start_angle_deg + self.sweep_angle_deg * t)
    }

    /// Length of the arc
    pub fn arc_length(&self) -> f64 {
        self.radius * self.sweep_angle_deg.abs().to_radians()
    }

    /// Check whether the arc passes through the given angle (degrees)
    pub fn contains_angle(&self, angle_deg: f64) -> bool {
        sweep_contains(self.start_angle_deg, self.sweep_angle_deg, angle_deg)
    }

    /// Sample the arc as a polyline with `segments` pieces (`segments + 1` points)
    pub fn sample_polyline(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_collinear_points_rejected() {
        assert!(fit_circle(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)).is_none());
        assert!(fit_circle(p(0.0, 0.0), p(5.0, 5.0), p(10.0, 10.0)).is_none());
        // Start and end coincide
        assert!(fit_circle(p(3.0, 4.0), p(10.0, 0.0), p(3.0, 4.0)).is_none());
    }

    #[test]
    fn test_center_and_radius() {
        let fit = fit_circle(p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0)).unwrap();
        assert_abs_diff_eq!(fit.center.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.center.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(fit.radius, 1.0);

        let fit = fit_circle(p(60.0, 10.0), p(10.0, 60.0), p(-40.0, 10.0)).unwrap();
        assert_relative_eq!(fit.center.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(fit.center.y, 10.0, epsilon = 1e-9);
        assert_relative_eq!(fit.radius, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_half_sweep_lands_on_middle_point() {
        let r = 100.0;
        let diag = r * std::f64::consts::FRAC_1_SQRT_2;
        let fit = fit_circle(p(r, 0.0), p(diag, diag), p(0.0, r)).unwrap();

        assert!(fit.clockwise);
        assert_relative_eq!(fit.sweep_angle_deg, 90.0, epsilon = 1e-9);
        let mid = fit.point_at(0.5);
        assert!(mid.distance(p(diag, diag)) < 1e-6);
    }

    #[test]
    fn test_counter_clockwise_sweep_is_negative() {
        let r = 100.0;
        let diag = r * std::f64::consts::FRAC_1_SQRT_2;
        let fit = fit_circle(p(0.0, r), p(diag, diag), p(r, 0.0)).unwrap();

        assert!(!fit.clockwise);
        assert_relative_eq!(fit.start_angle_deg, 90.0, epsilon = 1e-9);
        assert_relative_eq!(fit.sweep_angle_deg, -90.0, epsilon = 1e-9);
        assert!(fit.point_at(0.5).distance(p(diag, diag)) < 1e-6);
        assert!(fit.point_at(1.0).distance(p(r, 0.0)) < 1e-6);
    }

    #[test]
    fn test_reflex_arc_passes_through_middle_point() {
        // Start at 0°, pass through 180°, end at 90°: the long way round
        let fit = fit_circle(p(100.0, 0.0), p(-100.0, 0.0), p(0.0, 100.0)).unwrap();

        assert!(!fit.clockwise);
        assert_relative_eq!(fit.sweep_angle_deg, -270.0, epsilon = 1e-9);
        assert!(fit.contains_angle(180.0));
        assert!(!fit.contains_angle(45.0));
        assert_relative_eq!(fit.end_angle_deg(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_always_contains_middle_point() {
        let cases = [
            (p(0.0, 0.0), p(30.0, -20.0), p(80.0, 5.0)),
            (p(0.0, 0.0), p(30.0, 20.0), p(80.0, 5.0)),
            (p(-50.0, 12.0), p(3.0, 90.0), p(40.0, -7.0)),
            (p(10.0, 10.0), p(11.0, 40.0), p(12.0, 10.0)),
        ];

        for (a, b, c) in cases {
            let fit = fit_circle(a, b, c).unwrap();
            let through = angle_degrees(fit.center, b);
            assert!(fit.contains_angle(through), "arc misses {b:?}");
            assert!(fit.point_at(0.0).distance(a) < 1e-6);
            assert!(fit.point_at(1.0).distance(c) < 1e-6);
        }
    }

    #[test]
    fn test_arc_length_and_sampling() {
        let fit = fit_circle(p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0)).unwrap();
        assert_relative_eq!(fit.arc_length(), std::f64::consts::PI, epsilon = 1e-9);

        let points = fit.sample_polyline(32);
        assert_eq!(points.len(), 33);
        assert!(points[0].distance(p(1.0, 0.0)) < 1e-9);
        assert!(points[32].distance(p(-1.0, 0.0)) < 1e-9);
        for point in &points {
            assert_relative_eq!(point.distance(fit.center), 1.0, epsilon = 1e-9);
        }
    }
}
