//! Junction resolution
//!
//! Keeps the connection lists on straight walls in sync with their geometry
//! and builds the polygon that fills the corner where exactly two walls meet.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{PARALLEL_EPSILON, Point, centroid, point_in_polygon, segment_intersection};
use crate::wall::{COINCIDENCE_EPSILON, Connection, WallEnd, WallSegment};

/// Endpoints closer than this (per axis) form a junction
pub const JUNCTION_EPSILON: f64 = 1.0;

/// How far the fill rectangles reach along each wall, in thicknesses
const FILL_REACH: f64 = 3.0;

/// Points closer than this are merged in a fill polygon
const FILL_MERGE_EPSILON: f64 = 1e-9;

/// A point where two or more wall endpoints meet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    /// Junction coordinate (first endpoint seen)
    pub point: Point,
    /// Walls meeting here, in wall order
    pub wall_ids: Vec<Uuid>,
    /// Corner fill polygon; empty unless exactly two walls meet
    pub fill: Vec<Point>,
}

impl Junction {
    /// Number of walls meeting here
    pub fn degree(&self) -> usize {
        self.wall_ids.len()
    }

    /// Check if a fill polygon was produced
    pub fn is_filled(&self) -> bool {
        !self.fill.is_empty()
    }
}

/// Recompute the connection lists of every straight wall.
///
/// Arc walls are returned untouched. Straight walls that fail validation are
/// logged and left as they were.
pub fn resolve_connections(mut walls: Vec<WallSegment>) -> Vec<WallSegment> {
    let eligible: Vec<usize> = walls
        .iter()
        .enumerate()
        .filter(|(_, wall)| wall.is_straight())
        .filter_map(|(index, wall)| match wall.validate() {
            Ok(()) => Some(index),
            Err(e) => {
                tracing::warn!("Skipping wall {} in connection resolution: {}", wall.id, e);
                None
            }
        })
        .collect();

    // Snapshot endpoints before rewriting any connection list
    let endpoints: Vec<(Uuid, Point, Point)> = eligible
        .iter()
        .map(|&i| (walls[i].id, walls[i].start(), walls[i].end()))
        .collect();

    for (slot, &index) in eligible.iter().enumerate() {
        let wall = &mut walls[index];
        wall.connections.at_start.clear();
        wall.connections.at_end.clear();

        for (other_slot, &(other_id, other_start, other_end)) in endpoints.iter().enumerate() {
            if other_slot == slot || other_id == wall.id {
                continue;
            }

            for my_end in [WallEnd::Start, WallEnd::End] {
                let mine = wall.endpoint(my_end);
                for (their_end, theirs) in [(WallEnd::Start, other_start), (WallEnd::End, other_end)]
                {
                    if coincident(mine, theirs, COINCIDENCE_EPSILON) {
                        wall.connections.at_mut(my_end).push(Connection {
                            other_wall_id: other_id,
                            point: theirs,
                            other_end: their_end,
                        });
                    }
                }
            }
        }
    }

    walls
}

/// Build the polygon covering the overlap of two walls meeting at `point`.
///
/// Each wall contributes a rectangle as wide as the wall, reaching three
/// thicknesses either side of the junction along the wall's axis. The result
/// is their intersection, ordered counter-clockwise around its centroid.
/// Returns an empty polygon unless exactly two usable, non-parallel walls are
/// given.
pub fn compute_junction_fill(point: Point, walls: &[&WallSegment]) -> Vec<Point> {
    let [first, second] = walls else {
        return Vec::new();
    };

    let (Some((along_a, a)), Some((along_b, b))) =
        (fill_rectangle(point, first), fill_rectangle(point, second))
    else {
        return Vec::new();
    };

    // Straight-through and overlapping walls have no corner to fill
    if along_a.perp_dot(along_b).abs() < PARALLEL_EPSILON {
        return Vec::new();
    }

    let mut polygon: Vec<Point> = Vec::new();
    let mut push = |candidate: Point| {
        if !polygon
            .iter()
            .any(|p| p.distance(candidate) < FILL_MERGE_EPSILON)
        {
            polygon.push(candidate);
        }
    };

    for corner in a.iter().filter(|c| point_in_polygon(**c, &b)) {
        push(*corner);
    }
    for corner in b.iter().filter(|c| point_in_polygon(**c, &a)) {
        push(*corner);
    }
    for (p1, p2) in edges(&a) {
        for (p3, p4) in edges(&b) {
            if let Some(hit) = segment_intersection(p1, p2, p3, p4) {
                push(hit);
            }
        }
    }

    sort_around_centroid(&mut polygon);
    polygon
}

/// Group straight-wall endpoints into junctions and fill the two-wall ones
pub fn find_junctions(walls: &[WallSegment]) -> Vec<Junction> {
    let usable: Vec<&WallSegment> = walls
        .iter()
        .filter(|wall| wall.is_straight() && wall.validate().is_ok())
        .collect();

    let mut junctions: Vec<Junction> = Vec::new();

    for wall in &usable {
        for end in [WallEnd::Start, WallEnd::End] {
            let at = wall.endpoint(end);
            match junctions
                .iter_mut()
                .find(|j| coincident(j.point, at, JUNCTION_EPSILON))
            {
                Some(junction) => {
                    if !junction.wall_ids.contains(&wall.id) {
                        junction.wall_ids.push(wall.id);
                    }
                }
                None => junctions.push(Junction {
                    point: at,
                    wall_ids: vec![wall.id],
                    fill: Vec::new(),
                }),
            }
        }
    }

    junctions.retain(|j| j.degree() >= 2);

    for junction in &mut junctions {
        if junction.degree() != 2 {
            continue;
        }
        let meeting: Vec<&WallSegment> = usable
            .iter()
            .copied()
            .filter(|wall| junction.wall_ids.contains(&wall.id))
            .collect();
        junction.fill = compute_junction_fill(junction.point, &meeting);
    }

    junctions
}

fn coincident(a: Point, b: Point, epsilon: f64) -> bool {
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
}

/// Unit direction away from the junction and the oriented rectangle for one
/// wall of a two-wall junction
fn fill_rectangle(point: Point, wall: &WallSegment) -> Option<(Point, [Point; 4])> {
    if !wall.thickness.is_finite() || wall.thickness <= 0.0 {
        tracing::warn!(
            "Wall {} has no usable thickness ({}), skipping junction fill",
            wall.id,
            wall.thickness
        );
        return None;
    }

    let near_start = wall.start().distance(point) <= wall.end().distance(point);
    let from = if near_start { WallEnd::Start } else { WallEnd::End };
    let along = wall.direction_from(from);
    if along == Point::ZERO || !along.is_finite() {
        return None;
    }

    let across = along.perp() * (wall.thickness / 2.0);
    let reach = along * (wall.thickness * FILL_REACH);
    Some((
        along,
        [
            point - reach + across,
            point + reach + across,
            point + reach - across,
            point - reach - across,
        ],
    ))
}

fn edges(polygon: &[Point; 4]) -> impl Iterator<Item = (Point, Point)> + '_ {
    (0..polygon.len()).map(|i| (polygon[i], polygon[(i + 1) % polygon.len()]))
}

fn sort_around_centroid(points: &mut [Point]) {
    let Some(center) = centroid(points) else {
        return;
    };
    points.sort_by(|a, b| {
        let angle_a = (a.y - center.y).atan2(a.x - center.x);
        let angle_b = (b.y - center.y).atan2(b.x - center.x);
        angle_a.total_cmp(&angle_b)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::fit_circle;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn wall(a: Point, b: Point) -> WallSegment {
        WallSegment::straight(a, b, 20.0).unwrap()
    }

    fn polygon_area(points: &[Point]) -> f64 {
        let n = points.len();
        (0..n)
            .map(|i| points[i].perp_dot(points[(i + 1) % n]))
            .sum::<f64>()
            / 2.0
    }

    #[test]
    fn test_connections_are_symmetric() {
        let a = wall(p(0.0, 0.0), p(100.0, 0.0));
        let b = wall(p(100.0, 0.0), p(100.0, 100.0));
        let c = wall(p(300.0, 300.0), p(400.0, 300.0));
        let (a_id, b_id) = (a.id, b.id);

        let walls = resolve_connections(vec![a, b, c]);

        assert!(walls[0].connections.at_start.is_empty());
        assert_eq!(
            walls[0].connections.at_end,
            vec![Connection {
                other_wall_id: b_id,
                point: p(100.0, 0.0),
                other_end: WallEnd::Start,
            }]
        );
        assert_eq!(
            walls[1].connections.at_start,
            vec![Connection {
                other_wall_id: a_id,
                point: p(100.0, 0.0),
                other_end: WallEnd::End,
            }]
        );
        assert!(walls[1].connections.at_end.is_empty());
        assert!(walls[2].connections.is_empty());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let walls = vec![
            wall(p(0.0, 0.0), p(100.0, 0.0)),
            wall(p(100.0, 0.0), p(100.0, 100.0)),
            wall(p(100.0, 100.0), p(0.0, 0.0)),
        ];
        let once = resolve_connections(walls);
        let twice = resolve_connections(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_moved_wall_drops_stale_connection() {
        let a = wall(p(0.0, 0.0), p(100.0, 0.0));
        let b = wall(p(100.0, 0.0), p(100.0, 100.0));
        let mut walls = resolve_connections(vec![a, b]);
        assert!(!walls[0].connections.is_empty());

        walls[1].geometry = crate::wall::WallGeometry::Straight {
            start: p(150.0, 0.0),
            end: p(150.0, 100.0),
        };
        let walls = resolve_connections(walls);
        assert!(walls[0].connections.is_empty());
        assert!(walls[1].connections.is_empty());
    }

    #[test]
    fn test_arcs_are_left_alone() {
        let fit = fit_circle(p(100.0, 0.0), p(0.0, 100.0), p(-100.0, 0.0)).unwrap();
        let arc = WallSegment::arc(p(100.0, 0.0), p(-100.0, 0.0), &fit, 10.0).unwrap();
        let straight = wall(p(100.0, 0.0), p(200.0, 0.0));

        let walls = resolve_connections(vec![arc.clone(), straight]);
        assert_eq!(walls[0], arc);
        assert!(walls[1].connections.is_empty());
    }

    #[test]
    fn test_malformed_wall_skipped() {
        let mut broken = wall(p(0.0, 0.0), p(100.0, 0.0));
        broken.thickness = f64::NAN;
        let good = wall(p(100.0, 0.0), p(100.0, 100.0));

        let walls = resolve_connections(vec![broken, good]);
        assert!(walls[0].connections.is_empty());
        assert!(walls[1].connections.is_empty());
    }

    #[test]
    fn test_perpendicular_fill_is_square() {
        let a = wall(p(0.0, 0.0), p(100.0, 0.0));
        let b = wall(p(0.0, 0.0), p(0.0, 100.0));

        let fill = compute_junction_fill(p(0.0, 0.0), &[&a, &b]);

        assert_eq!(fill.len(), 4);
        assert_relative_eq!(polygon_area(&fill).abs(), 400.0, epsilon = 1e-9);
        for corner in &fill {
            assert_relative_eq!(corner.x.abs(), 10.0, epsilon = 1e-9);
            assert_relative_eq!(corner.y.abs(), 10.0, epsilon = 1e-9);
        }
        // Counter-clockwise in increasing atan2 order
        assert!(polygon_area(&fill) > 0.0);
    }

    #[test]
    fn test_fill_at_end_of_wall() {
        let a = wall(p(-100.0, 50.0), p(0.0, 50.0));
        let b = wall(p(0.0, 50.0), p(0.0, 150.0));
        let fill = compute_junction_fill(p(0.0, 50.0), &[&a, &b]);

        assert_eq!(fill.len(), 4);
        let center = centroid(&fill).unwrap();
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(center.y, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fill_needs_exactly_two_walls() {
        let a = wall(p(0.0, 0.0), p(100.0, 0.0));
        let b = wall(p(0.0, 0.0), p(0.0, 100.0));
        let c = wall(p(0.0, 0.0), p(-100.0, 0.0));

        assert!(compute_junction_fill(p(0.0, 0.0), &[&a]).is_empty());
        assert!(compute_junction_fill(p(0.0, 0.0), &[&a, &b, &c]).is_empty());
    }

    #[test]
    fn test_fill_rejects_bad_thickness() {
        let a = wall(p(0.0, 0.0), p(100.0, 0.0));
        let mut b = wall(p(0.0, 0.0), p(0.0, 100.0));
        b.thickness = 0.0;
        assert!(compute_junction_fill(p(0.0, 0.0), &[&a, &b]).is_empty());
    }

    #[test]
    fn test_parallel_walls_have_no_fill() {
        let left = wall(p(-100.0, 0.0), p(0.0, 0.0));
        let right = wall(p(0.0, 0.0), p(100.0, 0.0));
        assert!(compute_junction_fill(p(0.0, 0.0), &[&left, &right]).is_empty());

        let long = wall(p(0.0, 0.0), p(100.0, 0.0));
        let short = wall(p(0.0, 0.0), p(50.0, 0.0));
        assert!(compute_junction_fill(p(0.0, 0.0), &[&long, &short]).is_empty());

        let junctions = find_junctions(&[left, right]);
        assert_eq!(junctions.len(), 1);
        assert_eq!(junctions[0].degree(), 2);
        assert!(!junctions[0].is_filled());
    }

    #[test]
    fn test_shared_id_never_connects_to_itself() {
        let id = Uuid::new_v4();
        let a = wall(p(0.0, 0.0), p(100.0, 0.0)).with_id(id);
        let b = wall(p(100.0, 0.0), p(100.0, 100.0)).with_id(id);

        let walls = resolve_connections(vec![a, b]);
        for resolved in &walls {
            assert!(!resolved.connections.references(id));
            assert!(resolved.connections.is_empty());
        }
    }

    #[test]
    fn test_find_junctions() {
        let a = wall(p(0.0, 0.0), p(100.0, 0.0));
        let b = wall(p(100.5, 0.3), p(100.0, 100.0));
        let c = wall(p(0.0, 0.0), p(0.0, 100.0));
        let d = wall(p(0.0, 0.0), p(-100.0, 0.0));
        let (a_id, b_id) = (a.id, b.id);

        let junctions = find_junctions(&[a, b, c, d]);
        assert_eq!(junctions.len(), 2);

        let corner = &junctions[0];
        assert_eq!(corner.point, p(0.0, 0.0));
        assert_eq!(corner.degree(), 3);
        assert!(!corner.is_filled());

        let elbow = &junctions[1];
        assert_eq!(elbow.point, p(100.0, 0.0));
        assert_eq!(elbow.wall_ids, vec![a_id, b_id]);
        assert!(elbow.is_filled());
    }
}
