//! Snap resolution
//!
//! While drawing, the cursor locks onto existing wall endpoints and
//! midpoints, falls back to the nearest point on a wall, and finally to the
//! grid (when enabled) or the raw cursor.
//!
//! Arc walls do not provide snap anchors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, closest_point_on_segment};
use crate::wall::WallSegment;

/// What a snap point was captured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapKind {
    /// A wall endpoint, or the raw cursor when nothing was captured
    Endpoint,
    /// A wall midpoint
    Midpoint,
    /// The closest point on a wall
    Projection,
    /// A grid lattice point
    Grid,
}

/// A resolved cursor position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapPoint {
    /// Resolved position
    pub point: Point,
    /// Anchor kind
    pub kind: SnapKind,
    /// Wall the anchor belongs to
    pub owner_wall_id: Option<Uuid>,
    /// Distance from the cursor at resolution time
    pub distance: Option<f64>,
}

impl SnapPoint {
    /// The raw cursor, not captured by anything
    pub fn unsnapped(point: Point) -> Self {
        Self {
            point,
            kind: SnapKind::Endpoint,
            owner_wall_id: None,
            distance: None,
        }
    }

    /// Check whether the cursor was captured by an anchor or the grid
    pub fn is_snapped(&self) -> bool {
        self.distance.is_some()
    }
}

/// Snapping preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Master switch; when off the cursor is used as-is
    pub enabled: bool,
    /// Capture radius in canvas units
    pub snap_distance: f64,
    /// Round uncaptured points to the grid
    pub snap_to_grid: bool,
    /// Grid spacing
    pub grid_size: f64,
    /// Capture the closest point on a wall
    pub snap_to_walls: bool,
    /// Capture wall endpoints
    pub snap_to_endpoints: bool,
    /// Capture wall midpoints
    pub snap_to_midpoints: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            snap_distance: 10.0,
            snap_to_grid: false,
            grid_size: 50.0,
            snap_to_walls: true,
            snap_to_endpoints: true,
            snap_to_midpoints: true,
        }
    }
}

impl SnapConfig {
    /// Snapping switched off entirely
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Endpoint and midpoint anchors of the straight walls, in wall order
pub fn snap_candidates<'a>(
    walls: impl IntoIterator<Item = &'a WallSegment>,
    config: &SnapConfig,
) -> Vec<SnapPoint> {
    let mut candidates = Vec::new();

    for wall in walls.into_iter().filter(|w| w.is_straight()) {
        let anchor = |point, kind| SnapPoint {
            point,
            kind,
            owner_wall_id: Some(wall.id),
            distance: None,
        };

        if config.snap_to_endpoints {
            candidates.push(anchor(wall.start(), SnapKind::Endpoint));
            candidates.push(anchor(wall.end(), SnapKind::Endpoint));
        }
        if config.snap_to_midpoints {
            candidates.push(anchor(wall.midpoint(), SnapKind::Midpoint));
        }
    }

    candidates
}

/// Resolve the cursor against the walls.
///
/// Priority: nearest endpoint/midpoint, then nearest projection onto a wall,
/// both within `snap_distance`; then the grid if enabled; otherwise the
/// cursor itself. Ties keep the first candidate found.
pub fn resolve<'a>(
    cursor: Point,
    walls: impl IntoIterator<Item = &'a WallSegment>,
    config: &SnapConfig,
) -> SnapPoint {
    if !config.enabled {
        return SnapPoint::unsnapped(cursor);
    }

    let walls: Vec<&WallSegment> = walls.into_iter().filter(|w| w.is_straight()).collect();

    let mut best: Option<SnapPoint> = None;
    let mut min_distance = config.snap_distance;

    for candidate in snap_candidates(walls.iter().copied(), config) {
        let distance = cursor.distance(candidate.point);
        if distance < min_distance {
            min_distance = distance;
            best = Some(SnapPoint {
                distance: Some(distance),
                ..candidate
            });
        }
    }

    if best.is_none() && config.snap_to_walls {
        for wall in &walls {
            let projection = closest_point_on_segment(cursor, wall.start(), wall.end());
            let distance = cursor.distance(projection);
            if distance < min_distance {
                min_distance = distance;
                best = Some(SnapPoint {
                    point: projection,
                    kind: SnapKind::Projection,
                    owner_wall_id: Some(wall.id),
                    distance: Some(distance),
                });
            }
        }
    }

    if let Some(snap) = best {
        return snap;
    }

    if config.snap_to_grid && config.grid_size > 0.0 {
        let point = (cursor / config.grid_size).round() * config.grid_size;
        return SnapPoint {
            point,
            kind: SnapKind::Grid,
            owner_wall_id: None,
            distance: Some(cursor.distance(point)),
        };
    }

    SnapPoint::unsnapped(cursor)
}

/// Constrain a snap point to the horizontal or vertical through `start`.
///
/// The dominant axis of the offset wins; equal offsets lock vertically.
pub fn apply_axis_lock(start: Point, snap: SnapPoint) -> SnapPoint {
    let offset = snap.point - start;
    let point = if offset.x.abs() > offset.y.abs() {
        Point::new(snap.point.x, start.y)
    } else {
        Point::new(start.x, snap.point.y)
    };
    SnapPoint { point, ..snap }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::fit_circle;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn wall(a: Point, b: Point) -> WallSegment {
        WallSegment::straight(a, b, 20.0).unwrap()
    }

    #[test]
    fn test_snap_priority() {
        let walls = [wall(p(0.0, 0.0), p(100.0, 0.0))];
        let config = SnapConfig::default();

        let snap = resolve(p(2.0, 0.0), &walls, &config);
        assert_eq!(snap.kind, SnapKind::Endpoint);
        assert_eq!(snap.point, p(0.0, 0.0));
        assert_eq!(snap.owner_wall_id, Some(walls[0].id));
        assert_eq!(snap.distance, Some(2.0));

        let snap = resolve(p(50.0, 3.0), &walls, &config);
        assert_eq!(snap.kind, SnapKind::Midpoint);
        assert_eq!(snap.point, p(50.0, 0.0));

        let snap = resolve(p(50.0, 30.0), &walls, &config);
        assert_eq!(snap, SnapPoint::unsnapped(p(50.0, 30.0)));
        assert!(!snap.is_snapped());
    }

    #[test]
    fn test_projection_fallback() {
        let walls = [wall(p(0.0, 0.0), p(100.0, 0.0))];
        let snap = resolve(p(25.0, 4.0), &walls, &SnapConfig::default());

        assert_eq!(snap.kind, SnapKind::Projection);
        assert_eq!(snap.point, p(25.0, 0.0));
        assert_eq!(snap.distance, Some(4.0));
    }

    #[test]
    fn test_nearest_candidate_wins() {
        let walls = [
            wall(p(0.0, 0.0), p(100.0, 0.0)),
            wall(p(104.0, 0.0), p(104.0, 100.0)),
        ];
        let snap = resolve(p(103.0, 1.0), &walls, &SnapConfig::default());
        assert_eq!(snap.point, p(104.0, 0.0));
        assert_eq!(snap.owner_wall_id, Some(walls[1].id));
    }

    #[test]
    fn test_tie_keeps_first_wall() {
        let a = wall(p(0.0, 0.0), p(100.0, 0.0));
        let b = wall(p(100.0, 100.0), p(0.0, 0.0));
        let walls = [a.clone(), b];
        let snap = resolve(p(1.0, 1.0), &walls, &SnapConfig::default());
        assert_eq!(snap.owner_wall_id, Some(a.id));
    }

    #[test]
    fn test_disabled_is_identity() {
        let walls = [wall(p(0.0, 0.0), p(100.0, 0.0))];
        let snap = resolve(p(1.0, 0.0), &walls, &SnapConfig::disabled());
        assert_eq!(snap, SnapPoint::unsnapped(p(1.0, 0.0)));
    }

    #[test]
    fn test_config_flags() {
        let walls = [wall(p(0.0, 0.0), p(100.0, 0.0))];

        let no_endpoints = SnapConfig {
            snap_to_endpoints: false,
            ..Default::default()
        };
        // Falls through to the projection, which clamps to the endpoint
        let snap = resolve(p(-2.0, 0.0), &walls, &no_endpoints);
        assert_eq!(snap.kind, SnapKind::Projection);
        assert_eq!(snap.point, p(0.0, 0.0));

        let no_midpoints = SnapConfig {
            snap_to_midpoints: false,
            ..Default::default()
        };
        let snap = resolve(p(50.0, 3.0), &walls, &no_midpoints);
        assert_eq!(snap.kind, SnapKind::Projection);

        let nothing = SnapConfig {
            snap_to_midpoints: false,
            snap_to_walls: false,
            ..Default::default()
        };
        assert!(!resolve(p(50.0, 3.0), &walls, &nothing).is_snapped());
    }

    #[test]
    fn test_grid_fallback() {
        let config = SnapConfig {
            snap_to_grid: true,
            grid_size: 50.0,
            ..Default::default()
        };
        let walls = [wall(p(0.0, 0.0), p(100.0, 0.0))];

        let snap = resolve(p(140.0, 70.0), &walls, &config);
        assert_eq!(snap.kind, SnapKind::Grid);
        assert_eq!(snap.point, p(150.0, 50.0));
        assert!(snap.owner_wall_id.is_none());

        // Wall anchors still take priority
        let snap = resolve(p(98.0, 1.0), &walls, &config);
        assert_eq!(snap.kind, SnapKind::Endpoint);
    }

    #[test]
    fn test_arcs_do_not_snap() {
        let fit = fit_circle(p(100.0, 0.0), p(0.0, 100.0), p(-100.0, 0.0)).unwrap();
        let arc = WallSegment::arc(p(100.0, 0.0), p(-100.0, 0.0), &fit, 10.0).unwrap();
        let snap = resolve(p(99.0, 0.0), [&arc], &SnapConfig::default());
        assert!(!snap.is_snapped());
        assert!(snap_candidates([&arc], &SnapConfig::default()).is_empty());
    }

    #[test]
    fn test_snap_candidates_order() {
        let walls = [wall(p(0.0, 0.0), p(10.0, 0.0))];
        let candidates = snap_candidates(&walls, &SnapConfig::default());
        let kinds: Vec<SnapKind> = candidates.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![SnapKind::Endpoint, SnapKind::Endpoint, SnapKind::Midpoint]
        );
    }

    #[test]
    fn test_axis_lock() {
        let start = p(0.0, 0.0);
        let snap = apply_axis_lock(start, resolve(p(52.0, 4.0), [], &SnapConfig::default()));
        assert_eq!(snap.point, p(52.0, 0.0));

        let snap = apply_axis_lock(start, SnapPoint::unsnapped(p(4.0, 52.0)));
        assert_eq!(snap.point, p(0.0, 52.0));
    }
}
