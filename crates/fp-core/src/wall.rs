//! Wall segments
//!
//! Defines straight and arc walls together with the connection metadata the
//! junction resolver maintains on them.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::arc::CircleFit;
use crate::geometry::{Point, segment_intersection};

/// Endpoints closer than this are the same point
pub const COINCIDENCE_EPSILON: f64 = 1e-6;

/// Wall-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WallError {
    #[error("Degenerate wall: start and end coincide at {0}")]
    DegenerateSegment(Point),

    #[error("Invalid wall thickness: {0}")]
    InvalidThickness(f64),

    #[error("Non-finite wall coordinate: {0}")]
    NonFiniteCoordinate(Point),

    #[error("Invalid arc radius: {0}")]
    InvalidRadius(f64),
}

/// Result type for wall construction
pub type WallResult<T> = Result<T, WallError>;

/// One end of a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallEnd {
    Start,
    End,
}

impl WallEnd {
    /// The other end
    pub fn opposite(self) -> Self {
        match self {
            WallEnd::Start => WallEnd::End,
            WallEnd::End => WallEnd::Start,
        }
    }
}

/// A link from one wall end to another wall sharing that point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// The wall on the other side of the junction
    pub other_wall_id: Uuid,
    /// Junction coordinate (the other wall's matched endpoint)
    pub point: Point,
    /// Which end of the other wall touches this one
    pub other_end: WallEnd,
}

/// Connections recorded at both ends of a wall
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WallConnections {
    /// Walls meeting this wall's start point
    pub at_start: Vec<Connection>,
    /// Walls meeting this wall's end point
    pub at_end: Vec<Connection>,
}

impl WallConnections {
    /// Connections at the given end
    pub fn at(&self, end: WallEnd) -> &[Connection] {
        match end {
            WallEnd::Start => &self.at_start,
            WallEnd::End => &self.at_end,
        }
    }

    /// Mutable connections at the given end
    pub fn at_mut(&mut self, end: WallEnd) -> &mut Vec<Connection> {
        match end {
            WallEnd::Start => &mut self.at_start,
            WallEnd::End => &mut self.at_end,
        }
    }

    /// Check if no wall is connected at either end
    pub fn is_empty(&self) -> bool {
        self.at_start.is_empty() && self.at_end.is_empty()
    }

    /// Check whether a given wall is connected at either end
    pub fn references(&self, wall_id: Uuid) -> bool {
        self.at_start
            .iter()
            .chain(&self.at_end)
            .any(|c| c.other_wall_id == wall_id)
    }
}

/// Shape of a wall's centerline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WallGeometry {
    /// Straight wall from start to end
    Straight { start: Point, end: Point },

    /// Circular arc wall
    Arc {
        start: Point,
        end: Point,
        center: Point,
        radius: f64,
        /// Angle of the start point, degrees in `[0, 360)`
        start_angle_deg: f64,
        /// Signed sweep, degrees
        sweep_angle_deg: f64,
    },
}

impl WallGeometry {
    /// Start point of the centerline
    pub fn start(&self) -> Point {
        match self {
            WallGeometry::Straight { start, .. } | WallGeometry::Arc { start, .. } => *start,
        }
    }

    /// End point of the centerline
    pub fn end(&self) -> Point {
        match self {
            WallGeometry::Straight { end, .. } | WallGeometry::Arc { end, .. } => *end,
        }
    }

    /// Get the type name of this geometry
    pub fn type_name(&self) -> &'static str {
        match self {
            WallGeometry::Straight { .. } => "Straight",
            WallGeometry::Arc { .. } => "Arc",
        }
    }

    /// The fitted circle for arc walls
    pub fn circle(&self) -> Option<CircleFit> {
        match *self {
            WallGeometry::Straight { .. } => None,
            WallGeometry::Arc {
                center,
                radius,
                start_angle_deg,
                sweep_angle_deg,
                ..
            } => Some(CircleFit {
                center,
                radius,
                start_angle_deg,
                sweep_angle_deg,
                clockwise: sweep_angle_deg > 0.0,
            }),
        }
    }
}

/// A wall placed on the floor plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    /// Unique identifier
    pub id: Uuid,
    /// Centerline shape
    pub geometry: WallGeometry,
    /// Wall thickness in canvas units
    pub thickness: f64,
    /// Glass partition instead of a solid wall
    #[serde(default)]
    pub is_glass: bool,
    /// Maintained by the junction resolver
    #[serde(default)]
    pub connections: WallConnections,
}

impl WallSegment {
    /// Thickness used when nothing else is configured
    pub const DEFAULT_THICKNESS: f64 = 20.0;

    /// Create a straight wall
    pub fn straight(start: Point, end: Point, thickness: f64) -> WallResult<Self> {
        let wall = Self {
            id: Uuid::new_v4(),
            geometry: WallGeometry::Straight { start, end },
            thickness,
            is_glass: false,
            connections: WallConnections::default(),
        };
        wall.validate()?;
        Ok(wall)
    }

    /// Create an arc wall from its endpoints and a fitted circle
    pub fn arc(start: Point, end: Point, fit: &CircleFit, thickness: f64) -> WallResult<Self> {
        let wall = Self {
            id: Uuid::new_v4(),
            geometry: WallGeometry::Arc {
                start,
                end,
                center: fit.center,
                radius: fit.radius,
                start_angle_deg: fit.start_angle_deg,
                sweep_angle_deg: fit.sweep_angle_deg,
            },
            thickness,
            is_glass: false,
            connections: WallConnections::default(),
        };
        wall.validate()?;
        Ok(wall)
    }

    /// Replace the generated ID
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Mark the wall as a glass partition
    pub fn with_glass(mut self, is_glass: bool) -> Self {
        self.is_glass = is_glass;
        self
    }

    /// Check the wall's invariants
    pub fn validate(&self) -> WallResult<()> {
        let (start, end) = (self.start(), self.end());
        for point in [start, end] {
            if !point.is_finite() {
                return Err(WallError::NonFiniteCoordinate(point));
            }
        }
        if !self.thickness.is_finite() || self.thickness <= 0.0 {
            return Err(WallError::InvalidThickness(self.thickness));
        }
        if start.distance(end) < COINCIDENCE_EPSILON {
            return Err(WallError::DegenerateSegment(start));
        }
        if let WallGeometry::Arc { radius, center, .. } = self.geometry {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(WallError::InvalidRadius(radius));
            }
            if !center.is_finite() {
                return Err(WallError::NonFiniteCoordinate(center));
            }
        }
        Ok(())
    }

    /// Start point
    pub fn start(&self) -> Point {
        self.geometry.start()
    }

    /// End point
    pub fn end(&self) -> Point {
        self.geometry.end()
    }

    /// Point at the given end
    pub fn endpoint(&self, end: WallEnd) -> Point {
        match end {
            WallEnd::Start => self.start(),
            WallEnd::End => self.end(),
        }
    }

    /// Check if this is a straight wall
    pub fn is_straight(&self) -> bool {
        matches!(self.geometry, WallGeometry::Straight { .. })
    }

    /// Check if this is an arc wall
    pub fn is_arc(&self) -> bool {
        matches!(self.geometry, WallGeometry::Arc { .. })
    }

    /// Centerline length (arc length for arcs)
    pub fn length(&self) -> f64 {
        match self.geometry.circle() {
            Some(fit) => fit.arc_length(),
            None => self.start().distance(self.end()),
        }
    }

    /// Point halfway along the centerline
    pub fn midpoint(&self) -> Point {
        match self.geometry.circle() {
            Some(fit) => fit.point_at(0.5),
            None => (self.start() + self.end()) * 0.5,
        }
    }

    /// Which end lies within `epsilon` of `point`, start checked first
    pub fn end_at(&self, point: Point, epsilon: f64) -> Option<WallEnd> {
        [WallEnd::Start, WallEnd::End].into_iter().find(|&end| {
            let p = self.endpoint(end);
            (p.x - point.x).abs() < epsilon && (p.y - point.y).abs() < epsilon
        })
    }

    /// Unit vector pointing from the given end along the wall's chord
    pub fn direction_from(&self, end: WallEnd) -> Point {
        let from = self.endpoint(end);
        let to = self.endpoint(end.opposite());
        (to - from).normalize_or_zero()
    }

    /// Quad outline of a straight wall, offset half the thickness each side.
    ///
    /// Corners run start-left, start-right, end-right, end-left.
    pub fn outline(&self) -> Option<[Point; 4]> {
        let WallGeometry::Straight { start, end } = self.geometry else {
            return None;
        };
        let normal = (end - start).normalize_or_zero().perp() * (self.thickness / 2.0);
        Some([start - normal, start + normal, end + normal, end - normal])
    }

    /// Centerline as a polyline; arcs are sampled with `segments` pieces
    pub fn centerline(&self, segments: usize) -> Vec<Point> {
        match self.geometry.circle() {
            Some(fit) => fit.sample_polyline(segments),
            None => vec![self.start(), self.end()],
        }
    }

    /// Where the centerlines of two straight walls cross
    pub fn crossing(&self, other: &WallSegment) -> Option<Point> {
        if !self.is_straight() || !other.is_straight() {
            return None;
        }
        segment_intersection(self.start(), self.end(), other.start(), other.end())
    }
}
