//! Space elements
//!
//! Everything that can be placed on the floor plan. Walls carry their own
//! geometry; the other kinds are positioned boxes with kind-specific data.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;
use crate::wall::WallSegment;

/// Door opening style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DoorType {
    #[default]
    Single,
    Double,
    Sliding,
}

/// Side a door swings towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpenDirection {
    #[default]
    Left,
    Right,
}

/// Window opening style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowType {
    #[default]
    Fixed,
    Sliding,
    Casement,
}

/// Window glazing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlassType {
    #[default]
    Clear,
    Frosted,
    Tinted,
}

/// Footprint and height of an element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Dimensions {
    /// Create new dimensions
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Diagonal of the width x depth footprint
    pub fn footprint_diagonal(&self) -> f64 {
        self.width.hypot(self.depth)
    }
}

/// Kind-specific element data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    /// A desk seat
    Seat {
        seat_number: String,
        is_occupied: bool,
        department: Option<String>,
    },

    /// A door
    Door {
        door_type: DoorType,
        open_direction: OpenDirection,
        is_automatic: bool,
    },

    /// A window
    Window {
        window_type: WindowType,
        glass_type: GlassType,
        has_grills: bool,
    },

    /// A meeting room
    MeetingRoom {
        capacity: u32,
        name: String,
        has_display: bool,
    },

    /// A wall or glass partition
    Wall(WallSegment),
}

impl ElementKind {
    /// Get the type name of this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Seat { .. } => "Seat",
            ElementKind::Door { .. } => "Door",
            ElementKind::Window { .. } => "Window",
            ElementKind::MeetingRoom { .. } => "Meeting Room",
            ElementKind::Wall(_) => "Wall",
        }
    }
}

/// An element placed on the floor plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceElement {
    /// Unique identifier (shared with the wall for wall elements)
    pub id: Uuid,
    /// Placement position
    pub position: DVec3,
    /// Rotation around each axis (radians)
    pub rotation: DVec3,
    /// Size of the element
    pub dimensions: Dimensions,
    /// Kind-specific data
    pub kind: ElementKind,
}

impl SpaceElement {
    /// Default seat footprint
    pub const SEAT_DIMENSIONS: Dimensions = Dimensions {
        width: 120.0,
        height: 50.0,
        depth: 100.0,
    };

    /// Wrap a wall as an element; walls keep their geometry in the wall itself
    pub fn wall(wall: WallSegment) -> Self {
        Self {
            id: wall.id,
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            dimensions: Dimensions::default(),
            kind: ElementKind::Wall(wall),
        }
    }

    /// Create a seat at the given position
    pub fn seat(position: Point, seat_number: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: position.extend(0.0),
            rotation: DVec3::ZERO,
            dimensions: Self::SEAT_DIMENSIONS,
            kind: ElementKind::Seat {
                seat_number: seat_number.into(),
                is_occupied: false,
                department: None,
            },
        }
    }

    /// Create a non-wall element with small default dimensions
    pub fn with_kind(position: Point, kind: ElementKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: position.extend(0.0),
            rotation: DVec3::ZERO,
            dimensions: Dimensions::new(2.0, 0.1, 2.0),
            kind,
        }
    }

    /// Position projected onto the floor plane
    pub fn plan_position(&self) -> Point {
        self.position.truncate()
    }

    /// Rotation around the vertical axis (radians)
    pub fn heading(&self) -> f64 {
        self.rotation.z
    }

    /// The wall, if this is a wall element
    pub fn as_wall(&self) -> Option<&WallSegment> {
        match &self.kind {
            ElementKind::Wall(wall) => Some(wall),
            _ => None,
        }
    }

    /// Mutable wall, if this is a wall element
    pub fn as_wall_mut(&mut self) -> Option<&mut WallSegment> {
        match &mut self.kind {
            ElementKind::Wall(wall) => Some(wall),
            _ => None,
        }
    }

    /// Check if this element is a wall
    pub fn is_wall(&self) -> bool {
        matches!(self.kind, ElementKind::Wall(_))
    }

    /// Check if this element is a seat
    pub fn is_seat(&self) -> bool {
        matches!(self.kind, ElementKind::Seat { .. })
    }
}
