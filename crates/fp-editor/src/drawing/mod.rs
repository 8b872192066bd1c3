//! Wall drawing
//!
//! Turns pointer and keyboard input into committed straight or arc walls.

mod session;

pub use session::DrawingSession;

use fp_core::{CircleFit, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of wall being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WallMode {
    /// Two clicks: start and end
    #[default]
    Straight,
    /// Three clicks: start, a point on the arc, end
    Arc,
}

impl WallMode {
    /// Get the display name of the mode
    pub fn name(&self) -> &'static str {
        match self {
            WallMode::Straight => "Straight Wall",
            WallMode::Arc => "Arc Wall",
        }
    }
}

/// Progress through the clicks of one wall
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawingState {
    /// Waiting for the first click
    #[default]
    Idle,
    /// Start point placed
    StartPicked { start: Point },
    /// Arc start and middle point placed, waiting for the end
    ArcMidPicked { start: Point, mid: Point },
}

impl DrawingState {
    /// Start point of the wall in progress
    pub fn start(&self) -> Option<Point> {
        match *self {
            DrawingState::Idle => None,
            DrawingState::StartPicked { start } | DrawingState::ArcMidPicked { start, .. } => {
                Some(start)
            }
        }
    }
}

/// What a pointer-down did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawOutcome {
    /// Drawing inactive, or the click changed nothing
    Ignored,
    /// First point recorded
    StartPicked,
    /// Arc middle point recorded
    MidPicked,
    /// A wall was dispatched
    Committed(Uuid),
    /// The click could not form a wall
    Rejected,
}

/// Rubber-band geometry for the wall in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallPreview {
    /// Straight wall from the start to the cursor
    Straight { start: Point, end: Point },
    /// Arc wall whose middle point is not yet known
    Chord { start: Point, end: Point },
    /// Arc through the start, the middle point and the cursor
    Arc {
        start: Point,
        end: Point,
        fit: CircleFit,
    },
}

/// Live dimensions shown next to the cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Wall length (arc length once the arc is known)
    pub length: f64,
    pub radius: Option<f64>,
    /// Included angle, degrees
    pub angle_deg: Option<f64>,
}

impl WallPreview {
    /// Dimensions of the previewed wall
    pub fn measurement(&self) -> Measurement {
        match *self {
            WallPreview::Straight { start, end } | WallPreview::Chord { start, end } => {
                Measurement {
                    length: start.distance(end),
                    radius: None,
                    angle_deg: None,
                }
            }
            WallPreview::Arc { fit, .. } => Measurement {
                length: fit.arc_length(),
                radius: Some(fit.radius),
                angle_deg: Some(fit.sweep_angle_deg.abs()),
            },
        }
    }
}
