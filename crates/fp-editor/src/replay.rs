//! Scripted input replay
//!
//! Drives a [`DrawingSession`] against a [`FloorPlan`] from a RON list of
//! input events and reports the resulting walls and junctions. Useful for
//! reproducing drawing bugs without a canvas.

use fp_core::{Junction, Point, WallSegment};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::document::{DocumentError, FloorPlan};
use crate::drawing::{DrawOutcome, DrawingSession, WallMode};

/// Replay errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    #[error("Failed to read script: {0}")]
    Io(String),

    #[error("Invalid replay script: {0}")]
    Parse(String),

    #[error("Failed to write report: {0}")]
    Serialize(String),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// One recorded input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReplayEvent {
    /// Enter drawing mode
    Begin(WallMode),
    /// Pointer pressed at canvas coordinates
    Down(f64, f64),
    /// Pointer moved to canvas coordinates
    Move(f64, f64),
    Escape,
    ToggleContinuous,
    /// Shift held or released
    AxisLock(bool),
    /// Wall thickness changed
    Thickness(f64),
    Undo,
    Redo,
}

/// Result of a replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Document version after the last event
    pub version: u64,
    /// Outcome of every pointer-down, in order
    pub outcomes: Vec<DrawOutcome>,
    pub walls: Vec<WallSegment>,
    pub junctions: Vec<Junction>,
}

impl ReplayReport {
    /// Serialize the report as pretty RON
    pub fn to_ron(&self) -> Result<String, ReplayError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ReplayError::Serialize(e.to_string()))
    }
}

/// Parse a RON event list
pub fn parse_script(content: &str) -> Result<Vec<ReplayEvent>, ReplayError> {
    ron::from_str(content).map_err(|e| ReplayError::Parse(e.to_string()))
}

/// Read and parse a script file
pub fn load_script(path: &std::path::Path) -> Result<Vec<ReplayEvent>, ReplayError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReplayError::Io(e.to_string()))?;
    parse_script(&content)
}

/// Play events against a fresh document
pub fn replay(events: &[ReplayEvent], config: &AppConfig) -> Result<ReplayReport, ReplayError> {
    let mut session = DrawingSession::new(config.drawing.clone());
    let mut plan = FloorPlan::new();
    let mut outcomes = Vec::new();

    for event in events {
        tracing::debug!("Replaying {:?}", event);
        match *event {
            ReplayEvent::Begin(mode) => session.begin(mode),
            ReplayEvent::Down(x, y) => {
                let walls = plan.wall_snapshot();
                let outcome =
                    session.pointer_down(Point::new(x, y), &walls, &config.snap, &mut plan);
                outcomes.push(outcome);
            }
            ReplayEvent::Move(x, y) => {
                let walls = plan.wall_snapshot();
                session.pointer_move(Point::new(x, y), &walls, &config.snap);
            }
            ReplayEvent::Escape => session.escape(),
            ReplayEvent::ToggleContinuous => {
                session.toggle_continuous();
            }
            ReplayEvent::AxisLock(locked) => session.set_axis_lock(locked),
            ReplayEvent::Thickness(thickness) => {
                session.set_thickness(thickness);
            }
            ReplayEvent::Undo => {
                plan.undo()?;
            }
            ReplayEvent::Redo => {
                plan.redo()?;
            }
        }
    }

    Ok(ReplayReport {
        version: plan.version(),
        outcomes,
        walls: plan.wall_snapshot(),
        junctions: plan.junctions().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"[
        Begin(Straight),
        ToggleContinuous,
        Down(0.0, 0.0),
        Down(100.0, 0.0),
        Down(100.0, 100.0),
        Down(0.0, 100.0),
        Down(2.0, 3.0),
        Escape,
        Escape,
    ]"#;

    #[test]
    fn test_parse_script() {
        let events = parse_script("[Begin(Arc), Down(1.0, 2.0), AxisLock(true), Undo]").unwrap();
        assert_eq!(
            events,
            vec![
                ReplayEvent::Begin(WallMode::Arc),
                ReplayEvent::Down(1.0, 2.0),
                ReplayEvent::AxisLock(true),
                ReplayEvent::Undo,
            ]
        );
        assert!(matches!(parse_script("[Jump]"), Err(ReplayError::Parse(_))));
    }

    #[test]
    fn test_replay_closed_square() {
        let events = parse_script(SQUARE).unwrap();
        let report = replay(&events, &AppConfig::new()).unwrap();

        assert_eq!(report.walls.len(), 4);
        assert_eq!(report.outcomes.len(), 5);
        assert_eq!(report.outcomes[0], DrawOutcome::StartPicked);
        // The closing click snaps onto the first wall's start
        assert_eq!(report.walls[3].end(), Point::new(0.0, 0.0));
        assert_eq!(report.junctions.len(), 4);
        assert!(report.junctions.iter().all(|j| j.is_filled()));
        assert!(report.walls.iter().all(|w| w.connections.at_start.len() == 1));
    }

    #[test]
    fn test_replay_undo_redo() {
        let events = [
            ReplayEvent::Begin(WallMode::Straight),
            ReplayEvent::Thickness(8.0),
            ReplayEvent::Down(0.0, 0.0),
            ReplayEvent::Down(50.0, 0.0),
            ReplayEvent::Undo,
            ReplayEvent::Redo,
            ReplayEvent::Undo,
        ];
        let report = replay(&events, &AppConfig::new()).unwrap();
        assert!(report.walls.is_empty());
        assert_eq!(report.version, 4);
    }

    #[test]
    fn test_report_is_ron() {
        let events = [
            ReplayEvent::Begin(WallMode::Straight),
            ReplayEvent::Down(0.0, 0.0),
            ReplayEvent::Down(50.0, 0.0),
        ];
        let report = replay(&events, &AppConfig::new()).unwrap();
        let text = report.to_ron().unwrap();
        let parsed: ReplayReport = ron::from_str(&text).unwrap();
        assert_eq!(parsed.walls.len(), 1);
        assert_eq!(parsed.walls[0].thickness, 20.0);
    }
}
