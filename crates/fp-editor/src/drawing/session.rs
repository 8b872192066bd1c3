//! Wall drawing session state machine

use fp_core::snap::{self, SnapConfig, SnapPoint};
use fp_core::wall::{COINCIDENCE_EPSILON, WallError};
use fp_core::{Point, SpaceElement, WallSegment, fit_circle};

use super::{DrawOutcome, DrawingState, Measurement, WallMode, WallPreview};
use crate::config::{DrawingConfig, SharedConfig};
use crate::document::{Command, CommandDispatcher};

/// Interactive wall drawing.
///
/// Straight walls take two clicks. Arc walls take three: the start, a point
/// the arc passes through, and the end. In continuous mode each committed
/// wall's end becomes the next wall's start.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    /// Active drawing mode; `None` while not drawing
    mode: Option<WallMode>,
    state: DrawingState,
    /// Last resolved cursor position
    cursor: Option<SnapPoint>,
    continuous: bool,
    axis_lock: bool,
    thickness: f64,
    config: DrawingConfig,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new(DrawingConfig::default())
    }
}

impl DrawingSession {
    /// Create an inactive session
    pub fn new(config: DrawingConfig) -> Self {
        Self {
            mode: None,
            state: DrawingState::Idle,
            cursor: None,
            continuous: config.continuous_by_default,
            axis_lock: false,
            thickness: config.clamp_thickness(config.default_thickness),
            config,
        }
    }

    /// Create an inactive session from the shared editor configuration
    pub fn from_shared(config: &SharedConfig) -> Self {
        Self::new(config.read().config().drawing.clone())
    }

    /// Enter drawing mode, discarding any wall in progress
    pub fn begin(&mut self, mode: WallMode) {
        self.mode = Some(mode);
        self.state = DrawingState::Idle;
        self.cursor = None;
        tracing::debug!("Started drawing: {}", mode.name());
    }

    /// Leave drawing mode
    pub fn exit_mode(&mut self) {
        if self.mode.take().is_some() {
            tracing::debug!("Stopped drawing");
        }
        self.state = DrawingState::Idle;
        self.cursor = None;
    }

    /// Drop the wall in progress but keep drawing
    pub fn cancel_segment(&mut self) {
        self.state = DrawingState::Idle;
    }

    /// Escape key: cancel the wall in progress, or leave drawing mode if
    /// nothing is in progress
    pub fn escape(&mut self) {
        if self.state.start().is_some() {
            tracing::debug!("Cancelled wall in progress");
            self.cancel_segment();
        } else {
            self.exit_mode();
        }
    }

    /// Flip continuous mode, returning the new setting
    pub fn toggle_continuous(&mut self) -> bool {
        self.continuous = !self.continuous;
        tracing::debug!("Continuous drawing: {}", self.continuous);
        self.continuous
    }

    /// Constrain straight walls to horizontal or vertical
    pub fn set_axis_lock(&mut self, locked: bool) {
        self.axis_lock = locked;
    }

    /// Set the thickness for new walls, returning the clamped value
    pub fn set_thickness(&mut self, thickness: f64) -> f64 {
        self.thickness = self.config.clamp_thickness(thickness);
        self.thickness
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    pub fn mode(&self) -> Option<WallMode> {
        self.mode
    }

    pub fn state(&self) -> DrawingState {
        self.state
    }

    pub fn cursor(&self) -> Option<SnapPoint> {
        self.cursor
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn is_axis_locked(&self) -> bool {
        self.axis_lock
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Snap a raw position, applying the axis lock to straight walls
    fn resolve<'a>(
        &self,
        raw: Point,
        walls: impl IntoIterator<Item = &'a WallSegment>,
        config: &SnapConfig,
    ) -> SnapPoint {
        let snapped = snap::resolve(raw, walls, config);
        match (self.mode, self.state) {
            (Some(WallMode::Straight), DrawingState::StartPicked { start }) if self.axis_lock => {
                snap::apply_axis_lock(start, snapped)
            }
            _ => snapped,
        }
    }

    /// Track the cursor; returns the resolved position while drawing
    pub fn pointer_move<'a>(
        &mut self,
        raw: Point,
        walls: impl IntoIterator<Item = &'a WallSegment>,
        config: &SnapConfig,
    ) -> Option<SnapPoint> {
        if !self.is_active() {
            return None;
        }
        let point = self.resolve(raw, walls, config);
        self.cursor = Some(point);
        Some(point)
    }

    /// Handle a click
    pub fn pointer_down<'a, D>(
        &mut self,
        raw: Point,
        walls: impl IntoIterator<Item = &'a WallSegment>,
        config: &SnapConfig,
        dispatcher: &mut D,
    ) -> DrawOutcome
    where
        D: CommandDispatcher + ?Sized,
    {
        let Some(mode) = self.mode else {
            return DrawOutcome::Ignored;
        };

        let snapped = self.resolve(raw, walls, config);
        self.cursor = Some(snapped);
        let point = snapped.point;

        match (self.state, mode) {
            (DrawingState::Idle, _) => {
                self.state = DrawingState::StartPicked { start: point };
                tracing::debug!("Wall start at {}", point);
                DrawOutcome::StartPicked
            }

            (DrawingState::StartPicked { start }, WallMode::Straight) => {
                match WallSegment::straight(start, point, self.thickness) {
                    Ok(wall) => self.commit(wall, dispatcher),
                    Err(WallError::DegenerateSegment(_)) => DrawOutcome::Ignored,
                    Err(e) => {
                        tracing::warn!("Cannot build wall: {}", e);
                        DrawOutcome::Rejected
                    }
                }
            }

            (DrawingState::StartPicked { start }, WallMode::Arc) => {
                if start.distance(point) < COINCIDENCE_EPSILON {
                    return DrawOutcome::Ignored;
                }
                self.state = DrawingState::ArcMidPicked { start, mid: point };
                tracing::debug!("Arc passes through {}", point);
                DrawOutcome::MidPicked
            }

            (DrawingState::ArcMidPicked { start, mid }, _) => {
                let Some(fit) = fit_circle(start, mid, point) else {
                    tracing::debug!("Arc points are collinear, ignoring click");
                    return DrawOutcome::Rejected;
                };
                match WallSegment::arc(start, point, &fit, self.thickness) {
                    Ok(wall) => self.commit(wall, dispatcher),
                    Err(e) => {
                        tracing::warn!("Cannot build arc wall: {}", e);
                        DrawOutcome::Rejected
                    }
                }
            }
        }
    }

    fn commit<D>(&mut self, wall: WallSegment, dispatcher: &mut D) -> DrawOutcome
    where
        D: CommandDispatcher + ?Sized,
    {
        let id = wall.id;
        let end = wall.end();
        let length = wall.length();
        let command = Command::AddElement {
            element: SpaceElement::wall(wall),
        };

        if let Err(e) = dispatcher.dispatch(command) {
            tracing::warn!("Failed to add wall: {}", e);
            return DrawOutcome::Rejected;
        }

        tracing::debug!("Committed wall {} (length {:.1})", id, length);
        self.state = if self.continuous {
            DrawingState::StartPicked { start: end }
        } else {
            DrawingState::Idle
        };
        DrawOutcome::Committed(id)
    }

    /// Geometry to draw for the wall in progress
    pub fn preview(&self) -> Option<WallPreview> {
        let mode = self.mode?;
        let end = self.cursor?.point;

        match (self.state, mode) {
            (DrawingState::Idle, _) => None,
            (DrawingState::StartPicked { start }, WallMode::Straight) => {
                Some(WallPreview::Straight { start, end })
            }
            (DrawingState::StartPicked { start }, WallMode::Arc) => {
                Some(WallPreview::Chord { start, end })
            }
            (DrawingState::ArcMidPicked { start, mid }, _) => Some(
                fit_circle(start, mid, end)
                    .map(|fit| WallPreview::Arc { start, end, fit })
                    .unwrap_or(WallPreview::Chord { start, end }),
            ),
        }
    }

    /// Live dimensions of the wall in progress
    pub fn measurements(&self) -> Option<Measurement> {
        self.preview().map(|preview| preview.measurement())
    }
}
