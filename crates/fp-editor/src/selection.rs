//! Box selection

use fp_core::geometry::{AxisBox, point_in_box, segment_intersects_box};
use fp_core::{Point, SpaceElement, WallGeometry};
use uuid::Uuid;

use crate::document::FloorPlan;

/// How a box selection treats walls it only partly covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Walls must lie entirely inside the box
    Window,
    /// Walls touching the box are selected too
    Crossing,
}

/// A rubber-band selection rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSelection {
    /// Where the drag started
    pub start: Point,
    /// Current drag position
    pub end: Point,
}

impl BoxSelection {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Dragging towards the bottom right selects by window, anything else by crossing
    pub fn mode(&self) -> SelectionMode {
        if self.end.x > self.start.x && self.end.y > self.start.y {
            SelectionMode::Window
        } else {
            SelectionMode::Crossing
        }
    }

    /// The selection rectangle
    pub fn bounds(&self) -> AxisBox {
        AxisBox::new(self.start, self.end)
    }

    /// Check whether an element falls inside the selection
    pub fn selects(&self, element: &SpaceElement) -> bool {
        let bounds = self.bounds();
        let window = self.mode() == SelectionMode::Window;

        let Some(wall) = element.as_wall() else {
            return point_in_box(element.plan_position(), &bounds);
        };

        let (start, end) = (wall.start(), wall.end());
        let start_inside = point_in_box(start, &bounds);
        let end_inside = point_in_box(end, &bounds);

        match (&wall.geometry, window) {
            (_, true) => start_inside && end_inside,
            (WallGeometry::Straight { .. }, false) => {
                start_inside || end_inside || segment_intersects_box(start, end, &bounds)
            }
            (WallGeometry::Arc { .. }, false) => start_inside || end_inside,
        }
    }
}

/// IDs of the elements picked by a box selection, in document order
pub fn select_elements(plan: &FloorPlan, selection: &BoxSelection) -> Vec<Uuid> {
    plan.elements()
        .iter()
        .filter(|element| selection.selects(element))
        .map(|element| element.id)
        .collect()
}
