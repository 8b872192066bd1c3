//! Seat placement helpers
//!
//! Seats near a wall rotate in quarter turns relative to that wall; seats in
//! open space rotate between the four orthogonal headings.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use fp_core::geometry::distance_point_to_segment;
use fp_core::{Point, SpaceElement, WallSegment};
use glam::DVec3;

use crate::document::Command;

/// Fraction of the footprint diagonal within which a seat counts as against a wall
const NEAR_WALL_FACTOR: f64 = 2.0 / 3.0;

/// Closest straight wall to a point, with its distance
pub fn nearest_straight_wall<'a>(
    point: Point,
    walls: impl IntoIterator<Item = &'a WallSegment>,
) -> Option<(&'a WallSegment, f64)> {
    walls
        .into_iter()
        .filter(|wall| wall.is_straight())
        .map(|wall| (wall, distance_point_to_segment(point, wall.start(), wall.end())))
        .filter(|(_, distance)| distance.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Check whether an element sits close enough to a wall to align with it
pub fn is_near_wall<'a>(
    element: &SpaceElement,
    walls: impl IntoIterator<Item = &'a WallSegment>,
) -> bool {
    let threshold = element.dimensions.footprint_diagonal() * NEAR_WALL_FACTOR;
    nearest_straight_wall(element.plan_position(), walls)
        .is_some_and(|(_, distance)| distance < threshold)
}

/// Heading (radians, `[0, 2π)`) the element takes on its next rotate action
pub fn next_rotation<'a>(
    element: &SpaceElement,
    walls: impl IntoIterator<Item = &'a WallSegment>,
) -> f64 {
    let position = element.plan_position();
    let threshold = element.dimensions.footprint_diagonal() * NEAR_WALL_FACTOR;
    let current = element.heading();

    let base = match nearest_straight_wall(position, walls) {
        Some((wall, distance)) if distance < threshold => {
            let direction = wall.end() - wall.start();
            direction.y.atan2(direction.x)
        }
        _ => 0.0,
    };

    let headings = [0.0, FRAC_PI_2, PI, 1.5 * PI].map(|offset| normalize_radians(base + offset));
    let current_index = headings
        .iter()
        .enumerate()
        .min_by(|a, b| {
            (current - a.1).abs().total_cmp(&(current - b.1).abs())
        })
        .map_or(0, |(index, _)| index);

    headings[(current_index + 1) % headings.len()]
}

/// Command rotating an element to its next heading
pub fn rotate_command<'a>(
    element: &SpaceElement,
    walls: impl IntoIterator<Item = &'a WallSegment>,
) -> Command {
    let heading = next_rotation(element, walls);
    let rotation = DVec3::new(element.rotation.x, element.rotation.y, heading);
    let mut rotated = element.clone();
    rotated.rotation = rotation;

    Command::RotateElement {
        element: rotated,
        previous: element.clone(),
        rotation,
    }
}

fn normalize_radians(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}
