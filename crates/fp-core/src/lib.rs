//! Floor-plan wall geometry core
//!
//! This crate contains the geometry behind interactive wall editing:
//! - Geometry primitives (segments, boxes, polygons)
//! - Wall segments and the other placeable space elements
//! - Snap resolution against existing walls
//! - Three-point arc fitting
//! - Junction resolution (wall connections and corner fills)
//!
//! Everything here is pure: callers pass snapshots in and get new values back.

pub mod arc;
pub mod element;
pub mod geometry;
pub mod junction;
pub mod snap;
pub mod wall;

pub use arc::{CircleFit, fit_circle};
pub use element::{
    DoorType, Dimensions, ElementKind, GlassType, OpenDirection, SpaceElement, WindowType,
};
pub use geometry::{AxisBox, Point};
pub use junction::{Junction, compute_junction_fill, find_junctions, resolve_connections};
pub use snap::{SnapConfig, SnapKind, SnapPoint};
pub use wall::{Connection, WallConnections, WallEnd, WallError, WallGeometry, WallSegment};
