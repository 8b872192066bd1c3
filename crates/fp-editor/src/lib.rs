//! Floor-plan editor
//!
//! Interactive layer over `fp-core`:
//! - Wall drawing session (straight and arc walls, continuous mode)
//! - Command-backed floor-plan document with undo/redo
//! - Box selection and seat placement helpers
//! - Persistent editor configuration
//! - Scripted input replay

pub mod config;
pub mod document;
pub mod drawing;
pub mod placement;
pub mod replay;
pub mod selection;

pub use config::{AppConfig, ConfigManager, DrawingConfig, SharedConfig, create_shared_config};
pub use document::{Command, CommandDispatcher, CommandQueue, DocumentError, FloorPlan};
pub use drawing::{DrawOutcome, DrawingSession, DrawingState, Measurement, WallMode, WallPreview};
pub use replay::{ReplayError, ReplayEvent, ReplayReport, replay};
pub use selection::{BoxSelection, SelectionMode, select_elements};
