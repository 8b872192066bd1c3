//! Editor configuration module
//!
//! Snapping and wall-drawing preferences, persisted as RON.

mod manager;

pub use manager::{ConfigError, ConfigManager, SharedConfig, create_shared_config};

pub use fp_core::SnapConfig;
use fp_core::WallSegment;
use serde::{Deserialize, Serialize};

/// Wall drawing preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DrawingConfig {
    /// Thickness of newly drawn walls
    pub default_thickness: f64,
    /// Smallest thickness the user can pick
    pub min_thickness: f64,
    /// Largest thickness the user can pick
    pub max_thickness: f64,
    /// Start every drawing session in continuous mode
    pub continuous_by_default: bool,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_thickness: WallSegment::DEFAULT_THICKNESS,
            min_thickness: 1.0,
            max_thickness: 500.0,
            continuous_by_default: false,
        }
    }
}

impl DrawingConfig {
    /// Clamp a requested thickness into the allowed range.
    ///
    /// Non-finite requests fall back to the default thickness.
    pub fn clamp_thickness(&self, thickness: f64) -> f64 {
        let (min, max) = if self.min_thickness <= self.max_thickness {
            (self.min_thickness, self.max_thickness)
        } else {
            (self.max_thickness, self.min_thickness)
        };
        if thickness.is_finite() {
            thickness.clamp(min, max)
        } else {
            self.default_thickness.clamp(min, max)
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    /// Snapping settings
    #[serde(default)]
    pub snap: SnapConfig,
    /// Wall drawing settings
    #[serde(default)]
    pub drawing: DrawingConfig,
}

impl AppConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }
}
