//! Engine configuration.
//!
//! Every value has a default matching the editor's built-in behavior, so an
//! empty JSON object (or no file at all) yields the stock engine.

use crate::node::NodeClass;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default rounding radius for polygon clip paths.
pub const DEFAULT_POLYGON_RADIUS: f64 = 10.0;

/// Default lower bound for the visible part of a dragged node.
pub const DEFAULT_MIN_VISIBLE_FLOOR: f64 = 50.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Minimum-visibility rule used by drag and resize constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    /// Absolute floor in pixels for the visible portion.
    pub min_visible_floor: f64,
    /// Fraction of the node dimension that must stay visible.
    pub min_visible_ratio: f64,
    /// Node classes that may never be partially outside their parent.
    pub fully_visible_classes: Vec<NodeClass>,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            min_visible_floor: DEFAULT_MIN_VISIBLE_FLOOR,
            min_visible_ratio: 0.5,
            fully_visible_classes: vec![NodeClass::Text],
        }
    }
}

impl ConstraintConfig {
    /// Whether nodes of this class must stay entirely inside their parent.
    pub fn requires_full_visibility(&self, class: NodeClass) -> bool {
        self.fully_visible_classes.contains(&class)
    }
}

/// Clip path generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    /// Radius used for polygon clips when none is given.
    pub polygon_radius: f64,
    /// Accuracy used when arcs are flattened into cubic segments.
    pub curve_tolerance: f64,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            polygon_radius: DEFAULT_POLYGON_RADIUS,
            curve_tolerance: 0.1,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub constraints: ConstraintConfig,
    pub clip: ClipConfig,
}

impl EngineConfig {
    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!("Loaded engine config: {:?}", config);
        Ok(config)
    }

    /// Load a configuration file from disk.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        log::debug!("Reading engine config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Write the configuration to disk as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::debug!("Saved engine config to {}", path.display());
        Ok(())
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        let c = &self.constraints;
        if c.min_visible_floor.is_nan() || c.min_visible_floor < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_visible_floor must be >= 0, got {}",
                c.min_visible_floor
            )));
        }
        if !(0.0..=1.0).contains(&c.min_visible_ratio) {
            return Err(ConfigError::Invalid(format!(
                "min_visible_ratio must be within [0, 1], got {}",
                c.min_visible_ratio
            )));
        }
        if self.clip.curve_tolerance.is_nan() || self.clip.curve_tolerance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "curve_tolerance must be > 0, got {}",
                self.clip.curve_tolerance
            )));
        }
        if self.clip.polygon_radius.is_nan() || self.clip.polygon_radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "polygon_radius must be >= 0, got {}",
                self.clip.polygon_radius
            )));
        }
        Ok(())
    }
}
