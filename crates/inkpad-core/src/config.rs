//! Tunables for the drawing surface.

use crate::geometry::DEFAULT_HANDLE_HIT_RADIUS;
use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of snapshots kept on the undo stack.
pub const DEFAULT_HISTORY_CAPACITY: usize = 80;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("History capacity must be at least 1")]
    ZeroCapacity,
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Stroke style for freehand ink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkStyle {
    pub color: SerializableColor,
    pub width: f64,
}

impl Default for InkStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 2.0,
        }
    }
}

/// When drag and rotate gestures record history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPolicy {
    /// One snapshot when the gesture starts and one when it ends.
    #[default]
    BeforeAndAfter,
    /// Only the end state is recorded.
    AfterOnly,
}

/// What happens to committed ink when the surface changes size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InkResizePolicy {
    /// Scale the existing ink into the new buffer.
    #[default]
    Rescale,
    /// Start over with a blank buffer.
    Discard,
}

/// Canvas configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub ink: InkStyle,
    pub history_capacity: usize,
    pub handle_hit_radius: f64,
    pub snapshot_policy: SnapshotPolicy,
    pub ink_resize: InkResizePolicy,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            ink: InkStyle::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            handle_hit_radius: DEFAULT_HANDLE_HIT_RADIUS,
            snapshot_policy: SnapshotPolicy::default(),
            ink_resize: InkResizePolicy::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(self.handle_hit_radius > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "handle_hit_radius",
                value: self.handle_hit_radius,
            });
        }
        if !(self.ink.width > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "ink.width",
                value: self.ink.width,
            });
        }
        Ok(())
    }
}
