//! Session scripts: a surface setup plus a list of recorded events.

use crate::{AppError, AppResult};
use inkpad_core::config::CanvasConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    Undo,
    Redo,
    Clear,
    Resize { width: u32, height: u32 },
}

/// Presentation switches for the written frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScriptOptions {
    pub show_handles: bool,
}

/// A replayable session.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub width: u32,
    pub height: u32,
    /// Directory holding shape images, relative to the script file.
    #[serde(default)]
    pub assets: Option<PathBuf>,
    /// Background image name inside `assets`.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub config: CanvasConfig,
    #[serde(default)]
    pub options: ScriptOptions,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Script {
    /// Parse and validate a script.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let script: Self = serde_json::from_str(json)?;
        if script.width == 0 || script.height == 0 {
            return Err(AppError::Script(format!(
                "surface size must be non-zero, got {}x{}",
                script.width, script.height
            )));
        }
        script.config.validate()?;
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_core::config::SnapshotPolicy;

    #[test]
    fn test_parse_events() {
        let script = Script::from_json(
            r#"{
                "width": 360,
                "height": 600,
                "config": {"snapshot_policy": "after_only"},
                "events": [
                    {"type": "down", "x": 1.0, "y": 2.0},
                    {"type": "move", "x": 3.0, "y": 4.0},
                    {"type": "up"},
                    {"type": "undo"},
                    {"type": "resize", "width": 100, "height": 50}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(script.events.len(), 5);
        assert_eq!(script.events[0], Event::Down { x: 1.0, y: 2.0 });
        assert_eq!(script.events[4], Event::Resize { width: 100, height: 50 });
        assert_eq!(script.config.snapshot_policy, SnapshotPolicy::AfterOnly);
        assert!(script.assets.is_none());
        assert!(!script.options.show_handles);
    }

    #[test]
    fn test_rejects_bad_scripts() {
        assert!(matches!(
            Script::from_json(r#"{"width": 0, "height": 10}"#),
            Err(AppError::Script(_))
        ));
        assert!(matches!(
            Script::from_json(r#"{"width": 10, "height": 10, "config": {"history_capacity": 0}}"#),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Script::from_json(r#"{"width": 10, "height": 10, "events": [{"type": "fly"}]}"#),
            Err(AppError::Json(_))
        ));
    }
}
