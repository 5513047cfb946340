//! Inkpad Application
//!
//! Headless driver for the drawing surface: replays a recorded session
//! script and writes the resulting frame.

mod script;
mod session;

pub use script::{Event, Script, ScriptOptions};
pub use session::{Args, Summary, USAGE, apply_event, replay, run};

use inkpad_core::config::ConfigError;
use inkpad_render::RenderError;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid script JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid script: {0}")]
    Script(String),
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("PNG encode failed: {0}")]
    Encode(String),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
