//! Inkpad Core Library
//!
//! Platform-agnostic shapes, geometry, undo history and gesture handling for
//! the Inkpad drawing surface. Pixels live behind the [`raster`] traits.

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod layout;
pub mod raster;
pub mod shapes;

pub use canvas::{Canvas, PendingRestore, raster_dims};
pub use config::{CanvasConfig, ConfigError, InkResizePolicy, InkStyle, SnapshotPolicy};
pub use geometry::{Hit, HitKind, hit_test};
pub use history::{History, Snapshot, SnapshotError};
pub use interaction::{GestureState, SurfaceRect};
pub use layout::{InitialLayout, LayoutEntry};
pub use raster::{EncodedRaster, RasterBuffer, RasterCodec, RasterError, RasterResult};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeKind};
