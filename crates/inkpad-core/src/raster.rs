//! The boundary between the canvas and its committed-ink bitmap.
//!
//! The canvas never touches pixels. It drives a [`RasterBuffer`] for drawing
//! and a [`RasterCodec`] to turn the buffer into opaque bytes for history.

use crate::config::{InkResizePolicy, InkStyle};
use kurbo::Point;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Raster errors.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid raster size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Encode error: {0}")]
    Encode(String),
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Encoded raster bytes. Cheap to clone.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedRaster(Arc<[u8]>);

impl EncodedRaster {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for EncodedRaster {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl fmt::Debug for EncodedRaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedRaster({} bytes)", self.0.len())
    }
}

/// An off-screen bitmap that accumulates freehand ink.
pub trait RasterBuffer: Sized {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Start a new open path at `at`.
    fn begin_path(&mut self, at: Point);

    /// Extend the open path to `to` and stroke the new segment.
    ///
    /// Without an open path this starts one at `to`.
    fn line_to(&mut self, to: Point, style: &InkStyle);

    /// Erase all ink and drop any open path.
    fn clear(&mut self);

    /// A buffer of the new size, carrying over ink according to `policy`.
    fn resized(&self, width: u32, height: u32, policy: InkResizePolicy) -> RasterResult<Self>;
}

/// Converts a raster buffer to and from opaque bytes.
pub trait RasterCodec<R> {
    fn encode(&self, raster: &R) -> RasterResult<EncodedRaster>;
    fn decode(&self, encoded: &EncodedRaster) -> RasterResult<R>;
}
