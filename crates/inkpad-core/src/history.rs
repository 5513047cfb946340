//! Snapshot-based undo/redo.

use crate::config::DEFAULT_HISTORY_CAPACITY;
use crate::raster::EncodedRaster;
use crate::shapes::Shape;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

/// Errors reading a snapshot document.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid raster encoding: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// Result type for snapshot documents.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// An immutable capture of the committed ink and the shape list.
///
/// Raster and shapes are only ever stored together so they cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub raster: EncodedRaster,
    pub shapes: Vec<Shape>,
    /// Surface size at capture time.
    pub surface_size: Size,
}

/// On-disk form of a snapshot.
#[derive(Serialize)]
struct SnapshotDocument<'a> {
    width: f64,
    height: f64,
    raster: String,
    shapes: &'a [Shape],
}

#[derive(Deserialize)]
struct RawSnapshotDocument {
    width: Option<f64>,
    height: Option<f64>,
    raster: Option<String>,
    #[serde(default)]
    shapes: serde_json::Value,
}

impl Snapshot {
    pub fn new(raster: EncodedRaster, shapes: Vec<Shape>, surface_size: Size) -> Self {
        Self {
            raster,
            shapes,
            surface_size,
        }
    }

    /// Serialize as `{ width, height, raster: base64, shapes: [...] }`.
    pub fn to_json(&self) -> SnapshotResult<String> {
        let doc = SnapshotDocument {
            width: self.surface_size.width,
            height: self.surface_size.height,
            raster: BASE64.encode(self.raster.as_bytes()),
            shapes: &self.shapes,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Parse a snapshot document.
    ///
    /// A missing or malformed shape list is read as empty.
    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        let raw: RawSnapshotDocument = serde_json::from_str(json)?;
        let width = raw.width.ok_or(SnapshotError::MissingField("width"))?;
        let height = raw.height.ok_or(SnapshotError::MissingField("height"))?;
        let raster = raw.raster.ok_or(SnapshotError::MissingField("raster"))?;
        let raster = EncodedRaster::from(BASE64.decode(raster.as_bytes())?);

        let shapes = if raw.shapes.is_null() {
            log::warn!("Snapshot has no shape list, using empty list");
            Vec::new()
        } else {
            match serde_json::from_value::<Vec<Shape>>(raw.shapes) {
                Ok(shapes) => shapes,
                Err(e) => {
                    log::warn!("Malformed shape list in snapshot, using empty list: {e}");
                    Vec::new()
                }
            }
        };

        Ok(Self::new(raster, shapes, Size::new(width, height)))
    }
}

/// Linear undo/redo over shared snapshots.
///
/// Once initialized the undo stack always holds at least one entry, the
/// state currently on screen. Undo moves that entry to the redo stack and
/// hands back the one beneath it.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Arc<Snapshot>>,
    redo_stack: Vec<Arc<Snapshot>>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// Create an empty history keeping at most `capacity` undo entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Reset to a single entry.
    pub fn init(&mut self, snapshot: Snapshot) {
        self.undo_stack.clear();
        self.undo_stack.push_back(Arc::new(snapshot));
        self.redo_stack.clear();
    }

    /// Record a new state. Clears redo; evicts the oldest entry past capacity.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.push_undo(Arc::new(snapshot));
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, snapshot: Arc<Snapshot>) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Step back. Returns the snapshot to restore, or `None` if only the
    /// initial entry remains.
    pub fn undo(&mut self) -> Option<Arc<Snapshot>> {
        if !self.can_undo() {
            return None;
        }
        let top = self.undo_stack.pop_back()?;
        self.redo_stack.push(top);
        self.undo_stack.back().cloned()
    }

    /// Step forward. Returns the snapshot to restore, or `None` if nothing was undone.
    pub fn redo(&mut self) -> Option<Arc<Snapshot>> {
        let snapshot = self.redo_stack.pop()?;
        self.push_undo(Arc::clone(&snapshot));
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The entry matching what is on screen.
    pub fn current(&self) -> Option<&Arc<Snapshot>> {
        self.undo_stack.back()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &Arc<Snapshot>> {
        self.undo_stack.iter()
    }
}
