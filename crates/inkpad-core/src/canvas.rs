//! Canvas state: shapes, committed ink, history and the active gesture.

use crate::config::CanvasConfig;
use crate::history::{History, Snapshot};
use crate::interaction::GestureState;
use crate::layout::InitialLayout;
use crate::raster::{EncodedRaster, RasterBuffer, RasterCodec, RasterError, RasterResult};
use crate::shapes::Shape;
use kurbo::{Size, Vec2};
use std::sync::Arc;

/// A restore that has left the history stacks but not yet reached the screen.
///
/// Produced by [`Canvas::undo_deferred`] and [`Canvas::redo_deferred`]. Only
/// the most recently issued restore can be completed.
#[derive(Debug, Clone)]
pub struct PendingRestore {
    generation: u64,
    snapshot: Arc<Snapshot>,
}

impl PendingRestore {
    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// Raster bytes that need decoding before the restore can complete.
    pub fn encoded_raster(&self) -> &EncodedRaster {
        &self.snapshot.raster
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Whole-number raster dimensions for a surface size.
pub fn raster_dims(size: Size) -> (u32, u32) {
    (
        size.width.round().max(1.0) as u32,
        size.height.round().max(1.0) as u32,
    )
}

/// Factors mapping shapes laid out at `from` onto `to`: per-axis for
/// centers, shorter-side ratio for sizes.
fn rescale_factors(from: Size, to: Size) -> (Vec2, f64) {
    let scale = Vec2::new(to.width / from.width, to.height / from.height);
    let size_scale = to.width.min(to.height) / from.width.min(from.height);
    (scale, size_scale)
}

fn rescale_shapes(shapes: &[Shape], from: Size, to: Size) -> Vec<Shape> {
    if from == to || from.width <= 0.0 || from.height <= 0.0 {
        return shapes.to_vec();
    }
    let (scale, size_scale) = rescale_factors(from, to);
    shapes.iter().map(|s| s.rescaled(scale, size_scale)).collect()
}

/// The drawing surface's model.
///
/// All mutation goes through `&mut self` on one thread; rendering reads
/// [`Canvas::shapes`] and [`Canvas::raster`] after
/// [`Canvas::take_redraw_request`] reports a change.
pub struct Canvas<R: RasterBuffer> {
    pub(crate) shapes: Vec<Shape>,
    layout: InitialLayout,
    pub(crate) raster: R,
    codec: Box<dyn RasterCodec<R>>,
    history: History,
    pub(crate) gesture: GestureState,
    pub(crate) config: CanvasConfig,
    size: Size,
    restore_generation: u64,
    redraw_requested: bool,
}

impl<R: RasterBuffer> Canvas<R> {
    /// Create a canvas sized to `raster`, laid out from `layout`, with the
    /// initial state as the only history entry.
    pub fn new(
        raster: R,
        codec: Box<dyn RasterCodec<R>>,
        layout: InitialLayout,
        config: CanvasConfig,
    ) -> Self {
        let size = Size::new(raster.width() as f64, raster.height() as f64);
        let mut canvas = Self {
            shapes: layout.materialize(size),
            layout,
            raster,
            codec,
            history: History::new(config.history_capacity),
            gesture: GestureState::Idle,
            config,
            size,
            restore_generation: 0,
            redraw_requested: true,
        };
        canvas.init();
        canvas
    }

    /// Make the current state the sole history entry.
    pub fn init(&mut self) {
        let snapshot = self.capture().unwrap_or_else(|e| {
            log::warn!("Failed to encode initial raster: {e}");
            Snapshot::new(EncodedRaster::from(Vec::new()), self.shapes.clone(), self.size)
        });
        self.history.init(snapshot);
        self.restore_generation += 1;
    }

    fn capture(&self) -> RasterResult<Snapshot> {
        let raster = self.codec.encode(&self.raster)?;
        Ok(Snapshot::new(raster, self.shapes.clone(), self.size))
    }

    /// Push the current raster and shape list onto the undo stack.
    ///
    /// A successful push supersedes any restore still in flight, since the
    /// new top of history is what is on screen. Returns `false` if the
    /// raster could not be encoded; history is left untouched in that case.
    pub fn save_snapshot(&mut self) -> bool {
        match self.capture() {
            Ok(snapshot) => {
                self.history.push(snapshot);
                self.restore_generation += 1;
                log::debug!(
                    "Saved snapshot ({} undo, {} redo)",
                    self.history.undo_len(),
                    self.history.redo_len()
                );
                true
            }
            Err(e) => {
                log::warn!("Skipping snapshot, raster encode failed: {e}");
                false
            }
        }
    }

    /// Undo and restore immediately. No-op while a gesture is active.
    pub fn undo(&mut self) -> bool {
        match self.undo_deferred() {
            Some(pending) => self.finish_now(pending),
            None => false,
        }
    }

    /// Redo and restore immediately. No-op while a gesture is active.
    pub fn redo(&mut self) -> bool {
        match self.redo_deferred() {
            Some(pending) => self.finish_now(pending),
            None => false,
        }
    }

    fn finish_now(&mut self, pending: PendingRestore) -> bool {
        let decoded = self.decode(&pending);
        self.complete_restore(pending, decoded)
    }

    /// Move history back one step and return the restore to complete once
    /// the raster is decoded.
    pub fn undo_deferred(&mut self) -> Option<PendingRestore> {
        if !self.gesture.is_idle() {
            log::debug!("Ignoring undo during {:?}", self.gesture);
            return None;
        }
        let snapshot = self.history.undo()?;
        Some(self.issue_restore(snapshot))
    }

    /// Move history forward one step and return the restore to complete
    /// once the raster is decoded.
    pub fn redo_deferred(&mut self) -> Option<PendingRestore> {
        if !self.gesture.is_idle() {
            log::debug!("Ignoring redo during {:?}", self.gesture);
            return None;
        }
        let snapshot = self.history.redo()?;
        Some(self.issue_restore(snapshot))
    }

    fn issue_restore(&mut self, snapshot: Arc<Snapshot>) -> PendingRestore {
        self.restore_generation += 1;
        PendingRestore {
            generation: self.restore_generation,
            snapshot,
        }
    }

    /// Decode a pending restore's raster with this canvas's codec.
    pub fn decode(&self, pending: &PendingRestore) -> RasterResult<R> {
        self.codec.decode(pending.encoded_raster())
    }

    /// Apply a restore's raster and shapes together.
    ///
    /// Restores superseded by a later undo, redo or snapshot are
    /// dropped and `false` is returned. If decoding failed the shapes are
    /// still restored over a blank raster.
    pub fn complete_restore(&mut self, pending: PendingRestore, decoded: RasterResult<R>) -> bool {
        if pending.generation != self.restore_generation {
            log::debug!(
                "Dropping stale restore {} (latest {})",
                pending.generation,
                self.restore_generation
            );
            return false;
        }
        if !self.gesture.is_idle() {
            log::debug!("Restore landed during {:?}, cancelling gesture", self.gesture);
            self.gesture = GestureState::Idle;
        }
        self.apply(&pending.snapshot, decoded);
        true
    }

    fn apply(&mut self, snapshot: &Snapshot, decoded: RasterResult<R>) {
        let (width, height) = raster_dims(self.size);
        match decoded {
            Ok(raster) if raster.width() == width && raster.height() == height => {
                self.raster = raster;
            }
            Ok(raster) => match raster.resized(width, height, self.config.ink_resize) {
                Ok(raster) => self.raster = raster,
                Err(e) => {
                    log::warn!("Could not fit restored raster to surface: {e}");
                    self.raster.clear();
                }
            },
            Err(e) => {
                log::warn!("Restored raster failed to decode, clearing ink: {e}");
                self.raster.clear();
            }
        }
        self.shapes = rescale_shapes(&snapshot.shapes, snapshot.surface_size, self.size);
        self.request_redraw();
    }

    /// Clear ink and reset shapes to the initial layout as one undoable step.
    ///
    /// Only allowed while idle.
    pub fn clear_all(&mut self) -> bool {
        if !self.gesture.is_idle() {
            log::debug!("Ignoring clear during {:?}", self.gesture);
            return false;
        }
        self.save_snapshot();
        self.raster.clear();
        self.shapes = self.layout.materialize(self.size);
        self.save_snapshot();
        self.request_redraw();
        log::debug!("Cleared canvas");
        true
    }

    /// Change the surface size, rescaling shapes and ink.
    ///
    /// Sizes that are not positive and finite on both axes are rejected and
    /// leave the canvas untouched.
    pub fn resize(&mut self, size: Size) -> RasterResult<()> {
        if !(size.is_finite() && size.width > 0.0 && size.height > 0.0) {
            return Err(RasterError::InvalidSize {
                width: size.width.max(0.0) as u32,
                height: size.height.max(0.0) as u32,
            });
        }
        if size == self.size {
            return Ok(());
        }
        let (width, height) = raster_dims(size);
        self.raster = self.raster.resized(width, height, self.config.ink_resize)?;
        self.shapes = rescale_shapes(&self.shapes, self.size, size);
        log::debug!("Resized surface {:?} -> {:?}", self.size, size);
        self.size = size;
        self.request_redraw();
        Ok(())
    }

    /// Capture the on-screen state without touching history.
    pub fn export_snapshot(&self) -> RasterResult<Snapshot> {
        self.capture()
    }

    /// Replace the on-screen state with `snapshot` and record it as a new
    /// history entry. Only allowed while idle.
    pub fn import_snapshot(&mut self, snapshot: Snapshot) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        let decoded = self.codec.decode(&snapshot.raster);
        self.restore_generation += 1;
        self.apply(&snapshot, decoded);
        self.save_snapshot();
        true
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn raster(&self) -> &R {
        &self.raster
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn layout(&self) -> &InitialLayout {
        &self.layout
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub(crate) fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Whether anything visible changed since the last call.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}
