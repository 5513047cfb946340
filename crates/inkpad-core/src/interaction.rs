//! Pointer-driven gesture state machine.

use crate::canvas::Canvas;
use crate::config::SnapshotPolicy;
use crate::geometry::{Hit, HitKind, hit_test, pointer_angle};
use crate::raster::RasterBuffer;
use kurbo::{Point, Vec2};

/// The gesture in progress, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Freehand ink is being laid down.
    Drawing,
    /// A shape follows the pointer, keeping the grab offset.
    Dragging { index: usize, offset: Vec2 },
    /// A shape turns by the pointer's angular travel around its center.
    Rotating {
        index: usize,
        start_angle: f64,
        start_pointer_angle: f64,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }
}

/// Placement of the surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Client point to surface-local point.
    pub fn to_surface(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }
}

impl<R: RasterBuffer> Canvas<R> {
    /// Start a gesture at `point` (surface coordinates).
    ///
    /// A gesture left open by a lost pointer-up is finished first.
    pub fn pointer_down(&mut self, point: Point) {
        if !self.gesture.is_idle() {
            log::debug!("Pointer down during {:?}, finishing it", self.gesture);
            self.pointer_up();
        }

        let snapshot_before = self.config.snapshot_policy == SnapshotPolicy::BeforeAndAfter;
        match hit_test(&self.shapes, point, self.config.handle_hit_radius) {
            Some(Hit {
                kind: HitKind::Rotate,
                index,
            }) => {
                if snapshot_before {
                    self.save_snapshot();
                }
                let shape = &self.shapes[index];
                self.gesture = GestureState::Rotating {
                    index,
                    start_angle: shape.angle,
                    start_pointer_angle: pointer_angle(point, shape.position),
                };
            }
            Some(Hit {
                kind: HitKind::Body,
                index,
            }) => {
                if snapshot_before {
                    self.save_snapshot();
                }
                self.gesture = GestureState::Dragging {
                    index,
                    offset: point - self.shapes[index].position,
                };
            }
            None => {
                self.save_snapshot();
                self.raster.begin_path(point);
                self.gesture = GestureState::Drawing;
            }
        }
        log::debug!("Gesture started: {:?}", self.gesture);
    }

    /// Advance the active gesture. Ignored while idle.
    pub fn pointer_move(&mut self, point: Point) {
        match self.gesture {
            GestureState::Idle => {}
            GestureState::Drawing => {
                self.raster.line_to(point, &self.config.ink);
                self.request_redraw();
            }
            GestureState::Dragging { index, offset } => {
                if let Some(shape) = self.shapes.get(index) {
                    self.shapes[index] = shape.moved_to(point - offset);
                    self.request_redraw();
                }
            }
            GestureState::Rotating {
                index,
                start_angle,
                start_pointer_angle,
            } => {
                if let Some(shape) = self.shapes.get(index) {
                    let delta = pointer_angle(point, shape.position) - start_pointer_angle;
                    self.shapes[index] = shape.rotated_to(start_angle + delta);
                    self.request_redraw();
                }
            }
        }
    }

    /// Finish the active gesture and record the result.
    pub fn pointer_up(&mut self) {
        if self.gesture.is_idle() {
            return;
        }
        log::debug!("Gesture finished: {:?}", self.gesture);
        self.gesture = GestureState::Idle;
        self.save_snapshot();
        self.request_redraw();
    }

    /// Leaving the surface ends the gesture like a pointer-up.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }
}
