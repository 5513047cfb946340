//! The drawing surface as a host sees it: pointer input in, pixels out.

use crate::images::{ImageCache, ImageSource, decode_image};
use crate::ink::{PixmapRaster, PngCodec};
use crate::renderer::{RenderError, RenderOptions, RenderResult, render};
use inkpad_core::canvas::{Canvas, raster_dims};
use inkpad_core::config::CanvasConfig;
use inkpad_core::history::Snapshot;
use inkpad_core::interaction::SurfaceRect;
use inkpad_core::layout::InitialLayout;
use kurbo::{Point, Size};
use tiny_skia::Pixmap;

/// A canvas with its images, background and rendered frame.
pub struct Sketchpad {
    canvas: Canvas<PixmapRaster>,
    output: Pixmap,
    images: ImageCache,
    background: Option<Pixmap>,
    options: RenderOptions,
    rect: SurfaceRect,
    dirty: bool,
}

fn new_output(size: Size) -> RenderResult<Pixmap> {
    let (width, height) = raster_dims(size);
    Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })
}

impl Sketchpad {
    /// A surface of `width` x `height` with the preset shapes.
    pub fn new(width: u32, height: u32, config: CanvasConfig) -> RenderResult<Self> {
        Self::with_layout(width, height, InitialLayout::preset(), config)
    }

    pub fn with_layout(
        width: u32,
        height: u32,
        layout: InitialLayout,
        config: CanvasConfig,
    ) -> RenderResult<Self> {
        let raster = PixmapRaster::new(width, height)?;
        let canvas = Canvas::new(raster, Box::new(PngCodec), layout, config);
        let output = new_output(canvas.size())?;
        log::info!("Created {width}x{height} sketchpad");
        Ok(Self {
            canvas,
            output,
            images: ImageCache::new(),
            background: None,
            options: RenderOptions::default(),
            rect: SurfaceRect::default(),
            dirty: true,
        })
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self.dirty = true;
        self
    }

    /// Where the surface sits in client coordinates.
    pub fn set_surface_rect(&mut self, rect: SurfaceRect) {
        self.rect = rect;
    }

    /// Map a client-space point into the surface.
    pub fn surface_point(&self, client: Point) -> Point {
        self.rect.to_surface(client)
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.canvas.pointer_down(point);
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.canvas.pointer_move(point);
    }

    pub fn pointer_up(&mut self) {
        self.canvas.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.canvas.pointer_leave();
    }

    pub fn undo(&mut self) -> bool {
        self.canvas.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.canvas.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.canvas.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.canvas.can_redo()
    }

    pub fn clear_all(&mut self) -> bool {
        self.canvas.clear_all()
    }

    /// Resize the surface, rescaling shapes and ink. Zero sizes are rejected.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        let size = Size::new(width as f64, height as f64);
        let output = new_output(size)?;
        self.canvas.resize(size)?;
        self.output = output;
        self.dirty = true;
        Ok(())
    }

    /// Decode and register an image for shapes referencing `src`.
    pub fn insert_image(&mut self, src: &str, bytes: &[u8]) -> RenderResult<()> {
        self.images.insert_encoded(src, bytes)?;
        self.dirty = true;
        Ok(())
    }

    /// Decode and set the background, stretched over the whole surface.
    pub fn set_background_image(&mut self, bytes: &[u8]) -> RenderResult<()> {
        self.background = Some(decode_image("background", bytes)?);
        self.dirty = true;
        Ok(())
    }

    /// Fetch every image the layout and current shapes reference that is not
    /// cached yet. Returns how many were loaded.
    ///
    /// Unavailable or undecodable images are logged and left out.
    pub async fn load_images(&mut self, source: &dyn ImageSource) -> usize {
        let mut wanted: Vec<String> = self
            .canvas
            .layout()
            .image_refs()
            .into_iter()
            .map(str::to_string)
            .collect();
        for shape in self.canvas.shapes() {
            if let Some(src) = &shape.image_ref {
                if !wanted.contains(src) {
                    wanted.push(src.clone());
                }
            }
        }

        let mut loaded = 0;
        for src in wanted {
            if self.images.contains(&src) {
                continue;
            }
            let Some(bytes) = source.load(&src).await else {
                continue;
            };
            match self.insert_image(&src, &bytes) {
                Ok(()) => loaded += 1,
                Err(e) => log::warn!("{e}"),
            }
        }
        loaded
    }

    /// Fetch and set the background. Returns whether it was set.
    pub async fn load_background(&mut self, source: &dyn ImageSource, src: &str) -> bool {
        let Some(bytes) = source.load(src).await else {
            return false;
        };
        match self.set_background_image(&bytes) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    /// The current frame, re-rendered if anything changed since the last call.
    pub fn current_render_output(&mut self) -> &Pixmap {
        if self.canvas.take_redraw_request() || self.dirty {
            render(
                &mut self.output,
                self.background.as_ref(),
                self.canvas.raster().pixmap(),
                self.canvas.shapes(),
                &self.images,
                &self.options,
            );
            self.dirty = false;
        }
        &self.output
    }

    /// The on-screen state as a snapshot document.
    pub fn export_snapshot_json(&self) -> RenderResult<String> {
        Ok(self.canvas.export_snapshot()?.to_json()?)
    }

    /// Load a snapshot document as a new undoable state.
    pub fn import_snapshot_json(&mut self, json: &str) -> RenderResult<bool> {
        let snapshot = Snapshot::from_json(json)?;
        Ok(self.canvas.import_snapshot(snapshot))
    }

    pub fn canvas(&self) -> &Canvas<PixmapRaster> {
        &self.canvas
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }
}
