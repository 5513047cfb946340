//! Pixmap-backed ink buffer and its PNG snapshot codec.

use inkpad_core::config::{InkResizePolicy, InkStyle};
use inkpad_core::raster::{EncodedRaster, RasterBuffer, RasterCodec, RasterError, RasterResult};
use kurbo::Point;
use tiny_skia::{
    FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

/// Committed freehand ink on a transparent pixmap.
#[derive(Debug, Clone)]
pub struct PixmapRaster {
    pixmap: Pixmap,
    pen: Option<Point>,
}

impl PixmapRaster {
    /// A blank buffer. Fails for zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self { pixmap, pen: None })
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap, pen: None }
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Whether no pixel carries any ink.
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }
}

impl RasterBuffer for PixmapRaster {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn begin_path(&mut self, at: Point) {
        self.pen = Some(at);
    }

    fn line_to(&mut self, to: Point, style: &InkStyle) {
        let from = self.pen.replace(to).unwrap_or(to);

        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(style.color.r, style.color.g, style.color.b, style.color.a);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: style.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.pen = None;
    }

    fn resized(&self, width: u32, height: u32, policy: InkResizePolicy) -> RasterResult<Self> {
        let mut out = Self::new(width, height)?;
        if policy == InkResizePolicy::Rescale {
            let sx = width as f32 / self.pixmap.width() as f32;
            let sy = height as f32 / self.pixmap.height() as f32;
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            out.pixmap.draw_pixmap(
                0,
                0,
                self.pixmap.as_ref(),
                &paint,
                Transform::from_scale(sx, sy),
                None,
            );
        }
        Ok(out)
    }
}

/// Stores ink snapshots as PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngCodec;

impl RasterCodec<PixmapRaster> for PngCodec {
    fn encode(&self, raster: &PixmapRaster) -> RasterResult<EncodedRaster> {
        raster
            .pixmap
            .encode_png()
            .map(EncodedRaster::from)
            .map_err(|e| RasterError::Encode(e.to_string()))
    }

    fn decode(&self, encoded: &EncodedRaster) -> RasterResult<PixmapRaster> {
        Pixmap::decode_png(encoded.as_bytes())
            .map(PixmapRaster::from_pixmap)
            .map_err(|e| RasterError::Decode(e.to_string()))
    }
}
