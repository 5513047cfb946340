//! Frame compositing: background, ink, then shapes.

use crate::images::ImageCache;
use inkpad_core::geometry::{rotation_handle_global, triangle_vertices};
use inkpad_core::history::SnapshotError;
use inkpad_core::raster::RasterError;
use inkpad_core::shapes::{Shape, ShapeKind};
use kurbo::{Affine, Vec2};
use peniko::Color;
use thiserror::Error;
use tiny_skia::{FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform};

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Failed to decode image {src}: {message}")]
    ImageDecode { src: String, message: String },
    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Radius of the drawn rotation handle.
pub const HANDLE_RADIUS: f64 = 7.0;

/// Per-frame presentation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Color the surface is cleared to before the background.
    pub clear_color: Color,
    /// Draw a rotation handle on every shape.
    pub show_handles: bool,
    pub handle_radius: f64,
    pub handle_fill: Color,
    pub handle_stroke: Color,
    /// Fill for triangles without their own color.
    pub triangle_fill: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            clear_color: Color::from_rgba8(0, 0, 0, 0),
            show_handles: false,
            handle_radius: HANDLE_RADIUS,
            handle_fill: Color::from_rgba8(0x11, 0x11, 0x11, 255),
            handle_stroke: Color::from_rgba8(255, 255, 255, 255),
            triangle_fill: Color::from_rgba8(0x33, 0x33, 0x33, 255),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Toggle the rotation-handle overlay.
    pub fn with_handles(mut self, show: bool) -> Self {
        self.show_handles = show;
        self
    }

    pub fn with_triangle_fill(mut self, color: Color) -> Self {
        self.triangle_fill = color;
        self
    }
}

fn to_skia(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn solid_paint(color: Color) -> Paint<'static> {
    let rgba = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
    paint.anti_alias = true;
    paint
}

fn fill_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

/// Paint one frame into `target`.
///
/// Clears, stretches `background` over the whole surface, copies `ink`
/// verbatim, then draws `shapes` first to last. Shapes whose image is not
/// in `images` are skipped.
pub fn render(
    target: &mut Pixmap,
    background: Option<&Pixmap>,
    ink: &Pixmap,
    shapes: &[Shape],
    images: &ImageCache,
    options: &RenderOptions,
) {
    target.fill(fill_color(options.clear_color));

    if let Some(bg) = background {
        let sx = target.width() as f32 / bg.width() as f32;
        let sy = target.height() as f32 / bg.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        target.draw_pixmap(0, 0, bg.as_ref(), &paint, Transform::from_scale(sx, sy), None);
    }

    target.draw_pixmap(
        0,
        0,
        ink.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );

    for shape in shapes {
        match shape.kind {
            ShapeKind::SquareImage => draw_square_image(target, shape, images),
            ShapeKind::Triangle => draw_triangle(target, shape, options),
        }
        if options.show_handles {
            draw_handle(target, shape, options);
        }
    }
}

fn draw_square_image(target: &mut Pixmap, shape: &Shape, images: &ImageCache) {
    let Some(image) = shape.image_ref.as_deref().and_then(|src| images.get(src)) else {
        log::trace!("Skipping shape {} without a loaded image", shape.id);
        return;
    };
    let half = shape.size / 2.0;
    let fit = Affine::translate(Vec2::new(-half, -half))
        * Affine::scale_non_uniform(
            shape.size / image.width() as f64,
            shape.size / image.height() as f64,
        );
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(
        0,
        0,
        image.as_ref(),
        &paint,
        to_skia(shape.transform() * fit),
        None,
    );
}

fn draw_triangle(target: &mut Pixmap, shape: &Shape, options: &RenderOptions) {
    let [a, b, c] = triangle_vertices(shape.size);
    let mut pb = PathBuilder::new();
    pb.move_to(a.x as f32, a.y as f32);
    pb.line_to(b.x as f32, b.y as f32);
    pb.line_to(c.x as f32, c.y as f32);
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };
    let color = shape.fill_color.map(Color::from).unwrap_or(options.triangle_fill);
    target.fill_path(
        &path,
        &solid_paint(color),
        FillRule::Winding,
        to_skia(shape.transform()),
        None,
    );
}

fn draw_handle(target: &mut Pixmap, shape: &Shape, options: &RenderOptions) {
    let center = rotation_handle_global(shape);
    let Some(circle) =
        PathBuilder::from_circle(center.x as f32, center.y as f32, options.handle_radius as f32)
    else {
        return;
    };
    target.fill_path(
        &circle,
        &solid_paint(options.handle_fill),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };
    target.stroke_path(
        &circle,
        &solid_paint(options.handle_stroke),
        &stroke,
        Transform::identity(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::tests::solid_png;
    use inkpad_core::shapes::SerializableColor;
    use kurbo::Point;

    fn rgba(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let p = pixmap.pixel(x, y).unwrap();
        [p.red(), p.green(), p.blue(), p.alpha()]
    }

    #[test]
    fn test_layers_stack_in_order() {
        let mut target = Pixmap::new(100, 100).unwrap();
        let mut background = Pixmap::new(10, 10).unwrap();
        background.fill(tiny_skia::Color::from_rgba8(0, 255, 0, 255));
        let mut ink = Pixmap::new(100, 100).unwrap();
        ink.fill_rect(
            tiny_skia::Rect::from_xywh(0.0, 0.0, 50.0, 100.0).unwrap(),
            &solid_paint(Color::from_rgba8(255, 0, 0, 255)),
            Transform::identity(),
            None,
        );
        let mut images = ImageCache::new();
        images.insert_encoded("blue.png", &solid_png(4, 4, [0, 0, 255, 255])).unwrap();
        let shapes = vec![Shape::square_image(Point::new(25.0, 75.0), 20.0, "blue.png")];

        render(&mut target, Some(&background), &ink, &shapes, &images, &RenderOptions::default());

        // Background stretched to the corner, ink over it, shape on top.
        let [r, g, _, a] = rgba(&target, 95, 5);
        assert!(r == 0 && g > 250 && a > 250);
        assert_eq!(rgba(&target, 10, 10), [255, 0, 0, 255]);
        let [r, _, b, a] = rgba(&target, 25, 75);
        assert!(r < 5 && b > 250 && a > 250);
    }

    #[test]
    fn test_missing_image_skipped() {
        let mut target = Pixmap::new(40, 40).unwrap();
        let ink = Pixmap::new(40, 40).unwrap();
        let shapes = vec![Shape::square_image(Point::new(20.0, 20.0), 20.0, "gone.png")];
        render(&mut target, None, &ink, &shapes, &ImageCache::new(), &RenderOptions::default());
        assert_eq!(rgba(&target, 20, 20), [0, 0, 0, 0]);
    }

    #[test]
    fn test_triangle_filled_and_rotated() {
        let mut target = Pixmap::new(100, 100).unwrap();
        let ink = Pixmap::new(100, 100).unwrap();
        let red = SerializableColor::new(255, 0, 0, 255);
        // Upside down: the apex points at the bottom of the surface.
        let shapes = vec![
            Shape::triangle(Point::new(50.0, 50.0), 60.0, red).with_angle(std::f64::consts::PI),
        ];
        render(&mut target, None, &ink, &shapes, &ImageCache::new(), &RenderOptions::default());
        assert_eq!(rgba(&target, 50, 50), [255, 0, 0, 255]);
        assert_eq!(rgba(&target, 50, 75)[3], 255);
        assert_eq!(rgba(&target, 50, 25)[3], 0);
    }

    #[test]
    fn test_handle_overlay() {
        let mut target = Pixmap::new(100, 100).unwrap();
        let ink = Pixmap::new(100, 100).unwrap();
        let shapes = vec![Shape::square_image(Point::new(50.0, 50.0), 40.0, "none.png")];
        let options = RenderOptions::new().with_handles(true);
        render(&mut target, None, &ink, &shapes, &ImageCache::new(), &options);
        // Handle sits on the top-right corner, (70, 30).
        assert_eq!(rgba(&target, 70, 30), [0x11, 0x11, 0x11, 255]);
    }

    #[test]
    fn test_clear_color_fills_empty_frame() {
        let mut target = Pixmap::new(20, 20).unwrap();
        let ink = Pixmap::new(20, 20).unwrap();
        let options = RenderOptions::new().with_clear_color(Color::from_rgba8(255, 255, 255, 255));
        render(&mut target, None, &ink, &[], &ImageCache::new(), &options);
        assert_eq!(rgba(&target, 0, 0), [255, 255, 255, 255]);
        assert_eq!(rgba(&target, 19, 19), [255, 255, 255, 255]);
    }

    #[test]
    fn test_uncolored_triangle_uses_option_fill() {
        let mut target = Pixmap::new(100, 100).unwrap();
        let ink = Pixmap::new(100, 100).unwrap();
        let mut plain = Shape::triangle(Point::new(30.0, 50.0), 40.0, SerializableColor::black());
        plain.fill_color = None;
        let colored = Shape::triangle(
            Point::new(75.0, 50.0),
            40.0,
            SerializableColor::new(255, 0, 0, 255),
        );
        let options = RenderOptions::new().with_triangle_fill(Color::from_rgba8(0, 0, 255, 255));
        render(&mut target, None, &ink, &[plain, colored], &ImageCache::new(), &options);
        assert_eq!(rgba(&target, 30, 52), [0, 0, 255, 255]);
        assert_eq!(rgba(&target, 75, 52), [255, 0, 0, 255]);
    }
}
