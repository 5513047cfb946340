//! Coordinate transforms and hit testing for rotated shapes.

use crate::shapes::{Shape, ShapeKind};
use kurbo::{Point, Vec2};

/// Distance the triangle rotation handle sits beyond the apex.
pub const TRIANGLE_HANDLE_OFFSET: f64 = 26.0;

/// Default pick radius around a rotation handle.
pub const DEFAULT_HANDLE_HIT_RADIUS: f64 = 8.0;

/// Denominators smaller than this mark a degenerate triangle.
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Which part of a shape a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// The rotation handle.
    Rotate,
    /// The shape body.
    Body,
}

/// Result of a successful hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub kind: HitKind,
    /// Index into the shape list.
    pub index: usize,
}

/// Rotate a vector about the origin.
fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Express a surface point in the shape's local frame (center at origin, unrotated).
pub fn to_local(point: Point, shape: &Shape) -> Point {
    rotate(point - shape.position, -shape.angle).to_point()
}

/// Inverse of [`to_local`].
pub fn to_global(local: Point, shape: &Shape) -> Point {
    shape.position + rotate(local.to_vec2(), shape.angle)
}

/// Inclusive bounds test against a square of edge `size` centered at the origin.
pub fn point_in_square(local: Point, size: f64) -> bool {
    let half = size / 2.0;
    local.x.abs() <= half && local.y.abs() <= half
}

/// Vertices of the apex-up equilateral triangle with its centroid at the origin.
///
/// Order is apex, bottom-right, bottom-left.
pub fn triangle_vertices(size: f64) -> [Point; 3] {
    let height = size * 3f64.sqrt() / 2.0;
    [
        Point::new(0.0, -2.0 * height / 3.0),
        Point::new(size / 2.0, height / 3.0),
        Point::new(-size / 2.0, height / 3.0),
    ]
}

/// Barycentric point-in-triangle test. Degenerate triangles contain nothing.
pub fn point_in_triangle(p: Point, [a, b, c]: [Point; 3]) -> bool {
    let denom = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if denom.abs() < DEGENERATE_EPSILON {
        return false;
    }
    let u = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / denom;
    let v = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / denom;
    let w = 1.0 - u - v;
    u >= 0.0 && v >= 0.0 && w >= 0.0
}

/// Whether a local-frame point falls on the body of a shape of the given kind.
pub fn point_in_body(local: Point, size: f64, kind: ShapeKind) -> bool {
    match kind {
        ShapeKind::SquareImage => point_in_square(local, size),
        ShapeKind::Triangle => point_in_triangle(local, triangle_vertices(size)),
    }
}

/// Rotation handle position in the shape's local frame.
pub fn rotation_handle_local(shape: &Shape) -> Point {
    match shape.kind {
        ShapeKind::Triangle => {
            let apex = triangle_vertices(shape.size)[0];
            Point::new(apex.x, apex.y - TRIANGLE_HANDLE_OFFSET)
        }
        ShapeKind::SquareImage => {
            let half = shape.size / 2.0;
            Point::new(half, -half)
        }
    }
}

/// Rotation handle position in surface coordinates.
pub fn rotation_handle_global(shape: &Shape) -> Point {
    to_global(rotation_handle_local(shape), shape)
}

/// Angle of `point` around `center`, as `atan2(dy, dx)`.
pub fn pointer_angle(point: Point, center: Point) -> f64 {
    let d = point - center;
    d.y.atan2(d.x)
}

/// Find the topmost shape part under `point`.
///
/// Shapes are tested from last to first. For each shape the rotation handle
/// wins over the body.
pub fn hit_test(shapes: &[Shape], point: Point, handle_radius: f64) -> Option<Hit> {
    for (index, shape) in shapes.iter().enumerate().rev() {
        let handle = rotation_handle_global(shape);
        let dx = point.x - handle.x;
        let dy = point.y - handle.y;
        if dx * dx + dy * dy <= handle_radius * handle_radius {
            return Some(Hit {
                kind: HitKind::Rotate,
                index,
            });
        }

        if point_in_body(to_local(point, shape), shape.size, shape.kind) {
            return Some(Hit {
                kind: HitKind::Body,
                index,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SerializableColor;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn square(x: f64, y: f64, size: f64, angle: f64) -> Shape {
        Shape::square_image(Point::new(x, y), size, "img.png").with_angle(angle)
    }

    #[test]
    fn test_center_maps_to_origin_at_any_angle() {
        for i in 0..16 {
            let angle = i as f64 * 0.7 - 3.0;
            let shape = square(123.5, -42.0, 30.0, angle);
            let local = to_local(shape.position, &shape);
            assert!(local.x.abs() < EPS && local.y.abs() < EPS);
        }
    }

    #[test]
    fn test_local_global_inverse() {
        let shape = square(50.0, 80.0, 20.0, 1.1);
        let p = Point::new(61.0, 72.5);
        let back = to_global(to_local(p, &shape), &shape);
        assert!((back.x - p.x).abs() < EPS && (back.y - p.y).abs() < EPS);
    }

    #[test]
    fn test_to_local_unrotates() {
        // Quarter turn clockwise: the point below the center lies on the local +x axis.
        let shape = square(0.0, 0.0, 10.0, FRAC_PI_2);
        let local = to_local(Point::new(0.0, 5.0), &shape);
        assert!((local.x - 5.0).abs() < EPS);
        assert!(local.y.abs() < EPS);
    }

    #[test]
    fn test_square_bounds_inclusive() {
        assert!(point_in_square(Point::new(5.0, -5.0), 10.0));
        assert!(!point_in_square(Point::new(5.01, 0.0), 10.0));
    }

    #[test]
    fn test_triangle_body() {
        let verts = triangle_vertices(60.0);
        assert!(point_in_triangle(Point::ZERO, verts));
        assert!(point_in_triangle(verts[0], verts));
        // Above the apex and outside a base corner.
        assert!(!point_in_triangle(Point::new(0.0, verts[0].y - 1.0), verts));
        assert!(!point_in_triangle(Point::new(29.0, -10.0), verts));
        assert!(point_in_body(Point::new(0.0, 5.0), 60.0, ShapeKind::Triangle));
    }

    #[test]
    fn test_degenerate_triangle_contains_nothing() {
        let flat = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        assert!(!point_in_triangle(Point::new(1.0, 0.0), flat));
        assert!(!point_in_body(Point::ZERO, 0.0, ShapeKind::Triangle));
    }

    #[test]
    fn test_square_handle_is_top_right_corner() {
        let shape = square(100.0, 100.0, 80.0, 0.0);
        let handle = rotation_handle_global(&shape);
        assert!((handle.x - 140.0).abs() < EPS);
        assert!((handle.y - 60.0).abs() < EPS);

        let flipped = square(100.0, 100.0, 80.0, PI);
        let handle = rotation_handle_global(&flipped);
        assert!((handle.x - 60.0).abs() < EPS);
        assert!((handle.y - 140.0).abs() < EPS);
    }

    #[test]
    fn test_triangle_handle_beyond_apex() {
        let shape = Shape::triangle(Point::new(0.0, 0.0), 60.0, SerializableColor::black());
        let apex = triangle_vertices(60.0)[0];
        let handle = rotation_handle_global(&shape);
        assert!(handle.x.abs() < EPS);
        assert!((handle.y - (apex.y - TRIANGLE_HANDLE_OFFSET)).abs() < EPS);
    }

    #[test]
    fn test_hit_priority() {
        let shapes = vec![square(100.0, 100.0, 80.0, 0.0)];
        let handle = rotation_handle_global(&shapes[0]);

        assert_eq!(
            hit_test(&shapes, handle, DEFAULT_HANDLE_HIT_RADIUS),
            Some(Hit { kind: HitKind::Rotate, index: 0 })
        );
        assert_eq!(
            hit_test(&shapes, Point::new(100.0, 100.0), DEFAULT_HANDLE_HIT_RADIUS),
            Some(Hit { kind: HitKind::Body, index: 0 })
        );
        assert_eq!(hit_test(&shapes, Point::new(0.0, 0.0), DEFAULT_HANDLE_HIT_RADIUS), None);
    }

    #[test]
    fn test_triangle_hit_kinds() {
        let shapes = vec![Shape::triangle(
            Point::new(100.0, 100.0),
            80.0,
            SerializableColor::black(),
        )];
        let handle = rotation_handle_global(&shapes[0]);
        let apex = to_global(triangle_vertices(80.0)[0], &shapes[0]);

        assert_eq!(
            hit_test(&shapes, handle, DEFAULT_HANDLE_HIT_RADIUS),
            Some(Hit { kind: HitKind::Rotate, index: 0 })
        );
        assert_eq!(
            hit_test(&shapes, Point::new(100.0, 110.0), DEFAULT_HANDLE_HIT_RADIUS),
            Some(Hit { kind: HitKind::Body, index: 0 })
        );
        // Between the apex and the handle.
        let gap = Point::new(100.0, apex.y - TRIANGLE_HANDLE_OFFSET / 2.0);
        assert_eq!(hit_test(&shapes, gap, DEFAULT_HANDLE_HIT_RADIUS), None);
        // Beside the body, where a square of the same size would be hit.
        assert_eq!(hit_test(&shapes, Point::new(135.0, 65.0), DEFAULT_HANDLE_HIT_RADIUS), None);
    }

    #[test]
    fn test_hit_prefers_topmost_shape() {
        let shapes = vec![square(100.0, 100.0, 80.0, 0.0), square(110.0, 110.0, 80.0, 0.0)];
        let hit = hit_test(&shapes, Point::new(105.0, 105.0), DEFAULT_HANDLE_HIT_RADIUS);
        assert_eq!(hit, Some(Hit { kind: HitKind::Body, index: 1 }));
    }

    #[test]
    fn test_upper_body_beats_lower_handle() {
        // The lower shape's handle lies inside the upper shape's body; the upper shape is
        // tested first and its body wins.
        let shapes = vec![square(100.0, 100.0, 80.0, 0.0), square(140.0, 60.0, 40.0, 0.0)];
        let hit = hit_test(&shapes, Point::new(140.0, 60.0), DEFAULT_HANDLE_HIT_RADIUS);
        assert_eq!(hit, Some(Hit { kind: HitKind::Body, index: 1 }));
    }

    #[test]
    fn test_pointer_angle() {
        let center = Point::new(10.0, 10.0);
        assert!(pointer_angle(Point::new(20.0, 10.0), center).abs() < EPS);
        assert!((pointer_angle(Point::new(10.0, 20.0), center) - FRAC_PI_2).abs() < EPS);
    }
}
