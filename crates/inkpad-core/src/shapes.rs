//! Shape definitions for the drawing surface.

use kurbo::{Affine, Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// The two body geometries a shape can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    /// Axis-aligned square in local space, usually backed by an image.
    SquareImage,
    /// Equilateral triangle with its apex pointing up in local space.
    Triangle,
}

/// A positioned, rotated shape on the surface.
///
/// `position` is the center in surface coordinates and `angle` is in radians,
/// clockwise on screen (y grows downward).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub position: Point,
    /// Edge length.
    pub size: f64,
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<SerializableColor>,
}

impl Shape {
    /// Create an image-backed square.
    pub fn square_image(position: Point, size: f64, image_ref: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ShapeKind::SquareImage,
            position,
            size,
            angle: 0.0,
            image_ref: Some(image_ref.into()),
            fill_color: None,
        }
    }

    /// Create a filled triangle.
    pub fn triangle(position: Point, size: f64, fill_color: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ShapeKind::Triangle,
            position,
            size,
            angle: 0.0,
            image_ref: None,
            fill_color: Some(fill_color),
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Copy of this shape centered at `position`.
    pub fn moved_to(&self, position: Point) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    /// Copy of this shape with a new rotation.
    pub fn rotated_to(&self, angle: f64) -> Self {
        Self {
            angle,
            ..self.clone()
        }
    }

    /// Copy of this shape with its center scaled per axis and its size scaled uniformly.
    pub fn rescaled(&self, scale: Vec2, size_scale: f64) -> Self {
        Self {
            position: Point::new(self.position.x * scale.x, self.position.y * scale.y),
            size: self.size * size_scale,
            ..self.clone()
        }
    }

    /// Local-to-surface transform: rotate about the origin, then translate to the center.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2()) * Affine::rotate(self.angle)
    }
}
