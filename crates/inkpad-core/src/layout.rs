//! The initial shape layout, expressed relative to the surface size.

use crate::shapes::{SerializableColor, Shape, ShapeId, ShapeKind};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use uuid::Uuid;

/// Image used by the upper pair of preset shapes.
pub const UPPER_IMAGE: &str = "yellow.png";
/// Image used by the lower pair of preset shapes.
pub const LOWER_IMAGE: &str = "blue.png";

/// One shape of the initial layout.
///
/// `x` and `y` are fractions of the surface width and height; `size` is a
/// fraction of the shorter surface side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub angle: f64,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
}

impl LayoutEntry {
    pub fn square_image(x: f64, y: f64, size: f64, angle: f64, image_ref: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ShapeKind::SquareImage,
            x,
            y,
            size,
            angle,
            image_ref: Some(image_ref.to_string()),
            fill_color: None,
        }
    }

    pub fn triangle(x: f64, y: f64, size: f64, angle: f64, fill_color: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ShapeKind::Triangle,
            x,
            y,
            size,
            angle,
            image_ref: None,
            fill_color: Some(fill_color),
        }
    }

    /// Resolve this entry against a concrete surface size.
    pub fn materialize(&self, surface: Size) -> Shape {
        Shape {
            id: self.id,
            kind: self.kind,
            position: Point::new(self.x * surface.width, self.y * surface.height),
            size: self.size * surface.width.min(surface.height),
            angle: self.angle,
            image_ref: self.image_ref.clone(),
            fill_color: self.fill_color,
        }
    }
}

/// The shapes a fresh or cleared surface starts with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialLayout {
    pub entries: Vec<LayoutEntry>,
}

impl InitialLayout {
    pub fn new(entries: Vec<LayoutEntry>) -> Self {
        Self { entries }
    }

    /// Two image squares upside down across the top, two upright across the bottom.
    pub fn preset() -> Self {
        Self::new(vec![
            LayoutEntry::square_image(0.35, 0.25, 0.25, PI, UPPER_IMAGE),
            LayoutEntry::square_image(0.70, 0.25, 0.25, PI, UPPER_IMAGE),
            LayoutEntry::square_image(0.35, 0.82, 0.25, 0.0, LOWER_IMAGE),
            LayoutEntry::square_image(0.70, 0.82, 0.25, 0.0, LOWER_IMAGE),
        ])
    }

    /// Shapes at `surface` size. Ids are the same on every call.
    pub fn materialize(&self, surface: Size) -> Vec<Shape> {
        self.entries.iter().map(|e| e.materialize(surface)).collect()
    }

    /// Every distinct image the layout references.
    pub fn image_refs(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if let Some(image) = entry.image_ref.as_deref() {
                if !refs.contains(&image) {
                    refs.push(image);
                }
            }
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_materializes_four_shapes() {
        let shapes = InitialLayout::preset().materialize(Size::new(360.0, 600.0));
        assert_eq!(shapes.len(), 4);
        assert!((shapes[0].position.x - 126.0).abs() < 1e-9);
        assert!((shapes[0].position.y - 150.0).abs() < 1e-9);
        assert!((shapes[0].size - 90.0).abs() < 1e-9);
        assert!((shapes[0].angle - PI).abs() < f64::EPSILON);
        assert_eq!(shapes[3].image_ref.as_deref(), Some(LOWER_IMAGE));
    }

    #[test]
    fn test_materialize_keeps_ids() {
        let layout = InitialLayout::preset();
        let a = layout.materialize(Size::new(100.0, 100.0));
        let b = layout.materialize(Size::new(300.0, 200.0));
        let ids_a: Vec<_> = a.iter().map(|s| s.id).collect();
        let ids_b: Vec<_> = b.iter().map(|s| s.id).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_image_refs_deduplicated() {
        assert_eq!(InitialLayout::preset().image_refs(), vec![UPPER_IMAGE, LOWER_IMAGE]);
    }
}
