//! Shape definitions for the canvas.

mod ellipse;
mod freehand;
mod image;
mod patch;
mod rectangle;
mod text;

pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use image::Image;
pub use patch::ShapePatch;
pub use rectangle::Rectangle;
pub use text::{FontFamily, Text};

use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

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

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
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

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width (never negative).
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    /// Get the stroke color with opacity applied, ready for a renderer.
    pub fn stroke_with_opacity(&self) -> Color {
        with_opacity(self.stroke_color, self.opacity)
    }

    /// Get the fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.fill_color.map(|c| with_opacity(c, self.opacity))
    }

    /// Clamp every attribute into its valid range.
    pub fn normalize(&mut self) {
        self.stroke_width = finite_or(self.stroke_width, 0.0).max(0.0);
        self.opacity = finite_or(self.opacity, 1.0).clamp(0.0, 1.0);
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            opacity: 1.0,
        }
    }
}

fn with_opacity(color: SerializableColor, opacity: f64) -> Color {
    let alpha = (color.a as f64 * opacity) as u8;
    Color::from_rgba8(color.r, color.g, color.b, alpha)
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Replace NaN and infinities with `fallback`.
pub(crate) fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Replace non-finite coordinates with 0.
pub(crate) fn finite_point(point: Point) -> Point {
    Point::new(finite_or(point.x, 0.0), finite_or(point.y, 0.0))
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = finite_or(degrees, 0.0).rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if r >= 360.0 { 0.0 } else { r }
}

/// Axis-aligned bounds of `rect` after rotating it about its center.
pub(crate) fn rotated_bounds(rect: Rect, degrees: f64) -> Rect {
    if degrees.abs() < 1e-9 {
        return rect;
    }
    let rot = Affine::rotate_about(degrees.to_radians(), rect.center());
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    points_bounds(corners.iter().map(|&p| rot * p))
}

/// Bounding box of a point set (`Rect::ZERO` when empty).
pub(crate) fn points_bounds(points: impl IntoIterator<Item = Point>) -> Rect {
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(first, first), |acc, p| acc.union_pt(p))
}

/// Common behavior of every shape variant.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Move the shape by `delta` in world coordinates.
    fn translate(&mut self, delta: Vec2);

    /// Clamp geometry and style into their valid ranges.
    fn normalize(&mut self);
}

/// Discriminant of a [`Shape`], for callers that only need the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Freehand,
    Text,
    Image,
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Freehand(Freehand),
    Text(Text),
    Image(Image),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Ellipse(s) => s.id(),
            Shape::Freehand(s) => s.id(),
            Shape::Text(s) => s.id(),
            Shape::Image(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Freehand(_) => ShapeKind::Freehand,
            Shape::Text(_) => ShapeKind::Text,
            Shape::Image(_) => ShapeKind::Image,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Freehand(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Image(s) => s.bounds(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Ellipse(s) => s.style(),
            Shape::Freehand(s) => s.style(),
            Shape::Text(s) => s.style(),
            Shape::Image(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Ellipse(s) => s.style_mut(),
            Shape::Freehand(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
            Shape::Image(s) => s.style_mut(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rectangle(s) => s.translate(delta),
            Shape::Ellipse(s) => s.translate(delta),
            Shape::Freehand(s) => s.translate(delta),
            Shape::Text(s) => s.translate(delta),
            Shape::Image(s) => s.translate(delta),
        }
    }

    pub fn normalize(&mut self) {
        match self {
            Shape::Rectangle(s) => s.normalize(),
            Shape::Ellipse(s) => s.normalize(),
            Shape::Freehand(s) => s.normalize(),
            Shape::Text(s) => s.normalize(),
            Shape::Image(s) => s.normalize(),
        }
    }

    /// Consume the shape and return it normalized.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Get the rotation angle in degrees (0 for shapes that don't support rotation).
    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(r) => r.rotation,
            Shape::Ellipse(e) => e.rotation,
            Shape::Text(t) => t.rotation,
            Shape::Image(i) => i.rotation,
            Shape::Freehand(_) => 0.0,
        }
    }

    /// Set the rotation angle in degrees. Ignored by shapes without rotation.
    pub fn set_rotation(&mut self, degrees: f64) {
        let degrees = normalize_rotation(degrees);
        match self {
            Shape::Rectangle(r) => r.rotation = degrees,
            Shape::Ellipse(e) => e.rotation = degrees,
            Shape::Text(t) => t.rotation = degrees,
            Shape::Image(i) => i.rotation = degrees,
            Shape::Freehand(_) => {}
        }
    }

    /// Check if this shape supports rotation.
    pub fn supports_rotation(&self) -> bool {
        !matches!(self, Shape::Freehand(_))
    }

    /// Return the same shape carrying `id` instead of its own identifier.
    ///
    /// Used by persistence collaborators that restore shapes with known ids.
    pub fn with_id(mut self, id: ShapeId) -> Self {
        match &mut self {
            Shape::Rectangle(s) => s.id = id,
            Shape::Ellipse(s) => s.id = id,
            Shape::Freehand(s) => s.id = id,
            Shape::Text(s) => s.id = id,
            Shape::Image(s) => s.id = id,
        }
        self
    }

    /// Give the shape a fresh identifier (duplicate / paste).
    pub fn regenerate_id(self) -> Self {
        self.with_id(Uuid::new_v4())
    }
}

impl From<Rectangle> for Shape {
    fn from(s: Rectangle) -> Self {
        Shape::Rectangle(s)
    }
}

impl From<Ellipse> for Shape {
    fn from(s: Ellipse) -> Self {
        Shape::Ellipse(s)
    }
}

impl From<Freehand> for Shape {
    fn from(s: Freehand) -> Self {
        Shape::Freehand(s)
    }
}

impl From<Text> for Shape {
    fn from(s: Text) -> Self {
        Shape::Text(s)
    }
}

impl From<Image> for Shape {
    fn from(s: Image) -> Self {
        Shape::Image(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rotation() {
        assert!((normalize_rotation(370.0) - 10.0).abs() < 1e-9);
        assert!((normalize_rotation(-90.0) - 270.0).abs() < 1e-9);
        assert!(normalize_rotation(360.0).abs() < f64::EPSILON);
        assert!(normalize_rotation(-1e-20) < 360.0);
        assert!(normalize_rotation(f64::NAN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_style_normalize() {
        let mut style = ShapeStyle {
            stroke_width: -4.0,
            opacity: 1.7,
            ..ShapeStyle::default()
        };
        style.normalize();
        assert!(style.stroke_width.abs() < f64::EPSILON);
        assert!((style.opacity - 1.0).abs() < f64::EPSILON);

        style.opacity = f64::NAN;
        style.normalize();
        assert!((style.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_color_conversion() {
        let color = SerializableColor::new(10, 20, 30, 200);
        let peniko: Color = color.into();
        assert_eq!(SerializableColor::from(peniko), color);
    }

    #[test]
    fn test_opacity_applied_to_colors() {
        let style = ShapeStyle {
            fill_color: Some(SerializableColor::white()),
            opacity: 0.5,
            ..ShapeStyle::default()
        };
        assert_eq!(style.stroke_with_opacity().to_rgba8().a, 127);
        assert_eq!(style.fill_with_opacity().map(|c| c.to_rgba8().a), Some(127));
    }

    #[test]
    fn test_with_id_keeps_geometry() {
        let rect = Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0);
        let id = Uuid::new_v4();
        let shape = Shape::from(rect.clone()).with_id(id);
        assert_eq!(shape.id(), id);
        assert_eq!(shape.bounds(), rect.as_rect());
    }

    #[test]
    fn test_rotation_only_on_supported_shapes() {
        let mut rect = Shape::from(Rectangle::new(Point::ZERO, 10.0, 10.0));
        rect.set_rotation(-45.0);
        assert!((rect.rotation() - 315.0).abs() < 1e-9);

        let mut stroke = Shape::from(Freehand::from_points(vec![Point::ZERO, Point::new(5.0, 5.0)]));
        assert!(!stroke.supports_rotation());
        stroke.set_rotation(30.0);
        assert!(stroke.rotation().abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotated_bounds_grow() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let rotated = rotated_bounds(rect, 45.0);
        assert!(rotated.width() > rect.width());
        assert!((rotated.center().x - 5.0).abs() < 1e-9);
    }
}
