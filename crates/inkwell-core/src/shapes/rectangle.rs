//! Rectangle shape.

use super::{
    ShapeId, ShapeStyle, ShapeTrait, finite_or, finite_point, normalize_rotation, rotated_bounds,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle shape with optional rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Corner radius (0 = sharp corners).
    pub corner_radius: f64,
    /// Rotation angle in degrees (around center), in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            corner_radius: 0.0,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();

        Self::new(Point::new(min_x, min_y), width, height)
    }

    /// Get the unrotated rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        rotated_bounds(self.as_rect(), self.rotation)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.position += delta;
        }
    }

    fn normalize(&mut self) {
        self.position = finite_point(self.position);
        self.width = finite_or(self.width, 0.0).max(0.0);
        self.height = finite_or(self.height, 0.0).max(0.0);
        self.corner_radius = finite_or(self.corner_radius, 0.0).max(0.0);
        self.rotation = normalize_rotation(self.rotation);
        self.style.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rectangle_from_corners() {
        let rect = Rectangle::from_corners(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert!((rect.position.x - 50.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 50.0).abs() < f64::EPSILON);
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        let bounds = rect.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quarter_turn_swaps_extent() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 50.0);
        rect.rotation = 90.0;
        let bounds = rect.bounds();
        assert!((bounds.width() - 50.0).abs() < 1e-9);
        assert!((bounds.height() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize() {
        let mut rect = Rectangle::new(Point::new(f64::NAN, 7.0), -5.0, f64::INFINITY);
        rect.corner_radius = -3.0;
        rect.rotation = 450.0;
        rect.normalize();
        assert_eq!(rect.position, Point::new(0.0, 7.0));
        assert!(rect.width.abs() < f64::EPSILON);
        assert!(rect.height.abs() < f64::EPSILON);
        assert!(rect.corner_radius.abs() < f64::EPSILON);
        assert!((rect.rotation - 90.0).abs() < 1e-9);
    }
}
