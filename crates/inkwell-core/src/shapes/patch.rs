//! Partial attribute changes merged over an existing shape.

use super::{SerializableColor, Shape, ShapeTrait};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A set of attribute changes for [`Shape`]s.
///
/// Every field is optional; `None` keeps the current value. Fields that don't
/// apply to a shape's variant (e.g. `content` on a rectangle) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapePatch {
    /// Anchor position: top-left for rectangles, text and images, center for
    /// ellipses, bounds origin for strokes.
    pub position: Option<Point>,
    /// Width and height (ellipses take half of each as radii). Ignored by text and strokes.
    pub size: Option<Size>,
    /// Rotation in degrees, normalized on apply.
    pub rotation: Option<f64>,
    /// Replacement stroke points.
    pub points: Option<Vec<Point>>,
    /// Replacement text content.
    pub content: Option<String>,
    pub font_size: Option<f64>,
    /// Replacement image reference.
    pub source: Option<String>,
    pub corner_radius: Option<f64>,
    pub stroke_color: Option<SerializableColor>,
    /// `Some(None)` removes the fill.
    pub fill_color: Option<Option<SerializableColor>>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    /// Translation applied after all other geometry changes.
    pub offset: Option<Vec2>,
}

impl ShapePatch {
    /// A patch that only moves the shape.
    pub fn moved_by(offset: Vec2) -> Self {
        Self {
            offset: Some(offset),
            ..Self::default()
        }
    }

    /// Check whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produce a new shape with this patch merged over `shape`.
    ///
    /// The result is normalized, so out-of-range values are clamped.
    pub fn apply(&self, shape: &Shape) -> Shape {
        let mut shape = shape.clone();

        match &mut shape {
            Shape::Rectangle(r) => {
                if let Some(position) = self.position {
                    r.position = position;
                }
                if let Some(size) = self.size {
                    r.width = size.width;
                    r.height = size.height;
                }
                if let Some(radius) = self.corner_radius {
                    r.corner_radius = radius;
                }
            }
            Shape::Ellipse(e) => {
                if let Some(center) = self.position {
                    e.center = center;
                }
                if let Some(size) = self.size {
                    e.radius_x = size.width / 2.0;
                    e.radius_y = size.height / 2.0;
                }
            }
            Shape::Freehand(f) => {
                if let Some(points) = &self.points {
                    f.points = points.clone();
                }
                if let Some(position) = self.position {
                    let origin = f.bounds().origin();
                    f.translate(position - origin);
                }
            }
            Shape::Text(t) => {
                if let Some(position) = self.position {
                    t.position = position;
                }
                if let Some(content) = &self.content {
                    t.content = content.clone();
                }
                if let Some(font_size) = self.font_size {
                    t.font_size = font_size;
                }
            }
            Shape::Image(i) => {
                if let Some(position) = self.position {
                    i.position = position;
                }
                if let Some(size) = self.size {
                    i.width = size.width;
                    i.height = size.height;
                }
                if let Some(source) = &self.source {
                    i.source = source.clone();
                }
            }
        }

        if let Some(rotation) = self.rotation {
            shape.set_rotation(rotation);
        }

        let style = shape.style_mut();
        if let Some(color) = self.stroke_color {
            style.stroke_color = color;
        }
        if let Some(fill) = self.fill_color {
            style.fill_color = fill;
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width;
        }
        if let Some(opacity) = self.opacity {
            style.opacity = opacity;
        }

        if let Some(offset) = self.offset {
            shape.translate(offset);
        }

        shape.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, Freehand, Rectangle, Text};

    #[test]
    fn test_empty_patch_is_identity() {
        let shape = Shape::from(Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0));
        let patch = ShapePatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(&shape), shape);
    }

    #[test]
    fn test_patch_merges_over_existing() {
        let shape = Shape::from(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0));
        let patch = ShapePatch {
            size: Some(Size::new(20.0, 5.0)),
            fill_color: Some(Some(SerializableColor::white())),
            ..ShapePatch::default()
        };
        let Shape::Rectangle(updated) = patch.apply(&shape) else {
            panic!("variant changed");
        };
        assert_eq!(updated.position, Point::ZERO);
        assert!((updated.width - 20.0).abs() < f64::EPSILON);
        assert!((updated.height - 5.0).abs() < f64::EPSILON);
        assert_eq!(updated.style.fill_color, Some(SerializableColor::white()));
        assert!((updated.style.stroke_width - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_clamps_values() {
        let shape = Shape::from(Ellipse::circle(Point::ZERO, 5.0));
        let patch = ShapePatch {
            opacity: Some(3.0),
            stroke_width: Some(-1.0),
            rotation: Some(-30.0),
            ..ShapePatch::default()
        };
        let updated = patch.apply(&shape);
        assert!((updated.style().opacity - 1.0).abs() < f64::EPSILON);
        assert!(updated.style().stroke_width.abs() < f64::EPSILON);
        assert!((updated.rotation() - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_inapplicable_fields_ignored() {
        let shape = Shape::from(Rectangle::new(Point::ZERO, 10.0, 10.0));
        let patch = ShapePatch {
            content: Some("ignored".to_string()),
            points: Some(vec![Point::new(1.0, 1.0)]),
            ..ShapePatch::default()
        };
        assert_eq!(patch.apply(&shape), shape);
    }

    #[test]
    fn test_stroke_position_moves_all_points() {
        let shape = Shape::from(Freehand::from_points(vec![
            Point::new(10.0, 10.0),
            Point::new(20.0, 30.0),
        ]));
        let patch = ShapePatch {
            position: Some(Point::new(0.0, 0.0)),
            ..ShapePatch::default()
        };
        let Shape::Freehand(moved) = patch.apply(&shape) else {
            panic!("variant changed");
        };
        assert_eq!(moved.points, vec![Point::new(0.0, 0.0), Point::new(10.0, 20.0)]);
    }

    #[test]
    fn test_offset_applies_after_position() {
        let shape = Shape::from(Text::new(Point::ZERO, "hi".to_string()));
        let patch = ShapePatch {
            position: Some(Point::new(5.0, 5.0)),
            offset: Some(Vec2::new(1.0, -1.0)),
            ..ShapePatch::default()
        };
        let Shape::Text(moved) = patch.apply(&shape) else {
            panic!("variant changed");
        };
        assert_eq!(moved.position, Point::new(6.0, 4.0));
    }

    #[test]
    fn test_moved_by_keeps_id() {
        let shape = Shape::from(Rectangle::new(Point::ZERO, 1.0, 1.0));
        let moved = ShapePatch::moved_by(Vec2::new(3.0, 0.0)).apply(&shape);
        assert_eq!(moved.id(), shape.id());
        assert!((moved.bounds().x0 - 3.0).abs() < f64::EPSILON);
    }
}
