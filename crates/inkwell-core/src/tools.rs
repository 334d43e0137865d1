//! Tool selection and the style template applied to new shapes.

use crate::shapes::{SerializableColor, Shape, ShapeStyle, Text};
use serde::{Deserialize, Serialize};

pub const MIN_STROKE_WIDTH: f64 = 1.0;
pub const MAX_STROKE_WIDTH: f64 = 100.0;
pub const MAX_CORNER_RADIUS: f64 = 1000.0;
pub const MIN_FONT_SIZE: f64 = 1.0;
pub const MAX_FONT_SIZE: f64 = 500.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Rectangle,
    Ellipse,
    Freehand,
    Text,
    Image,
    Eraser,
}

impl ToolKind {
    /// Check whether the tool creates new shapes.
    pub fn creates_shapes(self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle
                | ToolKind::Ellipse
                | ToolKind::Freehand
                | ToolKind::Text
                | ToolKind::Image
        )
    }
}

/// Current tool and the style new shapes are created with.
///
/// Setters clamp out-of-range input instead of rejecting it, so a slider can
/// be wired straight through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Style to apply to new shapes.
    current_style: ShapeStyle,
    /// Corner radius for new rectangles (0 = sharp corners).
    corner_radius: f64,
    /// Font size for new text.
    font_size: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            current_style: ShapeStyle::default(),
            corner_radius: 0.0,
            font_size: Text::DEFAULT_FONT_SIZE,
        }
    }
}

impl ToolSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.current_style
    }

    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.current_style.stroke_width = clamp_or(
            width,
            MIN_STROKE_WIDTH,
            MAX_STROKE_WIDTH,
            self.current_style.stroke_width,
        );
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.current_style.opacity = clamp_or(opacity, 0.0, 1.0, self.current_style.opacity);
    }

    pub fn set_corner_radius(&mut self, radius: f64) {
        self.corner_radius = clamp_or(radius, 0.0, MAX_CORNER_RADIUS, self.corner_radius);
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = clamp_or(size, MIN_FONT_SIZE, MAX_FONT_SIZE, self.font_size);
    }

    pub fn set_stroke_color(&mut self, color: SerializableColor) {
        self.current_style.stroke_color = color;
    }

    pub fn set_fill_color(&mut self, color: Option<SerializableColor>) {
        self.current_style.fill_color = color;
    }

    /// Give a freshly created shape the current style template.
    pub fn styled(&self, mut shape: Shape) -> Shape {
        *shape.style_mut() = self.current_style.clone();
        match &mut shape {
            Shape::Rectangle(r) => r.corner_radius = self.corner_radius,
            Shape::Text(t) => t.font_size = self.font_size,
            Shape::Ellipse(_) | Shape::Freehand(_) | Shape::Image(_) => {}
        }
        shape
    }
}

/// Clamp `value` into `[min, max]`, keeping `current` for NaN input.
fn clamp_or(value: f64, min: f64, max: f64, current: f64) -> f64 {
    if value.is_nan() {
        current
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, Rectangle};
    use kurbo::Point;

    #[test]
    fn test_stroke_width_clamped() {
        let mut tools = ToolSettings::new();
        tools.set_stroke_width(0.2);
        assert!((tools.style().stroke_width - MIN_STROKE_WIDTH).abs() < f64::EPSILON);
        tools.set_stroke_width(250.0);
        assert!((tools.style().stroke_width - MAX_STROKE_WIDTH).abs() < f64::EPSILON);
        tools.set_stroke_width(f64::NAN);
        assert!((tools.style().stroke_width - MAX_STROKE_WIDTH).abs() < f64::EPSILON);
    }

    #[test]
    fn test_opacity_clamped() {
        let mut tools = ToolSettings::new();
        tools.set_opacity(-1.0);
        assert!(tools.style().opacity.abs() < f64::EPSILON);
        tools.set_opacity(0.4);
        assert!((tools.style().opacity - 0.4).abs() < f64::EPSILON);
        tools.set_opacity(7.0);
        assert!((tools.style().opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_corner_radius_and_font_size_clamped() {
        let mut tools = ToolSettings::new();
        tools.set_corner_radius(-10.0);
        assert!(tools.corner_radius().abs() < f64::EPSILON);
        tools.set_font_size(0.0);
        assert!((tools.font_size() - MIN_FONT_SIZE).abs() < f64::EPSILON);
        tools.set_font_size(f64::INFINITY);
        assert!((tools.font_size() - MAX_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_styled_applies_template() {
        let mut tools = ToolSettings::new();
        tools.set_stroke_width(8.0);
        tools.set_fill_color(Some(SerializableColor::white()));
        tools.set_corner_radius(12.0);

        let rect = tools.styled(Rectangle::new(Point::ZERO, 10.0, 10.0).into());
        let Shape::Rectangle(rect) = rect else {
            panic!("variant changed");
        };
        assert!((rect.corner_radius - 12.0).abs() < f64::EPSILON);
        assert!((rect.style.stroke_width - 8.0).abs() < f64::EPSILON);
        assert_eq!(rect.style.fill_color, Some(SerializableColor::white()));

        let ellipse = tools.styled(Ellipse::circle(Point::ZERO, 4.0).into());
        assert_eq!(ellipse.style(), tools.style());
    }

    #[test]
    fn test_creates_shapes() {
        assert!(ToolKind::Rectangle.creates_shapes());
        assert!(!ToolKind::Select.creates_shapes());
        assert!(!ToolKind::Pan.creates_shapes());
    }
}
