//! Text shape.

use super::{
    ShapeId, ShapeStyle, ShapeTrait, finite_or, finite_point, normalize_rotation, rotated_bounds,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    /// Hand-drawn style font (default).
    #[default]
    Handwritten,
    /// Clean sans-serif font.
    Sans,
    /// Monospaced font for code snippets.
    Mono,
}

impl FontFamily {
    /// Average glyph width as a fraction of the font size.
    fn char_width_factor(&self) -> f64 {
        match self {
            FontFamily::Handwritten => 0.55,
            FontFamily::Sans => 0.52,
            FontFamily::Mono => 0.60,
        }
    }
}

/// A text shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Position (top-left corner of text bounding box).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family.
    #[serde(default)]
    pub font_family: FontFamily,
    /// Rotation angle in degrees (around center), in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    /// Default font size (M = Medium).
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Create a new text shape with font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Approximate width based on the widest line; the renderer owns exact layout.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        max_line_len as f64 * self.font_size * self.font_family.char_width_factor()
    }

    /// Approximate height based on font size and number of lines.
    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        // lines() doesn't count a trailing empty line
        let line_count = if self.content.ends_with('\n') {
            line_count + 1
        } else {
            line_count
        };
        line_count as f64 * self.font_size * 1.2
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let unrotated = Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.approximate_width(),
            self.position.y + self.approximate_height(),
        );
        rotated_bounds(unrotated, self.rotation)
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
        self.font_size = finite_or(self.font_size, Self::DEFAULT_FONT_SIZE).max(0.0);
        self.rotation = normalize_rotation(self.rotation);
        self.style.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_creation() {
        let text = Text::new(Point::new(10.0, 20.0), "Hello".to_string());
        assert_eq!(text.content, "Hello");
        assert!((text.font_size - Text::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_multiline_bounds() {
        let single = Text::new(Point::ZERO, "abc".to_string());
        let double = Text::new(Point::ZERO, "abc\nabc".to_string());
        assert!((double.bounds().height() - 2.0 * single.bounds().height()).abs() < 1e-9);
        assert!((double.bounds().width() - single.bounds().width()).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_newline_counts_as_line() {
        let text = Text::new(Point::ZERO, "abc\n".to_string()).with_font_size(10.0);
        assert!((text.bounds().height() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_font_family_changes_width() {
        let sans = Text::new(Point::ZERO, "wide".to_string()).with_font_family(FontFamily::Sans);
        let mono = Text::new(Point::ZERO, "wide".to_string()).with_font_family(FontFamily::Mono);
        assert!(mono.bounds().width() > sans.bounds().width());
    }
}
