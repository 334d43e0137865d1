//! Image shape referencing externally stored raster data.

use super::{
    ShapeId, ShapeStyle, ShapeTrait, finite_or, finite_point, normalize_rotation, rotated_bounds,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image placed on the canvas.
///
/// Only a reference (URI or asset key) is stored; pixel data belongs to the
/// persistence layer, which keeps snapshots cheap to copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Reference to the image data.
    pub source: String,
    /// Rotation angle in degrees (around center), in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties (stroke used for optional border).
    pub style: ShapeStyle,
}

impl Image {
    /// Create a new image reference at its natural size.
    pub fn new(position: Point, source: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            source: source.into(),
            rotation: 0.0,
            style: ShapeStyle {
                stroke_width: 0.0,
                ..ShapeStyle::default()
            },
        }
    }

    /// Scale the image to fit within max dimensions while preserving aspect ratio.
    pub fn fit_within(mut self, max_width: f64, max_height: f64) -> Self {
        if self.width <= 0.0 || self.height <= 0.0 {
            return self;
        }
        let aspect = self.width / self.height;
        let target_aspect = max_width / max_height;

        if aspect > target_aspect {
            self.width = max_width;
            self.height = max_width / aspect;
        } else {
            self.height = max_height;
            self.width = max_height * aspect;
        }

        self
    }

    /// Get the unrotated bounding rectangle.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl ShapeTrait for Image {
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
        self.rotation = normalize_rotation(self.rotation);
        self.style.normalize();
    }
}
