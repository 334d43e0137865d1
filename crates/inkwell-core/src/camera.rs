//! View transform: pan, zoom, grid and guides.
//!
//! Navigating the view is not a content edit, so none of this state is
//! recorded in undo history.

use crate::config::ViewConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed grid spacing in world units.
pub const MIN_GRID_SIZE: f64 = 5.0;
/// Largest allowed grid spacing in world units.
pub const MAX_GRID_SIZE: f64 = 100.0;

/// Camera manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates, and carries
/// the grid/guide display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%)
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
    /// Grid spacing in world units
    pub grid_size: f64,
    pub grid_visible: bool,
    /// Smart alignment guides while dragging
    pub guides_visible: bool,
    initial_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera using configured zoom bounds and grid size.
    pub fn from_config(config: &ViewConfig) -> Self {
        let mut camera = Self {
            offset: Vec2::ZERO,
            zoom: config.initial_zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            grid_size: config.grid_size,
            grid_visible: true,
            guides_visible: true,
            initial_zoom: config.initial_zoom,
        };
        camera.set_zoom(config.initial_zoom);
        camera.initial_zoom = camera.zoom;
        camera.set_grid_size(config.grid_size);
        camera
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        if delta.x.is_finite() && delta.y.is_finite() {
            self.offset += delta;
        }
    }

    /// Set the zoom level, clamped to the configured bounds.
    pub fn set_zoom(&mut self, zoom: f64) {
        let zoom = if zoom.is_finite() { zoom } else { self.zoom };
        // max/min rather than clamp: public bounds may be set inverted
        self.zoom = zoom.max(self.min_zoom).min(self.max_zoom);
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let world_point = self.screen_to_world(screen_point);
        let old_zoom = self.zoom;
        self.set_zoom(self.zoom * factor);
        if (self.zoom - old_zoom).abs() < f64::EPSILON {
            return;
        }

        // Adjust offset so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
    }

    /// Set the grid spacing, clamped to `[MIN_GRID_SIZE, MAX_GRID_SIZE]`.
    pub fn set_grid_size(&mut self, size: f64) {
        let size = if size.is_finite() { size } else { self.grid_size };
        self.grid_size = size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
    }

    /// Snap a world point to the nearest grid intersection.
    pub fn snap_to_grid(&self, point: Point) -> Point {
        Point::new(
            (point.x / self.grid_size).round() * self.grid_size,
            (point.y / self.grid_size).round() * self.grid_size,
        )
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = self.initial_zoom;
    }

    /// Fit the camera to show the given bounding box.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded_viewport = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded_viewport.width / bounds.width();
        let scale_y = padded_viewport.height / bounds.height();
        self.set_zoom(scale_x.min(scale_y));

        // Center the bounds in the viewport
        let bounds_center = bounds.center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);

        self.offset = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
        assert!((camera.grid_size - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_offset() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        let world = camera.screen_to_world(Point::new(100.0, 200.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_zoom() {
        let mut camera = Camera::new();
        camera.set_zoom(2.0);
        let world = camera.screen_to_world(Point::new(100.0, 200.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.set_zoom(1.5);

        let original = Point::new(123.0, 456.0);
        let back = camera.world_to_screen(camera.screen_to_world(original));

        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, 0.001);
        assert!((camera.zoom - camera.min_zoom).abs() < f64::EPSILON);

        camera.set_zoom(1.0);
        camera.zoom_at(Point::ZERO, 1000.0);
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);

        camera.set_zoom(f64::NAN);
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_configured_zoom_bounds() {
        let config = ViewConfig {
            max_zoom: 5.0,
            ..ViewConfig::default()
        };
        let mut camera = Camera::from_config(&config);
        camera.set_zoom(8.0);
        assert!((camera.zoom - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut camera = Camera::new();
        let anchor = Point::new(200.0, 100.0);
        let world_before = camera.screen_to_world(anchor);
        camera.zoom_at(anchor, 2.0);
        let world_after = camera.screen_to_world(anchor);
        assert!((world_before.x - world_after.x).abs() < 1e-9);
        assert!((world_before.y - world_after.y).abs() < 1e-9);
    }

    #[test]
    fn test_pan() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        assert!((camera.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((camera.offset.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grid_size_clamped() {
        let mut camera = Camera::new();
        camera.set_grid_size(1.0);
        assert!((camera.grid_size - MIN_GRID_SIZE).abs() < f64::EPSILON);
        camera.set_grid_size(500.0);
        assert!((camera.grid_size - MAX_GRID_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_to_grid() {
        let camera = Camera::new();
        assert_eq!(camera.snap_to_grid(Point::new(29.0, 11.0)), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut camera = Camera::new();
        camera.fit_to_bounds(Rect::new(0.0, 0.0, 100.0, 100.0), Size::new(300.0, 300.0), 50.0);
        assert!((camera.zoom - 2.0).abs() < 1e-9);
        let center = camera.world_to_screen(Point::new(50.0, 50.0));
        assert!((center.x - 150.0).abs() < 1e-9);
    }
}
