//! Canvas configuration.

use crate::error::CanvasResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum number of undo states to keep.
pub const DEFAULT_MAX_UNDO_HISTORY: usize = 50;

/// Pushes closer together than this collapse into one history entry.
pub const DEFAULT_COALESCE_WINDOW_MS: u64 = 300;

/// Undo history limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum entries on each of the undo and redo stacks.
    pub max_depth: usize,
    /// Coalescing window for pushes outside a transaction. 0 disables coalescing.
    pub coalesce_window_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_UNDO_HISTORY,
            coalesce_window_ms: DEFAULT_COALESCE_WINDOW_MS,
        }
    }
}

impl HistoryConfig {
    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_window_ms)
    }
}

/// Initial view state and zoom bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub initial_zoom: f64,
    pub grid_size: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 10.0,
            initial_zoom: 1.0,
            grid_size: 20.0,
        }
    }
}

/// Canvas configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub history: HistoryConfig,
    pub view: ViewConfig,
}

impl CanvasConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Repair values that would make the canvas misbehave.
    pub fn sanitized(mut self) -> Self {
        let defaults = ViewConfig::default();
        if self.history.max_depth == 0 {
            log::warn!("history.max_depth must be at least 1, using 1");
            self.history.max_depth = 1;
        }
        let view = &mut self.view;
        if !view.min_zoom.is_finite() || view.min_zoom <= 0.0 {
            view.min_zoom = defaults.min_zoom;
        }
        if !view.max_zoom.is_finite() {
            view.max_zoom = defaults.max_zoom;
        }
        if view.min_zoom > view.max_zoom {
            log::warn!(
                "view.min_zoom {} exceeds max_zoom {}, swapping",
                view.min_zoom,
                view.max_zoom
            );
            std::mem::swap(&mut view.min_zoom, &mut view.max_zoom);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.history.max_depth, 50);
        assert_eq!(config.history.coalesce_window(), Duration::from_millis(300));
        assert!((config.view.max_zoom - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json() {
        let config = CanvasConfig::from_json(r#"{"view": {"max_zoom": 5.0}}"#).unwrap();
        assert!((config.view.max_zoom - 5.0).abs() < f64::EPSILON);
        assert!((config.view.min_zoom - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.history, HistoryConfig::default());
    }

    #[test]
    fn test_sanitized() {
        let config = CanvasConfig::from_json(
            r#"{"history": {"max_depth": 0}, "view": {"min_zoom": 4.0, "max_zoom": 2.0}}"#,
        )
        .unwrap();
        assert_eq!(config.history.max_depth, 1);
        assert!((config.view.min_zoom - 2.0).abs() < f64::EPSILON);
        assert!((config.view.max_zoom - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_json() {
        assert!(CanvasConfig::from_json("{").is_err());
    }
}
