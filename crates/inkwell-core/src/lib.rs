//! Inkwell Core Library
//!
//! Platform-agnostic object model, intent dispatch and undo/redo history for
//! the Inkwell drawing canvas.

pub mod camera;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod intent;
pub mod shapes;
pub mod store;
pub mod tools;

pub use camera::Camera;
pub use canvas::Canvas;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CanvasConfig, HistoryConfig, ViewConfig};
pub use error::{CanvasError, CanvasResult};
pub use history::{HistoryManager, HistoryStep, PushOutcome, Snapshot, TransactionEnd};
pub use intent::{EditorState, Intent, dispatch};
pub use shapes::{Shape, ShapeId, ShapeKind, ShapePatch, ShapeStyle};
pub use store::ObjectStoreState;
pub use tools::{ToolKind, ToolSettings};
