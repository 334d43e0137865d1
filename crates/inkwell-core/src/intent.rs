//! Editor intents and the state transition function that applies them.
//!
//! [`dispatch`] is the single place where editor state changes. It never
//! touches history; callers decide when to snapshot (see
//! [`Canvas::record`](crate::canvas::Canvas::record)).

use crate::camera::Camera;
use crate::config::CanvasConfig;
use crate::error::CanvasResult;
use crate::shapes::{SerializableColor, Shape, ShapeId, ShapePatch};
use crate::store::ObjectStoreState;
use crate::tools::{ToolKind, ToolSettings};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A requested change to editor state.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetTool(ToolKind),
    SetStrokeWidth(f64),
    SetStrokeColor(SerializableColor),
    SetFillColor(Option<SerializableColor>),
    SetOpacity(f64),
    SetCornerRadius(f64),
    SetFontSize(f64),
    SetGridSize(f64),
    SetGridVisible(bool),
    SetGuidesVisible(bool),
    SetZoom(f64),
    /// Pan the view by a delta in screen coordinates.
    Pan(Vec2),
    AddObject(Shape),
    UpdateObject {
        id: ShapeId,
        changes: ShapePatch,
    },
    DeleteObjects(Vec<ShapeId>),
    SetSelection(Vec<ShapeId>),
    SelectAll,
    ReplaceObjects(Vec<Arc<Shape>>),
    BringToFront(ShapeId),
    SendToBack(ShapeId),
    BringForward(ShapeId),
    SendBackward(ShapeId),
    Clear,
}

impl Intent {
    /// Check whether this intent changes the object store.
    ///
    /// Tool and view intents return `false`; they are never recorded in
    /// undo history.
    pub fn is_content_edit(&self) -> bool {
        match self {
            Intent::SetTool(_)
            | Intent::SetStrokeWidth(_)
            | Intent::SetStrokeColor(_)
            | Intent::SetFillColor(_)
            | Intent::SetOpacity(_)
            | Intent::SetCornerRadius(_)
            | Intent::SetFontSize(_)
            | Intent::SetGridSize(_)
            | Intent::SetGridVisible(_)
            | Intent::SetGuidesVisible(_)
            | Intent::SetZoom(_)
            | Intent::Pan(_) => false,
            Intent::AddObject(_)
            | Intent::UpdateObject { .. }
            | Intent::DeleteObjects(_)
            | Intent::SetSelection(_)
            | Intent::SelectAll
            | Intent::ReplaceObjects(_)
            | Intent::BringToFront(_)
            | Intent::SendToBack(_)
            | Intent::BringForward(_)
            | Intent::SendBackward(_)
            | Intent::Clear => true,
        }
    }
}

/// Everything the editor knows at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub store: ObjectStoreState,
    pub tools: ToolSettings,
    pub view: Camera,
}

impl EditorState {
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            store: ObjectStoreState::new(),
            tools: ToolSettings::new(),
            view: Camera::from_config(&config.view),
        }
    }
}

/// Apply `intent` to `state`, producing the next state.
///
/// Out-of-range tool and view values are clamped, never rejected. The only
/// failure is [`CanvasError::DuplicateIdentifier`](crate::error::CanvasError)
/// from [`Intent::AddObject`], in which case `state` is left as it was.
pub fn dispatch(state: &EditorState, intent: Intent) -> CanvasResult<EditorState> {
    let mut next = state.clone();
    match intent {
        Intent::SetTool(tool) => next.tools.set_tool(tool),
        Intent::SetStrokeWidth(width) => next.tools.set_stroke_width(width),
        Intent::SetStrokeColor(color) => next.tools.set_stroke_color(color),
        Intent::SetFillColor(color) => next.tools.set_fill_color(color),
        Intent::SetOpacity(opacity) => next.tools.set_opacity(opacity),
        Intent::SetCornerRadius(radius) => next.tools.set_corner_radius(radius),
        Intent::SetFontSize(size) => next.tools.set_font_size(size),
        Intent::SetGridSize(size) => next.view.set_grid_size(size),
        Intent::SetGridVisible(visible) => next.view.grid_visible = visible,
        Intent::SetGuidesVisible(visible) => next.view.guides_visible = visible,
        Intent::SetZoom(zoom) => next.view.set_zoom(zoom),
        Intent::Pan(delta) => next.view.pan(delta),
        Intent::AddObject(shape) => next.store = state.store.add_object(shape)?,
        Intent::UpdateObject { id, changes } => {
            next.store = state.store.update_object(id, &changes);
        }
        Intent::DeleteObjects(ids) => next.store = state.store.delete_objects(&ids),
        Intent::SetSelection(ids) => next.store = state.store.set_selection(&ids),
        Intent::SelectAll => next.store = state.store.select_all(),
        Intent::ReplaceObjects(objects) => next.store = state.store.replace_objects(objects),
        Intent::BringToFront(id) => next.store = state.store.bring_to_front(id),
        Intent::SendToBack(id) => next.store = state.store.send_to_back(id),
        Intent::BringForward(id) => next.store = state.store.bring_forward(id),
        Intent::SendBackward(id) => next.store = state.store.send_backward(id),
        Intent::Clear => next.store = state.store.clear(),
    }
    Ok(next)
}
