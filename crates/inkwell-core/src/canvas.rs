//! The owning editor context: current state plus undo history.

use crate::camera::Camera;
use crate::clock::{Clock, SystemClock};
use crate::config::CanvasConfig;
use crate::error::CanvasResult;
use crate::history::{HistoryManager, HistoryStep, PushOutcome, TransactionEnd};
use crate::intent::{EditorState, Intent, dispatch};
use crate::store::ObjectStoreState;
use crate::tools::ToolSettings;
use kurbo::Size;

/// An editable canvas.
///
/// Holds the [`EditorState`] and the [`HistoryManager`] recording its object
/// store. Edits go through [`dispatch`]; only the object store is versioned,
/// tool settings and the view are not.
///
/// Callers record edits in one of two ways:
///
/// - call [`push_snapshot`](Self::push_snapshot) before [`mutate`](Self::mutate),
///   optionally wrapped in [`begin_transaction`](Self::begin_transaction) /
///   [`end_transaction`](Self::end_transaction) for a multi-step gesture;
/// - or use [`record`](Self::record), which does both for content edits.
#[derive(Debug)]
pub struct Canvas {
    state: EditorState,
    history: HistoryManager,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create a canvas whose history coalescing reads time from `clock`.
    pub fn with_clock(config: CanvasConfig, clock: Box<dyn Clock>) -> Self {
        let config = config.sanitized();
        Self {
            state: EditorState::from_config(&config),
            history: HistoryManager::with_clock(&config.history, clock),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn store(&self) -> &ObjectStoreState {
        &self.state.store
    }

    pub fn tools(&self) -> &ToolSettings {
        &self.state.tools
    }

    pub fn camera(&self) -> &Camera {
        &self.state.view
    }

    /// Direct access to the view for gestures that have no intent, such as
    /// anchored zoom. View changes are never recorded.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.state.view
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Record the current object store as the state to return to on undo.
    pub fn push_snapshot(&mut self) -> PushOutcome {
        self.history.push_snapshot(&self.state.store)
    }

    /// Apply `intent` without touching history.
    pub fn mutate(&mut self, intent: Intent) -> CanvasResult<&ObjectStoreState> {
        self.state = dispatch(&self.state, intent)?;
        Ok(&self.state.store)
    }

    /// Apply `intent`, snapshotting first if it edits content.
    ///
    /// Nothing is recorded when the intent fails.
    pub fn record(&mut self, intent: Intent) -> CanvasResult<&ObjectStoreState> {
        let content_edit = intent.is_content_edit();
        let next = dispatch(&self.state, intent)?;
        if content_edit {
            self.history.push_snapshot(&self.state.store);
        }
        self.state = next;
        Ok(&self.state.store)
    }

    pub fn begin_transaction(&mut self) {
        self.history.begin_transaction();
    }

    pub fn end_transaction(&mut self) -> TransactionEnd {
        self.history.end_transaction()
    }

    pub fn undo(&mut self) -> HistoryStep {
        let step = self.history.undo(&self.state.store);
        if let HistoryStep::Restored(state) = &step {
            self.restore(state);
        }
        step
    }

    pub fn redo(&mut self) -> HistoryStep {
        let step = self.history.redo(&self.state.store);
        if let HistoryStep::Restored(state) = &step {
            self.restore(state);
        }
        step
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the document and start a fresh history.
    pub fn load(&mut self, store: ObjectStoreState) {
        self.restore(&store);
        self.history.clear();
        log::info!("Loaded document with {} shapes", self.state.store.len());
    }

    /// Load a document from JSON. On error the canvas is unchanged.
    pub fn load_json(&mut self, json: &str) -> CanvasResult<()> {
        let store = ObjectStoreState::from_json(json)?;
        self.load(store);
        Ok(())
    }

    pub fn to_json(&self) -> CanvasResult<String> {
        self.state.store.to_json()
    }

    /// Fit the view to every shape on the canvas.
    pub fn zoom_to_fit(&mut self, viewport: Size, padding: f64) {
        match self.state.store.bounds() {
            Some(bounds) => self.state.view.fit_to_bounds(bounds, viewport, padding),
            None => self.state.view.reset(),
        }
    }

    /// Bring the live store in line with `target`. Infallible, so history and
    /// store never drift apart.
    fn restore(&mut self, target: &ObjectStoreState) {
        self.state.store = self
            .state
            .store
            .replace_objects(target.objects().to_vec())
            .set_selection(target.selection());
    }
}
