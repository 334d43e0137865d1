//! Undo/redo history with transactions and time-window coalescing.
//!
//! The manager stores whole-state [`Snapshot`]s on two bounded stacks. It never
//! touches the live store: callers hand it the current state and apply
//! whatever it returns.
//!
//! A snapshot is recorded by [`HistoryManager::push_snapshot`], which callers
//! invoke *before* each logical mutation:
//!
//! - inside a transaction only the first push records anything, so a whole
//!   drag or resize undoes in one step;
//! - outside a transaction, a push that follows the previous one within the
//!   coalescing window is folded into the existing entry;
//! - every push clears the redo stack, recorded or not.

use crate::clock::{Clock, Instant, SystemClock};
use crate::config::HistoryConfig;
use crate::store::ObjectStoreState;
use std::collections::VecDeque;
use std::time::Duration;

/// An immutable copy of the object store at one point in time.
///
/// Shapes are shared with the live store through `Arc`s whose contents are
/// never mutated, so later edits cannot leak into a stored snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    state: ObjectStoreState,
}

impl Snapshot {
    pub fn capture(state: &ObjectStoreState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    pub fn state(&self) -> &ObjectStoreState {
        &self.state
    }

    pub fn into_state(self) -> ObjectStoreState {
        self.state
    }
}

/// Result of an undo or redo.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryStep {
    /// The state to restore.
    Restored(ObjectStoreState),
    /// The relevant stack was empty; nothing changed.
    NoOperation,
}

impl HistoryStep {
    pub fn is_noop(&self) -> bool {
        matches!(self, HistoryStep::NoOperation)
    }

    pub fn restored(&self) -> Option<&ObjectStoreState> {
        match self {
            HistoryStep::Restored(state) => Some(state),
            HistoryStep::NoOperation => None,
        }
    }
}

/// What [`HistoryManager::push_snapshot`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// A new undo entry was recorded.
    Recorded,
    /// Folded into the previous entry by the coalescing window.
    Coalesced,
    /// The active transaction already recorded its entry.
    InTransaction,
}

/// What [`HistoryManager::end_transaction`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEnd {
    /// The transaction recorded exactly one undo entry.
    Committed,
    /// Nothing was pushed during the transaction; history is unchanged.
    Abandoned,
    /// No transaction was active. Treated as a no-op.
    Unbalanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Transaction {
    #[default]
    Inactive,
    Active {
        recorded: bool,
    },
}

/// Bounded undo/redo stacks plus transaction and coalescing state.
#[derive(Debug)]
pub struct HistoryManager {
    /// Oldest entry at the front, most recent at the back.
    undo_stack: VecDeque<Snapshot>,
    redo_stack: VecDeque<Snapshot>,
    max_depth: usize,
    coalesce_window: Duration,
    transaction: Transaction,
    /// Time of the previous `push_snapshot` call.
    last_push: Option<Instant>,
    clock: Box<dyn Clock>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    /// Create a history with default limits and the system clock.
    pub fn new() -> Self {
        Self::with_config(&HistoryConfig::default())
    }

    pub fn with_config(config: &HistoryConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create a history reading time from `clock`.
    pub fn with_clock(config: &HistoryConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: config.max_depth.max(1),
            coalesce_window: config.coalesce_window(),
            transaction: Transaction::Inactive,
            last_push: None,
            clock,
        }
    }

    /// Record `state` as the pre-mutation state of the next edit.
    pub fn push_snapshot(&mut self, state: &ObjectStoreState) -> PushOutcome {
        // Any mutation invalidates forward history, recorded or not.
        self.redo_stack.clear();

        // The window is measured from the previous call of any kind.
        let now = self.clock.now();
        let coalesce = self
            .last_push
            .is_some_and(|last| now.saturating_duration_since(last) < self.coalesce_window);
        self.last_push = Some(now);

        match self.transaction {
            Transaction::Active { recorded: true } => return PushOutcome::InTransaction,
            Transaction::Active { recorded: false } => {
                self.transaction = Transaction::Active { recorded: true };
                self.record(state);
                return PushOutcome::Recorded;
            }
            Transaction::Inactive => {}
        }

        if coalesce && !self.undo_stack.is_empty() {
            log::trace!("push_snapshot coalesced into previous entry");
            return PushOutcome::Coalesced;
        }
        self.record(state);
        PushOutcome::Recorded
    }

    fn record(&mut self, state: &ObjectStoreState) {
        push_bounded(&mut self.undo_stack, Snapshot::capture(state), self.max_depth);
        log::debug!(
            "history: recorded snapshot of {} shapes (undo depth {})",
            state.len(),
            self.undo_stack.len()
        );
    }

    /// Step back one entry.
    ///
    /// `current` is saved for redo and the previous state returned. An active
    /// transaction is closed first.
    pub fn undo(&mut self, current: &ObjectStoreState) -> HistoryStep {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return HistoryStep::NoOperation;
        };
        self.interrupt_transaction("undo");
        push_bounded(&mut self.redo_stack, Snapshot::capture(current), self.max_depth);
        log::debug!(
            "history: undo (undo depth {}, redo depth {})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        HistoryStep::Restored(snapshot.into_state())
    }

    /// Step forward one entry; the inverse of [`undo`](Self::undo).
    pub fn redo(&mut self, current: &ObjectStoreState) -> HistoryStep {
        let Some(snapshot) = self.redo_stack.pop_back() else {
            return HistoryStep::NoOperation;
        };
        self.interrupt_transaction("redo");
        push_bounded(&mut self.undo_stack, Snapshot::capture(current), self.max_depth);
        log::debug!(
            "history: redo (undo depth {}, redo depth {})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        HistoryStep::Restored(snapshot.into_state())
    }

    /// Start grouping pushes into a single undo step.
    ///
    /// Transactions don't nest: beginning while one is active starts over,
    /// and the next push records a fresh entry.
    pub fn begin_transaction(&mut self) {
        if self.is_transaction_active() {
            log::warn!("begin_transaction while a transaction is active; resetting it");
        }
        self.transaction = Transaction::Active { recorded: false };
    }

    /// Close the current transaction. Idempotent.
    pub fn end_transaction(&mut self) -> TransactionEnd {
        let Transaction::Active { recorded } = std::mem::take(&mut self.transaction) else {
            log::debug!("end_transaction without begin_transaction; ignored");
            return TransactionEnd::Unbalanced;
        };
        if recorded {
            TransactionEnd::Committed
        } else {
            TransactionEnd::Abandoned
        }
    }

    fn interrupt_transaction(&mut self, reason: &str) {
        if self.is_transaction_active() {
            log::warn!("{reason} during an active transaction; ending it");
            self.transaction = Transaction::Inactive;
        }
    }

    pub fn is_transaction_active(&self) -> bool {
        matches!(self.transaction, Transaction::Active { .. })
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Undo entries, oldest first.
    pub fn undo_snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.undo_stack.iter()
    }

    /// Drop all history, e.g. after loading a different document.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.transaction = Transaction::Inactive;
        self.last_push = None;
    }
}

/// Push onto the top of `stack`, evicting from the bottom past `max_depth`.
fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, max_depth: usize) {
    stack.push_back(snapshot);
    while stack.len() > max_depth {
        stack.pop_front();
    }
}
