use serde::{Deserialize, Serialize};

use crate::dispatch::EventDispatcher;
use crate::element::ElementId;
use crate::event::{Event, EventType};
use crate::state::{CanvasContext, CanvasState};
use crate::store::StoreSnapshot;

/// A restorable document state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Live elements at capture time.
    pub store: StoreSnapshot,
    /// Selection at capture time.
    pub selection: Vec<ElementId>,
    /// Store revision at capture time.
    pub revision: u64,
    /// Frame the checkpoint was taken in.
    pub frame: u64,
}

impl Checkpoint {
    /// Capture the current document.
    #[must_use]
    pub fn capture(state: &CanvasState) -> Self {
        Self {
            store: state.store.snapshot(),
            selection: state
                .selection
                .ids()
                .iter()
                .copied()
                .filter(|id| !state.store.is_pending_destruction(*id))
                .collect(),
            revision: state.store.revision(),
            frame: state.frame,
        }
    }
}

/// Undo/redo over whole-document checkpoints.
///
/// The top of the undo stack is always the current document state, so undo
/// needs at least two checkpoints.
#[derive(Debug, Clone, Default)]
pub struct HistoryController {
    undo: Vec<Checkpoint>,
    redo: Vec<Checkpoint>,
}

impl HistoryController {
    /// Handle [`EventType::MakeSnapshot`], [`EventType::Undo`] and
    /// [`EventType::Redo`].
    pub fn on_event(&mut self, event: &mut Event, ctx: &mut CanvasContext<'_>) {
        let state = &mut *ctx.state;
        let mut dispatcher = EventDispatcher::new(event);
        dispatcher.handle(EventType::MakeSnapshot, |_| {
            self.checkpoint(state);
            true
        });
        dispatcher.handle(EventType::Undo, |_| self.undo(state));
        dispatcher.handle(EventType::Redo, |_| self.redo(state));
    }

    /// Record the current document.
    ///
    /// A request in the same frame as the previous checkpoint, with no store
    /// change in between, replaces it instead of stacking a duplicate.
    pub fn checkpoint(&mut self, state: &CanvasState) {
        let checkpoint = Checkpoint::capture(state);

        if let Some(top) = self.undo.last_mut() {
            if top.frame == checkpoint.frame && top.revision == checkpoint.revision {
                tracing::debug!("Coalesced checkpoint in frame {}", checkpoint.frame);
                *top = checkpoint;
                return;
            }
        }

        tracing::info!(
            "Checkpoint {} with {} elements",
            self.undo.len(),
            checkpoint.store.len()
        );
        self.undo.push(checkpoint);
        self.redo.clear();
    }

    /// Step back one checkpoint. Returns `false` at the oldest one.
    pub fn undo(&mut self, state: &mut CanvasState) -> bool {
        if self.undo.len() < 2 {
            tracing::debug!("Nothing to undo");
            return false;
        }
        if let Some(current) = self.undo.pop() {
            self.redo.push(current);
        }
        let Some(previous) = self.undo.last_mut() else {
            return false;
        };
        restore(state, previous);

        tracing::info!("Undo to checkpoint {}", self.undo.len() - 1);
        true
    }

    /// Re-apply the last undone checkpoint. Returns `false` when there is
    /// none.
    pub fn redo(&mut self, state: &mut CanvasState) -> bool {
        let Some(mut next) = self.redo.pop() else {
            tracing::debug!("Nothing to redo");
            return false;
        };
        restore(state, &mut next);
        self.undo.push(next);

        tracing::info!("Redo to checkpoint {}", self.undo.len() - 1);
        true
    }

    /// Checkpoints available to undo into, current state included.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Undone checkpoints available to redo.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

/// Load `checkpoint` into `state` and stamp it with the resulting revision,
/// so a snapshot request right after the restore coalesces into it.
fn restore(state: &mut CanvasState, checkpoint: &mut Checkpoint) {
    state.store.restore(&checkpoint.store);
    state
        .selection
        .replace(&mut state.store, &checkpoint.selection);
    checkpoint.revision = state.store.revision();
    checkpoint.frame = state.frame;
}
