//! Canvas state shared by every controller.

use glam::Vec2;

use crate::config::CanvasConfig;
use crate::element::ElementId;
use crate::event::Tool;
use crate::platform::{Clipboard, Renderer};
use crate::queue::CommandQueue;
use crate::store::ElementStore;

/// The focused elements, in selection order.
///
/// Focus flags on the elements are kept in step with the id list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    /// Selected ids, oldest first.
    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of selected elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Make `id` the only selected element. Returns `false` if it cannot be
    /// focused.
    pub fn select_only(&mut self, store: &mut ElementStore, id: ElementId) -> bool {
        if !store.get(id).is_some_and(|e| e.focus.is_some()) {
            return false;
        }
        self.clear(store);
        self.add(store, id)
    }

    /// Add `id` to the selection. Returns `false` if it cannot be focused.
    pub fn add(&mut self, store: &mut ElementStore, id: ElementId) -> bool {
        if !store.set_focused(id, true) {
            return false;
        }
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
        true
    }

    /// Flip membership of `id`.
    pub fn toggle(&mut self, store: &mut ElementStore, id: ElementId) {
        if self.contains(id) {
            store.set_focused(id, false);
            self.ids.retain(|s| *s != id);
        } else {
            self.add(store, id);
        }
    }

    /// Unfocus everything.
    pub fn clear(&mut self, store: &mut ElementStore) {
        for id in self.ids.drain(..) {
            store.set_focused(id, false);
        }
    }

    /// Replace the selection wholesale, skipping ids that no longer exist.
    pub fn replace(&mut self, store: &mut ElementStore, ids: &[ElementId]) {
        self.clear(store);
        for id in ids {
            self.add(store, *id);
        }
    }

    /// Drop ids that are gone or pending destruction.
    pub fn retain_live(&mut self, store: &ElementStore) {
        self.ids
            .retain(|id| store.contains(*id) && !store.is_pending_destruction(*id));
    }
}

/// View-level toggles that are not part of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    /// The active tool; exactly one is active at a time.
    pub tool: Tool,
    /// Whether debug outlines are drawn.
    pub debug_mode: bool,
}

/// Everything a controller may read or change while handling an event.
#[derive(Debug, Default)]
pub struct CanvasState {
    /// Element storage.
    pub store: ElementStore,
    /// Commands for the next drain pass.
    pub queue: CommandQueue,
    /// Focused elements.
    pub selection: Selection,
    /// Tool and debug flags.
    pub view: ViewState,
    /// Styling and thresholds.
    pub config: CanvasConfig,
    /// World-space pointer position.
    pub pointer: Vec2,
    /// Frame counter, advanced by the end-of-frame sweep.
    pub frame: u64,
}

impl CanvasState {
    /// Empty state using `config`.
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            view: ViewState {
                tool: config.initial_tool,
                debug_mode: config.debug_mode,
            },
            config,
            ..Self::default()
        }
    }
}

/// State plus host services, handed to controllers for one event.
pub struct CanvasContext<'a> {
    /// Canvas state.
    pub state: &'a mut CanvasState,
    /// System clipboard.
    pub clipboard: &'a mut dyn Clipboard,
    /// Rendering backend, for texture upload.
    pub renderer: &'a mut dyn Renderer,
}

impl std::fmt::Debug for CanvasContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasContext")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
