use glam::Vec2;

use crate::dispatch::EventDispatcher;
use crate::element::{ElementId, ElementKind};
use crate::event::{Event, EventKind, EventType, KeyModifiers, PointerButton, Tool};
use crate::state::{CanvasContext, CanvasState};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    last: Vec2,
    moved: bool,
}

/// Selection commands and the select tool's pointer handling.
///
/// Clicking picks the topmost element under the pointer and selects its
/// root ancestor, so children move with their group. Dragging moves every
/// selected root.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    drag: Option<Drag>,
}

impl SelectionController {
    /// Handle selection commands and select-tool pointer input.
    pub fn on_event(&mut self, event: &mut Event, ctx: &mut CanvasContext<'_>) {
        let state = &mut *ctx.state;
        let mut dispatcher = EventDispatcher::new(event);

        dispatcher.handle(EventType::SelectElement, |kind| match kind {
            EventKind::SelectElement { id } => select(state, *id),
            _ => false,
        });
        dispatcher.handle(EventType::ClearSelection, |_| {
            state.selection.clear(&mut state.store);
            true
        });
        dispatcher.handle(EventType::DeleteSelection, |_| delete_selection(state));
        dispatcher.handle(EventType::GroupSelection, |_| group_selection(state));

        if state.view.tool != Tool::Select {
            self.drag = None;
            return;
        }
        dispatcher.handle(EventType::PointerPressed, |kind| match kind {
            EventKind::PointerPressed {
                position,
                button: PointerButton::Left,
                modifiers,
            } => self.press(state, *position, *modifiers),
            _ => false,
        });
        dispatcher.handle(EventType::PointerMoved, |kind| match kind {
            EventKind::PointerMoved { position } => self.drag_to(state, *position),
            _ => false,
        });
        dispatcher.handle(EventType::PointerReleased, |kind| match kind {
            EventKind::PointerReleased {
                button: PointerButton::Left,
                ..
            } => self.release(state),
            _ => false,
        });
    }

    fn press(&mut self, state: &mut CanvasState, position: Vec2, modifiers: KeyModifiers) -> bool {
        let hit = state
            .store
            .hit_test(position, state.config.hit_slop)
            .and_then(|id| state.store.root_of(id));

        match hit {
            Some(id) if modifiers.shift => state.selection.toggle(&mut state.store, id),
            Some(id) if !state.selection.contains(id) => {
                state.selection.select_only(&mut state.store, id);
            }
            Some(_) => {}
            None if modifiers.shift => {}
            None => state.selection.clear(&mut state.store),
        }

        self.drag = hit.map(|_| Drag {
            last: position,
            moved: false,
        });
        true
    }

    fn drag_to(&mut self, state: &mut CanvasState, position: Vec2) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let delta = position - drag.last;
        drag.last = position;
        if delta == Vec2::ZERO {
            return true;
        }

        for id in state.selection.ids() {
            if state.store.get(*id).is_some_and(|e| e.is_root()) {
                if let Some(element) = state.store.get_mut(*id) {
                    element.transform.translation += delta;
                }
            }
        }
        drag.moved = true;
        true
    }

    fn release(&mut self, state: &mut CanvasState) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        if drag.moved {
            state.queue.push(EventKind::MakeSnapshot);
        }
        true
    }
}

fn select(state: &mut CanvasState, id: ElementId) -> bool {
    if state.selection.select_only(&mut state.store, id) {
        tracing::debug!("Selected {id}");
        true
    } else {
        tracing::debug!("Cannot select {id}");
        false
    }
}

fn delete_selection(state: &mut CanvasState) -> bool {
    if state.selection.is_empty() {
        return false;
    }
    let doomed = state.selection.ids().to_vec();
    state.selection.clear(&mut state.store);

    let removed = doomed
        .into_iter()
        .filter(|id| state.store.schedule_destruction(*id))
        .count();
    tracing::info!("Deleted {removed} selected elements");

    state.queue.push(EventKind::MakeSnapshot);
    true
}

fn group_selection(state: &mut CanvasState) -> bool {
    let mut roots: Vec<ElementId> = Vec::new();
    for id in state.selection.ids() {
        if let Some(root) = state.store.root_of(*id) {
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
    }
    if roots.is_empty() {
        return false;
    }

    let group = match state.store.create(ElementKind::Group, None) {
        Ok(group) => group,
        Err(e) => {
            tracing::warn!("Failed to create group: {e}");
            return false;
        }
    };
    let mut attached = 0;
    for root in roots {
        match state.store.add_child(group, root) {
            Ok(()) => attached += 1,
            Err(e) => tracing::warn!("Skipping {root} while grouping: {e}"),
        }
    }

    state.selection.select_only(&mut state.store, group);
    state.queue.push(EventKind::MakeSnapshot);
    tracing::info!("Grouped {attached} elements under {group}");
    true
}
