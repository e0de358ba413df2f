use crate::dispatch::EventDispatcher;
use crate::event::{Event, EventKind, EventType, Key, KeyModifiers, Tool};
use crate::state::{CanvasContext, CanvasState};

/// Global keyboard shortcuts and view toggles.
///
/// Runs last, so it only sees keys that no canvas controller consumed.
/// Shortcuts never act directly; they queue the matching command.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortcutsController;

impl ShortcutsController {
    /// Map unconsumed key presses to commands and handle
    /// [`EventKind::ToggleDebug`].
    pub fn on_event(&mut self, event: &mut Event, ctx: &mut CanvasContext<'_>) {
        let state = &mut *ctx.state;
        let mut dispatcher = EventDispatcher::new(event);
        dispatcher.handle(EventType::KeyPressed, |kind| match kind {
            EventKind::KeyPressed { key, modifiers } => queue_shortcut(state, *key, *modifiers),
            _ => false,
        });
        dispatcher.handle(EventType::ToggleDebug, |_| {
            state.view.debug_mode = !state.view.debug_mode;
            tracing::info!("Debug mode {}", if state.view.debug_mode { "on" } else { "off" });
            true
        });
    }
}

/// The command bound to a key chord, if any.
#[must_use]
pub fn shortcut(key: Key, modifiers: KeyModifiers) -> Option<EventKind> {
    let command = if modifiers.command() {
        match key {
            Key::Character('v') => EventKind::Paste,
            Key::Character('z') if !modifiers.shift => EventKind::Undo,
            Key::Character('z' | 'y') => EventKind::Redo,
            Key::Character('g') => EventKind::GroupSelection,
            _ => return None,
        }
    } else {
        match key {
            Key::Delete | Key::Backspace => EventKind::DeleteSelection,
            Key::Tab => EventKind::ToggleDebug,
            Key::Escape => EventKind::SelectTool { tool: Tool::Select },
            Key::Character(digit @ '1'..='5') => EventKind::SelectTool {
                tool: match digit {
                    '1' => Tool::Select,
                    '2' => Tool::DrawLine,
                    '3' => Tool::DrawArrow,
                    '4' => Tool::DrawText,
                    _ => Tool::Idle,
                },
            },
            _ => return None,
        }
    };
    Some(command)
}

fn queue_shortcut(state: &mut CanvasState, key: Key, modifiers: KeyModifiers) -> bool {
    let Some(command) = shortcut(key, modifiers) else {
        return false;
    };
    tracing::debug!("Shortcut {key:?} -> {:?}", command.event_type());
    state.queue.push(command);
    true
}
