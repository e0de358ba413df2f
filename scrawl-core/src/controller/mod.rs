//! Controllers: the listeners that turn events into document changes.
//!
//! Each controller handles a fixed set of [`EventType`](crate::EventType)s
//! through an [`EventDispatcher`](crate::EventDispatcher) and reports back
//! through the event's handled flag. They sit in a
//! [`ListenerStack`](crate::ListenerStack):
//!
//! | Priority     | Controller                                   |
//! |--------------|----------------------------------------------|
//! | `Overlay`    | [`OverlayController`]                        |
//! | `Canvas`     | [`PasteImageController`], [`ToolController`], [`SelectionController`], [`HistoryController`] |
//! | `Background` | [`ShortcutsController`]                      |

mod history;
mod overlay;
mod paste;
mod selection;
mod shortcuts;
mod tool;

pub use history::{Checkpoint, HistoryController};
pub use overlay::OverlayController;
pub use paste::PasteImageController;
pub use selection::SelectionController;
pub use shortcuts::{shortcut, ShortcutsController};
pub use tool::{Operation, ToolController};

use crate::dispatch::{ListenerPriority, ListenerStack};
use crate::event::Event;
use crate::state::CanvasContext;

/// The closed set of controllers.
#[derive(Debug)]
pub enum Controller {
    /// GUI input capture.
    Overlay(OverlayController),
    /// Clipboard image paste.
    PasteImage(PasteImageController),
    /// Tool switching and drawing.
    Tool(ToolController),
    /// Selection, drag-move, delete and group.
    Selection(SelectionController),
    /// Undo checkpoints.
    History(HistoryController),
    /// Global keyboard shortcuts.
    Shortcuts(ShortcutsController),
}

impl Controller {
    /// Offer `event` to this controller.
    pub fn on_event(&mut self, event: &mut Event, ctx: &mut CanvasContext<'_>) {
        match self {
            Self::Overlay(c) => c.on_event(event),
            Self::PasteImage(c) => c.on_event(event, ctx),
            Self::Tool(c) => c.on_event(event, ctx),
            Self::Selection(c) => c.on_event(event, ctx),
            Self::History(c) => c.on_event(event, ctx),
            Self::Shortcuts(c) => c.on_event(event, ctx),
        }
    }

    /// Where the controller sits in the listener stack.
    #[must_use]
    pub const fn priority(&self) -> ListenerPriority {
        match self {
            Self::Overlay(_) => ListenerPriority::Overlay,
            Self::PasteImage(_) | Self::Tool(_) | Self::Selection(_) | Self::History(_) => {
                ListenerPriority::Canvas
            }
            Self::Shortcuts(_) => ListenerPriority::Background,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Overlay(_) => "overlay",
            Self::PasteImage(_) => "paste-image",
            Self::Tool(_) => "tool",
            Self::Selection(_) => "selection",
            Self::History(_) => "history",
            Self::Shortcuts(_) => "shortcuts",
        }
    }
}

/// The standard stack in dispatch order.
#[must_use]
pub fn default_stack() -> ListenerStack<Controller> {
    let mut stack = ListenerStack::new();
    for controller in [
        Controller::Overlay(OverlayController::default()),
        Controller::PasteImage(PasteImageController),
        Controller::Tool(ToolController::default()),
        Controller::Selection(SelectionController::default()),
        Controller::History(HistoryController::default()),
        Controller::Shortcuts(ShortcutsController),
    ] {
        stack.push(controller.priority(), controller);
    }
    stack
}
