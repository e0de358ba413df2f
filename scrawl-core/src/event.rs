//! Events and commands flowing through the canvas.
//!
//! Raw input (pointer, keys, text) and internal commands share one closed
//! [`EventKind`] union. Input arrives from the host each frame; commands are
//! pushed onto the [`CommandQueue`](crate::CommandQueue) by controllers and
//! replayed on the next drain pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ElementId;

/// The active editing tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// No tool; pointer input is ignored by the tool controller.
    #[default]
    Idle,
    /// Select and move elements.
    Select,
    /// Drag out a plain line.
    DrawLine,
    /// Drag out an arrow.
    DrawArrow,
    /// Click to place a text label, then type.
    DrawText,
}

impl Tool {
    /// Short name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Select => "select",
            Self::DrawLine => "line",
            Self::DrawArrow => "arrow",
            Self::DrawText => "text",
        }
    }
}

/// Mouse button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    /// Primary button.
    #[default]
    Left,
    /// Middle button or wheel click.
    Middle,
    /// Secondary button.
    Right,
}

/// A keyboard key the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "key", content = "char")]
pub enum Key {
    /// A printable key, lowercase for letters.
    Character(char),
    /// Tab.
    Tab,
    /// Escape.
    Escape,
    /// Enter / Return.
    Enter,
    /// Forward delete.
    Delete,
    /// Backspace.
    Backspace,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    #[serde(default)]
    pub shift: bool,
    /// Control key pressed.
    #[serde(default)]
    pub ctrl: bool,
    /// Alt/Option key pressed.
    #[serde(default)]
    pub alt: bool,
    /// Meta/Command key pressed.
    #[serde(default)]
    pub meta: bool,
}

impl KeyModifiers {
    /// Control on most platforms, Command on macOS.
    #[must_use]
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Everything that can be dispatched to controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventKind {
    /// Paste clipboard contents onto the canvas.
    Paste,
    /// Focus an element, replacing the selection.
    SelectElement {
        /// Element to select.
        id: ElementId,
    },
    /// Unfocus everything.
    ClearSelection,
    /// Switch the active tool.
    SelectTool {
        /// Tool to activate.
        tool: Tool,
    },
    /// Record an undo checkpoint.
    MakeSnapshot,
    /// Step back one checkpoint.
    Undo,
    /// Re-apply an undone checkpoint.
    Redo,
    /// Destroy the selected elements.
    DeleteSelection,
    /// Put the selected roots under a new group.
    GroupSelection,
    /// Flip debug outlines on or off.
    ToggleDebug,
    /// A pointer button went down.
    PointerPressed {
        /// World-space position.
        position: Vec2,
        /// Which button.
        #[serde(default)]
        button: PointerButton,
        /// Held modifiers.
        #[serde(default)]
        modifiers: KeyModifiers,
    },
    /// The pointer moved.
    PointerMoved {
        /// World-space position.
        position: Vec2,
    },
    /// A pointer button went up.
    PointerReleased {
        /// World-space position.
        position: Vec2,
        /// Which button.
        #[serde(default)]
        button: PointerButton,
    },
    /// A key went down.
    KeyPressed {
        /// The key.
        key: Key,
        /// Held modifiers.
        #[serde(default)]
        modifiers: KeyModifiers,
    },
    /// A key went up.
    KeyReleased {
        /// The key.
        key: Key,
        /// Held modifiers.
        #[serde(default)]
        modifiers: KeyModifiers,
    },
    /// Typed text, after keyboard layout processing.
    TextInput {
        /// The typed characters.
        text: String,
    },
}

/// Fieldless discriminant of [`EventKind`], used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum EventType {
    Paste,
    SelectElement,
    ClearSelection,
    SelectTool,
    MakeSnapshot,
    Undo,
    Redo,
    DeleteSelection,
    GroupSelection,
    ToggleDebug,
    PointerPressed,
    PointerMoved,
    PointerReleased,
    KeyPressed,
    KeyReleased,
    TextInput,
}

impl EventKind {
    /// The discriminant.
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Paste => EventType::Paste,
            Self::SelectElement { .. } => EventType::SelectElement,
            Self::ClearSelection => EventType::ClearSelection,
            Self::SelectTool { .. } => EventType::SelectTool,
            Self::MakeSnapshot => EventType::MakeSnapshot,
            Self::Undo => EventType::Undo,
            Self::Redo => EventType::Redo,
            Self::DeleteSelection => EventType::DeleteSelection,
            Self::GroupSelection => EventType::GroupSelection,
            Self::ToggleDebug => EventType::ToggleDebug,
            Self::PointerPressed { .. } => EventType::PointerPressed,
            Self::PointerMoved { .. } => EventType::PointerMoved,
            Self::PointerReleased { .. } => EventType::PointerReleased,
            Self::KeyPressed { .. } => EventType::KeyPressed,
            Self::KeyReleased { .. } => EventType::KeyReleased,
            Self::TextInput { .. } => EventType::TextInput,
        }
    }

    /// World position carried by pointer events.
    #[must_use]
    pub const fn pointer_position(&self) -> Option<Vec2> {
        match self {
            Self::PointerPressed { position, .. }
            | Self::PointerMoved { position }
            | Self::PointerReleased { position, .. } => Some(*position),
            _ => None,
        }
    }
}

impl EventType {
    /// Pointer input.
    #[must_use]
    pub const fn is_pointer_event(self) -> bool {
        matches!(
            self,
            Self::PointerPressed | Self::PointerMoved | Self::PointerReleased
        )
    }

    /// Keyboard and text input.
    #[must_use]
    pub const fn is_key_event(self) -> bool {
        matches!(self, Self::KeyPressed | Self::KeyReleased | Self::TextInput)
    }

    /// Internal commands, as opposed to raw input.
    #[must_use]
    pub const fn is_command(self) -> bool {
        !self.is_pointer_event() && !self.is_key_event()
    }
}

/// An event plus its handled flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Set once a handler consumed the event.
    pub handled: bool,
}

impl Event {
    /// Wrap `kind` as a fresh, unhandled event.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            handled: false,
        }
    }

    /// The discriminant.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// Pointer input.
    #[must_use]
    pub fn is_pointer_event(&self) -> bool {
        self.event_type().is_pointer_event()
    }

    /// Keyboard and text input.
    #[must_use]
    pub fn is_key_event(&self) -> bool {
        self.event_type().is_key_event()
    }

    /// Internal command.
    #[must_use]
    pub fn is_command(&self) -> bool {
        self.event_type().is_command()
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_is_unhandled() {
        let event = Event::new(EventKind::Paste);
        assert!(!event.handled);
        assert_eq!(event.event_type(), EventType::Paste);
    }

    #[test]
    fn test_categories() {
        let press = Event::new(EventKind::PointerPressed {
            position: Vec2::ZERO,
            button: PointerButton::Left,
            modifiers: KeyModifiers::default(),
        });
        assert!(press.is_pointer_event());
        assert!(!press.is_command());

        let text = Event::new(EventKind::TextInput {
            text: "a".to_string(),
        });
        assert!(text.is_key_event());
        assert!(!text.is_pointer_event());

        let snapshot = Event::new(EventKind::MakeSnapshot);
        assert!(snapshot.is_command());
        assert!(!snapshot.is_key_event());
    }

    #[test]
    fn test_pointer_position() {
        let moved = EventKind::PointerMoved {
            position: Vec2::new(3.0, 4.0),
        };
        assert_eq!(moved.pointer_position(), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(EventKind::Undo.pointer_position(), None);
    }

    #[test]
    fn test_event_json_shape() {
        let json = r#"{"type":"SelectTool","data":{"tool":"draw_arrow"}}"#;
        let kind: EventKind = serde_json::from_str(json).expect("should parse");
        assert_eq!(
            kind,
            EventKind::SelectTool {
                tool: Tool::DrawArrow
            }
        );

        let json = r#"{"type":"KeyPressed","data":{"key":{"key":"Character","char":"z"},"modifiers":{"ctrl":true}}}"#;
        let kind: EventKind = serde_json::from_str(json).expect("should parse");
        assert_eq!(
            kind,
            EventKind::KeyPressed {
                key: Key::Character('z'),
                modifiers: KeyModifiers {
                    ctrl: true,
                    ..KeyModifiers::default()
                }
            }
        );

        let json = r#"{"type":"PointerPressed","data":{"position":[1.0,2.0]}}"#;
        let kind: EventKind = serde_json::from_str(json).expect("should parse");
        assert_eq!(kind.pointer_position(), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_command_modifier() {
        let mods = KeyModifiers {
            meta: true,
            ..KeyModifiers::default()
        };
        assert!(mods.command());
        assert!(!KeyModifiers::default().command());
    }
}
