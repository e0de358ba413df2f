use glam::Vec2;

use crate::dispatch::EventDispatcher;
use crate::element::{Arrow, Element, ElementId, ElementKind, LineSegment, TextBlock, Transform};
use crate::event::{Event, EventKind, EventType, Key, PointerButton, Tool};
use crate::state::{CanvasContext, CanvasState};

/// A multi-step drawing operation in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Dragging out the end point of a line or arrow.
    Stroke(ElementId),
    /// Typing into a freshly placed text label.
    Typing(ElementId),
}

impl Operation {
    /// The element being built.
    #[must_use]
    pub const fn element(self) -> ElementId {
        match self {
            Self::Stroke(id) | Self::Typing(id) => id,
        }
    }
}

/// Owns tool switching and the drawing tools.
///
/// Only [`EventKind::SelectTool`] changes the active tool. Switching while
/// an operation is open finalizes it: a usable element is kept and
/// checkpointed, anything else is discarded.
#[derive(Debug, Clone, Default)]
pub struct ToolController {
    operation: Option<Operation>,
}

impl ToolController {
    /// The open operation, if any.
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    /// Handle tool switches and input for the drawing tools.
    pub fn on_event(&mut self, event: &mut Event, ctx: &mut CanvasContext<'_>) {
        let state = &mut *ctx.state;
        self.forget_vanished(state);

        let mut dispatcher = EventDispatcher::new(event);
        dispatcher.handle(EventType::SelectTool, |kind| match kind {
            EventKind::SelectTool { tool } => {
                self.finish(state);
                if state.view.tool != *tool {
                    tracing::info!("Tool changed: {} -> {}", state.view.tool.name(), tool.name());
                    state.view.tool = *tool;
                }
                true
            }
            _ => false,
        });
        dispatcher.handle(EventType::PointerPressed, |kind| match kind {
            EventKind::PointerPressed {
                position,
                button: PointerButton::Left,
                ..
            } => self.press(state, *position),
            _ => false,
        });
        dispatcher.handle(EventType::PointerMoved, |kind| match kind {
            EventKind::PointerMoved { position } => self.drag(state, *position),
            _ => false,
        });
        dispatcher.handle(EventType::PointerReleased, |kind| match kind {
            EventKind::PointerReleased {
                position,
                button: PointerButton::Left,
            } => self.release(state, *position),
            _ => false,
        });
        dispatcher.handle(EventType::TextInput, |kind| match kind {
            EventKind::TextInput { text } => self.type_text(state, text),
            _ => false,
        });
        dispatcher.handle(EventType::KeyPressed, |kind| match kind {
            EventKind::KeyPressed { key, modifiers } if !modifiers.command() => {
                self.edit_key(state, *key)
            }
            _ => false,
        });
    }

    /// Drop the operation if its element was destroyed or undone away.
    fn forget_vanished(&mut self, state: &CanvasState) {
        if let Some(op) = self.operation {
            let id = op.element();
            if !state.store.contains(id) || state.store.is_pending_destruction(id) {
                tracing::debug!("Operation element {id} vanished");
                self.operation = None;
            }
        }
    }

    fn press(&mut self, state: &mut CanvasState, position: Vec2) -> bool {
        let tool = state.view.tool;
        let kind = match tool {
            Tool::DrawLine | Tool::DrawArrow => {
                let line = LineSegment {
                    begin: Vec2::ZERO,
                    end: Vec2::ZERO,
                    thickness: state.config.stroke_thickness,
                    color: state.config.stroke_color,
                };
                if tool == Tool::DrawArrow {
                    ElementKind::Arrow(Arrow {
                        line,
                        head_color: state.config.arrow_head_color,
                    })
                } else {
                    ElementKind::Line(line)
                }
            }
            Tool::DrawText => ElementKind::Text(TextBlock {
                content: String::new(),
                size: state.config.text_size,
                spacing: state.config.text_spacing,
                color: state.config.text_color,
            }),
            Tool::Idle | Tool::Select => return false,
        };

        self.finish(state);
        let element = Element::new(kind).with_transform(Transform::at(position));
        let id = match state.store.insert(element, None) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Failed to start {} operation: {e}", tool.name());
                return false;
            }
        };

        self.operation = Some(if tool == Tool::DrawText {
            state.queue.push(EventKind::SelectElement { id });
            Operation::Typing(id)
        } else {
            Operation::Stroke(id)
        });
        tracing::debug!("Started {} operation on {id}", tool.name());
        true
    }

    fn drag(&mut self, state: &mut CanvasState, position: Vec2) -> bool {
        let Some(Operation::Stroke(id)) = self.operation else {
            return false;
        };
        set_stroke_end(state, id, position);
        true
    }

    fn release(&mut self, state: &mut CanvasState, position: Vec2) -> bool {
        let Some(Operation::Stroke(id)) = self.operation else {
            return false;
        };
        set_stroke_end(state, id, position);
        self.operation = None;

        if stroke_is_valid(state, id) {
            state.queue.push(EventKind::SelectElement { id });
            state.queue.push(EventKind::SelectTool { tool: Tool::Select });
            state.queue.push(EventKind::MakeSnapshot);
        } else {
            tracing::debug!("Discarding degenerate stroke {id}");
            state.store.schedule_destruction(id);
        }
        true
    }

    fn type_text(&mut self, state: &mut CanvasState, text: &str) -> bool {
        let Some(Operation::Typing(id)) = self.operation else {
            return false;
        };
        if let Some(block) = state.store.get_mut(id).and_then(Element::text_mut) {
            block.content.push_str(text);
        }
        true
    }

    fn edit_key(&mut self, state: &mut CanvasState, key: Key) -> bool {
        let Some(Operation::Typing(id)) = self.operation else {
            return false;
        };
        match key {
            Key::Backspace => {
                if let Some(block) = state.store.get_mut(id).and_then(Element::text_mut) {
                    block.content.pop();
                }
            }
            Key::Enter | Key::Escape => {
                if self.finish(state) {
                    state.queue.push(EventKind::SelectTool { tool: Tool::Select });
                }
            }
            // Printable keys arrive again as text input.
            Key::Character(_) | Key::Tab | Key::Delete => {}
        }
        true
    }

    /// Close the open operation. Returns whether an element was kept.
    fn finish(&mut self, state: &mut CanvasState) -> bool {
        let Some(op) = self.operation.take() else {
            return false;
        };
        let id = op.element();
        let keep = match op {
            Operation::Stroke(_) => stroke_is_valid(state, id),
            Operation::Typing(_) => state
                .store
                .get(id)
                .and_then(Element::text)
                .is_some_and(|t| !t.content.is_empty()),
        };

        if keep {
            tracing::debug!("Finalized operation on {id}");
            state.queue.push(EventKind::MakeSnapshot);
        } else {
            tracing::debug!("Discarded unfinished operation on {id}");
            state.store.schedule_destruction(id);
        }
        keep
    }
}

fn set_stroke_end(state: &mut CanvasState, id: ElementId, position: Vec2) {
    if let Some(element) = state.store.get_mut(id) {
        let local = element.transform.to_affine().inverse().transform_point2(position);
        if let Some(line) = element.line_mut() {
            line.end = local;
        }
    }
}

fn stroke_is_valid(state: &CanvasState, id: ElementId) -> bool {
    state
        .store
        .get(id)
        .and_then(Element::line)
        .is_some_and(|line| line.length() >= state.config.min_line_length)
}
