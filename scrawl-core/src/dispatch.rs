//! Event routing: per-type handler dispatch and the priority-ordered
//! listener stack.

use crate::event::{Event, EventKind, EventType};

/// Routes one event to the handler registered for its type.
///
/// ```
/// use scrawl_core::{Event, EventDispatcher, EventKind, EventType};
///
/// let mut event = Event::new(EventKind::Undo);
/// let mut dispatcher = EventDispatcher::new(&mut event);
/// dispatcher.handle(EventType::Redo, |_| true);
/// dispatcher.handle(EventType::Undo, |_| true);
/// assert!(event.handled);
/// ```
#[derive(Debug)]
pub struct EventDispatcher<'a> {
    event: &'a mut Event,
}

impl<'a> EventDispatcher<'a> {
    /// Wrap an event for dispatch.
    pub fn new(event: &'a mut Event) -> Self {
        Self { event }
    }

    /// Run `handler` if the event is of `event_type` and still unhandled.
    ///
    /// The handler's return value becomes the handled flag. Returns the
    /// handled flag after the call.
    pub fn handle<F>(&mut self, event_type: EventType, handler: F) -> bool
    where
        F: FnOnce(&EventKind) -> bool,
    {
        if !self.event.handled && self.event.event_type() == event_type {
            self.event.handled = handler(&self.event.kind);
        }
        self.event.handled
    }

    /// Whether the event has been handled.
    #[must_use]
    pub fn handled(&self) -> bool {
        self.event.handled
    }
}

/// Position of a listener in the stack; lower values see events first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerPriority {
    /// GUI overlays drawn above the canvas.
    Overlay,
    /// Canvas interaction.
    Canvas,
    /// Fallbacks such as global shortcuts.
    Background,
}

/// Listeners ordered by priority, insertion order within a priority.
#[derive(Debug, Clone)]
pub struct ListenerStack<L> {
    entries: Vec<(ListenerPriority, L)>,
}

impl<L> Default for ListenerStack<L> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<L> ListenerStack<L> {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener after every listener of equal or higher priority.
    pub fn push(&mut self, priority: ListenerPriority, listener: L) {
        let at = self.entries.partition_point(|(p, _)| *p <= priority);
        self.entries.insert(at, (priority, listener));
    }

    /// Offer `event` to each listener in order until one handles it.
    pub fn dispatch<F>(&mut self, event: &mut Event, mut deliver: F)
    where
        F: FnMut(&mut L, &mut Event),
    {
        for (_, listener) in &mut self.entries {
            if event.handled {
                break;
            }
            deliver(listener, event);
        }
    }

    /// Listeners in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.entries.iter().map(|(_, l)| l)
    }

    /// Mutable listeners in dispatch order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut L> {
        self.entries.iter_mut().map(|(_, l)| l)
    }

    /// Number of listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
