//! Deferred command queue.

use std::collections::VecDeque;

use crate::event::EventKind;

/// FIFO of commands waiting for the next drain pass.
///
/// The canvas takes the whole queue once per frame. Commands pushed while
/// that pass runs land in the fresh queue and wait for the next frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandQueue {
    pending: VecDeque<EventKind>,
}

impl CommandQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    pub fn push(&mut self, command: EventKind) {
        tracing::trace!("Queued {:?}", command.event_type());
        self.pending.push_back(command);
    }

    /// Take everything queued so far, leaving the queue empty.
    #[must_use]
    pub fn take_pass(&mut self) -> VecDeque<EventKind> {
        std::mem::take(&mut self.pending)
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queued commands, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &EventKind> {
        self.pending.iter()
    }

    /// Drop everything queued.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Tool;

    #[test]
    fn test_fifo_order() {
        let mut queue = CommandQueue::new();
        queue.push(EventKind::Undo);
        queue.push(EventKind::SelectTool { tool: Tool::Select });
        queue.push(EventKind::MakeSnapshot);

        let pass: Vec<_> = queue.take_pass().into_iter().collect();
        assert_eq!(
            pass,
            vec![
                EventKind::Undo,
                EventKind::SelectTool { tool: Tool::Select },
                EventKind::MakeSnapshot
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_during_pass_is_deferred() {
        let mut queue = CommandQueue::new();
        queue.push(EventKind::Paste);

        let pass = queue.take_pass();
        for _ in &pass {
            queue.push(EventKind::MakeSnapshot);
        }
        assert_eq!(pass.len(), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next(), Some(&EventKind::MakeSnapshot));
    }
}
