use crate::event::Event;

/// Swallows input the GUI overlay wants for itself.
///
/// The host updates the capture flags every frame from its immediate-mode
/// GUI before handing input to the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayController {
    /// The overlay is under the pointer or dragging a widget.
    pub wants_pointer: bool,
    /// A GUI text field has keyboard focus.
    pub wants_keyboard: bool,
}

impl OverlayController {
    /// Mark captured input as handled so the canvas never sees it.
    pub fn on_event(&mut self, event: &mut Event) {
        let captured = (self.wants_pointer && event.is_pointer_event())
            || (self.wants_keyboard && event.is_key_event());
        if captured {
            tracing::trace!("Overlay captured {:?}", event.event_type());
            event.handled = true;
        }
    }
}
