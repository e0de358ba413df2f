use crate::dispatch::EventDispatcher;
use crate::element::{Element, ElementKind, ImageData, Transform};
use crate::event::{Event, EventKind, EventType, Tool};
use crate::pixels::normalize_rgba;
use crate::state::CanvasContext;

/// Pastes clipboard images at the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasteImageController;

impl PasteImageController {
    /// Handle [`EventKind::Paste`].
    pub fn on_event(&mut self, event: &mut Event, ctx: &mut CanvasContext<'_>) {
        EventDispatcher::new(event).handle(EventType::Paste, |_| paste_image(ctx));
    }
}

/// Place the clipboard image on the canvas.
///
/// Only acts when the clipboard holds an image and no text. On success the
/// new element is selected, the select tool activated and a checkpoint
/// requested, all through the queue. Every failure path leaves the canvas
/// untouched and returns `false`.
fn paste_image(ctx: &mut CanvasContext<'_>) -> bool {
    if !ctx.clipboard.has_image() || ctx.clipboard.has_text() {
        tracing::debug!("Clipboard has no standalone image; paste ignored");
        return false;
    }

    let Some(raw) = ctx.clipboard.get_image() else {
        tracing::warn!("Clipboard reported an image but returned none");
        return false;
    };
    let rgba = match normalize_rgba(&raw) {
        Ok(rgba) => rgba,
        Err(e) => {
            tracing::warn!("Skipping paste: {e}");
            return false;
        }
    };

    let state = &mut *ctx.state;
    let texture = ctx.renderer.load_texture(&rgba);
    let element = Element::new(ElementKind::Image(ImageData {
        texture,
        width: rgba.width(),
        height: rgba.height(),
    }))
    .with_transform(Transform::at(state.pointer));

    let id = match state.store.insert(element, None) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Failed to insert pasted image: {e}");
            return false;
        }
    };

    state.queue.push(EventKind::SelectElement { id });
    state.queue.push(EventKind::SelectTool { tool: Tool::Select });
    state.queue.push(EventKind::MakeSnapshot);

    tracing::info!(
        "Pasted {}x{} image as {id} at ({}, {})",
        rgba.width(),
        rgba.height(),
        state.pointer.x,
        state.pointer.y
    );
    true
}
