//! Fakes for unit tests.

use glam::{Affine2, Vec2};
use image::RgbaImage;

use crate::controller::Controller;
use crate::element::{Color, Rect, TextureHandle};
use crate::event::{Event, EventKind};
use crate::platform::{Clipboard, ClipboardImage, Renderer};
use crate::state::{CanvasContext, CanvasState};

#[derive(Debug, Default)]
pub(crate) struct TestClipboard {
    pub image: Option<ClipboardImage>,
    pub text: bool,
    pub fail_fetch: bool,
}

impl TestClipboard {
    pub fn with_image(image: ClipboardImage) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }
}

impl Clipboard for TestClipboard {
    fn has_image(&self) -> bool {
        self.image.is_some()
    }

    fn has_text(&self) -> bool {
        self.text
    }

    fn get_image(&mut self) -> Option<ClipboardImage> {
        if self.fail_fetch {
            return None;
        }
        self.image.clone()
    }
}

#[derive(Debug, Default)]
pub(crate) struct TestRenderer {
    pub textures: Vec<Vec<u8>>,
    pub lines: Vec<(Vec2, Vec2)>,
    pub triangles: usize,
    pub sprites: Vec<TextureHandle>,
    pub texts: Vec<String>,
    pub outlines: Vec<(f32, Color)>,
}

impl Renderer for TestRenderer {
    fn load_texture(&mut self, image: &RgbaImage) -> TextureHandle {
        self.textures.push(image.as_raw().clone());
        TextureHandle(u64::try_from(self.textures.len()).unwrap_or_default())
    }

    fn draw_line(&mut self, begin: Vec2, end: Vec2, _thickness: f32, _color: Color) {
        self.lines.push((begin, end));
    }

    fn draw_triangle(&mut self, _points: [Vec2; 3], _color: Color) {
        self.triangles += 1;
    }

    fn draw_texture(&mut self, texture: TextureHandle, _transform: &Affine2, _tint: Color) {
        self.sprites.push(texture);
    }

    fn draw_text(&mut self, text: &str, _transform: &Affine2, _size: f32, _spacing: f32, _color: Color) {
        self.texts.push(text.to_string());
    }

    fn draw_rect_outline(&mut self, _rect: Rect, thickness: f32, color: Color) {
        self.outlines.push((thickness, color));
    }
}

#[derive(Debug, Default)]
pub(crate) struct Harness {
    pub state: CanvasState,
    pub clipboard: TestClipboard,
    pub renderer: TestRenderer,
}

impl Harness {
    pub fn new(clipboard: TestClipboard) -> Self {
        Self {
            clipboard,
            ..Self::default()
        }
    }

    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut CanvasContext<'_>) -> R) -> R {
        let mut ctx = CanvasContext {
            state: &mut self.state,
            clipboard: &mut self.clipboard,
            renderer: &mut self.renderer,
        };
        f(&mut ctx)
    }

    /// Offer one event to a single controller and report whether it was
    /// handled.
    pub fn send(&mut self, controller: &mut Controller, kind: EventKind) -> bool {
        if let Some(position) = kind.pointer_position() {
            self.state.pointer = position;
        }
        let mut event = Event::new(kind);
        self.with_context(|ctx| controller.on_event(&mut event, ctx));
        event.handled
    }

    /// Queued commands, emptying the queue.
    pub fn take_queued(&mut self) -> Vec<EventKind> {
        self.state.queue.take_pass().into_iter().collect()
    }
}
