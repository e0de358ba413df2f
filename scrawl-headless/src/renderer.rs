//! A renderer that records draw calls instead of drawing.

use glam::{Affine2, Vec2};
use image::RgbaImage;
use scrawl_core::{Color, Rect, Renderer, TextureHandle};
use serde::Serialize;

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
#[allow(missing_docs)] // Fields mirror the Renderer trait arguments
pub enum DrawCommand {
    /// A texture upload.
    LoadTexture {
        handle: TextureHandle,
        width: u32,
        height: u32,
    },
    /// A stroked segment.
    Line {
        begin: Vec2,
        end: Vec2,
        thickness: f32,
        color: Color,
    },
    /// A filled triangle.
    Triangle { points: [Vec2; 3], color: Color },
    /// A textured quad placed at `origin`.
    Texture { handle: TextureHandle, origin: Vec2 },
    /// A text run placed at `origin`.
    Text {
        text: String,
        origin: Vec2,
        size: f32,
        color: Color,
    },
    /// A rectangle outline.
    RectOutline {
        rect: Rect,
        thickness: f32,
        color: Color,
    },
}

/// Records every call, split into frames by [`RecordingRenderer::take_frame`].
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
    next_texture: u64,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since the last take.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand over and forget the calls recorded so far.
    pub fn take_frame(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Textures uploaded over the recorder's lifetime.
    #[must_use]
    pub fn textures_loaded(&self) -> u64 {
        self.next_texture
    }
}

impl Renderer for RecordingRenderer {
    fn load_texture(&mut self, image: &RgbaImage) -> TextureHandle {
        self.next_texture += 1;
        let handle = TextureHandle(self.next_texture);
        self.commands.push(DrawCommand::LoadTexture {
            handle,
            width: image.width(),
            height: image.height(),
        });
        handle
    }

    fn draw_line(&mut self, begin: Vec2, end: Vec2, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            begin,
            end,
            thickness,
            color,
        });
    }

    fn draw_triangle(&mut self, points: [Vec2; 3], color: Color) {
        self.commands.push(DrawCommand::Triangle { points, color });
    }

    fn draw_texture(&mut self, texture: TextureHandle, transform: &Affine2, _tint: Color) {
        self.commands.push(DrawCommand::Texture {
            handle: texture,
            origin: transform.translation,
        });
    }

    fn draw_text(&mut self, text: &str, transform: &Affine2, size: f32, _spacing: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin: transform.translation,
            size,
            color,
        });
    }

    fn draw_rect_outline(&mut self, rect: Rect, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::RectOutline {
            rect,
            thickness,
            color,
        });
    }
}
