//! Host-facing seams: rendering backend and system clipboard.
//!
//! The core never talks to a GPU, window or OS clipboard directly. Hosts
//! implement these traits and hand them to the canvas each frame.

use glam::{Affine2, Vec2};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::element::{Color, Rect, TextureHandle};

/// Draw primitives and texture upload.
pub trait Renderer {
    /// Upload an RGBA8 image and return a handle for later draws.
    fn load_texture(&mut self, image: &RgbaImage) -> TextureHandle;

    /// Stroke a segment in canvas space.
    fn draw_line(&mut self, begin: Vec2, end: Vec2, thickness: f32, color: Color);

    /// Fill a triangle in canvas space.
    fn draw_triangle(&mut self, points: [Vec2; 3], color: Color);

    /// Draw a texture with its top-left corner at the transform origin.
    fn draw_texture(&mut self, texture: TextureHandle, transform: &Affine2, tint: Color);

    /// Draw a text run with its top-left corner at the transform origin.
    fn draw_text(&mut self, text: &str, transform: &Affine2, size: f32, spacing: f32, color: Color);

    /// Stroke an axis-aligned rectangle.
    fn draw_rect_outline(&mut self, rect: Rect, thickness: f32, color: Color);
}

/// Read access to the system clipboard.
pub trait Clipboard {
    /// Whether an image is available.
    fn has_image(&self) -> bool;

    /// Whether text is available.
    fn has_text(&self) -> bool;

    /// Fetch the image, or `None` if the provider fails.
    fn get_image(&mut self) -> Option<ClipboardImage>;
}

/// A clipboard provider that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyClipboard;

impl Clipboard for EmptyClipboard {
    fn has_image(&self) -> bool {
        false
    }

    fn has_text(&self) -> bool {
        false
    }

    fn get_image(&mut self) -> Option<ClipboardImage> {
        None
    }
}

/// Pixel layout of a clipboard bitmap.
///
/// Channel shifts are bit offsets inside one pixel, so a shift of 16 means
/// the channel lives in byte 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bits per pixel, 24 or 32.
    pub bits_per_pixel: u32,
    /// Stride between row starts, at least `width * bytes_per_pixel`.
    pub bytes_per_row: u32,
    /// Bit offset of red.
    pub red_shift: u32,
    /// Bit offset of green.
    pub green_shift: u32,
    /// Bit offset of blue.
    pub blue_shift: u32,
    /// Bit offset of alpha, if the format has one.
    pub alpha_shift: Option<u32>,
}

impl ImageSpec {
    /// Tightly packed RGBA, 4 bytes per pixel.
    #[must_use]
    pub fn rgba(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel: 32,
            bytes_per_row: width * 4,
            red_shift: 0,
            green_shift: 8,
            blue_shift: 16,
            alpha_shift: Some(24),
        }
    }

    /// Tightly packed RGB, 3 bytes per pixel.
    #[must_use]
    pub fn rgb(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel: 24,
            bytes_per_row: width * 3,
            red_shift: 0,
            green_shift: 8,
            blue_shift: 16,
            alpha_shift: None,
        }
    }

    /// Bytes in one pixel.
    #[must_use]
    pub fn bytes_per_pixel(&self) -> u32 {
        self.bits_per_pixel / 8
    }
}

/// Raw bitmap bytes as handed over by the clipboard provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    /// Pixel rows, `bytes_per_row` apart.
    pub bytes: Vec<u8>,
    /// Layout of `bytes`.
    pub spec: ImageSpec,
}
