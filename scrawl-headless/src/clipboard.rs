//! In-memory clipboard, optionally seeded from an image file.

use std::path::Path;

use scrawl_core::{Clipboard, ClipboardImage, ImageSpec};

use crate::error::HeadlessError;

/// Row alignment used when laying out seeded images, mimicking the padded
/// strides OS clipboards hand out.
const ROW_ALIGN: u32 = 16;

/// A clipboard holding at most one image and one text value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    /// Image contents.
    pub image: Option<ClipboardImage>,
    /// Text contents.
    pub text: Option<String>,
}

impl MemoryClipboard {
    /// An empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the image at `path` into a BGRA bitmap with padded rows.
    ///
    /// # Errors
    ///
    /// Returns [`HeadlessError::Image`] if the file cannot be opened or
    /// decoded.
    pub fn with_image_file(mut self, path: &Path) -> Result<Self, HeadlessError> {
        let decoded = image::open(path)
            .map_err(|source| HeadlessError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        self.image = Some(to_padded_bgra(&decoded));
        tracing::info!(
            "Clipboard seeded with {}x{} image from {}",
            decoded.width(),
            decoded.height(),
            path.display()
        );
        Ok(self)
    }

    /// Put `text` on the clipboard.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl Clipboard for MemoryClipboard {
    fn has_image(&self) -> bool {
        self.image.is_some()
    }

    fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    fn get_image(&mut self) -> Option<ClipboardImage> {
        self.image.clone()
    }
}

/// Lay out `rgba` as 32-bit BGRA with rows padded to [`ROW_ALIGN`] bytes.
#[must_use]
pub fn to_padded_bgra(rgba: &image::RgbaImage) -> ClipboardImage {
    let packed = rgba.width() * 4;
    let stride = packed.div_ceil(ROW_ALIGN) * ROW_ALIGN;
    let padding = (stride - packed) as usize;

    let mut bytes = Vec::with_capacity(stride as usize * rgba.height() as usize);
    for row in rgba.rows() {
        for pixel in row {
            let [r, g, b, a] = pixel.0;
            bytes.extend_from_slice(&[b, g, r, a]);
        }
        bytes.resize(bytes.len() + padding, 0);
    }

    ClipboardImage {
        bytes,
        spec: ImageSpec {
            width: rgba.width(),
            height: rgba.height(),
            bits_per_pixel: 32,
            bytes_per_row: stride,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
            alpha_shift: Some(24),
        },
    }
}
