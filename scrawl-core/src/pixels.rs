//! Clipboard bitmap normalization to RGBA8.

use image::RgbaImage;

use crate::error::{CanvasError, CanvasResult};
use crate::platform::{ClipboardImage, ImageSpec};

/// Convert a clipboard bitmap to tightly packed RGBA8.
///
/// Rows are read `bytes_per_row` apart, so padded strides decode the same as
/// packed ones. Sources without an alpha channel come out opaque, and so do
/// 24-bit sources whatever alpha shift they report.
///
/// # Errors
///
/// Returns [`CanvasError::InvalidImage`] if the size is zero, the pixel
/// format is not 24 or 32 bits with byte-aligned channels, the stride is
/// shorter than a packed row, or the buffer ends before the last row.
pub fn normalize_rgba(image: &ClipboardImage) -> CanvasResult<RgbaImage> {
    let spec = &image.spec;
    validate(spec, image.bytes.len())?;

    let bpp = spec.bytes_per_pixel() as usize;
    let stride = spec.bytes_per_row as usize;
    let width = spec.width as usize;
    let channel = |shift: u32| (shift / 8) as usize;
    let (r, g, b) = (
        channel(spec.red_shift),
        channel(spec.green_shift),
        channel(spec.blue_shift),
    );
    let a = if bpp == 4 {
        spec.alpha_shift.map(channel)
    } else {
        None
    };

    let mut rgba = Vec::with_capacity(width * spec.height as usize * 4);
    for row in image.bytes.chunks(stride).take(spec.height as usize) {
        for pixel in row[..width * bpp].chunks_exact(bpp) {
            rgba.extend_from_slice(&[
                pixel[r],
                pixel[g],
                pixel[b],
                a.map_or(u8::MAX, |a| pixel[a]),
            ]);
        }
    }

    RgbaImage::from_raw(spec.width, spec.height, rgba)
        .ok_or_else(|| CanvasError::InvalidImage("pixel buffer size mismatch".to_string()))
}

fn validate(spec: &ImageSpec, available: usize) -> CanvasResult<()> {
    let invalid = |reason: String| Err(CanvasError::InvalidImage(reason));

    if spec.width == 0 || spec.height == 0 {
        return invalid(format!("empty image {}x{}", spec.width, spec.height));
    }
    if !matches!(spec.bits_per_pixel, 24 | 32) {
        return invalid(format!("unsupported {} bits per pixel", spec.bits_per_pixel));
    }

    let pixel_bits = spec.bits_per_pixel;
    let shifts = [
        Some(spec.red_shift),
        Some(spec.green_shift),
        Some(spec.blue_shift),
        spec.alpha_shift,
    ];
    if let Some(bad) = shifts
        .into_iter()
        .flatten()
        .find(|shift| shift % 8 != 0 || shift.saturating_add(8) > pixel_bits)
    {
        return invalid(format!("channel shift {bad} outside a {pixel_bits}-bit pixel"));
    }

    let packed_row = spec.width as usize * spec.bytes_per_pixel() as usize;
    let stride = spec.bytes_per_row as usize;
    if stride < packed_row {
        return invalid(format!("stride {stride} shorter than row of {packed_row} bytes"));
    }

    let required = (spec.height as usize - 1)
        .checked_mul(stride)
        .and_then(|n| n.checked_add(packed_row));
    match required {
        Some(required) if required <= available => Ok(()),
        Some(required) => invalid(format!(
            "buffer holds {available} bytes, {required} required"
        )),
        None => invalid("image dimensions overflow".to_string()),
    }
}
