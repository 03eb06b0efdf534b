use super::types::{ensure_non_empty, CompositeError, Mask};
use image::{imageops, Rgb, RgbImage};

/// Alpha-blend `foreground` over `background` using `mask` as opacity
///
/// `result = alpha * fg + (1 - alpha) * bg`, computed in f32 per channel and
/// rounded back to u8. The mask may be at any resolution; it is resized to the
/// foreground first. The background must already match the foreground.
pub fn blend(
    foreground: &RgbImage,
    mask: &Mask,
    background: &RgbImage,
) -> Result<RgbImage, CompositeError> {
    let _span = tracing::debug_span!("blend").entered();

    ensure_non_empty("foreground", foreground.dimensions())?;
    ensure_non_empty("mask", mask.dimensions())?;

    if background.dimensions() != foreground.dimensions() {
        return Err(CompositeError::DimensionMismatch {
            foreground: foreground.dimensions(),
            background: background.dimensions(),
        });
    }

    let (width, height) = foreground.dimensions();
    let alpha = resize_mask(mask, width, height);

    let result = RgbImage::from_fn(width, height, |x, y| {
        let a = to_alpha(alpha.get_pixel(x, y)[0]);
        let fg = foreground.get_pixel(x, y);
        let bg = background.get_pixel(x, y);
        Rgb([mix(fg[0], bg[0], a), mix(fg[1], bg[1], a), mix(fg[2], bg[2], a)])
    });

    Ok(result)
}

/// Resize a mask to the given dimensions with bilinear filtering
pub fn resize_mask(mask: &Mask, width: u32, height: u32) -> Mask {
    if mask.dimensions() == (width, height) {
        return mask.clone();
    }

    tracing::debug!(
        "Resizing mask {}x{} -> {}x{}",
        mask.width(),
        mask.height(),
        width,
        height
    );
    imageops::resize(mask, width, height, imageops::FilterType::Triangle)
}

fn to_alpha(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn mix(fg: u8, bg: u8, alpha: f32) -> u8 {
    let value = alpha * fg as f32 + (1.0 - alpha) * bg as f32;
    value.round().clamp(0.0, 255.0) as u8
}
