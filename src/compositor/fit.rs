use super::types::{ensure_non_empty, CompositeError};
use image::{imageops, RgbImage};
use std::cmp::Ordering;

/// Fit a background to the foreground's dimensions
///
/// Steps:
/// 1. Scale uniformly so the height matches the foreground
/// 2. Center-crop the surplus width, or pad the missing width by repeating the edge columns
/// 3. Resize to exactly the foreground's dimensions
///
/// The crop/pad step splits the margin evenly with floor division, so it can land one
/// or two columns off; the last resize absorbs that.
pub fn fit_background(
    foreground: &RgbImage,
    background: &RgbImage,
) -> Result<RgbImage, CompositeError> {
    ensure_non_empty("foreground", foreground.dimensions())?;
    let (width, height) = foreground.dimensions();
    fit_to(background, width, height)
}

/// Same as [`fit_background`] with an explicit target size
pub fn fit_to(background: &RgbImage, width: u32, height: u32) -> Result<RgbImage, CompositeError> {
    let _span = tracing::debug_span!("fit_background").entered();

    ensure_non_empty("target", (width, height))?;
    ensure_non_empty("background", background.dimensions())?;

    let (bg_width, bg_height) = background.dimensions();
    let scaled_width = ((height as f64 * bg_width as f64 / bg_height as f64).round() as u32).max(1);
    let scaled = resize_exact(background, scaled_width, height);

    let margin = (scaled_width as i64 - width as i64).div_euclid(2);
    tracing::debug!(
        "Background {}x{} scaled to {}x{}, margin {}",
        bg_width,
        bg_height,
        scaled_width,
        height,
        margin
    );

    let adjusted = match margin.cmp(&0) {
        Ordering::Greater => {
            let margin = margin as u32;
            imageops::crop_imm(&scaled, margin, 0, scaled_width - 2 * margin, height).to_image()
        }
        Ordering::Equal => scaled,
        Ordering::Less => pad_replicate(&scaled, margin.unsigned_abs() as u32),
    };

    Ok(resize_exact(&adjusted, width, height))
}

/// Pad `columns` columns on the left and right by repeating the edge column
fn pad_replicate(image: &RgbImage, columns: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let last = width - 1;

    RgbImage::from_fn(width + 2 * columns, height, |x, y| {
        let source_x = x.saturating_sub(columns).min(last);
        *image.get_pixel(source_x, y)
    })
}

/// Bilinear resize, skipped when the size already matches
pub(crate) fn resize_exact(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, imageops::FilterType::Triangle)
}
