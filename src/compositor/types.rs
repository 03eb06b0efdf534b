use image::{ImageBuffer, Luma, RgbImage};
use thiserror::Error;

/// Person-confidence mask: 0.0 = background, 1.0 = person
/// Dimensions are whatever the segmentation model produced
pub type Mask = ImageBuffer<Luma<f32>, Vec<f32>>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompositeError {
    #[error("{0} image has zero width or height")]
    EmptyImage(&'static str),
    #[error("background is {background:?} but foreground is {foreground:?}")]
    DimensionMismatch {
        foreground: (u32, u32),
        background: (u32, u32),
    },
}

/// Final blended image, same dimensions as the foreground it was made from
#[derive(Debug, Clone)]
pub struct CompositeResult {
    image: RgbImage,
}

impl CompositeResult {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Returns (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

pub(crate) fn ensure_non_empty(
    role: &'static str,
    dimensions: (u32, u32),
) -> Result<(), CompositeError> {
    if dimensions.0 == 0 || dimensions.1 == 0 {
        return Err(CompositeError::EmptyImage(role));
    }
    Ok(())
}
