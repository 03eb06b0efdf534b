use super::types::SegmentationError;
use crate::compositor::Mask;
use anyhow::Result;
use image::{imageops, Luma, RgbImage};
use ndarray::{s, Array4, ArrayView4, Axis};

/// Shorter side length the torchvision segmentation weights are evaluated at
pub const RESIZE_SHORTER: u32 = 520;

/// ImageNet channel statistics
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Preprocessor for converting RGB images to model input tensors
pub struct Preprocessor {
    resize_shorter: u32,
    mean: [f32; 3],
    std: [f32; 3],
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(RESIZE_SHORTER, IMAGENET_MEAN, IMAGENET_STD)
    }
}

impl Preprocessor {
    pub fn new(resize_shorter: u32, mean: [f32; 3], std: [f32; 3]) -> Self {
        Self {
            resize_shorter,
            mean,
            std,
        }
    }

    /// Dimensions the model sees for an image of the given size
    ///
    /// The shorter side becomes `resize_shorter`, the longer one keeps the
    /// aspect ratio and is truncated to an integer.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let short = self.resize_shorter as u64;
        if width <= height {
            let long = (short * height as u64 / width.max(1) as u64).max(1);
            (self.resize_shorter, long as u32)
        } else {
            let long = (short * width as u64 / height.max(1) as u64).max(1);
            (long as u32, self.resize_shorter)
        }
    }

    /// Preprocess an RGB image into a normalized NCHW tensor
    ///
    /// Steps:
    /// 1. Resize so the shorter side matches `resize_shorter`
    /// 2. Convert to float in [0, 1]
    /// 3. Normalize with the channel mean/std
    /// 4. Transpose from HWC to NCHW format
    ///
    /// Returns: Array4<f32> with shape [1, 3, height, width]
    pub fn preprocess(&self, image: &RgbImage) -> Result<Array4<f32>> {
        let _span = tracing::debug_span!("preprocess").entered();

        let (target_width, target_height) = self.target_dimensions(image.width(), image.height());
        let resized = if image.dimensions() != (target_width, target_height) {
            imageops::resize(image, target_width, target_height, imageops::FilterType::Triangle)
        } else {
            image.clone()
        };

        let mut tensor =
            Array4::<f32>::zeros((1, 3, target_height as usize, target_width as usize));

        for (x, y, pixel) in resized.enumerate_pixels() {
            for channel in 0..3 {
                let value = pixel[channel] as f32 / 255.0;
                tensor[[0, channel, y as usize, x as usize]] =
                    (value - self.mean[channel]) / self.std[channel];
            }
        }

        Ok(tensor)
    }
}

/// Softmax over the class axis of `[1, C, H, W]` logits, keeping channel `index`
///
/// Returns: mask at the logits' spatial resolution
pub fn class_probability(logits: ArrayView4<f32>, index: usize) -> Result<Mask, SegmentationError> {
    let _span = tracing::debug_span!("postprocess").entered();

    let (batch, channels, height, width) = logits.dim();
    if batch == 0 || height == 0 || width == 0 {
        return Err(SegmentationError::UnexpectedOutput(logits.shape().to_vec()));
    }
    if index >= channels {
        return Err(SegmentationError::ClassOutOfRange { channels, index });
    }

    let scores = logits.index_axis(Axis(0), 0);

    let mask = Mask::from_fn(width as u32, height as u32, |x, y| {
        let column = scores.slice(s![.., y as usize, x as usize]);
        let max = column.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
        let sum: f32 = column.iter().map(|&v| (v - max).exp()).sum();
        Luma([(column[index] - max).exp() / sum])
    });

    Ok(mask)
}

/// Convert a mask to a grayscale RGB image for visualization
pub fn mask_to_rgb(mask: &Mask) -> RgbImage {
    RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        let value = (mask.get_pixel(x, y)[0] * 255.0).round().clamp(0.0, 255.0) as u8;
        image::Rgb([value, value, value])
    })
}
