mod blend;
mod fit;
pub mod types;

pub use blend::{blend, resize_mask};
pub use fit::{fit_background, fit_to};
pub use types::{CompositeError, CompositeResult, Mask};

use crate::segmentation::SegmentationModel;
use anyhow::{Context, Result};
use image::RgbImage;
use std::time::Instant;

/// Replaces the background of person photos using one segmentation model
///
/// Every call is independent: segment, fit the background, blend.
pub struct Compositor {
    model: Box<dyn SegmentationModel>,
}

impl Compositor {
    pub fn new(model: Box<dyn SegmentationModel>) -> Self {
        Self { model }
    }

    /// Run the segmentation model alone
    pub fn segment(&mut self, foreground: &RgbImage) -> Result<Mask> {
        let segment_start = Instant::now();
        let mask = self
            .model
            .segment(foreground)
            .with_context(|| format!("{} failed to segment image", self.model.name()))?;

        tracing::debug!(
            "Segmentation produced {}x{} mask in {:.1}ms",
            mask.width(),
            mask.height(),
            segment_start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(mask)
    }

    /// Composite `foreground` onto `background`
    pub fn composite(
        &mut self,
        foreground: &RgbImage,
        background: &RgbImage,
    ) -> Result<CompositeResult> {
        let _span = tracing::debug_span!("composite").entered();

        let mask = self.segment(foreground)?;

        let fit_start = Instant::now();
        let fitted = fit_background(foreground, background).context("Failed to fit background")?;
        let fit_time = fit_start.elapsed();

        let blend_start = Instant::now();
        let blended = blend(foreground, &mask, &fitted).context("Failed to blend images")?;
        let blend_time = blend_start.elapsed();

        tracing::debug!(
            "fit={:.1}ms, blend={:.1}ms",
            fit_time.as_secs_f64() * 1000.0,
            blend_time.as_secs_f64() * 1000.0
        );

        Ok(CompositeResult::new(blended))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    /// Reports the same confidence everywhere, at a fixed model resolution
    struct UniformModel {
        value: f32,
    }

    impl SegmentationModel for UniformModel {
        fn segment(&mut self, _image: &RgbImage) -> Result<Mask> {
            Ok(Mask::from_pixel(52, 39, Luma([self.value])))
        }

        fn name(&self) -> &str {
            "uniform"
        }
    }

    struct FailingModel;

    impl SegmentationModel for FailingModel {
        fn segment(&mut self, _image: &RgbImage) -> Result<Mask> {
            anyhow::bail!("inference runtime unavailable")
        }
    }

    #[test]
    fn test_composite_blends_with_fitted_background() {
        let mut compositor = Compositor::new(Box::new(UniformModel { value: 0.5 }));
        let foreground = RgbImage::from_pixel(300, 400, Rgb([200, 100, 50]));
        let background = RgbImage::from_pixel(800, 800, Rgb([10, 10, 10]));

        let result = compositor.composite(&foreground, &background).unwrap();
        assert_eq!(result.dimensions(), (300, 400));
        assert!(result.image().pixels().all(|p| *p == Rgb([105, 55, 30])));
    }

    #[test]
    fn test_composite_repeats_identically() {
        let mut compositor = Compositor::new(Box::new(UniformModel { value: 1.0 }));
        let foreground = RgbImage::from_pixel(16, 16, Rgb([9, 9, 9]));
        let background = RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]));

        let first = compositor.composite(&foreground, &background).unwrap();
        let second = compositor.composite(&foreground, &background).unwrap();
        assert_eq!(first.image(), &foreground);
        assert_eq!(first.into_image(), second.into_image());
    }

    #[test]
    fn test_composite_propagates_model_failure() {
        let mut compositor = Compositor::new(Box::new(FailingModel));
        let foreground = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));

        let err = compositor.composite(&foreground, &foreground).unwrap_err();
        assert!(format!("{:#}", err).contains("inference runtime unavailable"));
    }

    #[test]
    fn test_composite_rejects_empty_foreground() {
        let mut compositor = Compositor::new(Box::new(UniformModel { value: 0.5 }));
        let background = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));

        let err = compositor.composite(&RgbImage::new(0, 0), &background).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CompositeError>(),
            Some(&CompositeError::EmptyImage("foreground"))
        );
    }
}
