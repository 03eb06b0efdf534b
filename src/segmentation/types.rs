use crate::compositor::Mask;
use anyhow::Result;
use image::RgbImage;
use thiserror::Error;

/// Label the compositor keeps from the segmentation output
pub const PERSON: &str = "person";

/// Pascal VOC labels, in the order torchvision segmentation weights emit them
pub const VOC_CATEGORIES: &[&str] = &[
    "__background__",
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SegmentationError {
    #[error("category '{0}' not found in model labels")]
    MissingCategory(String),
    #[error("model output has {channels} channels, expected more than class index {index}")]
    ClassOutOfRange { channels: usize, index: usize },
    #[error("unexpected model output shape {0:?}")]
    UnexpectedOutput(Vec<usize>),
}

/// Category labels of a segmentation model, indexed by output channel
#[derive(Debug, Clone, Copy)]
pub struct Categories(&'static [&'static str]);

impl Categories {
    pub const fn new(labels: &'static [&'static str]) -> Self {
        Self(labels)
    }

    pub fn index_of(&self, label: &str) -> Result<usize, SegmentationError> {
        self.0
            .iter()
            .position(|candidate| *candidate == label)
            .ok_or_else(|| SegmentationError::MissingCategory(label.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Trait for segmentation models
/// Allows swapping between backends (ONNX Runtime, test doubles, ...)
pub trait SegmentationModel {
    /// Process an image and return the person mask
    ///
    /// # Returns
    /// * Probabilities in 0.0-1.0 at the model's own resolution
    fn segment(&mut self, image: &RgbImage) -> Result<Mask>;

    /// Name used in logs and error messages
    fn name(&self) -> &str {
        "segmentation model"
    }
}
