mod preprocess;
#[cfg(feature = "onnx")]
mod torchvision;
pub mod types;

pub use preprocess::{class_probability, mask_to_rgb, Preprocessor};
#[cfg(feature = "onnx")]
pub use torchvision::TorchvisionSegmenter;
pub use types::{Categories, SegmentationError, SegmentationModel};

use crate::registry::ModelKind;
use anyhow::Result;
use std::path::Path;

/// Create the segmentation model for `kind` from its file in `models_dir`
#[cfg(feature = "onnx")]
pub fn create_model(kind: ModelKind, models_dir: &Path) -> Result<Box<dyn SegmentationModel>> {
    let model = TorchvisionSegmenter::new(kind.path_in(models_dir), kind)?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
pub fn create_model(kind: ModelKind, models_dir: &Path) -> Result<Box<dyn SegmentationModel>> {
    anyhow::bail!(
        "cannot load {} from {}: built without the `onnx` feature",
        kind,
        kind.path_in(models_dir).display()
    )
}

#[cfg(all(test, not(feature = "onnx")))]
mod tests {
    use super::*;

    #[test]
    fn test_create_model_requires_onnx_feature() {
        let err = create_model(ModelKind::Performance, Path::new("models")).err().unwrap();
        assert!(err.to_string().contains("onnx"));
    }
}
