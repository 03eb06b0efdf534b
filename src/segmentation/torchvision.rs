use super::preprocess::{class_probability, Preprocessor};
use super::types::{SegmentationModel, PERSON};
use crate::compositor::Mask;
use crate::registry::ModelKind;
use anyhow::{Context, Result};
use image::RgbImage;
use ndarray::Ix4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;

/// Torchvision semantic-segmentation network exported to ONNX
///
/// Expects one `[1, 3, H, W]` input and emits `[1, C, H, W]` class logits as its
/// first output. The mask comes back at the network's input resolution.
pub struct TorchvisionSegmenter {
    session: Session,
    preprocessor: Preprocessor,
    kind: ModelKind,
    name: String,
    person_index: usize,
}

impl TorchvisionSegmenter {
    /// Load a model from an ONNX file
    ///
    /// Fails if the model's label set has no person class.
    pub fn new<P: AsRef<Path>>(model_path: P, kind: ModelKind) -> Result<Self> {
        let path = model_path.as_ref();

        let person_index = kind
            .categories()
            .index_of(PERSON)
            .with_context(|| format!("{} cannot segment people", kind))?;

        tracing::info!("Loading {} model from {}", kind, path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        tracing::info!("{} model loaded successfully", kind.name());

        Ok(Self {
            session,
            preprocessor: Preprocessor::default(),
            kind,
            name: kind.to_string(),
            person_index,
        })
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }
}

impl SegmentationModel for TorchvisionSegmenter {
    fn segment(&mut self, image: &RgbImage) -> Result<Mask> {
        let _span = tracing::debug_span!("torchvision_segment").entered();

        let input_tensor = self.preprocessor.preprocess(image)?;

        let _infer_span = tracing::debug_span!("inference").entered();
        let outputs = self
            .session
            .run(ort::inputs![TensorRef::from_array_view(input_tensor.view())?])
            .context("Failed to run inference")?;
        drop(_infer_span);

        let logits = outputs[0]
            .try_extract_array::<f32>()?
            .into_dimensionality::<Ix4>()
            .context("Segmentation output is not 4-dimensional")?;

        let mask = class_probability(logits, self.person_index)?;
        Ok(mask)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
