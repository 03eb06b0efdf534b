//! Background swap for person photos: segment the person, fit a landmark
//! background to the photo, and alpha-blend the two.

pub mod compositor;
pub mod input;
pub mod output;
pub mod registry;
pub mod segmentation;

pub use compositor::{blend, fit_background, CompositeError, CompositeResult, Compositor, Mask};
pub use registry::{ModelKind, Place};
pub use segmentation::SegmentationModel;
