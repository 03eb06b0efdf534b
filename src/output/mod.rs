mod jpeg_file;

pub use jpeg_file::JpegFileOutput;

use anyhow::Result;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Trait for result destinations
pub trait OutputSink {
    /// Store `image` as the result for the uploaded file `source`
    ///
    /// Returns where it was written
    fn write_result(&mut self, image: &RgbImage, source: &Path) -> Result<PathBuf>;
}

/// Byte order of the three channels in a raw pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Interleaved pixel bytes in this order
    pub fn to_bytes(self, image: &RgbImage) -> Vec<u8> {
        match self {
            ChannelOrder::Rgb => image.as_raw().clone(),
            ChannelOrder::Bgr => image
                .pixels()
                .flat_map(|p| [p[2], p[1], p[0]])
                .collect(),
        }
    }
}
