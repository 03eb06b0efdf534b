mod image_file;

pub use image_file::ImageFile;

use anyhow::Result;
use image::RgbImage;

/// Trait for image sources feeding the compositor
pub trait ImageSource {
    /// Read the image as 3-channel RGB
    fn read_image(&mut self) -> Result<RgbImage>;
}
