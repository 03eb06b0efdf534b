use super::ImageSource;
use anyhow::{Context, Result};
use image::{ImageReader, RgbImage};
use std::path::{Path, PathBuf};

/// Image file on disk, in any format the `image` crate decodes
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for ImageFile {
    fn read_image(&mut self) -> Result<RgbImage> {
        let decoded = ImageReader::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?
            .with_guessed_format()
            .with_context(|| format!("Failed to read {}", self.path.display()))?
            .decode()
            .with_context(|| format!("Failed to decode {}", self.path.display()))?;

        // Alpha, grayscale and 16-bit images all end up as RGB8
        let rgb = decoded.to_rgb8();
        tracing::debug!(
            "Read {} ({}x{}, {:?})",
            self.path.display(),
            rgb.width(),
            rgb.height(),
            decoded.color()
        );

        Ok(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("joriro-input-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_reads_rgba_png_as_rgb() {
        let dir = scratch_dir("rgba");
        let path = dir.join("hanra.png");
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 128])).save(&path).unwrap();

        let image = ImageFile::new(&path).read_image().unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert!(image.pixels().all(|p| *p == Rgb([10, 20, 30])));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut source = ImageFile::new("/nonexistent/joriro/photo.jpg");
        let err = source.read_image().unwrap_err();
        assert!(err.to_string().contains("photo.jpg"));
    }
}
