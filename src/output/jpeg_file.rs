use super::OutputSink;
use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const DEFAULT_QUALITY: u8 = 95;

/// Writes results as `<dir>/<upload name>.jpg`
pub struct JpegFileOutput {
    dir: PathBuf,
    quality: u8,
}

impl JpegFileOutput {
    pub fn new<P: AsRef<Path>>(dir: P, quality: u8) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            quality: quality.clamp(1, 100),
        }
    }

    /// Result path for an uploaded file
    ///
    /// The name is everything before the first dot, so `me.final.png` becomes `me.jpg`.
    pub fn result_path(&self, source: &Path) -> PathBuf {
        let file_name = source.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let stem = match file_name.split('.').next() {
            Some(stem) if !stem.is_empty() => stem,
            _ => "result",
        };
        self.dir.join(format!("{}.jpg", stem))
    }
}

impl OutputSink for JpegFileOutput {
    fn write_result(&mut self, image: &RgbImage, source: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.result_path(source);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), self.quality);
        image
            .write_with_encoder(encoder)
            .with_context(|| format!("Failed to encode {}", path.display()))?;

        tracing::info!("Saved result to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_result_path_uses_upload_name() {
        let output = JpegFileOutput::new("media/joriro/result", DEFAULT_QUALITY);
        assert_eq!(
            output.result_path(Path::new("joriro/2024/05/selfie.final.png")),
            PathBuf::from("media/joriro/result/selfie.jpg")
        );
        assert_eq!(
            output.result_path(Path::new(".hidden")),
            PathBuf::from("media/joriro/result/result.jpg")
        );
    }

    #[test]
    fn test_writes_jpeg_and_creates_directory() {
        let dir = std::env::temp_dir()
            .join(format!("joriro-output-{}", std::process::id()))
            .join("result");
        let mut output = JpegFileOutput::new(&dir, DEFAULT_QUALITY);
        let image = RgbImage::from_pixel(30, 40, Rgb([105, 55, 30]));

        let path = output.write_result(&image, Path::new("upload.png")).unwrap();
        assert_eq!(path, dir.join("upload.jpg"));

        let written = image::open(&path).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (30, 40));
        let pixel = written.get_pixel(15, 20);
        for (actual, expected) in pixel.0.iter().zip([105u8, 55, 30]) {
            assert!(actual.abs_diff(expected) <= 3, "{:?}", pixel);
        }

        std::fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }
}
