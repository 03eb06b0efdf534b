use anyhow::{Context, Result};
use clap::Parser;
use joriro::compositor::{resize_mask, Compositor};
use joriro::input::{ImageFile, ImageSource};
use joriro::output::{JpegFileOutput, OutputSink};
use joriro::registry::{ModelKind, Place};
use joriro::segmentation;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Photo of the person
    #[arg(short, long)]
    image: PathBuf,

    /// Landmark background (1-5 or name: 6.25, haeundae, hallasan, panmunjeom, seokguram)
    #[arg(short, long)]
    place: Place,

    /// Segmentation model (1-3 or name: quality, balanced, performance)
    #[arg(short, long, default_value = "balanced")]
    model: ModelKind,

    /// Directory holding the ONNX model exports
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,

    /// Directory holding the landmark background images
    #[arg(long, default_value = "background_image")]
    backgrounds_dir: PathBuf,

    /// Directory results are written to
    #[arg(short, long, default_value = "media/joriro/result")]
    output_dir: PathBuf,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 95)]
    quality: u8,

    /// Write the person mask (grayscale silhouette) instead of the composite
    #[arg(long)]
    show_matte: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("Joriro starting");
    tracing::info!("Image: {}", args.image.display());
    tracing::info!("Place: {}", args.place);
    tracing::info!("Model: {}", args.model);

    let load_start = Instant::now();
    let foreground = ImageFile::new(&args.image)
        .read_image()
        .context("Failed to load photo")?;
    let background = if args.show_matte {
        None
    } else {
        let image = ImageFile::new(args.place.background_path(&args.backgrounds_dir))
            .read_image()
            .with_context(|| format!("Failed to load background for {}", args.place))?;
        Some(image)
    };
    let load_time = load_start.elapsed();

    let model = segmentation::create_model(args.model, &args.models_dir)
        .context("Failed to load segmentation model")?;
    let mut compositor = Compositor::new(model);

    let process_start = Instant::now();
    let result = match &background {
        Some(background) => compositor
            .composite(&foreground, background)
            .context("Failed to composite photo")?
            .into_image(),
        None => {
            // Visualize the mask at photo resolution
            let mask = compositor.segment(&foreground)?;
            let (width, height) = foreground.dimensions();
            segmentation::mask_to_rgb(&resize_mask(&mask, width, height))
        }
    };
    let process_time = process_start.elapsed();

    let output_start = Instant::now();
    let mut output = JpegFileOutput::new(&args.output_dir, args.quality);
    let path = output
        .write_result(&result, &args.image)
        .context("Failed to write result")?;
    let output_time = output_start.elapsed();

    tracing::info!(
        "Done: load={:.1}ms, process={:.1}ms, output={:.1}ms -> {}",
        load_time.as_secs_f64() * 1000.0,
        process_time.as_secs_f64() * 1000.0,
        output_time.as_secs_f64() * 1000.0,
        path.display()
    );

    Ok(())
}
