use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use flypeak_core::{DetectionRequest, Image};
use flypeak_detect::Detector;

#[derive(Parser)]
#[command(name = "flypeak", about = "Fly centroid detection service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a JSON config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the detection server.
    Serve {
        /// Interface to bind (overrides config).
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the pipeline on one image file and print JSON results.
    Process {
        /// Input image path (PNG/JPEG).
        #[arg(required = true)]
        input: PathBuf,
        /// Include the full heatmap in the output.
        #[arg(long)]
        heatmap: bool,
        /// Upsample the heatmap to the input image's dimensions.
        #[arg(long)]
        upsample: bool,
    },
}

/// Load a grayscale frame from disk and run it through the detector.
pub fn process_file(
    detector: &Detector,
    path: &Path,
    heatmap: bool,
    upsample: bool,
) -> anyhow::Result<()> {
    let gray = image::open(path)?.to_luma8();
    let (width, height) = gray.dimensions();
    tracing::info!(file = %path.display(), width, height, "processing image");

    let req = DetectionRequest {
        image: Image::gray(height, width, gray.into_raw()),
        return_heatmap: heatmap,
        return_peaks: true,
        upsample_heatmap: upsample,
    };
    let rep = detector.handle(&req)?;

    println!("{}", serde_json::to_string_pretty(&rep)?);
    Ok(())
}
