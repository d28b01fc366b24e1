//! layout-eval command line front end.
//!
//! Drives the layout service from files: render recorded model output onto a
//! page image, or evaluate it against a COCO-style ground truth document.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use layout_eval::{EvalConfig, LayoutService, RecordedLayoutModel};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Document layout detection and evaluation
#[derive(Parser, Debug)]
#[command(name = "layout-eval", author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file (IoU threshold, line width, report precision)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw layout regions on an image
    Detect {
        /// Page image (PNG or JPEG)
        #[arg(long, value_name = "FILE")]
        image: PathBuf,

        /// Recorded model output: JSON array of {type, bbox: [x1, y1, x2, y2], score}
        #[arg(long, value_name = "FILE")]
        regions: PathBuf,

        /// Output PNG path
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Evaluate layout regions against ground truth
    Evaluate {
        /// Page image (PNG or JPEG)
        #[arg(long, value_name = "FILE")]
        image: PathBuf,

        /// Recorded model output: JSON array of {type, bbox: [x1, y1, x2, y2], score}
        #[arg(long, value_name = "FILE")]
        regions: PathBuf,

        /// COCO-style ground truth JSON
        #[arg(long, value_name = "FILE")]
        ground_truth: PathBuf,

        /// Write the report JSON here instead of stdout
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the service health status
    Health,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EvalConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EvalConfig::default(),
    };

    match args.command {
        Command::Detect {
            image,
            regions,
            output,
        } => {
            let service = load_service(&regions, config)?;
            let image_bytes = read(&image)?;
            let png = service.detect(&image_bytes)?;
            std::fs::write(&output, png)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(output = %output.display(), "wrote layout image");
        }
        Command::Evaluate {
            image,
            regions,
            ground_truth,
            output,
        } => {
            let service = load_service(&regions, config)?;
            let image_bytes = read(&image)?;
            let ground_truth_bytes = read(&ground_truth)?;
            let report = service.evaluate(&image_bytes, &ground_truth_bytes)?;
            let json = serde_json::to_string_pretty(&report)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(output = %path.display(), "wrote evaluation report");
                }
                None => println!("{}", json),
            }
        }
        Command::Health => {
            println!("{}", serde_json::to_string(&layout_eval::HealthStatus::ok())?);
        }
    }

    Ok(())
}

/// Load the model once and hand it to the service.
fn load_service(regions: &Path, config: EvalConfig) -> Result<LayoutService> {
    let model = RecordedLayoutModel::load(regions)?;
    Ok(LayoutService::new(Arc::new(model), config)?)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}
