//! superres CLI - upscale one image with a pretrained ESRGAN checkpoint.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use superres::{Config, Pipeline};

/// Upscale a single image 4x using a pretrained ESRGAN checkpoint.
#[derive(Parser, Debug)]
#[command(name = "superres")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path.
    #[arg(value_name = "INPUT", default_value = "images/out.png")]
    input: PathBuf,

    /// Output image path.
    #[arg(value_name = "OUTPUT", default_value = "images/out_sp.png")]
    output: PathBuf,

    /// Path to the ONNX checkpoint.
    #[arg(short, long, default_value = "RRDB_ESRGAN_x4.onnx", value_name = "PATH")]
    checkpoint: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("superres={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    let config = Config {
        checkpoint: args.checkpoint.clone(),
    };

    let mut pipeline = Pipeline::new(&config).context("Failed to initialize pipeline")?;

    pipeline
        .process(&args.input, &args.output)
        .context("Failed to upscale image")?;

    println!(
        "Successfully upscaled {} -> {}",
        args.input.display(),
        args.output.display()
    );

    Ok(())
}
