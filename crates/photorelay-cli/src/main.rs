//! Photorelay CLI — upload a photo to the configured destinations.
//!
//! Destination configuration comes from the environment (`WEBDAV_*`,
//! `DROPBOX_*`, `PHOTO_*`, see photorelay-core); photo settings can be
//! overridden with flags. A `.env` file is honored.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use photorelay_cli::init_tracing;
use photorelay_core::{
    DestinationConfig, QualityTier, ResolutionTier, UploadRequest, UploadSettings,
};
use photorelay_pipeline::{DirectoryAlbum, TracingReporter, UploadPipeline};
use photorelay_processing::JpegTransformer;
use photorelay_storage::create_sinks;

#[derive(Parser)]
#[command(name = "photorelay", about = "Photo upload relay CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a photo to every enabled destination
    Upload {
        /// Path to the photo file
        file: PathBuf,
        /// Name the upload is stored under (defaults to a timestamp)
        #[arg(long, default_value = "")]
        name: String,
        /// Resolution tier: original, large, small (or legacy 0/1/2)
        #[arg(long)]
        resolution: Option<String>,
        /// Quality tier: high, medium, low (or legacy 0/1/2)
        #[arg(long)]
        quality: Option<String>,
        /// Also save a copy of the transformed photo to this directory
        #[arg(long)]
        album_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Upload {
            file,
            name,
            resolution,
            quality,
            album_dir,
        } => upload(file, name, resolution, quality, album_dir).await,
    }
}

async fn upload(
    file: PathBuf,
    name: String,
    resolution: Option<String>,
    quality: Option<String>,
    album_dir: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let destinations = DestinationConfig::from_env();
    let mut settings = UploadSettings::from_env()?;
    if let Some(ref value) = resolution {
        settings.resolution = ResolutionTier::parse(value)?;
    }
    if let Some(ref value) = quality {
        settings.quality = QualityTier::parse(value)?;
    }
    if album_dir.is_some() {
        settings.save_to_album = true;
    }

    let image = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let sinks = create_sinks(&destinations)?;
    let mut pipeline = UploadPipeline::new(
        destinations,
        settings,
        Arc::new(JpegTransformer),
        sinks,
        Arc::new(TracingReporter),
    );
    if let Some(dir) = album_dir {
        pipeline = pipeline.with_album(Arc::new(DirectoryAlbum::new(dir).await?));
    }

    let request = UploadRequest {
        image: image.into(),
        display_name: name,
        save_to_album: true,
    };

    let outcome = pipeline.run(request).await?;
    if outcome.is_success() {
        println!("Upload succeeded");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Upload failed");
        Ok(ExitCode::FAILURE)
    }
}
