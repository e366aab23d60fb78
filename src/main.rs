//! Perception Kit - command-line front end
//!
//! Loads AR artifacts from documents or URLs and replays perceptual
//! observations against them, printing what is found and lost.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use perception_kit::{
    config::PerceptionConfig, loader::decode_json, DetectedImage, GeoCoordinates, Marker,
    MeaningMaker, NearbyResultDelta,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Parser)]
#[command(name = "perception-kit")]
#[command(version)]
#[command(about = "Match recognized markers, images and locations against AR artifacts")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PERCEPTION_KIT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load artifacts from a URL and list what can be detected
    Load {
        /// Page or JSON-LD document carrying artifacts
        url: Url,
    },

    /// Index artifact sources, then replay observations
    Scan {
        /// Files or URLs carrying artifacts
        #[arg(required = true)]
        sources: Vec<String>,

        /// Marker values seen (QR code contents)
        #[arg(short, long)]
        marker: Vec<String>,

        /// Image target ids seen
        #[arg(short, long)]
        image: Vec<String>,

        /// Observer latitude
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Observer longitude
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("perception_kit={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => PerceptionConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PerceptionConfig::default(),
    };

    match cli.command {
        Commands::Load { url } => {
            run_load(&config, &url).await?;
        }
        Commands::Scan {
            sources,
            marker,
            image,
            lat,
            lng,
        } => {
            let geo = lat.zip(lng).map(|(lat, lng)| GeoCoordinates::new(lat, lng));
            run_scan(&config, &sources, marker, image, geo).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_load(config: &PerceptionConfig, url: &Url) -> Result<()> {
    let maker = MeaningMaker::from_config(config)?;
    let artifacts = maker.load_artifacts_from_url(url).await;
    let images = maker.get_detectable_images().await;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "artifacts": artifacts,
            "detectableImages": images,
        }))?
    );
    Ok(())
}

async fn run_scan(
    config: &PerceptionConfig,
    sources: &[String],
    markers: Vec<String>,
    images: Vec<String>,
    geo: Option<GeoCoordinates>,
) -> Result<()> {
    let maker = MeaningMaker::from_config(config)?;

    for source in sources {
        let loaded = match Url::parse(source) {
            Ok(url) if url.scheme() != "file" => maker.load_artifacts_from_url(&url).await.len(),
            _ => load_file(&maker, source).await?,
        };
        tracing::info!(source = %source, artifacts = loaded, "Indexed source");
    }

    if let Some(geo) = geo {
        print_delta("geolocation", &maker.update_geolocation(geo).await)?;
    }
    for value in markers {
        let delta = maker.marker_found(Marker::qrcode(value.clone()), None).await;
        print_delta(&format!("marker {}", value), &delta)?;
    }
    for id in images {
        let delta = maker.image_found(DetectedImage::new(id.clone())).await;
        print_delta(&format!("image {}", id), &delta)?;
    }

    Ok(())
}

async fn load_file(maker: &MeaningMaker, source: &str) -> Result<usize> {
    let path = match Url::parse(source) {
        Ok(url) => url
            .to_file_path()
            .map_err(|_| anyhow::anyhow!("Invalid file URL: {}", source))?,
        Err(_) => PathBuf::from(source),
    };
    let path = std::fs::canonicalize(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let base = Url::from_file_path(&path)
        .map_err(|_| anyhow::anyhow!("Cannot build a URL for {}", path.display()))?;
    let content = tokio::fs::read_to_string(&path).await?;

    if is_json(&path) {
        let artifacts = decode_json(&content, &base)?;
        for artifact in &artifacts {
            maker.local_store().add_artifact(artifact.clone()).await;
        }
        Ok(artifacts.len())
    } else {
        Ok(maker.load_artifacts_from_document(&content, &base).await.len())
    }
}

fn is_json(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("json") | Some("jsonld")
    )
}

fn print_delta(event: &str, delta: &NearbyResultDelta) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "event": event,
            "found": delta.found,
            "lost": delta.lost,
        }))?
    );
    Ok(())
}

fn show_config(config: Option<&PerceptionConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
