//! MediaGuard CLI: run the moderation workflow for one object by hand.
//!
//! Reads the same environment as the HTTP service. Useful for replaying an event that
//! went to the dead-letter topic, or for checking what a classifier says about an object.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mediaguard_cli::{event_for, init_tracing, print_json, read_event};
use mediaguard_core::{Config, MediaKind};
use mediaguard_plugins::{Classifier, GoogleVideoIntelligenceClassifier, GoogleVisionClassifier};
use mediaguard_services::EventDispatcher;
use mediaguard_storage::create_storage;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediaguard", about = "Moderate uploaded images and videos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an object and remediate or pass it through, as the trigger would
    Moderate {
        /// Media type: image or video
        #[arg(long)]
        kind: MediaKind,
        /// Bucket-relative object path
        #[arg(long)]
        path: String,
        /// Bucket name (defaults to GCS_BUCKET)
        #[arg(long)]
        bucket: Option<String>,
        /// Content type of the object (guessed from the extension when omitted)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Replay a recorded storage object notification
    Replay {
        /// Media type the notification was delivered for
        #[arg(long)]
        kind: MediaKind,
        /// JSON file holding the storage object resource
        file: PathBuf,
    },
    /// Classify an object without changing anything
    Classify {
        /// Media type: image or video
        #[arg(long)]
        kind: MediaKind,
        /// Bucket-relative object path
        #[arg(long)]
        path: String,
        /// Bucket name (defaults to GCS_BUCKET)
        #[arg(long)]
        bucket: Option<String>,
    },
}

fn bucket_or_default(bucket: Option<String>, config: &Config) -> anyhow::Result<String> {
    bucket
        .or_else(|| config.gcs_bucket().map(String::from))
        .context("No bucket given. Pass --bucket or set GCS_BUCKET")
}

async fn dispatcher(config: &Config) -> anyhow::Result<EventDispatcher> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    EventDispatcher::from_config(config, storage)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let deadline = config.request_timeout();
    tracing::debug!(
        environment = %config.environment(),
        storage = %config.storage_backend(),
        timeout_secs = deadline.as_secs(),
        "Loaded configuration"
    );

    match cli.command {
        Commands::Moderate {
            kind,
            path,
            bucket,
            content_type,
        } => {
            let bucket = bucket_or_default(bucket, &config)?;
            let event = event_for(kind, &bucket, &path, content_type.as_deref());
            let dispatcher = dispatcher(&config).await?;

            let outcome = tokio::time::timeout(deadline, dispatcher.handle(kind, &event))
                .await
                .context("Timed out moderating object")??;
            print_json(&outcome)?;
        }
        Commands::Replay { kind, file } => {
            let event = read_event(&file)?;
            let dispatcher = dispatcher(&config).await?;

            let outcome = tokio::time::timeout(deadline, dispatcher.handle(kind, &event))
                .await
                .context("Timed out replaying event")??;
            print_json(&outcome)?;
        }
        Commands::Classify { kind, path, bucket } => {
            let bucket = bucket_or_default(bucket, &config)?;
            let uri = format!("gs://{}/{}", bucket, path);
            let classifier: Box<dyn Classifier> = match kind {
                MediaKind::Image => Box::new(GoogleVisionClassifier::from_config(&config)?),
                MediaKind::Video => {
                    Box::new(GoogleVideoIntelligenceClassifier::from_config(&config)?)
                }
            };

            let annotation = tokio::time::timeout(deadline, classifier.classify(&uri))
                .await
                .context("Timed out classifying object")??;
            print_json(&serde_json::json!({
                "uri": uri,
                "verdict": annotation.verdict().to_string(),
                "annotation": annotation,
            }))?;
        }
    }

    Ok(())
}
