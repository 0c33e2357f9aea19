//! Thin CLI driver for the airwatch pipeline. This is the demo frontend:
//! the library emits checkpoints and a structured response, and everything
//! rendered here stays here.

use airwatch::blobs::{BlobStore, TempFileBlobStore};
use airwatch::config::Config;
use airwatch::external::create_conditions_provider;
use airwatch::models::create_model_service;
use airwatch::pipeline::{Pipeline, ProgressSink, Request, Stage};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModalityArg {
    Text,
    Voice,
    Image,
}

#[derive(Parser)]
#[command(
    name = "airwatch",
    about = "Route an air-quality observation through the agent pipeline"
)]
struct Cli {
    /// Input modality
    #[arg(long, value_enum, default_value = "text")]
    modality: ModalityArg,

    /// Observation text, or a path to an audio/image file for voice/image
    input: String,

    /// Skip the external-conditions augmentation during Analysis
    #[arg(long)]
    no_external_data: bool,
}

struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn stage_complete(&self, stage: Stage) {
        eprintln!("[airwatch] {stage} complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airwatch=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if cli.no_external_data {
        config.pipeline.augment_with_external = false;
    }

    let models = create_model_service(&config)?;
    let conditions = create_conditions_provider(&config);
    let blobs: Arc<dyn BlobStore> =
        Arc::new(TempFileBlobStore::new(config.pipeline.blob_dir.clone()));

    let request = match cli.modality {
        ModalityArg::Text => Request::text(cli.input),
        ModalityArg::Voice | ModalityArg::Image => {
            let bytes = tokio::fs::read(&cli.input)
                .await
                .with_context(|| format!("read payload file {}", cli.input))?;
            let blob = blobs.store(&bytes).await?;
            match cli.modality {
                ModalityArg::Voice => Request::voice(blob),
                _ => Request::image(blob),
            }
        }
    };

    let pipeline = Pipeline::new(models, conditions, blobs, config.pipeline.clone())
        .with_progress(Arc::new(StderrProgress));

    info!("starting pipeline run");
    match pipeline.run(request).await {
        Ok(response) => {
            println!("{}", response.text);
            if response.alert {
                eprintln!("[airwatch] ALERT: high pollution detected, reduce outdoor activities");
            }
            Ok(())
        }
        Err(e) => {
            match e.stage() {
                Some(stage) => eprintln!("[airwatch] pipeline failed at {stage}: {e}"),
                None => eprintln!("[airwatch] pipeline failed: {e}"),
            }
            Err(e.into())
        }
    }
}
