//! The four-stage agent pipeline and its driver.
//!
//! Control flow is strictly sequential: Intake, then Vision (image modality
//! only), then Analysis, then Orchestration. Every stage's output is carried
//! forward; any unrecovered stage failure aborts the run with an error that
//! names the stage. The driver owns no rendering logic — progress is exposed
//! to callers through [`ProgressSink`].

pub mod analysis;
pub mod intake;
pub mod orchestrate;
pub mod vision;

use crate::blobs::{BlobRef, BlobStore};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::external::ExternalDataProvider;
use crate::models::ModelService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Input channel type for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Voice,
    Image,
}

/// Raw request payload: inline text, or a stored blob for voice/image.
#[derive(Debug, Clone)]
pub enum Payload {
    Inline(String),
    Blob(BlobRef),
}

/// One user observation, consumed by exactly one pipeline run.
#[derive(Debug, Clone)]
pub struct Request {
    pub modality: Modality,
    pub payload: Payload,
}

impl Request {
    pub fn text(observation: impl Into<String>) -> Self {
        Self {
            modality: Modality::Text,
            payload: Payload::Inline(observation.into()),
        }
    }

    pub fn voice(audio: BlobRef) -> Self {
        Self {
            modality: Modality::Voice,
            payload: Payload::Blob(audio),
        }
    }

    pub fn image(image: BlobRef) -> Self {
        Self {
            modality: Modality::Image,
            payload: Payload::Blob(image),
        }
    }
}

/// One step of the pipeline. Doubles as the checkpoint identifier reported
/// through [`ProgressSink`] and the stage tag on fatal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Intake,
    Vision,
    Analysis,
    Orchestration,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Intake => "Intake",
            Stage::Vision => "Vision",
            Stage::Analysis => "Analysis",
            Stage::Orchestration => "Orchestration",
        };
        f.write_str(name)
    }
}

/// Receives a checkpoint after each stage completes (Vision reports even
/// when skipped for non-image modalities). Implemented by the presentation
/// layer; the pipeline itself renders nothing.
pub trait ProgressSink: Send + Sync {
    fn stage_complete(&self, stage: Stage);
}

struct NoopSink;

impl ProgressSink for NoopSink {
    fn stage_complete(&self, _stage: Stage) {}
}

/// The terminal, user-facing output of a completed run. `alert` is the
/// structured form of the high-pollution heuristic, owned by the pipeline
/// rather than sniffed out of the text by a frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalResponse {
    pub text: String,
    pub alert: bool,
}

/// Driver over the four stages. Holds only shared, immutable dependencies,
/// so one instance serves concurrent runs.
pub struct Pipeline {
    pub(crate) models: Arc<dyn ModelService>,
    pub(crate) conditions: Arc<dyn ExternalDataProvider>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) config: PipelineConfig,
    progress: Arc<dyn ProgressSink>,
}

impl Pipeline {
    pub fn new(
        models: Arc<dyn ModelService>,
        conditions: Arc<dyn ExternalDataProvider>,
        blobs: Arc<dyn BlobStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            models,
            conditions,
            blobs,
            config,
            progress: Arc::new(NoopSink),
        }
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Run one request to Done or Failed. The payload blob, if any, is
    /// deleted on every exit path; prior stages' external calls are not
    /// compensable and are never rolled back.
    pub async fn run(&self, request: Request) -> Result<FinalResponse> {
        let result = self.run_stages(&request).await;

        if let Payload::Blob(blob) = &request.payload
            && let Err(e) = self.blobs.delete(blob).await
        {
            warn!(%blob, error = %e, "failed to delete request blob");
        }

        match &result {
            Ok(response) => info!(alert = response.alert, "pipeline run complete"),
            Err(e) => {
                let stage = e.stage().map(|s| s.to_string()).unwrap_or_default();
                warn!(stage = %stage, error = %e, "pipeline run failed");
            }
        }
        result
    }

    async fn run_stages(&self, request: &Request) -> Result<FinalResponse> {
        let intake_text = self.intake(request).await?;
        self.progress.stage_complete(Stage::Intake);

        let vision_text = if request.modality == Modality::Image {
            self.describe_image(request).await?
        } else {
            String::new()
        };
        self.progress.stage_complete(Stage::Vision);

        let analysis_text = self
            .analyze(&intake_text, self.config.augment_with_external)
            .await?;
        self.progress.stage_complete(Stage::Analysis);

        let response = self
            .orchestrate(&intake_text, &vision_text, &analysis_text)
            .await?;
        self.progress.stage_complete(Stage::Orchestration);

        Ok(response)
    }
}
