//! Intake stage: normalize the raw request into a text representation.

use crate::error::{AirwatchError, Result};
use crate::pipeline::{Modality, Payload, Pipeline, Request};
use tracing::debug;

impl Pipeline {
    /// Text passes through unchanged; voice payloads are transcribed via the
    /// model service. Image payloads pass through as their blob reference —
    /// the real signal for images is produced by the Vision stage.
    pub(crate) async fn intake(&self, request: &Request) -> Result<String> {
        match (request.modality, &request.payload) {
            (Modality::Text, Payload::Inline(text)) => Ok(text.clone()),
            (Modality::Voice, Payload::Blob(blob)) => {
                let audio =
                    self.blobs
                        .read(blob)
                        .await
                        .map_err(|e| AirwatchError::BlobStore {
                            message: e.to_string(),
                        })?;
                let text = self
                    .models
                    .transcribe(&audio, "audio.wav")
                    .await
                    .map_err(|e| AirwatchError::Transcription {
                        message: e.to_string(),
                    })?;
                debug!(chars = text.len(), "transcription complete");
                Ok(text)
            }
            (Modality::Image, Payload::Blob(blob)) => Ok(blob.as_str().to_string()),
            (modality, _) => Err(AirwatchError::Internal {
                message: format!("{modality:?} request carries the wrong payload kind"),
            }),
        }
    }
}
