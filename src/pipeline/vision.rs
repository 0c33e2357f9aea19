//! Vision stage: derive pollution-relevant cues from an image payload.

use crate::error::{AirwatchError, Result};
use crate::pipeline::{Payload, Pipeline, Request};
use crate::prompts;
use tracing::debug;

impl Pipeline {
    /// Invoked only for image-modality requests. Failure here is
    /// pipeline-fatal: an empty-string fallback would let downstream stages
    /// report success on a request whose actual signal was lost.
    pub(crate) async fn describe_image(&self, request: &Request) -> Result<String> {
        let Payload::Blob(blob) = &request.payload else {
            return Err(AirwatchError::Vision {
                message: "image request requires a stored blob payload".into(),
            });
        };

        let image = self
            .blobs
            .read(blob)
            .await
            .map_err(|e| AirwatchError::BlobStore {
                message: e.to_string(),
            })?;
        let mime = sniff_image_mime(&image);
        debug!(bytes = image.len(), mime, "describing image");

        let description = self
            .models
            .describe(
                &image,
                mime,
                prompts::VISION_INSTRUCTION,
                self.config.vision_max_tokens,
            )
            .await
            .map_err(|e| AirwatchError::Vision {
                message: e.to_string(),
            })?;

        if description.trim().is_empty() {
            return Err(AirwatchError::Vision {
                message: "model returned an empty description".into(),
            });
        }
        Ok(description)
    }
}

/// Guess the image MIME type from magic bytes; jpeg when unrecognized.
fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else {
        "image/jpeg"
    }
}
