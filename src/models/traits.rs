use async_trait::async_trait;
use thiserror::Error;

/// Client-level failures from the hosted model API. Stages wrap these into
/// their own error variants so the pipeline can name the failing stage.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("http error: {0}")]
    Http(String),
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("api key not available: {0}")]
    Auth(String),
}

/// The three capabilities the pipeline consumes from the hosted model
/// provider. Implementations must be shareable across concurrent pipeline
/// runs without per-request mutation.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Speech-to-text over a raw audio payload.
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, ModelError>;

    /// Multimodal image description under a fixed instruction, with a
    /// bounded output length.
    async fn describe(
        &self,
        image: &[u8],
        mime: &str,
        instruction: &str,
        max_tokens: u32,
    ) -> Result<String, ModelError>;

    /// Plain text generation with a bounded output length.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ModelError>;
}
