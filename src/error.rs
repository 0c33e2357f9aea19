//! Domain-specific error types for airwatch

use crate::pipeline::Stage;
use thiserror::Error;

/// Main error type for the airwatch pipeline.
///
/// Every stage-level failure is pipeline-fatal and surfaces as one of these
/// tagged variants so callers can name the failing stage without parsing
/// message strings.
#[derive(Error, Debug)]
pub enum AirwatchError {
    #[error("Transcription error: {message}")]
    Transcription { message: String },

    #[error("Vision service error: {message}")]
    Vision { message: String },

    #[error("Analysis service error: {message}")]
    Analysis { message: String },

    #[error("Orchestration error: {message}")]
    Orchestration { message: String },

    #[error("Blob store error: {message}")]
    BlobStore { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AirwatchError {
    /// The pipeline stage this error belongs to, if it is a stage failure.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Transcription { .. } => Some(Stage::Intake),
            Self::Vision { .. } => Some(Stage::Vision),
            Self::Analysis { .. } => Some(Stage::Analysis),
            Self::Orchestration { .. } => Some(Stage::Orchestration),
            Self::BlobStore { .. } | Self::Config { .. } | Self::Internal { .. } => None,
        }
    }
}

impl From<anyhow::Error> for AirwatchError {
    fn from(err: anyhow::Error) -> Self {
        AirwatchError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AirwatchError {
    fn from(err: serde_json::Error) -> Self {
        AirwatchError::Internal {
            message: err.to_string(),
        }
    }
}

/// Result type alias for airwatch operations
pub type Result<T> = std::result::Result<T, AirwatchError>;
