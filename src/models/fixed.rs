//! Deterministic, scripted ModelService for testing/dev (no network).

use crate::models::traits::{ModelError, ModelService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

type Scripted = std::result::Result<String, String>;

/// Returns fixed responses per capability and records every call so tests
/// can assert which capabilities ran and what they were fed.
pub struct FixedModelService {
    transcription: Scripted,
    description: Scripted,
    generations: Mutex<VecDeque<Scripted>>,
    default_generation: String,
    calls: Mutex<Vec<(String, String)>>,
}

impl Default for FixedModelService {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedModelService {
    pub fn new() -> Self {
        Self {
            transcription: Ok("transcribed observation".to_string()),
            description: Ok("hazy skyline with low visibility".to_string()),
            generations: Mutex::new(VecDeque::new()),
            default_generation: "generated response".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_transcription(mut self, text: impl Into<String>) -> Self {
        self.transcription = Ok(text.into());
        self
    }

    pub fn failing_transcription(mut self, message: impl Into<String>) -> Self {
        self.transcription = Err(message.into());
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Ok(text.into());
        self
    }

    pub fn failing_description(mut self, message: impl Into<String>) -> Self {
        self.description = Err(message.into());
        self
    }

    /// Queue a generation response; consumed in call order. When the queue
    /// runs dry, `generate` falls back to a fixed default.
    pub fn push_generation(self, text: impl Into<String>) -> Self {
        self.generations.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn push_failing_generation(self, message: impl Into<String>) -> Self {
        self.generations
            .lock()
            .unwrap()
            .push_back(Err(message.into()));
        self
    }

    /// Every call made so far, as (capability, input) pairs.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, capability: &str, input: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((capability.to_string(), input.to_string()));
    }
}

fn scripted_error(message: String) -> ModelError {
    ModelError::Api {
        status: 500,
        body: message,
    }
}

#[async_trait]
impl ModelService for FixedModelService {
    async fn transcribe(&self, _audio: &[u8], filename: &str) -> Result<String, ModelError> {
        self.record("transcribe", filename);
        self.transcription.clone().map_err(scripted_error)
    }

    async fn describe(
        &self,
        _image: &[u8],
        _mime: &str,
        instruction: &str,
        _max_tokens: u32,
    ) -> Result<String, ModelError> {
        self.record("describe", instruction);
        self.description.clone().map_err(scripted_error)
    }

    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, ModelError> {
        self.record("generate", prompt);
        match self.generations.lock().unwrap().pop_front() {
            Some(scripted) => scripted.map_err(scripted_error),
            None => Ok(self.default_generation.clone()),
        }
    }
}
