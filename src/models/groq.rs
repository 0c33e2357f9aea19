//! HTTP client for the hosted model API (Groq's OpenAI-compatible surface).

use crate::models::traits::{ModelError, ModelService};
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    transcription_model: String,
    vision_model: String,
    generation_model: String,
    timeout_ms: u64,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl GroqClient {
    pub fn new(
        base_url: String,
        api_key: String,
        transcription_model: String,
        vision_model: String,
        generation_model: String,
        timeout_ms: u64,
    ) -> Result<Self> {
        // One shared client, one timeout for every outbound call. Built once
        // so concurrent pipeline runs never touch its configuration.
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .context("Failed to build reqwest client with timeout")?;

        Ok(Self {
            client,
            base_url,
            api_key,
            transcription_model,
            vision_model,
            generation_model,
            timeout_ms,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn request_error(&self, err: reqwest::Error) -> ModelError {
        if err.is_timeout() {
            ModelError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            ModelError::Http(err.to_string())
        }
    }

    async fn chat(&self, body: Value) -> Result<String, ModelError> {
        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api { status, body });
        }

        let v: Value = response
            .json()
            .await
            .map_err(|e| ModelError::Parse(e.to_string()))?;
        v["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ModelError::Parse("response missing message content".into()))
    }
}

#[async_trait]
impl ModelService for GroqClient {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, ModelError> {
        if audio.is_empty() {
            return Err(ModelError::Api {
                status: 400,
                body: "empty audio payload".into(),
            });
        }
        debug!(
            model = %self.transcription_model,
            bytes = audio.len(),
            "submitting audio for transcription"
        );

        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str("audio/wav")
            .map_err(|e| ModelError::Http(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.transcription_model.clone());

        let response = self
            .client
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api { status, body });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Parse(e.to_string()))?;
        Ok(parsed.text)
    }

    async fn describe(
        &self,
        image: &[u8],
        mime: &str,
        instruction: &str,
        max_tokens: u32,
    ) -> Result<String, ModelError> {
        debug!(
            model = %self.vision_model,
            bytes = image.len(),
            max_tokens,
            "submitting image for description"
        );
        let data_url = format!("data:{mime};base64,{}", BASE64.encode(image));
        let body = json!({
            "model": self.vision_model,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": instruction},
                    {"type": "image_url", "image_url": {"url": data_url}}
                ]
            }],
            "max_tokens": max_tokens
        });
        self.chat(body).await
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ModelError> {
        debug!(
            model = %self.generation_model,
            chars = prompt.len(),
            max_tokens,
            "submitting generation prompt"
        );
        let body = json!({
            "model": self.generation_model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": max_tokens
        });
        self.chat(body).await
    }
}
