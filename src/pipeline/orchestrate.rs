//! Orchestration stage: synthesize the final recommendation narrative.

use crate::error::{AirwatchError, Result};
use crate::pipeline::{FinalResponse, Pipeline};
use crate::prompts;

/// Phrases that promote the final text to an alert. The flag ships as a
/// structured field so frontends don't have to sniff the narrative.
const ALERT_KEYWORDS: &[&str] = &["high pollution", "hazardous", "unhealthy"];

pub(crate) fn detect_alert(text: &str) -> bool {
    let lower = text.to_lowercase();
    ALERT_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

impl Pipeline {
    /// Terminal stage: one generation call over the concatenated context,
    /// with a ceiling tighter than the combined upstream context. No
    /// fallback synthesis — failure here fails the run.
    pub(crate) async fn orchestrate(
        &self,
        intake: &str,
        vision: &str,
        analysis: &str,
    ) -> Result<FinalResponse> {
        let prompt = prompts::orchestration_prompt(intake, vision, analysis);
        let text = self
            .models
            .generate(&prompt, self.config.orchestration_max_tokens)
            .await
            .map_err(|e| AirwatchError::Orchestration {
                message: e.to_string(),
            })?;
        let alert = detect_alert(&text);
        Ok(FinalResponse { text, alert })
    }
}
