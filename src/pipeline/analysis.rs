//! Analysis stage: classify and forecast air-quality impact.

use crate::error::{AirwatchError, Result};
use crate::pipeline::Pipeline;
use crate::prompts;
use tracing::{debug, warn};

impl Pipeline {
    /// Builds the forecast prompt from the normalized observation. When
    /// augmentation is enabled, the injected conditions provider is consulted
    /// first and its snippet embedded in the prompt. Provider failure is the
    /// pipeline's single designed degradation path: log and continue with
    /// the un-augmented prompt. Generation failure is fatal.
    pub(crate) async fn analyze(&self, observation: &str, augment: bool) -> Result<String> {
        let snippet = if augment {
            match self
                .conditions
                .fetch_current_conditions(self.config.locale.as_deref())
                .await
            {
                Ok(snippet) => {
                    debug!(source = %snippet.source, "external conditions fetched");
                    Some(snippet)
                }
                Err(e) => {
                    warn!(error = %e, "external conditions fetch failed, continuing un-augmented");
                    None
                }
            }
        } else {
            None
        };

        let prompt = prompts::analysis_prompt(observation, snippet.as_ref());
        self.models
            .generate(&prompt, self.config.analysis_max_tokens)
            .await
            .map_err(|e| AirwatchError::Analysis {
                message: e.to_string(),
            })
    }
}
