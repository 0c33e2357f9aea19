pub mod fixed;
pub mod groq;
pub mod traits;

pub use fixed::FixedModelService;
pub use groq::GroqClient;
pub use traits::{ModelError, ModelService};

use crate::config::Config;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Create the model service from configuration.
///
/// Provider selection:
/// 1) "groq" (default): requires the API key env var named in config
/// 2) "fixed": scripted offline double for dev/test runs
pub fn create_model_service(config: &Config) -> Result<Arc<dyn ModelService>> {
    let is_placeholder = |s: &str| {
        let t = s.trim();
        t.is_empty()
            || t.contains("${")
            || t.eq_ignore_ascii_case("your-api-key-here")
            || t.eq_ignore_ascii_case("changeme")
    };

    match config.api.provider.as_str() {
        "groq" => {
            let key = std::env::var(&config.api.api_key_env).unwrap_or_default();
            if is_placeholder(&key) {
                anyhow::bail!(
                    "model provider 'groq' selected but {} is not set",
                    config.api.api_key_env
                );
            }
            info!(
                base_url = %config.api.base_url,
                generation_model = %config.models.generation,
                "Using Groq model service"
            );
            Ok(Arc::new(GroqClient::new(
                config.api.base_url.clone(),
                key,
                config.models.transcription.clone(),
                config.models.vision.clone(),
                config.models.generation.clone(),
                config.api.timeout_ms,
            )?))
        }
        "fixed" => {
            info!("Using FixedModelService (scripted, offline)");
            Ok(Arc::new(FixedModelService::new()))
        }
        other => anyhow::bail!("unknown model provider '{other}' (expected 'groq' or 'fixed')"),
    }
}
