use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure loaded from airwatch.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub models: ModelsConfig,
    pub pipeline: PipelineConfig,
}

/// Model API transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// "groq" (hosted API) or "fixed" (scripted offline double)
    pub provider: String,
    pub base_url: String,
    /// Name of the env var holding the API key; the key itself never lives
    /// in the config file
    pub api_key_env: String,
    /// Per-call timeout applied to every outbound request
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_ms: 60_000,
        }
    }
}

/// Model identifiers per capability; opaque to the pipeline
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub transcription: String,
    pub vision: String,
    pub generation: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            transcription: "whisper-large-v3".to_string(),
            vision: "meta-llama/llama-4-maverick-17b-128e-instruct".to_string(),
            generation: "llama-3.3-70b-versatile".to_string(),
        }
    }
}

/// Stage behavior knobs
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Output ceiling for the Vision description; a tuning knob, not a hard
    /// technical limit
    pub vision_max_tokens: u32,
    pub analysis_max_tokens: u32,
    /// Tighter than Analysis: the final synthesis stays concise
    pub orchestration_max_tokens: u32,
    /// When false, Analysis skips the external-conditions fetch entirely
    pub augment_with_external: bool,
    pub locale: Option<String>,
    /// Directory for temporary payload blobs; system temp dir when unset
    pub blob_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vision_max_tokens: 200,
            analysis_max_tokens: 300,
            orchestration_max_tokens: 400,
            augment_with_external: true,
            locale: None,
            blob_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// Uses AIRWATCH_CONFIG environment variable or defaults to "airwatch.toml"
    pub fn load() -> anyhow::Result<Self> {
        crate::load_env();

        let config_path =
            std::env::var("AIRWATCH_CONFIG").unwrap_or_else(|_| "airwatch.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config.validate();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(provider) = std::env::var("AIRWATCH_MODEL_PROVIDER") {
            self.api.provider = provider;
        }
        if let Ok(base_url) = std::env::var("AIRWATCH_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Ok(key_env) = std::env::var("AIRWATCH_API_KEY_ENV") {
            self.api.api_key_env = key_env;
        }
        if let Some(timeout) = std::env::var("AIRWATCH_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.api.timeout_ms = timeout;
        }
        if let Ok(model) = std::env::var("AIRWATCH_MODEL_TRANSCRIPTION") {
            self.models.transcription = model;
        }
        if let Ok(model) = std::env::var("AIRWATCH_MODEL_VISION") {
            self.models.vision = model;
        }
        if let Ok(model) = std::env::var("AIRWATCH_MODEL_GENERATION") {
            self.models.generation = model;
        }
        if let Ok(augment) = std::env::var("AIRWATCH_AUGMENT") {
            if augment == "0" || augment.eq_ignore_ascii_case("false") {
                self.pipeline.augment_with_external = false;
            } else if augment == "1" || augment.eq_ignore_ascii_case("true") {
                self.pipeline.augment_with_external = true;
            }
        }
        if let Ok(locale) = std::env::var("AIRWATCH_LOCALE") {
            self.pipeline.locale = Some(locale);
        }
        if let Ok(dir) = std::env::var("AIRWATCH_BLOB_DIR") {
            self.pipeline.blob_dir = Some(PathBuf::from(dir));
        }
    }

    fn validate(&mut self) {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            tracing::warn!(
                "API base URL '{}' doesn't start with http:// or https://",
                self.api.base_url
            );
        }

        if self.api.timeout_ms == 0 {
            tracing::warn!("timeout_ms 0 is invalid, using default 60000");
            self.api.timeout_ms = 60_000;
        } else if self.api.timeout_ms > 600_000 {
            tracing::warn!(
                "timeout_ms {} exceeds max 600000, clamping",
                self.api.timeout_ms
            );
            self.api.timeout_ms = 600_000;
        }

        let defaults = PipelineConfig::default();
        if self.pipeline.vision_max_tokens == 0 {
            self.pipeline.vision_max_tokens = defaults.vision_max_tokens;
        }
        if self.pipeline.analysis_max_tokens == 0 {
            self.pipeline.analysis_max_tokens = defaults.analysis_max_tokens;
        }
        if self.pipeline.orchestration_max_tokens == 0 {
            self.pipeline.orchestration_max_tokens = defaults.orchestration_max_tokens;
        }
    }
}
