//! Pluggable external-data provider consumed mid-Analysis.
//!
//! The provider is an injection seam: Analysis always goes through the trait
//! and never bypasses the returned snippet, so a live AQI/weather client can
//! replace the shipped stub without touching stage logic.

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// A single real-time conditions reading, attributed to its source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalSnippet {
    pub source: String,
    pub value: String,
}

#[async_trait]
pub trait ExternalDataProvider: Send + Sync {
    /// Fetch current locale conditions (AQI/weather). Failure here is
    /// recoverable: Analysis falls back to the un-augmented prompt.
    async fn fetch_current_conditions(&self, locale: Option<&str>) -> Result<ExternalSnippet>;
}

/// Fixed-value provider standing in for a live AQI/weather feed.
pub struct StaticConditionsProvider {
    source: String,
    value: String,
}

impl StaticConditionsProvider {
    pub fn new(source: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            value: value.into(),
        }
    }
}

impl Default for StaticConditionsProvider {
    fn default() -> Self {
        Self::new(
            "stub",
            "Current AQI: 150 (Unhealthy). Weather: Smoggy, 25°C.",
        )
    }
}

#[async_trait]
impl ExternalDataProvider for StaticConditionsProvider {
    async fn fetch_current_conditions(&self, _locale: Option<&str>) -> Result<ExternalSnippet> {
        Ok(ExternalSnippet {
            source: self.source.clone(),
            value: self.value.clone(),
        })
    }
}

/// Create the conditions provider from configuration. Only the static stub
/// ships today; the factory keeps the seam in one place for a live client.
pub fn create_conditions_provider(_config: &Config) -> Arc<dyn ExternalDataProvider> {
    info!("Using static external-conditions provider");
    Arc::new(StaticConditionsProvider::default())
}
