//! Settings file support.
//!
//! Settings are read from TOML. Every key is optional and falls back to the
//! built-in defaults; the backend endpoint can additionally be overridden
//! through the `SUMLINK_ENDPOINT` environment variable.
//!
//! ```toml
//! [scrape]
//! prune = true
//! min_content_length = 150
//!
//! [delivery]
//! endpoint = "http://localhost:5000/analyze"
//! max_attempts = 5
//! attempt_timeout_ms = 5000
//! ```

use crate::constants::ENDPOINT_ENV_VAR;
use crate::error::{Error, Result};
use crate::options::{DeliveryOptions, ScrapeOptions};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Scrape section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapeSettings {
    pub prune: Option<bool>,
    pub min_content_length: Option<usize>,
    pub boilerplate_selectors: Option<Vec<String>>,
    pub content_selectors: Option<Vec<String>>,
    pub author_selectors: Option<Vec<String>>,
    pub date_selectors: Option<Vec<String>>,
    pub site_name_selector: Option<String>,
}

/// Delivery section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeliverySettings {
    pub endpoint: Option<String>,
    pub max_attempts: Option<u32>,
    pub attempt_timeout_ms: Option<u64>,
    pub base_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
}

/// Top-level settings (deserialized from TOML)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub scrape: ScrapeSettings,
    #[serde(default)]
    pub delivery: DeliverySettings,
}

impl Settings {
    pub fn from_toml_str(data: &str) -> Result<Self> {
        toml::from_str(data).map_err(|e| Error::Config(format!("failed to parse settings: {e}")))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read settings file {}: {e}", path.display()))
        })?;
        info!(path = %path.display(), "config: loaded settings file");
        Self::from_toml_str(&data)
    }

    /// Apply `SUMLINK_ENDPOINT` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV_VAR) {
            if !endpoint.trim().is_empty() {
                info!(%endpoint, "config: endpoint overridden from environment");
                self.delivery.endpoint = Some(endpoint.trim().to_string());
            }
        }
        self
    }

    pub fn scrape_options(&self) -> ScrapeOptions {
        let s = &self.scrape;
        let mut builder = ScrapeOptions::builder();
        if let Some(prune) = s.prune {
            builder = builder.prune(prune);
        }
        if let Some(min) = s.min_content_length {
            builder = builder.min_content_length(min);
        }
        if let Some(list) = &s.boilerplate_selectors {
            builder = builder.boilerplate_selectors(list.clone());
        }
        if let Some(list) = &s.content_selectors {
            builder = builder.content_selectors(list.clone());
        }
        if let Some(list) = &s.author_selectors {
            builder = builder.author_selectors(list.clone());
        }
        if let Some(list) = &s.date_selectors {
            builder = builder.date_selectors(list.clone());
        }
        if let Some(selector) = &s.site_name_selector {
            builder = builder.site_name_selector(selector.clone());
        }
        builder.build()
    }

    pub fn delivery_options(&self) -> DeliveryOptions {
        let d = &self.delivery;
        let mut builder = DeliveryOptions::builder();
        if let Some(endpoint) = &d.endpoint {
            builder = builder.endpoint(endpoint.clone());
        }
        if let Some(attempts) = d.max_attempts {
            builder = builder.max_attempts(attempts);
        }
        if let Some(ms) = d.attempt_timeout_ms {
            builder = builder.attempt_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = d.base_delay_ms {
            builder = builder.base_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = d.max_delay_ms {
            builder = builder.max_delay(Duration::from_millis(ms));
        }
        builder.build()
    }
}
