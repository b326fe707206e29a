//! Configuration options for scraping and delivery.
//!
//! This module provides [`ScrapeOptions`] and [`DeliveryOptions`] together
//! with their builders. Every selector list, limit and the backend endpoint
//! is injected through these values, so tests can override any of them
//! without touching component logic.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use sumlink::{DeliveryOptions, ScrapeOptions};
//!
//! let scrape = ScrapeOptions::builder()
//!     .prune(true)
//!     .min_content_length(200)
//!     .build();
//!
//! let delivery = DeliveryOptions::builder()
//!     .endpoint("http://localhost:5000/analyze")
//!     .max_attempts(3)
//!     .attempt_timeout(Duration::from_secs(2))
//!     .build();
//! # assert!(scrape.prune);
//! # assert_eq!(delivery.max_attempts, 3);
//! ```

use crate::constants::{
    ATTEMPT_TIMEOUT, AUTHOR_SELECTORS, BACKOFF_BASE_DELAY, BACKOFF_MAX_DELAY,
    BOILERPLATE_SELECTORS, CONTENT_SELECTORS, DATE_SELECTORS, DEFAULT_ENDPOINT,
    MAX_DELIVERY_ATTEMPTS, MIN_CONTENT_LENGTH, SITE_NAME_SELECTOR,
};
use crate::error::{Error, Result};
use scraper::Selector;
use std::time::Duration;

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Options controlling how a page is reduced to article text and metadata.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Remove boilerplate elements before extracting.
    ///
    /// Pruning mutates the page, so a second scrape of the same page sees
    /// the pruned document.
    ///
    /// Default: `false`
    pub prune: bool,

    /// Minimum number of characters the extracted content must have.
    ///
    /// Default: `100`
    pub min_content_length: usize,

    /// Selectors removed by the pruner, in order.
    pub boilerplate_selectors: Vec<String>,

    /// Main content containers, highest priority first.
    pub content_selectors: Vec<String>,

    /// Author candidates, highest priority first.
    pub author_selectors: Vec<String>,

    /// Publication date candidates, highest priority first.
    pub date_selectors: Vec<String>,

    /// Meta tag carrying the site name.
    pub site_name_selector: String,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            prune: false,
            min_content_length: MIN_CONTENT_LENGTH,
            boilerplate_selectors: owned(BOILERPLATE_SELECTORS),
            content_selectors: owned(CONTENT_SELECTORS),
            author_selectors: owned(AUTHOR_SELECTORS),
            date_selectors: owned(DATE_SELECTORS),
            site_name_selector: SITE_NAME_SELECTOR.to_string(),
        }
    }
}

impl ScrapeOptions {
    /// Creates a new builder for ScrapeOptions
    pub fn builder() -> ScrapeOptionsBuilder {
        ScrapeOptionsBuilder::default()
    }
}

/// Builder for [`ScrapeOptions`].
#[derive(Default)]
pub struct ScrapeOptionsBuilder {
    prune: Option<bool>,
    min_content_length: Option<usize>,
    boilerplate_selectors: Option<Vec<String>>,
    content_selectors: Option<Vec<String>>,
    author_selectors: Option<Vec<String>>,
    date_selectors: Option<Vec<String>>,
    site_name_selector: Option<String>,
}

impl ScrapeOptionsBuilder {
    /// Enable or disable the pruning pre-pass
    pub fn prune(mut self, prune: bool) -> Self {
        self.prune = Some(prune);
        self
    }

    /// Set the minimum content length
    pub fn min_content_length(mut self, min: usize) -> Self {
        self.min_content_length = Some(min);
        self
    }

    pub fn boilerplate_selectors(mut self, selectors: Vec<String>) -> Self {
        self.boilerplate_selectors = Some(selectors);
        self
    }

    pub fn content_selectors(mut self, selectors: Vec<String>) -> Self {
        self.content_selectors = Some(selectors);
        self
    }

    pub fn author_selectors(mut self, selectors: Vec<String>) -> Self {
        self.author_selectors = Some(selectors);
        self
    }

    pub fn date_selectors(mut self, selectors: Vec<String>) -> Self {
        self.date_selectors = Some(selectors);
        self
    }

    pub fn site_name_selector(mut self, selector: impl Into<String>) -> Self {
        self.site_name_selector = Some(selector.into());
        self
    }

    /// Build the ScrapeOptions
    pub fn build(self) -> ScrapeOptions {
        let defaults = ScrapeOptions::default();
        ScrapeOptions {
            prune: self.prune.unwrap_or(defaults.prune),
            min_content_length: self
                .min_content_length
                .unwrap_or(defaults.min_content_length),
            boilerplate_selectors: self
                .boilerplate_selectors
                .unwrap_or(defaults.boilerplate_selectors),
            content_selectors: self
                .content_selectors
                .unwrap_or(defaults.content_selectors),
            author_selectors: self.author_selectors.unwrap_or(defaults.author_selectors),
            date_selectors: self.date_selectors.unwrap_or(defaults.date_selectors),
            site_name_selector: self
                .site_name_selector
                .unwrap_or(defaults.site_name_selector),
        }
    }
}

/// Options for submitting scrape results to the backend.
#[derive(Debug, Clone)]
pub struct DeliveryOptions {
    /// Analysis endpoint receiving the POST.
    pub endpoint: String,

    /// Total number of attempts, including the first.
    ///
    /// Default: `15`
    pub max_attempts: u32,

    /// Time allowed for a single attempt before its result is discarded.
    ///
    /// Default: 10 seconds
    pub attempt_timeout: Duration,

    /// Delay after the first failed attempt; doubles after each failure.
    ///
    /// Default: 2 seconds
    pub base_delay: Duration,

    /// Upper bound on any single backoff delay.
    ///
    /// Default: 15 seconds
    pub max_delay: Duration,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_attempts: MAX_DELIVERY_ATTEMPTS,
            attempt_timeout: ATTEMPT_TIMEOUT,
            base_delay: BACKOFF_BASE_DELAY,
            max_delay: BACKOFF_MAX_DELAY,
        }
    }
}

impl DeliveryOptions {
    /// Creates a new builder for DeliveryOptions
    pub fn builder() -> DeliveryOptionsBuilder {
        DeliveryOptionsBuilder::default()
    }
}

/// Builder for [`DeliveryOptions`].
#[derive(Default)]
pub struct DeliveryOptionsBuilder {
    endpoint: Option<String>,
    max_attempts: Option<u32>,
    attempt_timeout: Option<Duration>,
    base_delay: Option<Duration>,
    max_delay: Option<Duration>,
}

impl DeliveryOptionsBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Build the DeliveryOptions
    pub fn build(self) -> DeliveryOptions {
        let defaults = DeliveryOptions::default();
        DeliveryOptions {
            endpoint: self.endpoint.unwrap_or(defaults.endpoint),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            attempt_timeout: self.attempt_timeout.unwrap_or(defaults.attempt_timeout),
            base_delay: self.base_delay.unwrap_or(defaults.base_delay),
            max_delay: self.max_delay.unwrap_or(defaults.max_delay),
        }
    }
}

/// Parse a list of CSS selectors, keeping their order.
pub fn compile_selectors<S: AsRef<str>>(selectors: &[S]) -> Result<Vec<Selector>> {
    selectors
        .iter()
        .map(|s| compile_selector(s.as_ref()))
        .collect()
}

pub fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
