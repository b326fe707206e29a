//! Error types for the extraction and delivery pipeline.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for crate-level operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or configuring pipeline components
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid URL provided (page URL or backend endpoint)
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A configured CSS selector could not be parsed
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Settings file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Terminal failures of a scrape. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// Extracted text is empty or shorter than the minimum length
    #[error("Insufficient content found to summarize.")]
    InsufficientContent,

    /// Unexpected failure while reading the document
    #[error("Scraping failed: {0}")]
    ScrapingFailed(String),
}

/// Failure of a single delivery attempt.
///
/// These are recovered by the retry loop and only surface wrapped in
/// [`DeliveryError::Exhausted`].
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Backend error: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Terminal delivery failure, reported after every attempt has failed.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Backend unreachable after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: AttemptError,
    },
}

impl DeliveryError {
    /// The error observed on the final attempt
    pub fn last_error(&self) -> &AttemptError {
        match self {
            DeliveryError::Exhausted { last, .. } => last,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryError::Exhausted { attempts, .. } => *attempts,
        }
    }
}
