//! Delivery of scrape results to the summarization backend.
//!
//! Every attempt is raced against a timeout and failed attempts are retried
//! with capped exponential backoff. The HTTP exchange itself sits behind the
//! [`Transport`] trait; [`HttpTransport`] is the reqwest implementation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sumlink::{DeliveryClient, DeliveryOptions, DeliveryRequest};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DeliveryClient::http(DeliveryOptions::default())?;
//! let request = DeliveryRequest::from_parts(Some("Article text".to_string()), None);
//!
//! let response = client.deliver(&request).await?;
//! if let Some(summary) = response.summary() {
//!     println!("{summary}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::constants::{FALLBACK_REQUEST_CONTENT, FALLBACK_REQUEST_SOURCE};
use crate::error::{AttemptError, DeliveryError, Error, Result};
use crate::metadata::ExtractedMetadata;
use crate::options::DeliveryOptions;
use crate::scrape::ScrapeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

/// Body of the POST sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub content: String,
    pub metadata: ExtractedMetadata,
}

impl DeliveryRequest {
    /// Build a request from possibly missing parts.
    ///
    /// Missing or empty content becomes `"Default content"` and missing
    /// metadata becomes the defaults with `"Unknown source"` as the source.
    pub fn from_parts(content: Option<String>, metadata: Option<ExtractedMetadata>) -> Self {
        let content = content
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| FALLBACK_REQUEST_CONTENT.to_string());
        let metadata = metadata.unwrap_or_else(|| ExtractedMetadata {
            source: FALLBACK_REQUEST_SOURCE.to_string(),
            ..ExtractedMetadata::default()
        });
        Self { content, metadata }
    }
}

impl From<&ScrapeResult> for DeliveryRequest {
    fn from(result: &ScrapeResult) -> Self {
        Self::from_parts(
            Some(result.content().to_string()),
            Some(result.metadata().clone()),
        )
    }
}

/// A suggested alternative source for the article's story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeSource {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// The backend's JSON answer, passed through untouched.
///
/// The backend conventionally returns `summary` and `alternative_sources`;
/// the accessors read those when present but nothing is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendResponse(Value);

impl BackendResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn summary(&self) -> Option<&str> {
        self.0.get("summary").and_then(Value::as_str)
    }

    /// Entries of `alternative_sources` that look like sources; others are skipped.
    pub fn alternative_sources(&self) -> Vec<AlternativeSource> {
        self.0
            .get("alternative_sources")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// A single request/response exchange with the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        endpoint: &Url,
        request: &DeliveryRequest,
    ) -> std::result::Result<Value, AttemptError>;
}

/// [`Transport`] over HTTP using reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sumlink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: &Url,
        request: &DeliveryRequest,
    ) -> std::result::Result<Value, AttemptError> {
        let response = self
            .client
            .post(endpoint.clone())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(AttemptError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await.map_err(AttemptError::Transport)?;
        serde_json::from_slice(&body).map_err(|e| AttemptError::Decode(e.to_string()))
    }
}

/// Capped exponential backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base: Duration,
    pub max: Duration,
}

impl Backoff {
    /// Delay to wait after failed attempt `attempt` (1-based):
    /// `min(base * 2^(attempt - 1), max)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base
            .checked_mul(1u32 << exponent)
            .map_or(self.max, |delay| delay.min(self.max))
    }
}

/// Submits scrape results to the backend with timeout and retry.
///
/// Cloning is cheap; each [`deliver`](DeliveryClient::deliver) call runs its
/// own retry sequence and shares nothing with concurrent calls.
#[derive(Clone)]
pub struct DeliveryClient {
    endpoint: Url,
    max_attempts: u32,
    attempt_timeout: Duration,
    backoff: Backoff,
    transport: Arc<dyn Transport>,
}

impl DeliveryClient {
    /// Create a client over an arbitrary transport.
    ///
    /// Fails with [`Error::InvalidUrl`] when the endpoint does not parse and
    /// with [`Error::Config`] when `max_attempts` is zero.
    pub fn new(options: DeliveryOptions, transport: Arc<dyn Transport>) -> Result<Self> {
        let endpoint =
            Url::parse(&options.endpoint).map_err(|_| Error::InvalidUrl(options.endpoint.clone()))?;
        if options.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".to_string()));
        }
        Ok(Self {
            endpoint,
            max_attempts: options.max_attempts,
            attempt_timeout: options.attempt_timeout,
            backoff: Backoff {
                base: options.base_delay,
                max: options.max_delay,
            },
            transport,
        })
    }

    /// Create a client that talks HTTP through [`HttpTransport`].
    pub fn http(options: DeliveryOptions) -> Result<Self> {
        Self::new(options, Arc::new(HttpTransport::new()?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Deliver a scrape result.
    pub async fn deliver_result(
        &self,
        result: &ScrapeResult,
    ) -> std::result::Result<BackendResponse, DeliveryError> {
        self.deliver(&DeliveryRequest::from(result)).await
    }

    /// Send `request`, retrying failed attempts until one succeeds or the
    /// attempt budget is spent.
    pub async fn deliver(
        &self,
        request: &DeliveryRequest,
    ) -> std::result::Result<BackendResponse, DeliveryError> {
        let mut attempt = 1;
        loop {
            info!(
                attempt,
                remaining = self.max_attempts - attempt,
                endpoint = %self.endpoint,
                "delivery: sending request"
            );
            let error = match self.attempt(request).await {
                Ok(body) => {
                    info!(attempt, "delivery: backend responded");
                    return Ok(BackendResponse::new(body));
                }
                Err(e) => e,
            };

            if attempt >= self.max_attempts {
                error!(attempts = attempt, %error, "delivery: max attempts reached");
                return Err(DeliveryError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }

            let delay = self.backoff.delay_for(attempt);
            warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                %error,
                "delivery: attempt failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, request: &DeliveryRequest) -> std::result::Result<Value, AttemptError> {
        tokio::time::timeout(
            self.attempt_timeout,
            self.transport.send(&self.endpoint, request),
        )
        .await
        .map_err(|_| AttemptError::Timeout(self.attempt_timeout))?
    }
}
