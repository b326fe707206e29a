//! # sumlink
//!
//! Article extraction and delivery for a page summarizer.
//!
//! ## Overview
//!
//! sumlink reduces the page a reader is looking at to its article text and a
//! small set of metadata, submits both to a summarization backend, and hands
//! the backend's answer (a summary and alternative sources) back to the UI.
//!
//! ## Pipeline
//!
//! - **Normalization**: whitespace collapse and removal of trailing share /
//!   "Read more" / related-article boilerplate ([`normalize`])
//! - **Pruning**: optional removal of navigation, ads, banners and other page
//!   furniture ([`prune`])
//! - **Content extraction**: first matching article container, or the page
//!   body ([`extract_main_content`])
//! - **Metadata extraction**: title, author, date and site name, each with a
//!   fixed default ([`extract_metadata`])
//! - **Scraping**: the above plus a minimum-length check ([`Scraper`])
//! - **Delivery**: JSON POST with per-attempt timeout and capped exponential
//!   backoff ([`DeliveryClient`])
//! - **Messaging**: answers `{"action": "scrape"}` requests from the UI
//!   ([`PageAgent`])
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use sumlink::{DeliveryClient, DeliveryOptions, Page, ScrapeOptions, Scraper};
//!
//! # async fn run(html: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let scraper = Scraper::new(ScrapeOptions::default())?;
//! let delivery = DeliveryClient::http(DeliveryOptions::default())?;
//!
//! let mut page = Page::parse(html, Some("https://example.com/article"))?;
//! let scraped = scraper.scrape(&mut page)?;
//! println!("{} by {}", scraped.metadata().title, scraped.metadata().author);
//!
//! let response = delivery.deliver_result(&scraped).await?;
//! println!("{:?}", response.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Scrape failures ([`ScrapeError`]) are deterministic for a given page and
//! are never retried. Delivery attempts that fail are retried; only the
//! final exhaustion is reported as a [`DeliveryError`].

mod agent;
mod config;
mod constants;
mod content;
mod delivery;
mod error;
mod metadata;
mod normalize;
mod options;
mod page;
mod pruner;
mod scrape;

// Public exports
pub use agent::{Envelope, PageAgent, Relay, Request, Response};
pub use config::{DeliverySettings, ScrapeSettings, Settings};
pub use constants::{
    AUTHOR_SELECTORS, BOILERPLATE_SELECTORS, CONTENT_SELECTORS, DATE_SELECTORS, DEFAULT_ENDPOINT,
    NO_CONTENT_SENTINEL,
};
pub use content::extract_main_content;
pub use delivery::{
    AlternativeSource, BackendResponse, Backoff, DeliveryClient, DeliveryRequest, HttpTransport,
    Transport,
};
pub use error::{AttemptError, DeliveryError, Error, Result, ScrapeError};
pub use metadata::{extract_metadata, ExtractedMetadata, MetadataSelectors};
pub use normalize::normalize;
pub use options::{
    compile_selector, compile_selectors, DeliveryOptions, DeliveryOptionsBuilder, ScrapeOptions,
    ScrapeOptionsBuilder,
};
pub use page::{rendered_text, Page};
pub use pruner::prune;
pub use scrape::{ScrapeResult, Scraper};
