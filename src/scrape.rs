//! The scrape orchestrator.
//!
//! [`Scraper`] runs the optional pruning pass, content extraction and
//! metadata extraction, then applies the single validation gate of the
//! pipeline: the minimum content length.
//!
//! ## Example
//!
//! ```rust
//! use sumlink::{Page, ScrapeError, ScrapeOptions, Scraper};
//!
//! let scraper = Scraper::new(ScrapeOptions::default())?;
//! let mut page = Page::parse("<body><div>Short content</div></body>", None)?;
//!
//! assert_eq!(scraper.scrape(&mut page), Err(ScrapeError::InsufficientContent));
//! # Ok::<(), sumlink::Error>(())
//! ```

use crate::content::extract_main_content;
use crate::error::{Result, ScrapeError};
use crate::metadata::{extract_metadata, ExtractedMetadata, MetadataSelectors};
use crate::options::{compile_selectors, ScrapeOptions};
use crate::page::Page;
use crate::pruner::prune;
use scraper::Selector;
use serde::Serialize;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Content and metadata of one successful scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeResult {
    content: String,
    metadata: ExtractedMetadata,
}

impl ScrapeResult {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &ExtractedMetadata {
        &self.metadata
    }

    pub fn into_parts(self) -> (String, ExtractedMetadata) {
        (self.content, self.metadata)
    }
}

/// Reduces a page to a [`ScrapeResult`].
///
/// Selector lists are compiled once at construction, so a `Scraper` can be
/// reused for any number of pages.
#[derive(Debug, Clone)]
pub struct Scraper {
    prune: bool,
    min_content_length: usize,
    boilerplate: Vec<Selector>,
    content: Vec<Selector>,
    metadata: MetadataSelectors,
}

impl Scraper {
    /// Create a scraper from `options`.
    ///
    /// Fails with [`Error::InvalidSelector`](crate::Error::InvalidSelector)
    /// when any configured selector does not parse.
    pub fn new(options: ScrapeOptions) -> Result<Self> {
        Ok(Self {
            prune: options.prune,
            min_content_length: options.min_content_length,
            boilerplate: compile_selectors(&options.boilerplate_selectors)?,
            content: compile_selectors(&options.content_selectors)?,
            metadata: MetadataSelectors::from_options(&options)?,
        })
    }

    /// Scrape `page`.
    ///
    /// With pruning enabled the page is modified in place. A panic while
    /// walking the document is reported as [`ScrapeError::ScrapingFailed`].
    pub fn scrape(&self, page: &mut Page) -> std::result::Result<ScrapeResult, ScrapeError> {
        let (content, metadata) = guarded(|| self.extract(page))?;

        let length = content.chars().count();
        if content.is_empty() || length < self.min_content_length {
            info!(
                length,
                minimum = self.min_content_length,
                "scrape: insufficient content"
            );
            return Err(ScrapeError::InsufficientContent);
        }

        info!(length, title = %metadata.title, "scrape: extracted article");
        Ok(ScrapeResult { content, metadata })
    }

    fn extract(&self, page: &mut Page) -> (String, ExtractedMetadata) {
        if self.prune {
            let removed = prune(page, &self.boilerplate);
            debug!(removed, "scrape: pruned document");
        }
        let content = extract_main_content(page, &self.content);
        let metadata = extract_metadata(page, &self.metadata);
        (content, metadata)
    }
}

/// Run `read`, reporting a panic as [`ScrapeError::ScrapingFailed`].
fn guarded<T>(read: impl FnOnce() -> T) -> std::result::Result<T, ScrapeError> {
    catch_unwind(AssertUnwindSafe(read)).map_err(|panic| {
        let reason = panic_reason(panic.as_ref());
        warn!(%reason, "scrape: document access failed");
        ScrapeError::ScrapingFailed(reason)
    })
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown error while reading the document".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_PARAGRAPH: &str = "The council approved the new transit plan on Tuesday after months of \
        debate, committing funds to three new bus lines and a light rail extension.";

    fn scraper(prune: bool) -> Scraper {
        Scraper::new(ScrapeOptions::builder().prune(prune).build()).unwrap()
    }

    #[test]
    fn resolves_with_content_and_metadata() {
        let html = format!(
            r#"
            <html>
                <head><title>Test Article</title></head>
                <body>
                    <div class="post-content">{LONG_PARAGRAPH}</div>
                    <div class="author">John Doe</div>
                    <time datetime="2024-10-25">October 25, 2024</time>
                </body>
            </html>
        "#
        );
        let mut page = Page::parse(&html, Some("https://example.com/news")).unwrap();

        let result = scraper(false).scrape(&mut page).unwrap();
        assert_eq!(result.content(), LONG_PARAGRAPH.split_whitespace().collect::<Vec<_>>().join(" "));
        assert_eq!(result.metadata().title, "Test Article");
        assert_eq!(result.metadata().author, "John Doe");
        assert_eq!(result.metadata().date, "2024-10-25");
        assert_eq!(result.metadata().source, "example.com");
    }

    #[test]
    fn rejects_short_content() {
        let mut page = Page::parse("<body><div>Short content</div></body>", None).unwrap();
        assert_eq!(
            scraper(false).scrape(&mut page),
            Err(ScrapeError::InsufficientContent)
        );
    }

    #[test]
    fn sentinel_is_still_too_short() {
        let mut page = Page::parse("<body></body>", None).unwrap();
        assert_eq!(
            scraper(false).scrape(&mut page),
            Err(ScrapeError::InsufficientContent)
        );
    }

    #[test]
    fn pruning_changes_the_body_fallback() {
        let html = format!(
            r#"
            <body>
                <nav>Home World Politics Sports</nav>
                <div>{LONG_PARAGRAPH}</div>
                <footer>Copyright Example News</footer>
            </body>
        "#
        );

        let mut unpruned = Page::parse(&html, None).unwrap();
        let result = scraper(false).scrape(&mut unpruned).unwrap();
        assert!(result.content().starts_with("Home World Politics Sports"));
        assert!(result.content().ends_with("Copyright Example News"));

        let mut pruned = Page::parse(&html, None).unwrap();
        let result = scraper(true).scrape(&mut pruned).unwrap();
        assert!(result.content().starts_with("The council approved"));
        assert!(!result.content().contains("Copyright"));
    }

    #[test]
    fn threshold_is_configurable() {
        let scraper = Scraper::new(ScrapeOptions::builder().min_content_length(5).build()).unwrap();
        let mut page = Page::parse("<body><div>Short content</div></body>", None).unwrap();
        let result = scraper.scrape(&mut page).unwrap();
        assert_eq!(result.content(), "Short content");
    }

    #[test]
    fn invalid_selector_fails_construction() {
        let options = ScrapeOptions::builder()
            .author_selectors(vec!["::::".to_string()])
            .build();
        assert!(Scraper::new(options).is_err());
    }

    #[test]
    fn panics_become_scraping_failed() {
        let err = guarded(|| -> u8 { panic!("detached node") }).unwrap_err();
        assert_eq!(err, ScrapeError::ScrapingFailed("detached node".to_string()));

        let node = 7;
        let err = guarded(|| -> u8 { panic!("node {node} vanished") }).unwrap_err();
        assert_eq!(err, ScrapeError::ScrapingFailed("node 7 vanished".to_string()));
        assert_eq!(err.to_string(), "Scraping failed: node 7 vanished");

        assert_eq!(guarded(|| 3), Ok(3));
    }

    #[test]
    fn unrecognized_panic_payload_has_generic_reason() {
        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(
            panic_reason(payload.as_ref()),
            "unknown error while reading the document"
        );
    }
}
