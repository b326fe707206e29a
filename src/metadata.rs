//! Metadata extraction: title, author, publication date and site name.
//!
//! Each field is resolved on its own by a first-match scan over an ordered
//! selector list, and falls back to a fixed default when nothing is found.

use crate::constants::{DEFAULT_AUTHOR, DEFAULT_DATE, DEFAULT_SOURCE, DEFAULT_TITLE};
use crate::error::Result;
use crate::options::{compile_selector, compile_selectors, ScrapeOptions};
use crate::page::{rendered_text, Page};
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// Article metadata sent alongside the content.
///
/// Every field always holds either a discovered value or its default, so
/// the serialized form always carries all four keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub title: String,
    pub author: String,
    pub date: String,
    pub source: String,
}

impl Default for ExtractedMetadata {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            date: DEFAULT_DATE.to_string(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

/// Compiled selector lists used by [`extract_metadata`]
#[derive(Debug, Clone)]
pub struct MetadataSelectors {
    pub author: Vec<Selector>,
    pub date: Vec<Selector>,
    pub site_name: Selector,
}

impl MetadataSelectors {
    pub fn from_options(options: &ScrapeOptions) -> Result<Self> {
        Ok(Self {
            author: compile_selectors(&options.author_selectors)?,
            date: compile_selectors(&options.date_selectors)?,
            site_name: compile_selector(&options.site_name_selector)?,
        })
    }
}

/// Extract metadata from `page`.
pub fn extract_metadata(page: &Page, selectors: &MetadataSelectors) -> ExtractedMetadata {
    let mut metadata = ExtractedMetadata::default();

    let title = page.title();
    if !title.is_empty() {
        metadata.title = title;
    }

    if let Some(author) = extract_author(page, &selectors.author) {
        metadata.author = author;
    }

    if let Some(date) = extract_date(page, &selectors.date) {
        metadata.date = date;
    }

    if let Some(source) = extract_source(page, &selectors.site_name) {
        metadata.source = source;
    }

    metadata
}

/// Trimmed text of the first author match; `None` if nothing matches or the
/// matching element is empty.
fn extract_author(page: &Page, selectors: &[Selector]) -> Option<String> {
    let element = selectors.iter().find_map(|s| page.select_first(s))?;
    non_empty(rendered_text(element).trim())
}

/// The first date match; its `datetime` attribute is preferred over its text.
fn extract_date(page: &Page, selectors: &[Selector]) -> Option<String> {
    let element = selectors.iter().find_map(|s| page.select_first(s))?;
    element
        .value()
        .attr("datetime")
        .and_then(non_empty)
        .or_else(|| non_empty(rendered_text(element).trim()))
}

/// Site name from the Open Graph tag, or the page host when the tag is
/// missing. A present tag with empty content yields `None` without
/// consulting the host.
fn extract_source(page: &Page, site_name: &Selector) -> Option<String> {
    match page.select_first(site_name) {
        Some(meta) => meta.value().attr("content").and_then(|c| non_empty(c.trim())),
        None => page.host().map(str::to_string),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
