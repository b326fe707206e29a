//! Main content extraction.
//!
//! Picks the article container by an ordered selector scan and falls back to
//! the whole page body when no container is found.

use crate::constants::NO_CONTENT_SENTINEL;
use crate::normalize::normalize;
use crate::page::{rendered_text, Page};
use scraper::Selector;
use tracing::debug;

/// Extract the normalized main text of `page`.
///
/// The first selector that matches anything wins and later selectors are
/// never consulted, even when the winning container normalizes to an empty
/// string. Without a match the body text is used, and if that is empty too
/// the sentinel message is returned.
pub fn extract_main_content(page: &Page, selectors: &[Selector]) -> String {
    for (priority, selector) in selectors.iter().enumerate() {
        if let Some(container) = page.select_first(selector) {
            debug!(priority, "content: matched container");
            return normalize(&rendered_text(container));
        }
    }

    debug!("content: no container matched, using page body");
    let body_text = normalize(&rendered_text(page.body()));
    if body_text.is_empty() {
        NO_CONTENT_SENTINEL.to_string()
    } else {
        body_text
    }
}
