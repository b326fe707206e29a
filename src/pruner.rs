//! Boilerplate removal ahead of extraction.

use crate::page::Page;
use scraper::Selector;
use tracing::debug;

/// Remove every element matching `selectors` from the page, in order.
///
/// Selectors with no matches are skipped. Returns the total number of
/// removed elements.
pub fn prune(page: &mut Page, selectors: &[Selector]) -> usize {
    let mut total = 0;
    for selector in selectors {
        let removed = page.remove_matching(selector);
        if removed > 0 {
            debug!(count = removed, "pruner: removed boilerplate elements");
        }
        total += removed;
    }
    total
}
