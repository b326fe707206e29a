//! Text normalization for extracted article text.
//!
//! Collapses whitespace and cuts trailing boilerplate such as share prompts,
//! "Read more" links and related-article lists. The boilerplate rules cut
//! from the marker to the end of the text, so anything after a marker is
//! dropped as well.

use crate::constants::REGEXPS;

/// Normalize raw rendered text.
///
/// Whitespace collapse runs first; the boilerplate patterns rely on the
/// text being on a single line.
///
/// ```rust
/// use sumlink::normalize;
///
/// let cleaned = normalize("  This is a   test.\n\nShare this article: Something\n");
/// assert_eq!(cleaned, "This is a test.");
/// ```
pub fn normalize(raw: &str) -> String {
    let text = REGEXPS.whitespace.replace_all(raw, " ");
    let text = REGEXPS.line_breaks.replace_all(&text, " ");
    let text = REGEXPS.share_this_article.replace_all(&text, "");
    let text = REGEXPS.read_more.replace_all(&text, "");
    let text = REGEXPS.related_articles.replace_all(&text, "");
    text.trim().to_string()
}
