//! Named selector lists, default values and limits shared by the pipeline.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

/// Backend analysis endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str =
    "https://sumlink-a8faegbrc0hthgfy.eastus2-01.azurewebsites.net/analyze";

/// Environment variable that overrides the configured endpoint
pub const ENDPOINT_ENV_VAR: &str = "SUMLINK_ENDPOINT";

pub const DEFAULT_TITLE: &str = "No title found";
pub const DEFAULT_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_DATE: &str = "Unknown Date";
pub const DEFAULT_SOURCE: &str = "Unknown Source";

/// Returned when neither a content container nor the page body yields text
pub const NO_CONTENT_SENTINEL: &str = "No readable content found on this page.";

/// Substituted into a delivery request whose content is missing
pub const FALLBACK_REQUEST_CONTENT: &str = "Default content";
/// Source recorded in a delivery request whose metadata is missing
pub const FALLBACK_REQUEST_SOURCE: &str = "Unknown source";

/// Minimum number of characters a scrape must produce
pub const MIN_CONTENT_LENGTH: usize = 100;

pub const MAX_DELIVERY_ATTEMPTS: u32 = 15;
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);
pub const BACKOFF_BASE_DELAY: Duration = Duration::from_millis(2000);
pub const BACKOFF_MAX_DELAY: Duration = Duration::from_millis(15000);

/// Page furniture removed by the pruner, in removal order
pub const BOILERPLATE_SELECTORS: &[&str] = &[
    "nav",
    "footer",
    "aside",
    ".advertisement",
    ".adsbygoogle",
    ".comments",
    ".related-posts",
    ".share-buttons",
    ".promo",
    ".newsletter-signup",
    ".modal",
    ".popup",
    ".cookie-consent",
    ".top-banner",
    ".bottom-banner",
];

/// Main content containers, highest priority first
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "menu",
    ".post-content",
    ".entry-content",
    "#content",
    ".article-body",
    ".story-body",
    ".news-content",
    ".post-body",
    ".content-body",
];

pub const AUTHOR_SELECTORS: &[&str] = &[
    ".author-name",
    ".byline",
    ".author",
    "[rel=\"author\"]",
    ".article-author",
    ".writer",
    ".posted-by",
];

pub const DATE_SELECTORS: &[&str] = &[
    "time[datetime]",
    ".publish-date",
    ".pub-date",
    ".date",
    ".article-date",
    ".posted-on",
];

pub const SITE_NAME_SELECTOR: &str = "meta[property=\"og:site_name\"]";

/// Elements that start a new line in rendered text
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "caption",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "legend",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tr",
    "ul",
];

/// Table cells; adjacent cells are separated by a tab
pub const CELL_ELEMENTS: &[&str] = &["td", "th"];

/// Elements whose text is never rendered
pub const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

pub struct RegExps {
    pub whitespace: Regex,
    pub line_breaks: Regex,
    pub share_this_article: Regex,
    pub read_more: Regex,
    pub related_articles: Regex,
}

pub static REGEXPS: Lazy<RegExps> = Lazy::new(|| RegExps {
    whitespace: Regex::new(r"\s+").unwrap(),
    line_breaks: Regex::new(r"\r\n|\n|\r").unwrap(),
    share_this_article: Regex::new(r"(?is)Share this article:.*").unwrap(),
    read_more: Regex::new(r"(?is)Read more.*$").unwrap(),
    related_articles: Regex::new(r"(?is)Related Articles:.*").unwrap(),
});
