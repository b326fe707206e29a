//! The document view the pipeline reads from and mutates.
//!
//! A [`Page`] pairs the parsed HTML of the current page with the URL it was
//! loaded from, which supplies the host name used as a metadata fallback.

use crate::constants::{BLOCK_ELEMENTS, CELL_ELEMENTS, HIDDEN_ELEMENTS};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("valid title selector"));
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("valid body selector"));

/// A parsed page and its location.
///
/// Queries always start from the root element so that nodes detached by the
/// pruner are no longer visible.
pub struct Page {
    document: Html,
    url: Option<Url>,
}

impl Page {
    /// Parse `html` as a full document.
    ///
    /// # Arguments
    /// * `html` - The page markup
    /// * `url` - Optional address of the page, used for the host-name fallback
    ///
    /// # Returns
    /// The page, or [`Error::InvalidUrl`] when `url` is not absolute
    pub fn parse(html: &str, url: Option<&str>) -> Result<Self> {
        let url = url
            .map(|u| Url::parse(u).map_err(|_| Error::InvalidUrl(u.to_string())))
            .transpose()?;

        Ok(Self {
            document: Html::parse_document(html),
            url,
        })
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Host name of the page URL, if it has a non-empty one
    pub fn host(&self) -> Option<&str> {
        self.url
            .as_ref()
            .and_then(|u| u.host_str())
            .filter(|h| !h.is_empty())
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// First element in document order matching `selector`
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.root().select(selector).next()
    }

    /// Whitespace-collapsed text of the `<title>` element
    pub fn title(&self) -> String {
        self.select_first(&TITLE_SELECTOR)
            .map(|title| {
                title
                    .text()
                    .flat_map(str::split_whitespace)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    /// The `<body>` element, or the root when the document has none
    pub fn body(&self) -> ElementRef<'_> {
        self.select_first(&BODY_SELECTOR)
            .unwrap_or_else(|| self.root())
    }

    /// Detach every element matching `selector` from the document.
    ///
    /// Returns the number of elements removed. Elements nested inside an
    /// already removed match are not counted twice.
    pub fn remove_matching(&mut self, selector: &Selector) -> usize {
        let ids: Vec<_> = self.root().select(selector).map(|el| el.id()).collect();
        let document_id = self.document.tree.root().id();
        let mut removed = 0;
        for id in ids {
            let attached = self
                .document
                .tree
                .get(id)
                .is_some_and(|node| node.ancestors().any(|a| a.id() == document_id));
            if !attached {
                continue;
            }
            if let Some(mut node) = self.document.tree.get_mut(id) {
                node.detach();
                removed += 1;
            }
        }
        removed
    }

    /// Serialized markup of the current document
    pub fn html(&self) -> String {
        self.document.html()
    }
}

/// Text of `element` as a reader would see it.
///
/// Block elements and `<br>` start new lines, adjacent table cells are
/// separated by a tab, and the contents of script-like elements are skipped.
pub fn rendered_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    append_rendered(element, &mut out);
    out
}

fn append_rendered(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child_element.value().name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if CELL_ELEMENTS.contains(&name) && follows_cell(child_element) {
                    out.push('\t');
                }
                let is_block = BLOCK_ELEMENTS.contains(&name);
                if is_block {
                    out.push('\n');
                }
                append_rendered(child_element, out);
                if is_block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn follows_cell(element: ElementRef<'_>) -> bool {
    element
        .prev_siblings()
        .find_map(ElementRef::wrap)
        .is_some_and(|prev| CELL_ELEMENTS.contains(&prev.value().name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_rejected() {
        let result = Page::parse("<p>Test</p>", Some("not a url"));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn host_comes_from_url() {
        let page = Page::parse("<p>Test</p>", Some("https://news.example.com/a/b")).unwrap();
        assert_eq!(page.host(), Some("news.example.com"));

        let page = Page::parse("<p>Test</p>", None).unwrap();
        assert_eq!(page.host(), None);
    }

    #[test]
    fn title_collapses_whitespace() {
        let page = Page::parse(
            "<html><head><title>\n  Test \n Article </title></head></html>",
            None,
        )
        .unwrap();
        assert_eq!(page.title(), "Test Article");
    }

    #[test]
    fn rendered_text_separates_blocks_and_skips_scripts() {
        let page = Page::parse(
            r#"<body><div>First</div><div>Sec<b>ond</b></div><script>var x = 1;</script>line<br>break</body>"#,
            None,
        )
        .unwrap();
        let text = rendered_text(page.body());
        assert!(text.contains("First\n"));
        assert!(text.contains("Second"));
        assert!(text.contains("line\nbreak"));
        assert!(!text.contains("var x"));
    }

    #[test]
    fn table_cells_are_tab_separated() {
        let page = Page::parse(
            "<body><table><caption>Scores</caption><tr><th>Team</th><th>Goals</th></tr>\
             <tr><td>Cell</td><td>Two</td></tr></table></body>",
            None,
        )
        .unwrap();
        let text = rendered_text(page.body());
        assert!(text.contains("Scores\n"), "{text:?}");
        assert!(text.contains("Team\tGoals"), "{text:?}");
        assert!(text.contains("Cell\tTwo"), "{text:?}");
        assert!(!text.contains("\tTeam") && !text.contains("\tCell"), "{text:?}");
    }

    #[test]
    fn removed_elements_are_no_longer_selectable() {
        let mut page = Page::parse(
            r#"<body><nav><nav>inner</nav></nav><p>keep</p></body>"#,
            None,
        )
        .unwrap();
        let nav = Selector::parse("nav").unwrap();
        assert_eq!(page.remove_matching(&nav), 1);
        assert!(page.select_first(&nav).is_none());
        assert!(rendered_text(page.body()).contains("keep"));
    }
}
