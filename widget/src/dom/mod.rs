//! In-memory host document: the page the widget is mounted into.
//!
//! Nodes are shared handles guarded by per-node locks, so pipelines running
//! as separate tasks can each mutate their own subtree.

pub mod events;
pub mod markup;
pub mod node;
pub mod selector;

pub use events::{EventKind, Subscription};
pub use node::Element;
pub use selector::{Selector, SelectorError};

/// A host page. Owns the root node everything else hangs off.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            root: Element::document_root(),
        }
    }

    /// Build a document whose top-level nodes come from `markup`.
    pub fn parse(markup: &str) -> Self {
        let doc = Self::new();
        doc.root.set_inner_html(markup);
        doc
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        self.root.query_selector(selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        self.root.query_selector_all(selector)
    }

    pub fn select(&self, selector: &Selector) -> Option<Element> {
        self.root.select(selector)
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<Element> {
        self.root.select_all(selector)
    }

    pub fn to_html(&self) -> String {
        self.root.inner_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_query() {
        let doc = Document::parse(
            r#"<div class="discord-widget"><div class="discord-content"></div></div><div class="discord-widget"></div>"#,
        );
        assert_eq!(doc.query_selector_all(".discord-widget").len(), 2);
        let content = doc.query_selector(".discord-content").unwrap();
        assert!(content.is_connected());
        assert_eq!(
            content.parent().unwrap().attr("class").as_deref(),
            Some("discord-widget")
        );
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let doc = Document::parse("<p>x</p>");
        assert!(doc.query_selector("p > x").is_none());
        assert!(doc.query_selector_all("").is_empty());
    }

    #[test]
    fn test_to_html() {
        let markup = r#"<span class="discord-online-count"></span>"#;
        assert_eq!(Document::parse(markup).to_html(), markup);
    }
}
