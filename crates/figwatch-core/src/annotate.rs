//! Link annotator and rich-text link rendering.

use crate::model::node_id::node_id_regex;
use crate::model::NodeId;
use crate::registry::NodeRegistry;
use regex::Captures;

/// Default base of design-document web links.
pub const DEFAULT_WEB_BASE: &str = "https://www.figma.com/design";

/// Escape text for the notifier's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for a single-quoted attribute value.
pub fn escape_attr(text: &str) -> String {
    escape_html(text).replace('\'', "&#39;").replace('"', "&quot;")
}

/// Builds links into one design document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLinks {
    web_base: String,
    file_key: String,
}

impl DocumentLinks {
    pub fn new(web_base: impl Into<String>, file_key: impl Into<String>) -> Self {
        Self {
            web_base: web_base.into().trim_end_matches('/').to_string(),
            file_key: file_key.into(),
        }
    }

    pub fn document_url(&self) -> String {
        format!("{}/{}", self.web_base, self.file_key)
    }

    pub fn node_url(&self, id: &NodeId) -> String {
        format!("{}?node-id={}", self.document_url(), id.as_dash())
    }

    /// `<a href='…'>text</a>` to the document itself.
    pub fn document_link(&self, text: &str) -> String {
        format!(
            "<a href='{}'>{}</a>",
            escape_attr(&self.document_url()),
            escape_html(text)
        )
    }

    /// `<a href='…?node-id=…'>text</a>` to one node.
    pub fn node_link(&self, id: &NodeId, text: &str) -> String {
        format!(
            "<a href='{}'>{}</a>",
            escape_attr(&self.node_url(id)),
            escape_html(text)
        )
    }
}

/// Replace every node-id token in `breadcrumb` that the registry knows with
/// a link showing the registered label.
///
/// Unknown tokens stay as plain text. Runs as a single pass, so ids inside an
/// inserted link are never rewritten again.
pub fn annotate(breadcrumb: &str, registry: &NodeRegistry, links: &DocumentLinks) -> String {
    node_id_regex()
        .replace_all(breadcrumb, |caps: &Captures<'_>| {
            let token = &caps[0];
            match registry.lookup(token) {
                Some(label) => links.node_link(&NodeId::new(token), label),
                None => token.to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> DocumentLinks {
        DocumentLinks::new(DEFAULT_WEB_BASE, "FILE1")
    }

    #[test]
    fn test_known_token_becomes_link() {
        let mut registry = NodeRegistry::new();
        registry.register("1:2", "Buttons, Primary");
        let out = annotate("nodes -> 1:2 -> document -> name", &registry, &links());
        assert_eq!(
            out,
            "nodes -> <a href='https://www.figma.com/design/FILE1?node-id=1-2'>Buttons, Primary</a> -> document -> name"
        );
    }

    #[test]
    fn test_unknown_token_left_plain() {
        let registry = NodeRegistry::new();
        let out = annotate("nodes -> 3:4 -> opacity", &registry, &links());
        assert_eq!(out, "nodes -> 3:4 -> opacity");
    }

    #[test]
    fn test_each_occurrence_linked_once() {
        let mut registry = NodeRegistry::new();
        registry.register("1-2", "Card");
        let out = annotate("1:2 -> children -> 1-2", &registry, &links());
        let link = "<a href='https://www.figma.com/design/FILE1?node-id=1-2'>Card</a>";
        assert_eq!(out.matches(link).count(), 2);
        assert_eq!(out, format!("{} -> children -> {}", link, link));
    }

    #[test]
    fn test_labels_are_escaped() {
        let mut registry = NodeRegistry::new();
        registry.register("1:2", "<Tag> & co");
        let out = annotate("1:2", &registry, &links());
        assert!(out.contains("&lt;Tag&gt; &amp; co"));
    }

    #[test]
    fn test_quote_in_file_key_stays_inside_href() {
        let links = DocumentLinks::new(DEFAULT_WEB_BASE, "K' onclick='x");
        assert_eq!(
            links.document_link("Doc"),
            "<a href='https://www.figma.com/design/K&#39; onclick=&#39;x'>Doc</a>"
        );
        let link = links.node_link(&NodeId::new("1:2"), "Card");
        assert_eq!(link.matches('\'').count(), 2);
    }

    #[test]
    fn test_trailing_slash_in_base_is_trimmed() {
        let links = DocumentLinks::new("https://example.test/design/", "K");
        assert_eq!(links.node_url(&NodeId::new("9:9")), "https://example.test/design/K?node-id=9-9");
    }
}
