//! Path resolver: raw diff path + snapshot tree → readable breadcrumb.

use crate::annotate::escape_html;
use crate::model::{Path, PathStep, SnapshotTree};

/// Marker for a step whose target had an unexpected shape or did not exist.
pub const ERROR_SENTINEL: &str = "ERROR";

/// Separator between breadcrumb segments.
pub const BREADCRUMB_SEPARATOR: &str = " -> ";

const NAME_FIELD: &str = "name";

/// Resolved breadcrumb segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb {
    segments: Vec<String>,
    degraded: bool,
}

impl Breadcrumb {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when at least one segment is the [`ERROR_SENTINEL`].
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn text(&self) -> String {
        self.segments.join(BREADCRUMB_SEPARATOR)
    }

    /// Text with each segment HTML-escaped; the separator is kept as is.
    pub fn escaped_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| escape_html(s))
            .collect::<Vec<_>>()
            .join(BREADCRUMB_SEPARATOR)
    }

    fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    fn push_error(&mut self) {
        self.segments.push(ERROR_SENTINEL.to_string());
        self.degraded = true;
    }
}

/// Walk `path` against `tree`, naming each step.
///
/// - key step: the key text
/// - index step: `(name)` when the element is a map with a name, the element
///   itself when it is a string, otherwise [`ERROR_SENTINEL`]
///
/// A key or index that does not exist yields [`ERROR_SENTINEL`] and ends the
/// walk. Never fails and never mutates `tree`.
pub fn resolve_breadcrumb(tree: &SnapshotTree, path: &Path) -> Breadcrumb {
    let mut crumb = Breadcrumb::default();
    let mut current = tree;

    for step in path.steps() {
        match step {
            PathStep::Key(key) => match current.get(key) {
                Some(next) => {
                    crumb.push(key.as_str());
                    current = next;
                }
                None => {
                    crumb.push_error();
                    break;
                }
            },
            PathStep::Index(index) => match current.at(*index) {
                Some(next) => {
                    match next {
                        SnapshotTree::Map(_) => match next.get(NAME_FIELD) {
                            Some(name) => crumb.push(format!("({})", name.render_text())),
                            None => crumb.push_error(),
                        },
                        SnapshotTree::Scalar(_) => match next.as_str() {
                            Some(text) => crumb.push(text),
                            None => crumb.push_error(),
                        },
                        SnapshotTree::Sequence(_) => crumb.push_error(),
                    }
                    current = next;
                }
                None => {
                    crumb.push_error();
                    break;
                }
            },
        }
    }
    crumb
}

/// Breadcrumb text for `path` in `tree`; the empty path resolves to `""`.
pub fn resolve(tree: &SnapshotTree, path: &Path) -> String {
    resolve_breadcrumb(tree, path).text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> SnapshotTree {
        SnapshotTree::from(json!({
            "nodes": {
                "1:2": {
                    "document": {
                        "name": "Buttons",
                        "children": [
                            {"id": "5:6", "name": "Icon", "opacity": 1},
                            "plain",
                            [1, 2],
                            {"id": "5:7"}
                        ]
                    }
                }
            },
            "lastModified": "2024-01-01T00:00:00Z"
        }))
    }

    fn path(text: &str) -> Path {
        Path::parse(text).unwrap()
    }

    #[test]
    fn test_keys_and_named_elements() {
        let crumb = resolve(&snapshot(), &path("nodes->1:2->document->children->[0]->opacity"));
        assert_eq!(crumb, "nodes -> 1:2 -> document -> children -> (Icon) -> opacity");
    }

    #[test]
    fn test_string_element_is_used_verbatim() {
        assert_eq!(
            resolve(&snapshot(), &path("nodes->1:2->document->children->[1]")),
            "nodes -> 1:2 -> document -> children -> plain"
        );
    }

    #[test]
    fn test_unnamed_elements_are_marked() {
        let crumb = resolve_breadcrumb(&snapshot(), &path("nodes->1:2->document->children->[3]"));
        assert!(crumb.is_degraded());
        assert_eq!(crumb.segments().last().map(String::as_str), Some(ERROR_SENTINEL));

        let nested = resolve_breadcrumb(&snapshot(), &path("nodes->1:2->document->children->[2]->[0]"));
        assert_eq!(
            nested.text(),
            "nodes -> 1:2 -> document -> children -> ERROR -> ERROR"
        );
    }

    #[test]
    fn test_missing_targets_end_the_walk() {
        assert_eq!(
            resolve(&snapshot(), &path("nodes->9:9->document")),
            "nodes -> ERROR"
        );
        assert_eq!(
            resolve(&snapshot(), &path("nodes->1:2->document->children->[40]->name")),
            "nodes -> 1:2 -> document -> children -> ERROR"
        );
        assert_eq!(resolve(&snapshot(), &path("lastModified->[0]")), "lastModified -> ERROR");
    }

    #[test]
    fn test_escaped_text_keeps_separator() {
        let tree = SnapshotTree::from(json!({"items": [{"name": "A & <B>"}]}));
        let crumb = resolve_breadcrumb(&tree, &path("items->[0]"));
        assert_eq!(crumb.escaped_text(), "items -> (A &amp; &lt;B&gt;)");
    }

    #[test]
    fn test_empty_path_is_empty_string() {
        assert_eq!(resolve(&snapshot(), &Path::root()), "");
    }

    #[test]
    fn test_top_level_field() {
        assert_eq!(resolve(&snapshot(), &path("lastModified")), "lastModified");
    }
}
