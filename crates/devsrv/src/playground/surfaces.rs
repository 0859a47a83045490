//! Headless models of the playground's panels.
//!
//! The browser page manipulates real DOM; these are the same surfaces as
//! plain state, shared freely across tasks. DOM-only concerns (CSS selector
//! queries, executing the code block) stay in the page script.

use parking_lot::RwLock;
use serde_json::Value;

/// A detached markup fragment standing in for a DOM node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHandle {
    markup: String,
}

impl NodeHandle {
    /// Create a handle from its markup.
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// The fragment's markup.
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// Content accepted by [`Preview::set`]: raw markup, a single node, or a
/// sequence of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewContent {
    /// Raw HTML markup
    Html(String),
    /// A single node
    Node(NodeHandle),
    /// An ordered sequence of nodes
    NodeList(Vec<NodeHandle>),
}

impl PreviewContent {
    fn render(&self) -> String {
        match self {
            PreviewContent::Html(markup) => markup.clone(),
            PreviewContent::Node(node) => node.markup().to_string(),
            PreviewContent::NodeList(nodes) => {
                nodes.iter().map(NodeHandle::markup).collect::<String>()
            }
        }
    }
}

/// The editable code block.
#[derive(Debug, Default)]
pub struct Code {
    content: RwLock<String>,
}

impl Code {
    /// Current code content.
    pub fn get(&self) -> String {
        self.content.read().clone()
    }

    /// Replace the code content.
    pub fn set(&self, code: impl Into<String>) {
        *self.content.write() = code.into();
    }

    /// Empty the code block.
    pub fn clear(&self) {
        self.content.write().clear();
    }
}

/// The preview sandbox.
#[derive(Debug, Default)]
pub struct Preview {
    content: RwLock<Option<PreviewContent>>,
}

impl Preview {
    /// Rendered markup of the current content, empty when cleared.
    pub fn get(&self) -> String {
        self.content
            .read()
            .as_ref()
            .map(PreviewContent::render)
            .unwrap_or_default()
    }

    /// Replace the preview content.
    pub fn set(&self, content: PreviewContent) {
        *self.content.write() = Some(content);
    }

    /// Empty the preview.
    pub fn clear(&self) {
        *self.content.write() = None;
    }
}

/// The append-only log list.
#[derive(Debug, Default)]
pub struct Logs {
    entries: RwLock<Vec<String>>,
}

impl Logs {
    /// Snapshot of all entries, oldest first.
    pub fn get(&self) -> Vec<String> {
        self.entries.read().clone()
    }

    /// Append one entry built from the given parts, joined by a space.
    /// Strings render bare, everything else as JSON.
    pub fn add(&self, parts: &[Value]) {
        let entry = parts
            .iter()
            .map(super::render_value)
            .collect::<Vec<_>>()
            .join(" ");
        self.entries.write().push(entry);
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_code_roundtrip() {
        let code = Code::default();
        assert_eq!(code.get(), "");

        code.set("console.log(1);");
        assert_eq!(code.get(), "console.log(1);");

        code.clear();
        assert_eq!(code.get(), "");
    }

    #[test]
    fn test_preview_accepts_markup() {
        let preview = Preview::default();
        preview.set(PreviewContent::Html("<button>go</button>".to_string()));
        assert_eq!(preview.get(), "<button>go</button>");

        preview.clear();
        assert_eq!(preview.get(), "");
    }

    #[test]
    fn test_preview_accepts_node_variants() {
        let preview = Preview::default();

        preview.set(PreviewContent::Node(NodeHandle::new("<p>one</p>")));
        assert_eq!(preview.get(), "<p>one</p>");

        preview.set(PreviewContent::NodeList(vec![
            NodeHandle::new("<p>one</p>"),
            NodeHandle::new("<p>two</p>"),
        ]));
        assert_eq!(preview.get(), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_logs_render_and_join_parts() {
        let logs = Logs::default();
        logs.add(&[json!("ready"), json!(3), json!({"ok": true})]);
        logs.add(&[json!("second")]);

        let entries = logs.get();
        assert_eq!(entries[0], r#"ready 3 {"ok":true}"#);
        assert_eq!(entries[1], "second");

        logs.clear();
        assert!(logs.get().is_empty());
    }
}
