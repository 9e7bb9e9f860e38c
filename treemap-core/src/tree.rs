//! File/directory hierarchy handed to the colouring core
//!
//! Nodes arrive as a JSON-shaped document. Leaves carry an opaque `data`
//! payload; internal nodes are recognised solely by a present `children`.

use crate::config::ResolvedConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// One file or directory in the metrics tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Aggregate size, lines of code by default
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub depth: usize,
}

impl Node {
    pub fn leaf(name: impl Into<String>, data: Value) -> Self {
        Node {
            name: name.into(),
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn parent(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node {
            name: name.into(),
            children: Some(children),
            ..Default::default()
        }
    }

    /// Leaf iff `children` is absent; an empty array still marks a directory
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Lines of code recorded by cloc, if any
    pub fn lines_of_code(&self) -> Option<f64> {
        self.data.as_ref()?.get("cloc")?.get("code")?.as_f64()
    }

    /// Set `depth` on every node and roll `value` up from leaf line counts
    pub fn annotate(&mut self) {
        self.annotate_at(0);
    }

    fn annotate_at(&mut self, depth: usize) -> f64 {
        self.depth = depth;
        self.value = match self.children.as_mut() {
            Some(children) => children
                .iter_mut()
                .map(|child| child.annotate_at(depth + 1))
                .sum(),
            None => self.lines_of_code().unwrap_or(0.0),
        };
        self.value
    }

    /// Deterministic pre-order traversal yielding `/`-joined paths
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self.name.clone(), self)],
        }
    }

    /// Whether the rendering layer should label this node
    pub fn show_title(&self, config: &ResolvedConfig) -> bool {
        self.has_children()
            && self.value >= config.min_value_for_title
            && self.depth <= config.max_title_depth
    }
}

/// Pre-order iterator returned by [`Node::walk`]
pub struct Walk<'a> {
    stack: Vec<(String, &'a Node)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (String, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for child in node.children().iter().rev() {
            self.stack.push((format!("{}/{}", path, child.name), child));
        }
        Some((path, node))
    }
}

/// Load a metrics tree from a JSON file
pub fn load_tree(path: &Path) -> Result<Node> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read metrics file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse metrics file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Node {
        Node::parent(
            "root",
            vec![
                Node::parent(
                    "src",
                    vec![
                        Node::leaf("main.rs", json!({"cloc": {"code": 300}})),
                        Node::leaf("lib.rs", json!({"cloc": {"code": 250}})),
                    ],
                ),
                Node::leaf("README.md", json!({})),
                Node::parent("empty", Vec::new()),
            ],
        )
    }

    #[test]
    fn test_annotate_rolls_up_values() {
        let mut root = sample();
        root.annotate();
        assert_eq!(root.value, 550.0);
        assert_eq!(root.depth, 0);
        let src = &root.children()[0];
        assert_eq!(src.value, 550.0);
        assert_eq!(src.depth, 1);
        assert_eq!(src.children()[1].depth, 2);
        assert_eq!(root.children()[1].value, 0.0);
        assert_eq!(root.children()[2].value, 0.0);
    }

    #[test]
    fn test_walk_is_preorder() {
        let root = sample();
        let paths: Vec<String> = root.walk().map(|(path, _)| path).collect();
        assert_eq!(
            paths,
            vec![
                "root",
                "root/src",
                "root/src/main.rs",
                "root/src/lib.rs",
                "root/README.md",
                "root/empty",
            ]
        );
    }

    #[test]
    fn test_empty_children_is_not_leaf() {
        let root = sample();
        assert!(!root.children()[2].is_leaf());
        assert!(root.children()[1].is_leaf());
    }

    #[test]
    fn test_deserialize_minimal_document() {
        let node: Node = serde_json::from_str(
            r#"{"name": "root", "children": [{"name": "a.js", "data": {"cloc": {"code": 12}}}]}"#,
        )
        .unwrap();
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].lines_of_code(), Some(12.0));
        assert_eq!(node.value, 0.0);
    }

    #[test]
    fn test_show_title_thresholds() {
        let config = ResolvedConfig::defaults().unwrap();
        let mut root = sample();
        root.annotate();
        assert!(root.show_title(&config));
        // leaves never get titles
        assert!(!root.children()[0].children()[0].show_title(&config));
        // below minValueForTitle (500)
        assert!(!root.children()[2].show_title(&config));

        let mut deep = root.clone();
        deep.depth = config.max_title_depth + 1;
        assert!(!deep.show_title(&config));
    }

    #[test]
    fn test_load_tree_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_tree(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("metrics.json"));

        std::fs::write(&path, r#"{"name": "root"}"#).unwrap();
        assert_eq!(load_tree(&path).unwrap().name, "root");
    }
}
