//! Painted output for the rendering layer
//!
//! Global invariants enforced:
//! - Pre-order traversal, children in document order
//! - Byte-for-byte identical output across runs

use crate::color::Rgb;
use crate::config::ResolvedConfig;
use crate::strategy::Strategy;
use crate::tree::Node;
use serde::{Deserialize, Serialize};

/// Fill, stroke, and title decision for one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaintedNode {
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub value: f64,
    pub leaf: bool,
    pub fill: Rgb,
    pub stroke: Rgb,
    pub title: bool,
}

/// Apply a strategy to every node of an annotated tree
pub fn paint_tree(root: &Node, strategy: &Strategy, config: &ResolvedConfig) -> Vec<PaintedNode> {
    root.walk()
        .map(|(path, node)| PaintedNode {
            path,
            name: node.name.clone(),
            depth: node.depth,
            value: node.value,
            leaf: node.is_leaf(),
            fill: strategy.fill(node),
            stroke: strategy.stroke(node),
            title: node.show_title(config),
        })
        .collect()
}

/// Render painted nodes as pretty JSON
pub fn render_json(nodes: &[PaintedNode]) -> String {
    serde_json::to_string_pretty(nodes).unwrap_or_else(|_| "[]".to_string())
}

/// Render painted nodes as indented text, one line per node
pub fn render_text(nodes: &[PaintedNode]) -> String {
    let mut output = String::new();
    for node in nodes {
        let indent = "  ".repeat(node.depth);
        let marker = if node.title { " *" } else { "" };
        output.push_str(&format!(
            "{}{}{} fill={} stroke={} value={}\n",
            indent, node.name, marker, node.fill, node.stroke, node.value
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyRegistry;
    use serde_json::json;

    fn painted(strategy: &str) -> (Vec<PaintedNode>, ResolvedConfig) {
        let config = ResolvedConfig::defaults().unwrap();
        let registry = StrategyRegistry::build(&config).unwrap();
        let mut root = Node::parent(
            "app",
            vec![
                Node::leaf(
                    "new.js",
                    json!({"cloc": {"code": 400}, "code-maat": {"ageMonths": 0}}),
                ),
                Node::leaf("old.js", json!({"cloc": {"code": 200}})),
            ],
        );
        root.annotate();
        let nodes = paint_tree(&root, registry.select(strategy).unwrap(), &config);
        (nodes, config)
    }

    #[test]
    fn test_paint_tree_order_and_colours() {
        let (nodes, config) = painted("age");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].path, "app");
        assert!(!nodes[0].leaf);
        assert!(nodes[0].title);
        assert_eq!(nodes[0].value, 600.0);
        assert_eq!(nodes[0].fill, config.parent_fill_colour);
        assert_eq!(nodes[0].stroke, config.parent_stroke_colour);
        assert_eq!(nodes[1].path, "app/new.js");
        assert_eq!(nodes[1].fill, config.good_colour);
        assert_eq!(nodes[2].fill, config.bad_colour);
        assert!(!nodes[2].title);
    }

    #[test]
    fn test_render_json_is_deterministic() {
        let (first, _) = painted("age");
        let (second, _) = painted("age");
        assert_eq!(render_json(&first), render_json(&second));
        let parsed: Vec<PaintedNode> = serde_json::from_str(&render_json(&first)).unwrap();
        assert_eq!(parsed.len(), first.len());
        assert_eq!(render_json(&parsed), render_json(&first));
        assert!(render_json(&first).contains("\"fill\": \"#7d7e8c\""));
    }

    #[test]
    fn test_render_text_keeps_names_with_slashes() {
        let config = ResolvedConfig::defaults().unwrap();
        let registry = StrategyRegistry::build(&config).unwrap();
        let mut root = Node::parent(
            "repo",
            vec![Node::parent(
                "src/main",
                vec![Node::leaf("java/App.java", json!({"cloc": {"code": 10}}))],
            )],
        );
        root.annotate();
        let nodes = paint_tree(&root, registry.select("age").unwrap(), &config);
        assert_eq!(nodes[2].path, "repo/src/main/java/App.java");
        assert_eq!(nodes[2].name, "java/App.java");

        let text = render_text(&nodes);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].starts_with("  src/main fill="));
        assert!(lines[2].starts_with("    java/App.java fill="));
    }

    #[test]
    fn test_render_text_indents_by_depth() {
        let (nodes, _) = painted("age");
        let text = render_text(&nodes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("app * fill=#7d7e8c stroke=#4e4545"));
        assert!(lines[1].starts_with("  new.js fill=#0e34e0"));
        assert!(lines[2].starts_with("  old.js fill=#e60d0d"));
    }
}
