//! Per-metric extraction from a node's opaque data payload
//!
//! Global invariants enforced:
//! - Internal nodes never yield a metric value
//! - Missing or malformed structure at any level is absent, never an error
//! - Zero is a present value, distinct from absent
//! - Field-name fallbacks are tried in a fixed order

use crate::error::ConfigurationError;
use crate::tree::Node;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The closed set of colourable metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Age,
    Authors,
    Language,
    Complexity,
    Coupling,
    IndentComplexity,
}

/// A value extracted from a leaf
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Label(String),
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            MetricValue::Label(s) => Some(s),
            MetricValue::Number(_) => None,
        }
    }
}

const AGE_PATHS: &[&[&str]] = &[&["code-maat", "ageMonths"], &["code-maat", "age-months"]];
const AUTHORS_PATHS: &[&[&str]] = &[&["code-maat", "nAuthors"], &["code-maat", "n-authors"]];
const LANGUAGE_PATHS: &[&[&str]] = &[&["cloc", "language"]];
const COMPLEXITY_PATHS: &[&[&str]] = &[&["jscomplexity", "cyclomatic"], &["lizard", "maxCcn"]];
const COUPLING_PATHS: &[&[&str]] = &[&["code-maat", "soc"]];
const INDENT_COMPLEXITY_PATHS: &[&[&str]] = &[&["indents", "p90"]];

impl Metric {
    /// Registry order
    pub const ALL: [Metric; 6] = [
        Metric::Age,
        Metric::Authors,
        Metric::Language,
        Metric::Complexity,
        Metric::Coupling,
        Metric::IndentComplexity,
    ];

    /// Strategy name as used by configs and the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Age => "age",
            Metric::Authors => "authors",
            Metric::Language => "language",
            Metric::Complexity => "jscomplexity",
            Metric::Coupling => "coupling",
            Metric::IndentComplexity => "indentComplexity",
        }
    }

    /// Field paths tried in order until one holds a usable value
    pub fn field_paths(&self) -> &'static [&'static [&'static str]] {
        match self {
            Metric::Age => AGE_PATHS,
            Metric::Authors => AUTHORS_PATHS,
            Metric::Language => LANGUAGE_PATHS,
            Metric::Complexity => COMPLEXITY_PATHS,
            Metric::Coupling => COUPLING_PATHS,
            Metric::IndentComplexity => INDENT_COMPLEXITY_PATHS,
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Metric::Language)
    }

    /// Extract this metric from a node
    pub fn extract(&self, node: &Node) -> Option<MetricValue> {
        if node.has_children() {
            return None;
        }
        let data = node.data.as_ref()?;
        if self.is_categorical() {
            first_match(data, self.field_paths(), as_label).map(MetricValue::Label)
        } else {
            first_match(data, self.field_paths(), Value::as_f64).map(MetricValue::Number)
        }
    }

    /// Numeric extraction; categorical metrics always yield `None`
    pub fn extract_number(&self, node: &Node) -> Option<f64> {
        self.extract(node).and_then(|v| v.as_number())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownStrategy {
                name: s.to_string(),
                known: Metric::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            })
    }
}

/// Follow a key path through nested objects
fn lookup<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(data, |value, key| value.as_object()?.get(*key))
}

fn first_match<T>(
    data: &Value,
    paths: &[&[&str]],
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    paths
        .iter()
        .find_map(|path| lookup(data, path).and_then(&convert))
}

fn as_label(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn age(node: &Node) -> Option<f64> {
    Metric::Age.extract_number(node)
}

pub fn authors(node: &Node) -> Option<f64> {
    Metric::Authors.extract_number(node)
}

pub fn language(node: &Node) -> Option<String> {
    match Metric::Language.extract(node)? {
        MetricValue::Label(label) => Some(label),
        MetricValue::Number(_) => None,
    }
}

pub fn complexity(node: &Node) -> Option<f64> {
    Metric::Complexity.extract_number(node)
}

pub fn coupling(node: &Node) -> Option<f64> {
    Metric::Coupling.extract_number(node)
}

pub fn indent_complexity(node: &Node) -> Option<f64> {
    Metric::IndentComplexity.extract_number(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authors_current_field() {
        let node = Node::leaf("a.js", json!({"code-maat": {"nAuthors": 3}}));
        assert_eq!(authors(&node), Some(3.0));
    }

    #[test]
    fn test_authors_legacy_field() {
        let node = Node::leaf("a.js", json!({"code-maat": {"n-authors": 3}}));
        assert_eq!(authors(&node), Some(3.0));
    }

    #[test]
    fn test_authors_missing() {
        let node = Node::leaf("a.js", json!({"code-maat": {}}));
        assert_eq!(authors(&node), None);
        let node = Node::leaf("a.js", json!({}));
        assert_eq!(authors(&node), None);
    }

    #[test]
    fn test_zero_authors_is_present() {
        let node = Node::leaf("a.js", json!({"code-maat": {"nAuthors": 0}}));
        assert_eq!(authors(&node), Some(0.0));
    }

    #[test]
    fn test_age_prefers_current_spelling() {
        let node = Node::leaf(
            "a.js",
            json!({"code-maat": {"ageMonths": 4, "age-months": 19}}),
        );
        assert_eq!(age(&node), Some(4.0));
        let node = Node::leaf("a.js", json!({"code-maat": {"age-months": 19}}));
        assert_eq!(age(&node), Some(19.0));
    }

    #[test]
    fn test_malformed_current_field_falls_back() {
        let node = Node::leaf(
            "a.js",
            json!({"code-maat": {"ageMonths": "old", "age-months": 7}}),
        );
        assert_eq!(age(&node), Some(7.0));
    }

    #[test]
    fn test_complexity_falls_back_to_second_analyzer() {
        let node = Node::leaf("a.py", json!({"lizard": {"maxCcn": 11}}));
        assert_eq!(complexity(&node), Some(11.0));
        let node = Node::leaf(
            "a.js",
            json!({"jscomplexity": {"cyclomatic": 2}, "lizard": {"maxCcn": 11}}),
        );
        assert_eq!(complexity(&node), Some(2.0));
    }

    #[test]
    fn test_coupling_and_indents() {
        let node = Node::leaf(
            "a.js",
            json!({"code-maat": {"soc": 17}, "indents": {"p90": 3.5}}),
        );
        assert_eq!(coupling(&node), Some(17.0));
        assert_eq!(indent_complexity(&node), Some(3.5));
    }

    #[test]
    fn test_language_label() {
        let node = Node::leaf("a.rs", json!({"cloc": {"language": "Rust"}}));
        assert_eq!(language(&node), Some("Rust".to_string()));
        let node = Node::leaf("a.rs", json!({"cloc": {"language": ""}}));
        assert_eq!(language(&node), None);
        let node = Node::leaf("a.rs", json!({"cloc": {"language": 5}}));
        assert_eq!(language(&node), None);
    }

    #[test]
    fn test_parent_nodes_are_always_absent() {
        let mut parent = Node::parent("dir", vec![Node::leaf("x", json!({}))]);
        parent.data = Some(json!({
            "code-maat": {"ageMonths": 1, "nAuthors": 2, "soc": 3},
            "cloc": {"language": "Rust"},
            "jscomplexity": {"cyclomatic": 4},
            "indents": {"p90": 5}
        }));
        for metric in Metric::ALL {
            assert_eq!(metric.extract(&parent), None, "{} leaked from parent", metric);
        }
        parent.children = Some(Vec::new());
        for metric in Metric::ALL {
            assert_eq!(metric.extract(&parent), None);
        }
    }

    #[test]
    fn test_malformed_structure_is_absent() {
        for data in [
            json!(null),
            json!(42),
            json!("code-maat"),
            json!({"code-maat": null}),
            json!({"code-maat": [1, 2, 3]}),
            json!({"code-maat": {"nAuthors": null}}),
            json!({"code-maat": {"nAuthors": true}}),
        ] {
            let node = Node::leaf("a.js", data);
            for metric in Metric::ALL {
                assert_eq!(metric.extract(&node), None);
            }
        }
        let bare = Node {
            name: "bare".to_string(),
            ..Default::default()
        };
        assert_eq!(Metric::Age.extract(&bare), None);
    }

    #[test]
    fn test_metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
        assert_eq!("jscomplexity".parse::<Metric>().unwrap(), Metric::Complexity);
        assert!(matches!(
            "churn".parse::<Metric>(),
            Err(ConfigurationError::UnknownStrategy { .. })
        ));
    }
}
