//! Treemap colouring core - metric extraction, colour scales, and strategies

#![deny(warnings)]

// Global invariants enforced in this crate:
// - No global mutable state; config is read-only once resolved
// - No randomness, clocks, threads, or I/O inside colouring
// - Missing metric data resolves to a colour, never an error
// - Identical input yields identical colours

pub mod color;
pub mod config;
pub mod error;
pub mod metrics;
pub mod report;
pub mod scale;
pub mod strategy;
pub mod tree;

pub use color::Rgb;
pub use config::ResolvedConfig;
pub use error::ConfigurationError;
pub use metrics::{Metric, MetricValue};
pub use report::{paint_tree, render_json, render_text, PaintedNode};
pub use scale::{CategoricalPalette, ColorScale};
pub use strategy::{build_strategies, Strategy, StrategyRegistry};
pub use tree::{load_tree, Node};
