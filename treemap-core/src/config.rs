//! Configuration file support for treemap colouring
//!
//! Loads metric ceilings, base colours, and title thresholds from JSON.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.treemaprc.json` in project root
//! 3. `treemap.config.json` in project root
//! 4. `"treemap"` key in `package.json`
//!
//! All fields are optional. A resolved config is read-only for the rest of
//! the process.

use crate::color::Rgb;
use crate::error::ConfigurationError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_MAX_AGE: f64 = 24.0;
const DEFAULT_MAX_AUTHORS: f64 = 20.0;
const DEFAULT_MAX_COMPLEXITY: f64 = 14.0;
const DEFAULT_MAX_COUPLING: f64 = 30.0;
const DEFAULT_MAX_INDENT_COMPLEXITY: f64 = 8.0;

const DEFAULT_BAD_COLOUR: &str = "#E60D0D";
const DEFAULT_GOOD_COLOUR: &str = "#0E34E0";
const DEFAULT_NEUTRAL_COLOUR: &str = "green";
const DEFAULT_STROKE_COLOUR: &str = "black";
const DEFAULT_PARENT_STROKE_COLOUR: &str = "#4E4545";
const DEFAULT_PARENT_FILL_COLOUR: &str = "#7D7E8C";

const DEFAULT_MAX_TITLE_DEPTH: usize = 4;
const DEFAULT_MIN_VALUE_FOR_TITLE: f64 = 500.0;

/// Shape of the authors gradient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorsScale {
    /// 0 → bad, 1 and 2 → intermediate penalties, ceiling → good
    #[default]
    Stepped,
    /// Plain two-stop gradient over `[0, ceiling]`
    Linear,
}

impl AuthorsScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorsScale::Stepped => "stepped",
            AuthorsScale::Linear => "linear",
        }
    }
}

/// Treemap configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TreemapConfig {
    /// Age in months at which colour saturates (default: 24)
    #[serde(default)]
    pub max_age: Option<f64>,
    /// Author count treated as fully healthy (default: 20)
    #[serde(default)]
    pub max_authors: Option<f64>,
    /// Cyclomatic complexity ceiling (default: 14)
    #[serde(default)]
    pub max_complexity: Option<f64>,
    /// Sum-of-coupling ceiling (default: 30)
    #[serde(default)]
    pub max_coupling: Option<f64>,
    /// 90th percentile indentation ceiling (default: 8)
    #[serde(default)]
    pub max_indent_complexity: Option<f64>,

    #[serde(default)]
    pub bad_colour: Option<String>,
    #[serde(default)]
    pub good_colour: Option<String>,
    #[serde(default)]
    pub neutral_colour: Option<String>,
    #[serde(default)]
    pub default_stroke_colour: Option<String>,
    #[serde(default)]
    pub parent_stroke_colour: Option<String>,
    #[serde(default)]
    pub parent_fill_colour: Option<String>,

    /// Deepest directory level that gets a title (default: 4)
    #[serde(default)]
    pub max_title_depth: Option<usize>,
    /// Smallest aggregate value that gets a title (default: 500)
    #[serde(default)]
    pub min_value_for_title: Option<f64>,

    /// Authors gradient shape (default: stepped)
    #[serde(default)]
    pub authors_scale: Option<AuthorsScale>,
}

/// Resolved configuration with parsed colours and concrete ceilings
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub max_age: f64,
    pub max_authors: f64,
    pub max_complexity: f64,
    pub max_coupling: f64,
    pub max_indent_complexity: f64,
    pub bad_colour: Rgb,
    pub good_colour: Rgb,
    pub neutral_colour: Rgb,
    pub default_stroke_colour: Rgb,
    pub parent_stroke_colour: Rgb,
    pub parent_fill_colour: Rgb,
    pub max_title_depth: usize,
    pub min_value_for_title: f64,
    pub authors_scale: AuthorsScale,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl TreemapConfig {
    fn ceilings(&self) -> [(&'static str, f64); 5] {
        [
            ("maxAge", self.max_age.unwrap_or(DEFAULT_MAX_AGE)),
            ("maxAuthors", self.max_authors.unwrap_or(DEFAULT_MAX_AUTHORS)),
            (
                "maxComplexity",
                self.max_complexity.unwrap_or(DEFAULT_MAX_COMPLEXITY),
            ),
            ("maxCoupling", self.max_coupling.unwrap_or(DEFAULT_MAX_COUPLING)),
            (
                "maxIndentComplexity",
                self.max_indent_complexity
                    .unwrap_or(DEFAULT_MAX_INDENT_COMPLEXITY),
            ),
        ]
    }

    fn colour(&self, name: &str, value: &Option<String>, default: &str) -> Result<Rgb> {
        value
            .as_deref()
            .unwrap_or(default)
            .parse::<Rgb>()
            .with_context(|| format!("invalid {}", name))
    }

    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        // Ceilings become domain endpoints opposite 0, so they must be positive
        for (metric, value) in self.ceilings() {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigurationError::InvalidCeiling {
                    metric,
                    value,
                    minimum: 0.0,
                }
                .into());
            }
        }

        // Stepped authors scale has fixed stops at 0, 1, 2
        let max_authors = self.max_authors.unwrap_or(DEFAULT_MAX_AUTHORS);
        if self.authors_scale.unwrap_or_default() == AuthorsScale::Stepped && max_authors <= 2.0 {
            return Err(ConfigurationError::InvalidCeiling {
                metric: "maxAuthors",
                value: max_authors,
                minimum: 2.0,
            })
            .context("the stepped authors scale needs maxAuthors above its fixed stops");
        }

        if let Some(min) = self.min_value_for_title {
            if !min.is_finite() || min < 0.0 {
                anyhow::bail!("minValueForTitle must be non-negative (got {})", min);
            }
        }

        self.colour("badColour", &self.bad_colour, DEFAULT_BAD_COLOUR)?;
        self.colour("goodColour", &self.good_colour, DEFAULT_GOOD_COLOUR)?;
        self.colour("neutralColour", &self.neutral_colour, DEFAULT_NEUTRAL_COLOUR)?;
        self.colour(
            "defaultStrokeColour",
            &self.default_stroke_colour,
            DEFAULT_STROKE_COLOUR,
        )?;
        self.colour(
            "parentStrokeColour",
            &self.parent_stroke_colour,
            DEFAULT_PARENT_STROKE_COLOUR,
        )?;
        self.colour(
            "parentFillColour",
            &self.parent_fill_colour,
            DEFAULT_PARENT_FILL_COLOUR,
        )?;

        Ok(())
    }

    /// Resolve config into concrete values ready for the strategy registry
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        Ok(ResolvedConfig {
            max_age: self.max_age.unwrap_or(DEFAULT_MAX_AGE),
            max_authors: self.max_authors.unwrap_or(DEFAULT_MAX_AUTHORS),
            max_complexity: self.max_complexity.unwrap_or(DEFAULT_MAX_COMPLEXITY),
            max_coupling: self.max_coupling.unwrap_or(DEFAULT_MAX_COUPLING),
            max_indent_complexity: self
                .max_indent_complexity
                .unwrap_or(DEFAULT_MAX_INDENT_COMPLEXITY),
            bad_colour: self.colour("badColour", &self.bad_colour, DEFAULT_BAD_COLOUR)?,
            good_colour: self.colour("goodColour", &self.good_colour, DEFAULT_GOOD_COLOUR)?,
            neutral_colour: self.colour(
                "neutralColour",
                &self.neutral_colour,
                DEFAULT_NEUTRAL_COLOUR,
            )?,
            default_stroke_colour: self.colour(
                "defaultStrokeColour",
                &self.default_stroke_colour,
                DEFAULT_STROKE_COLOUR,
            )?,
            parent_stroke_colour: self.colour(
                "parentStrokeColour",
                &self.parent_stroke_colour,
                DEFAULT_PARENT_STROKE_COLOUR,
            )?,
            parent_fill_colour: self.colour(
                "parentFillColour",
                &self.parent_fill_colour,
                DEFAULT_PARENT_FILL_COLOUR,
            )?,
            max_title_depth: self.max_title_depth.unwrap_or(DEFAULT_MAX_TITLE_DEPTH),
            min_value_for_title: self
                .min_value_for_title
                .unwrap_or(DEFAULT_MIN_VALUE_FOR_TITLE),
            authors_scale: self.authors_scale.unwrap_or_default(),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        TreemapConfig::default().resolve()
    }
}

/// Discover and load a config file from the project root
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(TreemapConfig, PathBuf)>> {
    for name in [".treemaprc.json", "treemap.config.json"] {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    let pkg_path = project_root.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<TreemapConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: TreemapConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load treemap config from the "treemap" key in package.json
fn load_from_package_json(path: &Path) -> Result<Option<TreemapConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match pkg.get("treemap") {
        Some(value) => {
            let config = TreemapConfig::deserialize(value)
                .with_context(|| format!("invalid treemap config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("invalid treemap config in {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (TreemapConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
