//! Strategy registry: per-metric fill and stroke colouring
//!
//! Global invariants enforced:
//! - Every strategy is built once, eagerly, from a resolved config
//! - Strategies are immutable; switching strategy never touches node data
//! - Internal nodes always get the configured parent colour
//! - Unknown strategy names are errors, never a silent default

use crate::color::Rgb;
use crate::config::{AuthorsScale, ResolvedConfig};
use crate::error::ConfigurationError;
use crate::metrics::{Metric, MetricValue};
use crate::scale::{CategoricalPalette, ColorScale};
use crate::tree::Node;
use tracing::{debug, trace};

/// Gradient shape a metric is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleShape {
    /// Two stops between 0 and the ceiling
    Linear,
    /// Fixed stops at 0, 1, 2 then the ceiling
    Stepped,
    /// Hashed palette, no numeric domain
    Categorical,
}

/// Colour used when a leaf has no value for the metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Unknown is treated pessimistically
    Bad,
    /// Unknown is not penalised
    Neutral,
}

/// Declarative description of how one metric is coloured
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSpec {
    pub metric: Metric,
    pub ceiling: Option<f64>,
    pub missing: MissingPolicy,
    /// Domain runs `[ceiling, 0]` so high values land on the bad colour
    pub reversed: bool,
    pub shape: ScaleShape,
}

impl MetricSpec {
    pub fn for_metric(metric: Metric, config: &ResolvedConfig) -> Self {
        let reversed_gradient = |ceiling: f64| MetricSpec {
            metric,
            ceiling: Some(ceiling),
            missing: MissingPolicy::Neutral,
            reversed: true,
            shape: ScaleShape::Linear,
        };

        match metric {
            Metric::Age => MetricSpec {
                missing: MissingPolicy::Bad,
                ..reversed_gradient(config.max_age)
            },
            Metric::Authors => MetricSpec {
                metric,
                ceiling: Some(config.max_authors),
                missing: MissingPolicy::Bad,
                reversed: false,
                shape: match config.authors_scale {
                    AuthorsScale::Stepped => ScaleShape::Stepped,
                    AuthorsScale::Linear => ScaleShape::Linear,
                },
            },
            Metric::Language => MetricSpec {
                metric,
                ceiling: None,
                missing: MissingPolicy::Neutral,
                reversed: false,
                shape: ScaleShape::Categorical,
            },
            Metric::Complexity => reversed_gradient(config.max_complexity),
            Metric::Coupling => reversed_gradient(config.max_coupling),
            Metric::IndentComplexity => reversed_gradient(config.max_indent_complexity),
        }
    }

    fn missing_colour(&self, config: &ResolvedConfig) -> Rgb {
        match self.missing {
            MissingPolicy::Bad => config.bad_colour,
            MissingPolicy::Neutral => config.neutral_colour,
        }
    }

    /// Fill gradient, or `None` for categorical metrics
    fn fill_scale(
        &self,
        base: &ColorScale,
        config: &ResolvedConfig,
    ) -> Result<Option<ColorScale>, ConfigurationError> {
        let Some(ceiling) = self.ceiling else {
            return Ok(None);
        };
        let scale = match self.shape {
            ScaleShape::Categorical => return Ok(None),
            ScaleShape::Linear if self.reversed => base.with_domain(vec![ceiling, 0.0])?,
            ScaleShape::Linear => base.with_domain(vec![0.0, ceiling])?,
            ScaleShape::Stepped => {
                let (bad, good) = (config.bad_colour, config.good_colour);
                ColorScale::build(
                    vec![0.0, 1.0, 2.0, ceiling],
                    vec![
                        bad,
                        Rgb::lerp(bad, good, 0.25),
                        Rgb::lerp(bad, good, 0.5),
                        good,
                    ],
                )?
            }
        };
        Ok(Some(scale))
    }
}

/// Where a [`Paint`] gets a leaf's colour from
#[derive(Debug, Clone, PartialEq)]
enum Palette {
    Gradient { metric: Metric, scale: ColorScale },
    Categorical { metric: Metric, palette: CategoricalPalette },
    Flat(Rgb),
}

/// A total node → colour function composed from an extractor, a parent
/// colour, a missing-value colour, and a palette
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    parent: Rgb,
    missing: Rgb,
    palette: Palette,
}

impl Paint {
    pub fn gradient(metric: Metric, parent: Rgb, missing: Rgb, scale: ColorScale) -> Self {
        Paint {
            parent,
            missing,
            palette: Palette::Gradient { metric, scale },
        }
    }

    pub fn categorical(
        metric: Metric,
        parent: Rgb,
        missing: Rgb,
        palette: CategoricalPalette,
    ) -> Self {
        Paint {
            parent,
            missing,
            palette: Palette::Categorical { metric, palette },
        }
    }

    /// Same colour for every node, no extractor involved
    pub fn flat(colour: Rgb) -> Self {
        Paint {
            parent: colour,
            missing: colour,
            palette: Palette::Flat(colour),
        }
    }

    pub fn colour(&self, node: &Node) -> Rgb {
        if node.has_children() {
            return self.parent;
        }
        let (metric, found) = match &self.palette {
            Palette::Flat(colour) => return *colour,
            Palette::Gradient { metric, scale } => (
                *metric,
                metric.extract_number(node).map(|value| scale.apply(value)),
            ),
            Palette::Categorical { metric, palette } => (
                *metric,
                metric
                    .extract(node)
                    .as_ref()
                    .and_then(MetricValue::as_label)
                    .map(|label| palette.colour_for(label)),
            ),
        };
        found.unwrap_or_else(|| {
            trace!(node = %node.name, metric = %metric, "metric missing");
            self.missing
        })
    }
}

/// A named pair of fill and stroke functions
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    metric: Metric,
    fill: Paint,
    stroke: Paint,
}

impl Strategy {
    fn build(
        spec: &MetricSpec,
        base: &ColorScale,
        config: &ResolvedConfig,
    ) -> Result<Self, ConfigurationError> {
        let missing = spec.missing_colour(config);
        let (fill, stroke) = match spec.fill_scale(base, config)? {
            Some(scale) => {
                let stroke_scale = scale.darker();
                (
                    Paint::gradient(spec.metric, config.parent_fill_colour, missing, scale),
                    Paint::gradient(
                        spec.metric,
                        config.parent_stroke_colour,
                        missing.darker(),
                        stroke_scale,
                    ),
                )
            }
            None => (
                Paint::categorical(
                    spec.metric,
                    config.parent_fill_colour,
                    missing,
                    CategoricalPalette::category20(),
                ),
                Paint::flat(config.default_stroke_colour),
            ),
        };
        Ok(Strategy {
            metric: spec.metric,
            fill,
            stroke,
        })
    }

    pub fn name(&self) -> &'static str {
        self.metric.as_str()
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn fill(&self, node: &Node) -> Rgb {
        self.fill.colour(node)
    }

    pub fn stroke(&self, node: &Node) -> Rgb {
        self.stroke.colour(node)
    }

    /// Borrowed fill function for a rendering pass
    pub fn fill_fn(&self) -> impl Fn(&Node) -> Rgb + '_ {
        move |node: &Node| self.fill(node)
    }

    /// Borrowed stroke function for a rendering pass
    pub fn stroke_fn(&self) -> impl Fn(&Node) -> Rgb + '_ {
        move |node: &Node| self.stroke(node)
    }
}

/// Every strategy, prebuilt so switching never rebuilds scales
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    pub fn build(config: &ResolvedConfig) -> Result<Self, ConfigurationError> {
        // Shared bad→good gradient, rebound onto each metric's domain
        let base = ColorScale::linear(0.0, 1.0, config.bad_colour, config.good_colour)?;

        let strategies = Metric::ALL
            .iter()
            .map(|&metric| {
                let spec = MetricSpec::for_metric(metric, config);
                let strategy = Strategy::build(&spec, &base, config)?;
                debug!(
                    strategy = metric.as_str(),
                    ceiling = ?spec.ceiling,
                    shape = ?spec.shape,
                    "built strategy"
                );
                Ok(strategy)
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        Ok(StrategyRegistry { strategies })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(Strategy::name).collect()
    }

    pub fn get(&self, metric: Metric) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.metric == metric)
    }

    /// Look up a strategy by name
    pub fn select(&self, name: &str) -> Result<&Strategy, ConfigurationError> {
        let found = self.strategies.iter().find(|s| s.name() == name);
        match found {
            Some(strategy) => {
                debug!(strategy = name, "selected strategy");
                Ok(strategy)
            }
            None => Err(ConfigurationError::UnknownStrategy {
                name: name.to_string(),
                known: self.names().iter().map(|n| n.to_string()).collect(),
            }),
        }
    }
}

/// Build every known strategy from a resolved config
pub fn build_strategies(config: &ResolvedConfig) -> Result<StrategyRegistry, ConfigurationError> {
    StrategyRegistry::build(config)
}
