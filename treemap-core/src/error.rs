//! Configuration errors raised by scale construction and strategy lookup
//!
//! Missing metric data is never an error: extractors report it as an absent
//! value and strategies resolve it to a missing-value colour.

use thiserror::Error;

/// Fatal misconfiguration reported to the caller
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Domain and colour sequences differ in length
    #[error("scale domain has {domain} breakpoints but {colours} colours were supplied")]
    LengthMismatch { domain: usize, colours: usize },

    /// A scale needs at least two stops to interpolate
    #[error("scale needs at least 2 breakpoints (got {0})")]
    TooFewStops(usize),

    /// Two adjacent breakpoints are equal
    #[error("scale breakpoints {index} and {} are both {value}", .index + 1)]
    DegenerateDomain { index: usize, value: f64 },

    /// Breakpoints change direction part way through the domain
    #[error("scale breakpoints must be strictly increasing or strictly decreasing (offending index {0})")]
    NonMonotonicDomain(usize),

    /// NaN or infinite breakpoint
    #[error("scale breakpoint {index} is not finite ({value})")]
    NonFiniteBreakpoint { index: usize, value: f64 },

    /// Strategy name not present in the registry
    #[error("unknown strategy '{name}' (known: {})", .known.join(", "))]
    UnknownStrategy { name: String, known: Vec<String> },

    /// Colour string could not be parsed
    #[error("invalid colour '{0}': expected #rrggbb, #rgb, or a CSS colour keyword")]
    InvalidColour(String),

    /// Metric ceiling unusable as a domain endpoint
    #[error("{metric} ceiling must be a finite number greater than {minimum} (got {value})")]
    InvalidCeiling {
        metric: &'static str,
        value: f64,
        minimum: f64,
    },
}
