//! Continuous and categorical colour scales
//!
//! Invariants enforced at construction:
//! - Domain and colour sequences have equal length, at least 2
//! - Breakpoints are finite and strictly monotone (either direction)
//!
//! Given those, `apply` is total: it never divides by zero and clamps
//! values outside the domain to the nearest endpoint colour.

use crate::color::Rgb;
use crate::error::ConfigurationError;

/// Piecewise-linear mapping from numbers to colours
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: Vec<f64>,
    colours: Vec<Rgb>,
}

impl ColorScale {
    /// Build a scale from parallel breakpoint and colour sequences
    pub fn build(domain: Vec<f64>, colours: Vec<Rgb>) -> Result<Self, ConfigurationError> {
        validate_domain(&domain, colours.len())?;
        Ok(ColorScale { domain, colours })
    }

    /// Two-stop convenience constructor
    pub fn linear(
        from: f64,
        to: f64,
        from_colour: Rgb,
        to_colour: Rgb,
    ) -> Result<Self, ConfigurationError> {
        Self::build(vec![from, to], vec![from_colour, to_colour])
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn colours(&self) -> &[Rgb] {
        &self.colours
    }

    /// Map `x` to a colour, clamping outside the domain
    pub fn apply(&self, x: f64) -> Rgb {
        let last = self.domain.len() - 1;
        let first_colour = self.colours[0];
        let last_colour = self.colours[last];

        if x.is_nan() {
            return first_colour;
        }

        let ascending = self.domain[0] < self.domain[last];
        let (before_first, after_last) = if ascending {
            (x <= self.domain[0], x >= self.domain[last])
        } else {
            (x >= self.domain[0], x <= self.domain[last])
        };
        if before_first {
            return first_colour;
        }
        if after_last {
            return last_colour;
        }

        // x lies strictly inside the domain, so exactly one segment holds it
        for i in 0..last {
            let (d0, d1) = (self.domain[i], self.domain[i + 1]);
            let inside = if ascending { x <= d1 } else { x >= d1 };
            if inside {
                let t = (x - d0) / (d1 - d0);
                return Rgb::lerp(self.colours[i], self.colours[i + 1], t);
            }
        }

        last_colour
    }

    /// Same domain, every colour darkened one step
    pub fn darker(&self) -> Self {
        ColorScale {
            domain: self.domain.clone(),
            colours: self.colours.iter().map(Rgb::darker).collect(),
        }
    }

    /// Rebind the colour sequence onto new breakpoints
    pub fn with_domain(&self, domain: Vec<f64>) -> Result<Self, ConfigurationError> {
        Self::build(domain, self.colours.clone())
    }
}

fn validate_domain(domain: &[f64], colour_count: usize) -> Result<(), ConfigurationError> {
    if domain.len() != colour_count {
        return Err(ConfigurationError::LengthMismatch {
            domain: domain.len(),
            colours: colour_count,
        });
    }
    if domain.len() < 2 {
        return Err(ConfigurationError::TooFewStops(domain.len()));
    }
    if let Some((index, &value)) = domain.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ConfigurationError::NonFiniteBreakpoint { index, value });
    }

    let ascending = domain[0] < domain[1];
    for (index, pair) in domain.windows(2).enumerate() {
        if pair[0] == pair[1] {
            return Err(ConfigurationError::DegenerateDomain {
                index,
                value: pair[0],
            });
        }
        if (pair[0] < pair[1]) != ascending {
            return Err(ConfigurationError::NonMonotonicDomain(index + 1));
        }
    }
    Ok(())
}

/// d3 `category20`
const CATEGORY20: [(u8, u8, u8); 20] = [
    (0x1f, 0x77, 0xb4),
    (0xae, 0xc7, 0xe8),
    (0xff, 0x7f, 0x0e),
    (0xff, 0xbb, 0x78),
    (0x2c, 0xa0, 0x2c),
    (0x98, 0xdf, 0x8a),
    (0xd6, 0x27, 0x28),
    (0xff, 0x98, 0x96),
    (0x94, 0x67, 0xbd),
    (0xc5, 0xb0, 0xd5),
    (0x8c, 0x56, 0x4b),
    (0xc4, 0x9c, 0x94),
    (0xe3, 0x77, 0xc2),
    (0xf7, 0xb6, 0xd2),
    (0x7f, 0x7f, 0x7f),
    (0xc7, 0xc7, 0xc7),
    (0xbc, 0xbd, 0x22),
    (0xdb, 0xdb, 0x8d),
    (0x17, 0xbe, 0xcf),
    (0x9e, 0xda, 0xe5),
];

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a, stable across runs and platforms
pub fn stable_hash(label: &str) -> u64 {
    label.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Fixed palette indexed by a stable hash of a categorical label
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalPalette {
    colours: Vec<Rgb>,
}

impl CategoricalPalette {
    pub fn new(colours: Vec<Rgb>) -> Result<Self, ConfigurationError> {
        if colours.is_empty() {
            return Err(ConfigurationError::TooFewStops(0));
        }
        Ok(CategoricalPalette { colours })
    }

    pub fn category20() -> Self {
        CategoricalPalette {
            colours: CATEGORY20
                .iter()
                .map(|&(r, g, b)| Rgb::from_u8(r, g, b))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    pub fn colour_for(&self, label: &str) -> Rgb {
        let index = (stable_hash(label) % self.colours.len() as u64) as usize;
        self.colours[index]
    }
}

impl Default for CategoricalPalette {
    fn default() -> Self {
        Self::category20()
    }
}
