//! RGB colours with d3-style darkening
//!
//! Channels are kept as `f64` in `0.0..=255.0` so that interpolation and
//! darkening compose exactly; rounding happens only when formatting.

use crate::error::ConfigurationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Per-step channel multiplier applied by [`Rgb::darker`]
pub const DARKER_FACTOR: f64 = 0.7;

/// CSS keywords accepted in config files
const NAMED_COLOURS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("yellow", (255, 255, 0)),
];

/// An RGB colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Rgb {
            r: r as f64,
            g: g as f64,
            b: b as f64,
        }
    }

    /// One darkening step
    pub fn darker(&self) -> Self {
        self.darker_by(1.0)
    }

    /// Scale every channel toward black by `DARKER_FACTOR^k`
    pub fn darker_by(&self, k: f64) -> Self {
        let f = DARKER_FACTOR.powf(k);
        Rgb {
            r: self.r * f,
            g: self.g * f,
            b: self.b * f,
        }
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`
    pub fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        if t <= 0.0 || t.is_nan() {
            return a;
        }
        if t >= 1.0 {
            return b;
        }
        Rgb {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
        }
    }

    /// Rounded, clamped 8-bit channels
    pub fn to_u8(&self) -> (u8, u8, u8) {
        fn channel(v: f64) -> u8 {
            if v.is_nan() {
                return 0;
            }
            v.round().clamp(0.0, 255.0) as u8
        }
        (channel(self.r), channel(self.g), channel(self.b))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_u8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ConfigurationError::InvalidColour(s.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            return match hex.len() {
                6 => {
                    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                    match (channel(0), channel(2), channel(4)) {
                        (Ok(r), Ok(g), Ok(b)) => Ok(Rgb::from_u8(r, g, b)),
                        _ => Err(invalid()),
                    }
                }
                3 => {
                    // #abc is shorthand for #aabbcc
                    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                    match (channel(0), channel(1), channel(2)) {
                        (Ok(r), Ok(g), Ok(b)) => Ok(Rgb::from_u8(r, g, b)),
                        _ => Err(invalid()),
                    }
                }
                _ => Err(invalid()),
            };
        }

        let lower = trimmed.to_ascii_lowercase();
        NAMED_COLOURS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, (r, g, b))| Rgb::from_u8(*r, *g, *b))
            .ok_or_else(invalid)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        let c: Rgb = "#E60D0D".parse().unwrap();
        assert_eq!(c, Rgb::from_u8(0xe6, 0x0d, 0x0d));
        assert_eq!(c.to_hex(), "#e60d0d");
    }

    #[test]
    fn test_parse_short_hex() {
        let c: Rgb = "#fa0".parse().unwrap();
        assert_eq!(c, Rgb::from_u8(0xff, 0xaa, 0x00));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!("green".parse::<Rgb>().unwrap(), Rgb::from_u8(0, 128, 0));
        assert_eq!("Black".parse::<Rgb>().unwrap(), Rgb::from_u8(0, 0, 0));
    }

    #[test]
    fn test_reject_malformed_colours() {
        for bad in ["", "#12", "#12345g", "#1234567", "chartreuse-ish", "é"] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad:?} should be rejected");
        }
        // multi-byte characters must not panic the hex slicer
        assert!("#ééé".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_darker_matches_d3_factor() {
        let c = Rgb::from_u8(100, 200, 50).darker();
        assert!((c.r - 70.0).abs() < 1e-9);
        assert!((c.g - 140.0).abs() < 1e-9);
        assert!((c.b - 35.0).abs() < 1e-9);
        assert_eq!(Rgb::from_u8(100, 200, 50).darker_by(0.0), Rgb::from_u8(100, 200, 50));
    }

    #[test]
    fn test_lerp_endpoints_are_exact() {
        let a = Rgb::from_u8(230, 13, 13);
        let b = Rgb::from_u8(14, 52, 224);
        assert_eq!(Rgb::lerp(a, b, 0.0), a);
        assert_eq!(Rgb::lerp(a, b, 1.0), b);
        assert_eq!(Rgb::lerp(a, b, -3.0), a);
        assert_eq!(Rgb::lerp(a, b, 7.0), b);
        assert_eq!(Rgb::lerp(a, b, 0.5), Rgb::new(122.0, 32.5, 118.5));
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb::from_u8(0x4e, 0x45, 0x45)).unwrap();
        assert_eq!(json, "\"#4e4545\"");
        let back: Rgb = serde_json::from_str("\"#4E4545\"").unwrap();
        assert_eq!(back, Rgb::from_u8(0x4e, 0x45, 0x45));
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }
}
