//! Color scales for classified map fills.
//!
//! A [`ColorScale`] maps a value to one of `breakpoints.len() + 1` buckets:
//! bucket 0 holds everything below the first breakpoint, bucket `i` covers
//! `[breakpoints[i-1], breakpoints[i])` and the last bucket is open-ended
//! upward. Scales are validated when built, so an invalid scale cannot
//! reach the renderer. Scales can also be loaded by name from a JSON file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Straight (non-premultiplied) RGBA.
pub type Rgba = [u8; 4];

/// Root style configuration - named color scales.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Version of the style schema
    #[serde(default = "default_version")]
    pub version: String,

    /// Named color scales
    pub scales: HashMap<String, ColorScale>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl StyleConfig {
    /// Load style configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StyleError::IoError(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse style configuration from JSON string. Every scale is validated.
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        serde_json::from_str(json).map_err(|e| StyleError::ParseError(e.to_string()))
    }

    /// Get a scale by name.
    pub fn get(&self, name: &str) -> Option<&ColorScale> {
        self.scales.get(name)
    }
}

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// "#RRGGBB", "#RRGGBBAA" or a named color
    Text(String),

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    pub fn transparent() -> Self {
        Color::Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Resolve to RGBA, rejecting malformed hex strings and unknown names.
    pub fn to_rgba(&self) -> Result<Rgba, StyleError> {
        match self {
            Color::Text(s) if s.starts_with('#') => parse_hex_color(s),
            Color::Text(name) => named_color(name),
            Color::Array(arr) if arr.len() == 3 || arr.len() == 4 => {
                let a = arr.get(3).copied().unwrap_or(255);
                Ok([arr[0], arr[1], arr[2], a])
            }
            Color::Array(arr) => Err(StyleError::InvalidColor(format!("{:?}", arr))),
            Color::Rgba { r, g, b, a } => Ok([*r, *g, *b, *a]),
        }
    }
}

fn parse_hex_color(s: &str) -> Result<Rgba, StyleError> {
    let hex = s.trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(StyleError::InvalidColor(s.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| StyleError::InvalidColor(s.to_string()))
    };
    let a = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok([channel(0)?, channel(2)?, channel(4)?, a])
}

fn named_color(name: &str) -> Result<Rgba, StyleError> {
    let rgba = match name.to_lowercase().as_str() {
        "transparent" | "none" => [0, 0, 0, 0],
        "black" => [0, 0, 0, 255],
        "white" => [255, 255, 255, 255],
        "red" => [255, 0, 0, 255],
        "green" => [0, 128, 0, 255],
        "blue" => [0, 0, 255, 255],
        "yellow" => [255, 255, 0, 255],
        "cyan" => [0, 255, 255, 255],
        "magenta" => [255, 0, 255, 255],
        "orange" => [255, 165, 0, 255],
        "purple" => [128, 0, 128, 255],
        "gray" | "grey" => [128, 128, 128, 255],
        _ => return Err(StyleError::InvalidColor(name.to_string())),
    };
    Ok(rgba)
}

/// Wire form of a [`ColorScale`] before validation.
#[derive(Debug, Clone, Deserialize)]
struct ColorScaleSpec {
    breakpoints: Vec<f64>,
    colors: Vec<Color>,
}

/// Validated breakpoints plus one color per bucket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ColorScaleSpec")]
pub struct ColorScale {
    breakpoints: Vec<f64>,
    colors: Vec<Rgba>,
}

impl TryFrom<ColorScaleSpec> for ColorScale {
    type Error = StyleError;

    fn try_from(spec: ColorScaleSpec) -> Result<Self, Self::Error> {
        let colors = spec
            .colors
            .iter()
            .map(Color::to_rgba)
            .collect::<Result<Vec<_>, _>>()?;
        ColorScale::new(spec.breakpoints, colors)
    }
}

impl ColorScale {
    /// Build a scale. Breakpoints must be finite and strictly increasing and
    /// there must be exactly one more color than breakpoints.
    pub fn new(breakpoints: Vec<f64>, colors: Vec<Rgba>) -> Result<Self, StyleError> {
        if breakpoints.is_empty() {
            return Err(StyleError::EmptyScale);
        }
        for (index, value) in breakpoints.iter().enumerate() {
            let increasing = index == 0 || *value > breakpoints[index - 1];
            if !value.is_finite() || !increasing {
                return Err(StyleError::NotIncreasing {
                    index,
                    value: *value,
                });
            }
        }
        if colors.len() != breakpoints.len() + 1 {
            return Err(StyleError::ColorCount {
                breakpoints: breakpoints.len(),
                expected: breakpoints.len() + 1,
                actual: colors.len(),
            });
        }
        Ok(Self {
            breakpoints,
            colors,
        })
    }

    /// Build a scale from `#RRGGBB` strings; `transparent` is accepted too.
    pub fn from_hex(breakpoints: &[f64], colors: &[&str]) -> Result<Self, StyleError> {
        let colors = colors
            .iter()
            .map(|c| Color::Text(c.to_string()).to_rgba())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(breakpoints.to_vec(), colors)
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn bucket_count(&self) -> usize {
        self.colors.len()
    }

    /// Bucket index for `value`, `None` for NaN.
    pub fn bucket(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        Some(self.breakpoints.partition_point(|b| *b <= value))
    }

    /// Fill color for `value`; `None` for NaN or a fully transparent bucket.
    pub fn color_for(&self, value: f64) -> Option<Rgba> {
        let color = self.colors[self.bucket(value)?];
        (color[3] > 0).then_some(color)
    }

    /// Lower and upper edge of a bucket; the outer buckets are unbounded.
    pub fn bucket_bounds(&self, bucket: usize) -> (Option<f64>, Option<f64>) {
        let lower = bucket.checked_sub(1).and_then(|i| self.breakpoints.get(i)).copied();
        let upper = self.breakpoints.get(bucket).copied();
        (lower, upper)
    }
}

/// Style-related errors.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Color scale has no breakpoints")]
    EmptyScale,

    #[error("Breakpoints must be finite and strictly increasing (index {index}: {value})")]
    NotIncreasing { index: usize, value: f64 },

    #[error("{breakpoints} breakpoints need {expected} colors, got {actual}")]
    ColorCount {
        breakpoints: usize,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::Text("#FF5500".into()).to_rgba().unwrap(), [255, 85, 0, 255]);
        assert_eq!(Color::Text("#FF550080".into()).to_rgba().unwrap(), [255, 85, 0, 128]);
        assert_eq!(Color::Array(vec![100, 150, 200]).to_rgba().unwrap(), [100, 150, 200, 255]);
        assert_eq!(Color::Text("red".into()).to_rgba().unwrap(), [255, 0, 0, 255]);
        assert!(Color::Text("#GG0000".into()).to_rgba().is_err());
        assert!(Color::Text("chartreuse-ish".into()).to_rgba().is_err());
    }

    #[test]
    fn test_bucket_lookup() {
        let scale = ColorScale::from_hex(&[1.0, 2.0], &["transparent", "#00ff00", "#0000ff"]).unwrap();
        assert_eq!(scale.bucket(0.5), Some(0));
        assert_eq!(scale.bucket(1.0), Some(1));
        assert_eq!(scale.bucket(1.99), Some(1));
        assert_eq!(scale.bucket(2.0), Some(2));
        assert_eq!(scale.bucket(1e9), Some(2));
        assert_eq!(scale.bucket(f64::NAN), None);
        assert_eq!(scale.color_for(0.5), None);
        assert_eq!(scale.color_for(5.0), Some([0, 0, 255, 255]));
        assert_eq!(scale.bucket_bounds(0), (None, Some(1.0)));
        assert_eq!(scale.bucket_bounds(2), (Some(2.0), None));
    }
}
