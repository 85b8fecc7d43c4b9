//! Color scales for the map products.
//!
//! The built-in tables can be replaced by name from a JSON style file:
//!
//! ```json
//! {"scales": {"wind-gust": {"breakpoints": [20, 40], "colors": ["transparent", "#ffcc00", "#ff0000"]}}}
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use renderer::{Colorbar, Tick};
use tracing::info;
use wx_common::{ColorScale, StyleConfig, StyleError};

pub const RAIN_RATE: &str = "rain-rate";
pub const SNOW_RATE: &str = "snow-rate";
pub const SNOWFALL_TOTAL: &str = "snowfall-total";
pub const WIND_GUST: &str = "wind-gust";

const RAIN_BREAKPOINTS: &[f64] = &[
    0.1, 0.25, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 12.0, 16.0, 20.0, 24.0, 28.0,
];
const RAIN_COLORS: &[&str] = &[
    "transparent", "#00FB4C", "#00E445", "#00CD3E", "#00B537", "#009E2E", "#018628", "#016F20",
    "#005518", "#FFFF50", "#FCD347", "#FBA141", "#FF763B", "#FF272B", "#D80E3A", "#B6093D",
    "#900649", "#C90DA9", "#FF04DC",
];

const SNOW_BREAKPOINTS: &[f64] = &[
    0.1, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 5.0, 6.0, 8.0, 10.0, 12.0, 14.0,
];
const SNOW_COLORS: &[&str] = &[
    "transparent", "#02FEFE", "#00EAFD", "#01D3FD", "#03BFFC", "#00AAFC", "#0092FC", "#0275F2",
    "#0459E8", "#073AD6", "#0D23C4", "#0A1DBB", "#05159B", "#291099", "#490C92", "#AC0F8B",
    "#CC0D8F", "#FF0C80",
];

const SNOWFALL_BREAKPOINTS: &[f64] = &[0.0001, 0.5, 1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 10.0, 12.0, 18.0, 24.0];
const SNOWFALL_COLORS: &[&str] = &[
    "transparent", "#e9e9e9", "#b3dff5", "#87c4ff", "#4d8fff", "#3a5dff", "#2e34cc", "#cec5f0",
    "#aea1ef", "#9b71ef", "#6738c4", "#45306e", "#faa3a7",
];
const SNOWFALL_TICK_LABELS: &[&str] = &[
    "T", "0.5\"", "1\"", "2\"", "3\"", "4\"", "6\"", "8\"", "10\"", "12\"", "18\"", "24\"",
];

const GUST_BREAKPOINTS: &[f64] = &[
    10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0, 24.0, 26.0, 28.0, 30.0, 32.0, 34.0, 36.0, 38.0, 40.0,
    42.0, 44.0, 46.0, 48.0, 50.0, 54.0, 58.0, 61.0, 64.0, 66.0, 68.0, 70.0, 72.0, 74.0, 76.0, 80.0,
    84.0, 88.0, 92.0, 96.0, 100.0, 104.0, 108.0, 112.0, 116.0, 120.0, 124.0, 128.0, 132.0, 135.0,
    145.0,
];
const GUST_COLORS: &[&str] = &[
    "transparent", "#D7D4D5", "#BFBDBE", "#979495", "#656365", "#1566D3", "#216CEC", "#2A82EF",
    "#4096F4", "#51A5F4", "#7FB7F6", "#98D6FC", "#B1F1FF", "#10A011", "#22B420", "#37D43C",
    "#79F675", "#96F38E", "#B6FAAD", "#C5FFBB", "#FFE77A", "#FDC336", "#FDA400", "#FF5F00",
    "#FF2E01", "#E41205", "#C60007", "#A60101", "#5F3E35", "#7B4E47", "#8D645B", "#A27870",
    "#E2BFB5", "#F0DED5", "#FEC7C9", "#F89FA0", "#F37F73", "#E3605B", "#D9443E", "#D32D2F",
    "#D62C27", "#B52E29", "#B62F29", "#AD4545", "#9E5D5D", "#937573", "#938282", "#7D7B7A",
];

/// Colorbar ticks on the gust map: every 4th breakpoint.
pub const GUST_TICK_EVERY: usize = 4;

/// The scales used by the three products.
#[derive(Debug, Clone)]
pub struct ProductStyles {
    pub rain: ColorScale,
    pub snow: ColorScale,
    pub snowfall: ColorScale,
    pub gust: ColorScale,
}

impl ProductStyles {
    pub fn builtin() -> Result<Self, StyleError> {
        Ok(Self {
            rain: ColorScale::from_hex(RAIN_BREAKPOINTS, RAIN_COLORS)?,
            snow: ColorScale::from_hex(SNOW_BREAKPOINTS, SNOW_COLORS)?,
            snowfall: ColorScale::from_hex(SNOWFALL_BREAKPOINTS, SNOWFALL_COLORS)?,
            gust: ColorScale::from_hex(GUST_BREAKPOINTS, GUST_COLORS)?,
        })
    }

    /// Replace every scale `config` names. Unknown names are ignored.
    pub fn with_overrides(mut self, config: &StyleConfig) -> Self {
        for (name, slot) in [
            (RAIN_RATE, &mut self.rain),
            (SNOW_RATE, &mut self.snow),
            (SNOWFALL_TOTAL, &mut self.snowfall),
            (WIND_GUST, &mut self.gust),
        ] {
            if let Some(scale) = config.get(name) {
                info!(scale = name, buckets = scale.bucket_count(), "Using color scale from style file");
                *slot = scale.clone();
            }
        }
        self
    }

    /// Built-in scales, overridden from the JSON file at `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let styles = Self::builtin().context("Built-in color scales are invalid")?;
        let Some(path) = path else {
            return Ok(styles);
        };
        let config = StyleConfig::from_file(path)
            .with_context(|| format!("Failed to load style file: {}", path.display()))?;
        Ok(styles.with_overrides(&config))
    }
}

/// Snowfall colorbar: one tick per breakpoint, `T` for the trace bucket.
///
/// Falls back to numeric labels when the scale was overridden with a
/// different number of breakpoints.
pub fn snowfall_colorbar(scale: &ColorScale) -> Colorbar {
    if scale.breakpoints().len() != SNOWFALL_TICK_LABELS.len() {
        return Colorbar::from_breakpoints(scale, 1);
    }
    let ticks = scale
        .breakpoints()
        .iter()
        .zip(SNOWFALL_TICK_LABELS)
        .map(|(&value, &label)| Tick::new(value, label))
        .collect();
    Colorbar::with_ticks(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scales_are_valid() {
        let styles = ProductStyles::builtin().unwrap();
        assert_eq!(styles.rain.bucket_count(), 19);
        assert_eq!(styles.snow.bucket_count(), 18);
        assert_eq!(styles.snowfall.bucket_count(), 13);
        assert_eq!(styles.gust.bucket_count(), 48);
    }

    #[test]
    fn test_first_bucket_is_not_drawn() {
        let styles = ProductStyles::builtin().unwrap();
        assert_eq!(styles.rain.color_for(0.05), None);
        assert_eq!(styles.snowfall.color_for(0.0), None);
        assert_eq!(styles.gust.color_for(9.9), None);
    }

    #[test]
    fn test_open_ended_top_bucket() {
        let styles = ProductStyles::builtin().unwrap();
        assert_eq!(styles.rain.color_for(100.0), Some([0xFF, 0x04, 0xDC, 255]));
        assert_eq!(styles.gust.color_for(145.0), Some([0x7D, 0x7B, 0x7A, 255]));
        assert_eq!(styles.snowfall.color_for(30.0), Some([0xfa, 0xa3, 0xa7, 255]));
    }

    #[test]
    fn test_trace_snowfall_is_drawn() {
        let styles = ProductStyles::builtin().unwrap();
        assert_eq!(styles.snowfall.color_for(0.0001), Some([0xe9, 0xe9, 0xe9, 255]));
    }

    #[test]
    fn test_override_by_name() {
        let config = StyleConfig::from_json(
            r##"{"scales": {"wind-gust": {"breakpoints": [20, 40], "colors": ["transparent", "#ffcc00", "#ff0000"]},
                            "unused": {"breakpoints": [1], "colors": ["red", "blue"]}}}"##,
        )
        .unwrap();
        let styles = ProductStyles::builtin().unwrap().with_overrides(&config);
        assert_eq!(styles.gust.bucket_count(), 3);
        assert_eq!(styles.rain.bucket_count(), 19);
    }

    #[test]
    fn test_snowfall_colorbar_labels() {
        let styles = ProductStyles::builtin().unwrap();
        let colorbar = snowfall_colorbar(&styles.snowfall);
        let labels: Vec<&str> = colorbar.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"T"));
        assert_eq!(labels.last(), Some(&"24\""));
        assert_eq!(labels.len(), 12);
    }
}
