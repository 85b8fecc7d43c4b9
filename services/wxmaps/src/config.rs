//! Run configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Command-line flags are applied on top in `main`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use grid_processor::IndexWindow;
use renderer::{CanvasLayout, LineStyle};
use serde::Deserialize;
use tracing::debug;
use wx_common::{BoundingBox, Color};

pub const DEFAULT_CONUS404_BASE: &str = "https://thredds.rda.ucar.edu/thredds/dodsC/files/g/ds559.0";
pub const DEFAULT_NOMADS_BASE: &str = "http://nomads.ncep.noaa.gov:80/dods";
pub const DEFAULT_ACIS_BASE: &str = "https://data.rcc-acis.org";

pub const STATE_LINES_GEOJSON: &str = "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_50m_admin_1_states_provinces_lines.geojson";
pub const COUNTRY_LINES_GEOJSON: &str = "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_50m_admin_0_boundary_lines_land.geojson";
pub const COUNTY_LINES_GEOJSON: &str = "https://raw.githubusercontent.com/EFisher828/geojson-store/main/CONUS%20Counties.geojson";

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WxmapsConfig {
    #[serde(default)]
    pub servers: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub image: ImageConfig,
    /// Left footer text on the precipitation maps
    #[serde(default = "default_credit")]
    pub credit: String,
    /// Named `[west, east, south, north]` extents for the gust maps
    #[serde(default = "default_regions")]
    pub regions: BTreeMap<String, [f64; 4]>,
    /// JSON file overriding the built-in color scales
    #[serde(default)]
    pub styles: Option<PathBuf>,
    #[serde(default)]
    pub precip_type: PrecipTypeConfig,
    #[serde(default)]
    pub snowfall: SnowfallConfig,
    #[serde(default)]
    pub gust: GustConfig,
}

fn default_credit() -> String {
    "Created by Your Name Here".to_string()
}

fn default_regions() -> BTreeMap<String, [f64; 4]> {
    BTreeMap::from([
        ("southern-apps".to_string(), [-85.0302, -80.3544, 34.509, 36.7941]),
        ("conus".to_string(), [-127.11, -64.81, 23.82, 49.97]),
    ])
}

impl Default for WxmapsConfig {
    fn default() -> Self {
        Self {
            servers: ServerConfig::default(),
            http: HttpConfig::default(),
            image: ImageConfig::default(),
            credit: default_credit(),
            regions: default_regions(),
            styles: None,
            precip_type: PrecipTypeConfig::default(),
            snowfall: SnowfallConfig::default(),
            gust: GustConfig::default(),
        }
    }
}

/// Base URLs of the remote data sources.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_conus404")]
    pub conus404: String,
    #[serde(default = "default_nomads")]
    pub nomads: String,
    #[serde(default = "default_acis")]
    pub acis: String,
}

fn default_conus404() -> String {
    DEFAULT_CONUS404_BASE.to_string()
}

fn default_nomads() -> String {
    DEFAULT_NOMADS_BASE.to_string()
}

fn default_acis() -> String {
    DEFAULT_ACIS_BASE.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            conus404: default_conus404(),
            nomads: default_nomads(),
            acis: default_acis(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_user_agent() -> String {
    concat!("wxmaps/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    900
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl ImageConfig {
    pub fn layout(&self) -> CanvasLayout {
        CanvasLayout::sized(self.width, self.height)
    }
}

/// A GeoJSON boundary layer: an `http(s)://` URL or a local path.
#[derive(Debug, Clone, Deserialize)]
pub struct OverlayConfig {
    pub source: String,
    #[serde(default = "default_overlay_color")]
    pub color: Color,
    #[serde(default = "default_overlay_width")]
    pub width: f32,
}

fn default_overlay_color() -> Color {
    Color::Text("black".to_string())
}

fn default_overlay_width() -> f32 {
    0.8
}

impl OverlayConfig {
    pub fn new(source: &str, color: &str, width: f32) -> Self {
        Self {
            source: source.to_string(),
            color: Color::Text(color.to_string()),
            width,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    pub fn line_style(&self) -> Result<LineStyle> {
        let color = self
            .color
            .to_rgba()
            .with_context(|| format!("Invalid overlay color for {}", self.source))?;
        Ok(LineStyle {
            color,
            width: self.width,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrecipTypeConfig {
    #[serde(default = "default_precip_extent")]
    pub extent: [f64; 4],
    /// Crop of the CONUS404 grid, e.g. `"250:-200,700:"`
    #[serde(default = "IndexWindow::conus404_east")]
    pub window: IndexWindow,
    /// Boundary layers drawn over the map, in order
    #[serde(default = "default_precip_overlays")]
    pub overlays: Vec<OverlayConfig>,
}

/// Country and state lines, no counties.
fn default_precip_overlays() -> Vec<OverlayConfig> {
    vec![
        OverlayConfig::new(COUNTRY_LINES_GEOJSON, "black", 1.0),
        OverlayConfig::new(STATE_LINES_GEOJSON, "black", 0.8),
    ]
}

fn default_precip_extent() -> [f64; 4] {
    [-94.05, -66.07, 30.13, 47.69]
}

impl Default for PrecipTypeConfig {
    fn default() -> Self {
        Self {
            extent: default_precip_extent(),
            window: IndexWindow::conus404_east(),
            overlays: default_precip_overlays(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnowfallConfig {
    #[serde(default = "default_snowfall_extent")]
    pub extent: [f64; 4],
    #[serde(default)]
    pub window: IndexWindow,
    /// Snow-to-liquid ratio
    #[serde(default = "default_slr")]
    pub slr: f32,
    #[serde(default = "default_snowfall_overlays")]
    pub overlays: Vec<OverlayConfig>,
}

fn default_snowfall_overlays() -> Vec<OverlayConfig> {
    vec![
        OverlayConfig::new(COUNTRY_LINES_GEOJSON, "black", 1.0),
        OverlayConfig::new(STATE_LINES_GEOJSON, "black", 0.8),
        OverlayConfig::new(COUNTY_LINES_GEOJSON, "black", 0.2),
    ]
}

fn default_snowfall_extent() -> [f64; 4] {
    [-85.13, -74.74, 31.59, 37.19]
}

fn default_slr() -> f32 {
    grid_processor::derive::DEFAULT_SLR
}

impl Default for SnowfallConfig {
    fn default() -> Self {
        Self {
            extent: default_snowfall_extent(),
            window: IndexWindow::full(),
            slr: default_slr(),
            overlays: default_snowfall_overlays(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GustConfig {
    /// Key into `regions`
    #[serde(default = "default_gust_region")]
    pub region: String,
    /// Degrees added on every side of the region before cropping
    #[serde(default = "default_gust_padding")]
    pub padding: f64,
    #[serde(default = "default_gust_overlays")]
    pub overlays: Vec<OverlayConfig>,
}

fn default_gust_overlays() -> Vec<OverlayConfig> {
    vec![
        OverlayConfig::new(COUNTRY_LINES_GEOJSON, "black", 1.0),
        OverlayConfig::new(STATE_LINES_GEOJSON, "black", 1.2),
        OverlayConfig::new(COUNTY_LINES_GEOJSON, "black", 0.3),
    ]
}

fn default_gust_region() -> String {
    "southern-apps".to_string()
}

fn default_gust_padding() -> f64 {
    0.2
}

impl Default for GustConfig {
    fn default() -> Self {
        Self {
            region: default_gust_region(),
            padding: default_gust_padding(),
            overlays: default_gust_overlays(),
        }
    }
}

impl WxmapsConfig {
    /// Load from a YAML file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), regions = config.regions.len(), "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Look up a named region.
    pub fn region(&self, name: &str) -> Result<BoundingBox> {
        match self.regions.get(name) {
            Some(extent) => Ok(BoundingBox::from_extent(*extent)),
            None => {
                let known: Vec<&str> = self.regions.keys().map(String::as_str).collect();
                bail!("Unknown region '{}' (known: {})", name, known.join(", "))
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.snowfall.slr.is_nan() || self.snowfall.slr <= 0.0 {
            bail!("snowfall.slr must be positive, got {}", self.snowfall.slr);
        }
        if self.image.width == 0 || self.image.height == 0 {
            bail!("image size must be non-zero");
        }
        check_extent("precip_type.extent", self.precip_type.extent)?;
        check_extent("snowfall.extent", self.snowfall.extent)?;
        for (name, extent) in &self.regions {
            check_extent(&format!("regions.{}", name), *extent)?;
        }
        let overlays = self
            .precip_type
            .overlays
            .iter()
            .chain(&self.snowfall.overlays)
            .chain(&self.gust.overlays);
        for overlay in overlays {
            overlay.line_style()?;
        }
        Ok(())
    }
}

fn check_extent(field: &str, [west, east, south, north]: [f64; 4]) -> Result<()> {
    if west >= east || south >= north {
        bail!(
            "{} must be [west, east, south, north] with west < east and south < north",
            field
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WxmapsConfig::default();
        assert_eq!(config.servers.conus404, DEFAULT_CONUS404_BASE);
        assert_eq!(config.credit, "Created by Your Name Here");
        assert_eq!(config.snowfall.slr, 12.0);
        assert_eq!(config.precip_type.window, IndexWindow::conus404_east());
        assert_eq!(config.snowfall.window, IndexWindow::full());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = WxmapsConfig::from_yaml("").unwrap();
        assert_eq!(config.gust.region, "southern-apps");
        assert_eq!(config.image.width, 1200);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r##"
servers:
  nomads: "http://localhost:9000/dods"
http:
  timeout_secs: 60
image:
  width: 800
credit: "Created by Test"
regions:
  blue-ridge: [-83.5, -81.0, 35.0, 36.5]
snowfall:
  slr: 10
  window: "10:-10,:"
  overlays:
    - source: "./counties.geojson"
      color: "#888888"
      width: 0.2
gust:
  region: blue-ridge
"##;

        let config = WxmapsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.servers.nomads, "http://localhost:9000/dods");
        assert_eq!(config.servers.acis, DEFAULT_ACIS_BASE);
        assert_eq!(config.http.timeout(), Duration::from_secs(60));
        assert_eq!(config.image.width, 800);
        assert_eq!(config.image.height, 900);
        assert_eq!(config.snowfall.overlays.len(), 1);
        assert!(!config.snowfall.overlays[0].is_remote());
        assert_eq!(
            config.snowfall.overlays[0].line_style().unwrap().color,
            [0x88, 0x88, 0x88, 255]
        );
        // Products without an overlays key keep their default layers.
        assert_eq!(config.gust.overlays.len(), 3);
        assert_eq!(config.snowfall.slr, 10.0);

        let region = config.region("blue-ridge").unwrap();
        assert_eq!(region.to_extent(), [-83.5, -81.0, 35.0, 36.5]);
        // Overriding the map drops the built-in regions.
        assert!(config.region("southern-apps").is_err());
    }

    #[test]
    fn test_default_overlays_per_product() {
        let config = WxmapsConfig::default();
        let sources = |overlays: &[OverlayConfig]| -> Vec<String> {
            overlays.iter().map(|o| o.source.clone()).collect()
        };

        for overlays in [
            &config.precip_type.overlays,
            &config.snowfall.overlays,
            &config.gust.overlays,
        ] {
            let sources = sources(overlays);
            assert!(sources.contains(&COUNTRY_LINES_GEOJSON.to_string()));
            assert!(sources.contains(&STATE_LINES_GEOJSON.to_string()));
            assert!(overlays.iter().all(OverlayConfig::is_remote));
        }
        assert!(!sources(&config.precip_type.overlays).contains(&COUNTY_LINES_GEOJSON.to_string()));
        assert!(sources(&config.snowfall.overlays).contains(&COUNTY_LINES_GEOJSON.to_string()));
        assert!(sources(&config.gust.overlays).contains(&COUNTY_LINES_GEOJSON.to_string()));
    }

    #[test]
    fn test_shipped_config_overlays() {
        let config = WxmapsConfig::from_yaml(include_str!("../../../config/wxmaps.yaml")).unwrap();
        assert_eq!(config.precip_type.overlays.len(), 2);
        assert_eq!(config.snowfall.overlays.len(), 3);
        assert_eq!(config.gust.overlays.len(), 3);
        assert!(config
            .precip_type
            .overlays
            .iter()
            .all(|o| o.source != COUNTY_LINES_GEOJSON));
        assert_eq!(config.snowfall.overlays[1].source, STATE_LINES_GEOJSON);
        assert_eq!(config.gust.overlays[0].source, COUNTRY_LINES_GEOJSON);
    }

    #[test]
    fn test_empty_overlay_list_disables_layers() {
        let config = WxmapsConfig::from_yaml("precip_type:\n  overlays: []\n").unwrap();
        assert!(config.precip_type.overlays.is_empty());
        assert_eq!(config.snowfall.overlays.len(), 3);
    }

    #[test]
    fn test_invalid_slr_rejected() {
        assert!(WxmapsConfig::from_yaml("snowfall:\n  slr: 0\n").is_err());
    }

    #[test]
    fn test_inverted_extent_rejected() {
        let yaml = "precip_type:\n  extent: [-66.0, -94.0, 30.0, 47.0]\n";
        assert!(WxmapsConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_bad_overlay_color_rejected() {
        let yaml = "gust:\n  overlays:\n    - source: x.geojson\n      color: \"#12\"\n";
        assert!(WxmapsConfig::from_yaml(yaml).is_err());
    }
}
