//! The three map products.
//!
//! Each pipeline is one sequential loop: fetch an hour, derive fields,
//! render, write, next hour. A failed fetch aborts the run; files already
//! written stay on disk.

pub mod gust;
pub mod precip_type;
pub mod snowfall;

use std::path::PathBuf;

use anyhow::{Context, Result};
use renderer::overlay::draw_boundaries;
use renderer::{BoundaryLayer, CanvasLayout, LineStyle, MapCanvas, TextStyle};
use tracing::{info, warn};
use wx_common::BoundingBox;

use crate::config::OverlayConfig;
use crate::fetch::HttpFetcher;
use crate::styles::ProductStyles;

const FRAME_COLOR: [u8; 4] = [0, 0, 0, 255];

/// A boundary layer with the style it is drawn in.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub layer: BoundaryLayer,
    pub style: LineStyle,
}

/// Everything a pipeline needs besides its data sources.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub output_dir: PathBuf,
    pub layout: CanvasLayout,
    /// Left footer text on the precipitation maps
    pub credit: String,
    pub overlays: Vec<Overlay>,
    pub styles: ProductStyles,
}

impl RunContext {
    /// Blank canvas for `extent`, with a colorbar band when asked for.
    pub(crate) fn canvas(&self, extent: BoundingBox, colorbar: bool) -> Result<MapCanvas> {
        let layout = if colorbar {
            let width = (self.layout.width as f32 * 0.07).max(60.0);
            self.layout.with_colorbar(width)
        } else {
            self.layout
        };
        MapCanvas::new(layout, extent).context("Failed to create map canvas")
    }

    /// Boundary overlays and the map frame, drawn over the data layers.
    pub(crate) fn finish_map(&self, canvas: &mut MapCanvas) {
        for overlay in &self.overlays {
            draw_boundaries(canvas, &overlay.layer, &overlay.style);
        }
        canvas.draw_frame(FRAME_COLOR, 1.0);
    }
}

pub(crate) fn title_style() -> TextStyle {
    TextStyle::sized(12.0)
}

pub(crate) fn note_style() -> TextStyle {
    TextStyle::sized(9.0)
}

/// Log loop progress as a percentage of the steps.
pub(crate) fn log_progress(processed: usize, total: usize) {
    let percent = if total == 0 { 100 } else { processed * 100 / total };
    info!(processed, total, percent, "Progress");
}

/// Read every configured GeoJSON layer, from the network or from disk.
pub async fn load_overlays(configs: &[OverlayConfig], http: &HttpFetcher) -> Result<Vec<Overlay>> {
    let mut overlays = Vec::with_capacity(configs.len());
    for config in configs {
        let text = if config.is_remote() {
            http.get_text(&config.source)
                .await
                .with_context(|| format!("Failed to download overlay {}", config.source))?
        } else {
            tokio::fs::read_to_string(&config.source)
                .await
                .with_context(|| format!("Failed to read overlay {}", config.source))?
        };

        let layer = BoundaryLayer::from_geojson(&text)
            .with_context(|| format!("Failed to parse overlay {}", config.source))?;
        if layer.is_empty() {
            warn!(source = %config.source, "Overlay has no line geometry");
        }
        info!(source = %config.source, lines = layer.lines().len(), "Loaded overlay");

        overlays.push(Overlay {
            layer,
            style: config.line_style()?,
        });
    }
    Ok(overlays)
}
