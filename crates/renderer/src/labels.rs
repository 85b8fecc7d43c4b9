//! Text labels anchored at geographic points (station reports).

use tracing::debug;

use crate::canvas::MapCanvas;
use crate::text::{draw_text, TextStyle};

/// Text to place at a lon/lat position.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLabel {
    pub text: String,
    pub lon: f64,
    pub lat: f64,
}

impl PointLabel {
    pub fn new(text: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            text: text.into(),
            lon,
            lat,
        }
    }
}

/// Draw each label centred on its point, skipping points that are not
/// strictly inside the map extent shrunk by `inset` degrees.
///
/// Returns the number of labels drawn.
pub fn draw_point_labels(
    canvas: &mut MapCanvas,
    labels: &[PointLabel],
    inset: f64,
    style: &TextStyle,
) -> usize {
    let extent = *canvas.view().extent();
    let mut drawn = 0;
    for label in labels {
        if !extent.contains_inset(label.lon, label.lat, inset) {
            continue;
        }
        let (x, y) = canvas.view().to_pixel(label.lon, label.lat);
        draw_text(canvas.pixmap_mut(), &label.text, x, y, style);
        drawn += 1;
    }
    debug!(total = labels.len(), drawn, "Drew point labels");
    drawn
}
