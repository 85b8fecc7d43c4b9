//! GeoJSON boundary overlays (state and county lines, coastlines).
//!
//! Only the geometry is read; properties are ignored. Polygon rings are
//! stroked as closed lines, never filled.

use serde::Deserialize;
use serde_json::Value;
use tiny_skia::{LineCap, LineJoin, PathBuilder, Stroke};
use tracing::debug;
use wx_common::Rgba;

use crate::canvas::MapCanvas;
use crate::error::RenderResult;
use crate::text::solid;

type Position = Vec<f64>;
type Line = Vec<Position>;

static NULL: Value = Value::Null;

/// A set of lon/lat polylines to stroke over the map.
#[derive(Debug, Clone, Default)]
pub struct BoundaryLayer {
    lines: Vec<Vec<(f64, f64)>>,
}

/// Stroke color and width for a boundary layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgba,
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: [0, 0, 0, 255],
            width: 0.8,
        }
    }
}

impl BoundaryLayer {
    /// Parse a FeatureCollection, a single Feature or a bare geometry.
    ///
    /// Points and other non-linear geometries are skipped.
    pub fn from_geojson(json: &str) -> RenderResult<Self> {
        let doc: Value = serde_json::from_str(json)?;
        let mut layer = Self::default();
        layer.push_object(&doc)?;
        debug!(lines = layer.lines.len(), "Parsed boundary layer");
        Ok(layer)
    }

    fn push_object(&mut self, value: &Value) -> RenderResult<()> {
        let coordinates = || value.get("coordinates").unwrap_or(&NULL);
        match value.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {
                for feature in array(value.get("features")) {
                    self.push_object(feature)?;
                }
            }
            Some("Feature") => {
                if let Some(geometry) = value.get("geometry").filter(|g| !g.is_null()) {
                    self.push_object(geometry)?;
                }
            }
            Some("GeometryCollection") => {
                for geometry in array(value.get("geometries")) {
                    self.push_object(geometry)?;
                }
            }
            Some("LineString") => self.push_line(Line::deserialize(coordinates())?),
            Some("MultiLineString") | Some("Polygon") => {
                for line in Vec::<Line>::deserialize(coordinates())? {
                    self.push_line(line);
                }
            }
            Some("MultiPolygon") => {
                for line in Vec::<Vec<Line>>::deserialize(coordinates())?.into_iter().flatten() {
                    self.push_line(line);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn push_line(&mut self, positions: Line) {
        let line: Vec<(f64, f64)> = positions
            .into_iter()
            .filter(|p| p.len() >= 2)
            .map(|p| (p[0], p[1]))
            .collect();
        if line.len() >= 2 {
            self.lines.push(line);
        }
    }

    pub fn lines(&self) -> &[Vec<(f64, f64)>] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn array(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// Stroke every line of `layer` inside the map frame.
pub fn draw_boundaries(canvas: &mut MapCanvas, layer: &BoundaryLayer, style: &LineStyle) {
    let mut pb = PathBuilder::new();
    for line in layer.lines() {
        let mut points = line.iter().map(|&(lon, lat)| canvas.view().to_pixel(lon, lat));
        let Some((x0, y0)) = points.next() else {
            continue;
        };
        pb.move_to(x0, y0);
        for (x, y) in points {
            pb.line_to(x, y);
        }
    }

    let Some(path) = pb.finish() else {
        return;
    };
    let stroke = Stroke {
        width: style.width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    canvas.stroke_map_path(&path, &solid(style.color), &stroke);
}
