//! Wind barb rendering.
//!
//! Barbs are drawn procedurally in pixel space: a staff pointing toward the
//! direction the wind blows from, with pennants (50 kt), full barbs (10 kt)
//! and half barbs (5 kt) stacked from the outer end inward.

use std::f64::consts::PI;

use projection::Frame;
use tiny_skia::{LineCap, PathBuilder, Stroke};
use tracing::debug;
use wx_common::{GeoGrid, Grid2D, Rgba};

use crate::canvas::MapCanvas;
use crate::error::RenderResult;
use crate::text::solid;

/// Speeds below this (after rounding to 5 kt) are drawn as a calm circle.
const CALM_KNOTS: f32 = 2.5;

/// Configuration for wind barb rendering
#[derive(Debug, Clone)]
pub struct BarbConfig {
    /// Draw every `stride`-th grid point in each direction, counted from the last index
    pub stride: usize,
    /// Staff length in pixels
    pub length: f32,
    pub line_width: f32,
    pub color: Rgba,
}

impl Default for BarbConfig {
    fn default() -> Self {
        Self {
            stride: 20,
            length: 18.0,
            line_width: 1.0,
            color: [0x3d, 0x3d, 0x3d, 255],
        }
    }
}

/// Feather counts for one barb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarbElements {
    pub pennants: u32,
    pub full: u32,
    pub half: u32,
    pub calm: bool,
}

/// Convert U and V wind components to speed and direction (radians FROM)
///
/// The direction is a math-convention angle (0 = east, counter-clockwise)
/// of the vector pointing toward where the wind comes from, in `[0, 2π)`.
pub fn uv_to_speed_direction(u: f32, v: f32) -> (f64, f64) {
    let u = u as f64;
    let v = v as f64;

    let speed = (u * u + v * v).sqrt();

    let mut direction = (-v).atan2(-u);
    if direction < 0.0 {
        direction += 2.0 * PI;
    }

    (speed, direction)
}

/// Break a speed in knots into pennants, full and half barbs.
pub fn barb_elements(speed_kt: f32) -> BarbElements {
    if !speed_kt.is_finite() || speed_kt < CALM_KNOTS {
        return BarbElements {
            calm: true,
            ..BarbElements::default()
        };
    }

    let mut rounded = ((speed_kt / 5.0).round() * 5.0) as u32;
    let pennants = rounded / 50;
    rounded %= 50;
    let full = rounded / 10;
    rounded %= 10;

    BarbElements {
        pennants,
        full,
        half: rounded / 5,
        calm: false,
    }
}

/// Indices `len-1, len-1-stride, ...` down to zero.
pub fn barb_indices(len: usize, stride: usize) -> Vec<usize> {
    if len == 0 {
        return vec![];
    }
    (0..len).rev().step_by(stride.max(1)).collect()
}

/// Append one barb at `(x, y)` to the line and fill paths.
fn build_barb(
    lines: &mut PathBuilder,
    fills: &mut PathBuilder,
    x: f32,
    y: f32,
    direction_rad: f64,
    elements: BarbElements,
    length: f32,
) {
    if elements.calm {
        lines.push_circle(x, y, length * 0.15);
        return;
    }

    // Staff unit vector in pixel space (y grows downward).
    let (sx, sy) = (direction_rad.cos() as f32, -(direction_rad.sin() as f32));
    // Feathers point to the left of the staff as seen from the station.
    let (px, py) = (-sy, sx);

    let feather = length * 0.4;
    let step = length * 0.14;
    let at = |d: f32| (x + sx * d, y + sy * d);

    let (tip_x, tip_y) = at(length);
    lines.move_to(x, y);
    lines.line_to(tip_x, tip_y);

    let mut d = length;
    for _ in 0..elements.pennants {
        let (ax, ay) = at(d);
        let (bx, by) = at(d - step * 1.4);
        fills.move_to(ax, ay);
        fills.line_to(ax + px * feather, ay + py * feather);
        fills.line_to(bx, by);
        fills.close();
        d -= step * 1.4 + step * 0.4;
    }
    if elements.pennants > 0 && elements.full + elements.half > 0 {
        d -= step * 0.3;
    }

    for _ in 0..elements.full {
        let (ax, ay) = at(d);
        lines.move_to(ax, ay);
        lines.line_to(ax + px * feather + sx * step, ay + py * feather + sy * step);
        d -= step;
    }

    if elements.half > 0 {
        // A lone half barb sits one step in from the end of the staff.
        if elements.pennants == 0 && elements.full == 0 {
            d -= step;
        }
        let (ax, ay) = at(d);
        let half = feather * 0.5;
        lines.move_to(ax, ay);
        lines.line_to(ax + px * half + sx * step * 0.5, ay + py * half + sy * step * 0.5);
    }
}

/// Draw barbs for `u_kt`/`v_kt` (knots) on every `stride`-th node.
///
/// Returns the number of barbs drawn. Nodes outside the map frame or with
/// missing components are skipped.
pub fn draw_barbs(
    canvas: &mut MapCanvas,
    u_kt: &Grid2D,
    v_kt: &Grid2D,
    geo: &GeoGrid,
    config: &BarbConfig,
) -> RenderResult<usize> {
    u_kt.ensure_same_shape(v_kt)?;
    u_kt.ensure_same_shape(&geo.lon)?;
    let (rows, cols) = u_kt.shape();

    // Half a pixel of slack keeps nodes on the extent edge.
    let frame = canvas.frame();
    let bounds = Frame::new(frame.x - 0.5, frame.y - 0.5, frame.width + 1.0, frame.height + 1.0);
    let mut lines = PathBuilder::new();
    let mut fills = PathBuilder::new();
    let mut drawn = 0usize;

    for row in barb_indices(rows, config.stride) {
        for col in barb_indices(cols, config.stride) {
            let (Some(u), Some(v), Some((lon, lat))) =
                (u_kt.get(row, col), v_kt.get(row, col), geo.node(row, col))
            else {
                continue;
            };
            if u.is_nan() || v.is_nan() {
                continue;
            }
            let (x, y) = canvas.view().to_pixel(lon, lat);
            if !bounds.contains(x, y) {
                continue;
            }

            let (speed, direction) = uv_to_speed_direction(u, v);
            build_barb(
                &mut lines,
                &mut fills,
                x,
                y,
                direction,
                barb_elements(speed as f32),
                config.length,
            );
            drawn += 1;
        }
    }

    let paint = solid(config.color);
    if let Some(path) = lines.finish() {
        let stroke = Stroke {
            width: config.line_width,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        canvas.stroke_map_path(&path, &paint, &stroke);
    }
    if let Some(path) = fills.finish() {
        canvas.fill_map_path(&path, &paint);
    }

    debug!(rows, cols, stride = config.stride, barbs = drawn, "Drew wind barbs");
    Ok(drawn)
}
