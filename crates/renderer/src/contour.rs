//! Contour line (isoline) rendering using the marching squares algorithm.
//!
//! Contours are traced in grid index space (x = column, y = row), smoothed,
//! then mapped to pixels through the projected grid nodes, so curvilinear
//! grids are followed exactly at the nodes.

use tiny_skia::{LineCap, LineJoin, PathBuilder, Stroke, StrokeDash};
use tracing::debug;
use wx_common::{GeoGrid, Grid2D, Rgba};

use crate::canvas::MapCanvas;
use crate::error::RenderResult;
use crate::text::{draw_text, solid, Align, TextStyle, VAlign};

/// A point in 2D space (grid or pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A line segment between two points
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline)
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f32,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Configuration for contour rendering
#[derive(Debug, Clone)]
pub struct ContourConfig {
    /// Contour levels to draw
    pub levels: Vec<f32>,
    /// Line width in pixels
    pub line_width: f32,
    pub line_color: Rgba,
    /// Dash pattern (on, off, ...) in pixels; `None` for solid lines
    pub dash: Option<Vec<f32>>,
    /// Number of smoothing passes (0 = no smoothing)
    pub smoothing_passes: u32,
    /// Whether to draw labels on contour lines
    pub labels_enabled: bool,
    /// Cap height of label text
    pub label_size: f32,
    /// Minimum spacing between labels along a line (in pixels)
    pub label_spacing: f32,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            levels: vec![],
            line_width: 1.0,
            line_color: [0, 0, 0, 255],
            dash: None,
            smoothing_passes: 1,
            labels_enabled: false,
            label_size: 9.0,
            label_spacing: 250.0,
        }
    }
}

impl ContourConfig {
    /// Numeric label for a level: whole numbers without decimals.
    pub fn level_label(&self, level: f32) -> String {
        if level.fract().abs() < 0.01 {
            format!("{:.0}", level)
        } else {
            format!("{:.1}", level)
        }
    }
}

/// Generate contour levels: every multiple of `interval` within the range.
pub fn generate_contour_levels(min_value: f32, max_value: f32, interval: f32) -> Vec<f32> {
    if interval <= 0.0 || max_value <= min_value {
        return vec![];
    }

    let first = (min_value / interval).ceil() as i64;
    let last = (max_value / interval).floor() as i64;
    (first..=last).map(|k| k as f32 * interval).collect()
}

/// Marching squares over row-major `data`.
///
/// Cells with a NaN corner produce no segments.
pub fn march_squares(data: &[f32], width: usize, height: usize, level: f32) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut cell_index = 0;
            if tl >= level {
                cell_index |= 1;
            }
            if tr >= level {
                cell_index |= 2;
            }
            if br >= level {
                cell_index |= 4;
            }
            if bl >= level {
                cell_index |= 8;
            }

            segments.extend(get_cell_segments(
                cell_index, x as f32, y as f32, tl, tr, br, bl, level,
            ));
        }
    }

    segments
}

/// Line segments for one cell, crossings placed by linear interpolation.
#[allow(clippy::too_many_arguments)]
fn get_cell_segments(
    cell_index: u8,
    x: f32,
    y: f32,
    tl: f32,
    tr: f32,
    br: f32,
    bl: f32,
    level: f32,
) -> Vec<Segment> {
    let top = interpolate_edge(x, y, x + 1.0, y, tl, tr, level);
    let right = interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, tr, br, level);
    let bottom = interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, bl, br, level);
    let left = interpolate_edge(x, y, x, y + 1.0, tl, bl, level);

    let seg = |start, end| Segment { start, end };
    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![seg(left, top)],
        2 | 13 => vec![seg(top, right)],
        3 | 12 => vec![seg(left, right)],
        4 | 11 => vec![seg(right, bottom)],
        // Saddles: resolve by the cell-centre average
        5 => {
            if (tl + tr + br + bl) / 4.0 >= level {
                vec![seg(left, bottom), seg(top, right)]
            } else {
                vec![seg(left, top), seg(right, bottom)]
            }
        }
        10 => {
            if (tl + tr + br + bl) / 4.0 >= level {
                vec![seg(left, top), seg(right, bottom)]
            } else {
                vec![seg(top, right), seg(left, bottom)]
            }
        }
        6 | 9 => vec![seg(top, bottom)],
        7 | 8 => vec![seg(left, bottom)],
        _ => vec![],
    }
}

/// Linearly interpolate between two edge points based on data values
fn interpolate_edge(x1: f32, y1: f32, x2: f32, y2: f32, val1: f32, val2: f32, level: f32) -> Point {
    if (val2 - val1).abs() < 1e-6 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);
    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Connect unordered segments into polylines.
///
/// Chains grow from both ends, so a line is never split in two because
/// tracing started in its middle.
pub fn connect_segments(segments: Vec<Segment>) -> Vec<Contour> {
    const EPSILON: f32 = 0.001;

    let mut contours = Vec::new();
    let mut used = vec![false; segments.len()];

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }
        used[start_idx] = true;
        let mut points = std::collections::VecDeque::from(vec![
            segments[start_idx].start,
            segments[start_idx].end,
        ]);

        let mut changed = true;
        while changed {
            changed = false;
            for (i, seg) in segments.iter().enumerate() {
                if used[i] {
                    continue;
                }
                let (head, tail) = match (points.front(), points.back()) {
                    (Some(h), Some(t)) => (*h, *t),
                    _ => break,
                };
                if seg.start.distance(&tail) < EPSILON {
                    points.push_back(seg.end);
                } else if seg.end.distance(&tail) < EPSILON {
                    points.push_back(seg.start);
                } else if seg.end.distance(&head) < EPSILON {
                    points.push_front(seg.start);
                } else if seg.start.distance(&head) < EPSILON {
                    points.push_front(seg.end);
                } else {
                    continue;
                }
                used[i] = true;
                changed = true;
            }
        }

        let points: Vec<Point> = points.into_iter().collect();
        let closed = points.len() > 2 && points[0].distance(&points[points.len() - 1]) < EPSILON;
        contours.push(Contour {
            level: 0.0, // set by caller
            points,
            closed,
        });
    }

    contours
}

/// Apply Chaikin's corner cutting algorithm for smoothing
pub fn smooth_contour(contour: &Contour, iterations: u32) -> Contour {
    if iterations == 0 || contour.points.len() < 3 {
        return contour.clone();
    }

    let mut points = contour.points.clone();

    for _ in 0..iterations {
        let mut new_points = Vec::with_capacity(points.len() * 2 + 2);
        if !contour.closed {
            new_points.push(points[0]);
        }

        let pairs = if contour.closed {
            points.len()
        } else {
            points.len() - 1
        };
        for i in 0..pairs {
            let p1 = points[i];
            let p2 = points[(i + 1) % points.len()];
            new_points.push(Point::new(0.75 * p1.x + 0.25 * p2.x, 0.75 * p1.y + 0.25 * p2.y));
            new_points.push(Point::new(0.25 * p1.x + 0.75 * p2.x, 0.25 * p1.y + 0.75 * p2.y));
        }

        if !contour.closed {
            new_points.push(points[points.len() - 1]);
        }
        points = new_points;
    }

    Contour {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

/// Trace, connect and smooth every configured level.
pub fn generate_all_contours(
    data: &[f32],
    width: usize,
    height: usize,
    config: &ContourConfig,
) -> Vec<Contour> {
    let mut all_contours = Vec::new();

    for &level in &config.levels {
        let segments = march_squares(data, width, height, level);
        for mut contour in connect_segments(segments) {
            contour.level = level;
            if config.smoothing_passes > 0 {
                contour = smooth_contour(&contour, config.smoothing_passes);
            }
            all_contours.push(contour);
        }
    }

    all_contours
}

/// Bilinear mapping from fractional grid indices to pixels.
pub struct GridToPixel<'a> {
    nodes: &'a [(f32, f32)],
    rows: usize,
    cols: usize,
}

impl<'a> GridToPixel<'a> {
    pub fn new(nodes: &'a [(f32, f32)], rows: usize, cols: usize) -> Self {
        Self { nodes, rows, cols }
    }

    pub fn map(&self, p: Point) -> Point {
        let max_x = (self.cols - 1) as f32;
        let max_y = (self.rows - 1) as f32;
        let x = p.x.clamp(0.0, max_x);
        let y = p.y.clamp(0.0, max_y);
        let c0 = (x.floor() as usize).min(self.cols.saturating_sub(2));
        let r0 = (y.floor() as usize).min(self.rows.saturating_sub(2));
        let (fx, fy) = (x - c0 as f32, y - r0 as f32);

        let at = |r: usize, c: usize| self.nodes[r * self.cols + c];
        let (x00, y00) = at(r0, c0);
        let (x01, y01) = at(r0, c0 + 1);
        let (x10, y10) = at(r0 + 1, c0);
        let (x11, y11) = at(r0 + 1, c0 + 1);

        let top = (x00 + (x01 - x00) * fx, y00 + (y01 - y00) * fx);
        let bottom = (x10 + (x11 - x10) * fx, y10 + (y11 - y10) * fx);
        Point::new(top.0 + (bottom.0 - top.0) * fy, top.1 + (bottom.1 - top.1) * fy)
    }
}

/// Position for a contour label
#[derive(Debug, Clone)]
struct LabelPosition {
    x: f32,
    y: f32,
    text: String,
}

fn contour_length(points: &[Point]) -> f32 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Evenly spaced label positions along a pixel-space polyline, skipping
/// positions near the frame edge or too close to an existing label.
fn collect_label_positions(
    points: &[Point],
    text: &str,
    config: &ContourConfig,
    bounds: (f32, f32, f32, f32),
    positions: &mut Vec<LabelPosition>,
) {
    let total_length = contour_length(points);
    if total_length < config.label_spacing * 0.5 {
        return;
    }

    let num_labels = ((total_length / config.label_spacing).floor() as usize).max(1);
    let spacing = total_length / (num_labels as f32 + 1.0);
    let margin = config.label_size * 2.0;
    let min_distance = config.label_size * 5.0;
    let (left, top, right, bottom) = bounds;

    let mut accumulated = 0.0;
    let mut next_label_at = spacing;
    let mut placed = 0;

    for w in points.windows(2) {
        let (p1, p2) = (w[0], w[1]);
        let segment_length = p1.distance(&p2);

        while placed < num_labels && accumulated + segment_length >= next_label_at {
            let t = if segment_length > 0.0 {
                (next_label_at - accumulated) / segment_length
            } else {
                0.0
            };
            let x = p1.x + t * (p2.x - p1.x);
            let y = p1.y + t * (p2.y - p1.y);

            let inside = x > left + margin && x < right - margin && y > top + margin && y < bottom - margin;
            let crowded = positions
                .iter()
                .any(|pos| (pos.x - x).powi(2) + (pos.y - y).powi(2) < min_distance.powi(2));
            if inside && !crowded {
                positions.push(LabelPosition {
                    x,
                    y,
                    text: text.to_string(),
                });
            }

            next_label_at += spacing;
            placed += 1;
        }
        accumulated += segment_length;
    }
}

/// Contour `field` and draw the lines (and labels) onto the map.
///
/// Returns the number of polylines drawn.
pub fn draw_contours(
    canvas: &mut MapCanvas,
    field: &Grid2D,
    geo: &GeoGrid,
    config: &ContourConfig,
) -> RenderResult<usize> {
    field.ensure_same_shape(&geo.lon)?;
    let (rows, cols) = field.shape();

    debug!(
        rows,
        cols,
        data_min = field.min_value().unwrap_or(f32::NAN),
        data_max = field.max_value().unwrap_or(f32::NAN),
        num_levels = config.levels.len(),
        "draw_contours input"
    );

    let contours = generate_all_contours(field.data(), cols, rows, config);
    if contours.is_empty() {
        return Ok(0);
    }

    let nodes = canvas.project_nodes(geo);
    let to_pixel = GridToPixel::new(&nodes, rows, cols);

    let paint = solid(config.line_color);
    let stroke = Stroke {
        width: config.line_width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash: config
            .dash
            .as_ref()
            .and_then(|d| StrokeDash::new(d.clone(), 0.0)),
        ..Stroke::default()
    };

    let frame = canvas.frame();
    let bounds = (frame.x, frame.y, frame.right(), frame.bottom());
    let mut labels: Vec<LabelPosition> = Vec::new();
    let mut drawn = 0;

    for contour in &contours {
        let pixels: Vec<Point> = contour.points.iter().map(|&p| to_pixel.map(p)).collect();
        let mut pb = PathBuilder::new();
        pb.move_to(pixels[0].x, pixels[0].y);
        for p in &pixels[1..] {
            pb.line_to(p.x, p.y);
        }
        if contour.closed {
            pb.close();
        }
        if let Some(path) = pb.finish() {
            canvas.stroke_map_path(&path, &paint, &stroke);
            drawn += 1;
        }

        if config.labels_enabled {
            let text = config.level_label(contour.level);
            collect_label_positions(&pixels, &text, config, bounds, &mut labels);
        }
    }

    let label_style = TextStyle::sized(config.label_size)
        .color(config.line_color)
        .halo([255, 255, 255, 255], config.label_size * 0.35)
        .align(Align::Center)
        .valign(VAlign::Middle);
    for label in &labels {
        draw_text(canvas.pixmap_mut(), &label.text, label.x, label.y, &label_style);
    }

    debug!(
        num_contours = drawn,
        num_labels = labels.len(),
        "Drew contours"
    );
    Ok(drawn)
}
