//! Vertical colorbar in the canvas' right-hand band.
//!
//! Only the drawable buckets are shown: from the first bucket with a
//! non-zero alpha up to the open-ended top bucket, each as an equal-height
//! block. Ticks sit on the breakpoints between blocks.

use tiny_skia::{PathBuilder, Rect, Stroke, Transform};
use tracing::{debug, warn};
use wx_common::{ColorScale, Rgba};

use crate::canvas::MapCanvas;
use crate::error::RenderResult;
use crate::text::{draw_text, solid, Align, TextStyle, VAlign};

/// A labelled breakpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

impl Tick {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Colorbar {
    pub ticks: Vec<Tick>,
    pub bar_width: f32,
    pub label_size: f32,
    pub label_color: Rgba,
    pub outline: Rgba,
}

impl Colorbar {
    pub fn with_ticks(ticks: Vec<Tick>) -> Self {
        Self {
            ticks,
            bar_width: 18.0,
            label_size: 9.0,
            label_color: [0, 0, 0, 255],
            outline: [0, 0, 0, 255],
        }
    }

    /// Tick every `every`-th drawable breakpoint, labelled with its value.
    pub fn from_breakpoints(scale: &ColorScale, every: usize) -> Self {
        let first = first_drawable(scale).unwrap_or(0);
        let ticks = scale
            .breakpoints()
            .iter()
            .skip(first.saturating_sub(1))
            .step_by(every.max(1))
            .map(|&value| Tick::new(value, format_value(value)))
            .collect();
        Self::with_ticks(ticks)
    }
}

/// Breakpoint value without a trailing `.0`.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Index of the first bucket that is not fully transparent.
fn first_drawable(scale: &ColorScale) -> Option<usize> {
    scale.colors().iter().position(|c| c[3] > 0)
}

/// Draw `colorbar` for `scale` in the canvas' colorbar band.
///
/// Does nothing when the layout reserves no band or the scale has no
/// drawable bucket.
pub fn draw_colorbar(canvas: &mut MapCanvas, scale: &ColorScale, colorbar: &Colorbar) -> RenderResult<()> {
    let Some(area) = canvas.colorbar_area() else {
        warn!("Colorbar requested but the layout has no colorbar band");
        return Ok(());
    };
    let Some(first) = first_drawable(scale) else {
        return Ok(());
    };

    let blocks = scale.bucket_count() - first;
    let x = area.x + 12.0;
    let top = area.y;
    let bottom = area.bottom();
    let block_height = (bottom - top) / blocks as f32;

    let pixmap = canvas.pixmap_mut();
    for (i, color) in scale.colors()[first..].iter().enumerate() {
        let y = bottom - (i + 1) as f32 * block_height;
        if let Some(rect) = Rect::from_xywh(x, y, colorbar.bar_width, block_height) {
            pixmap.fill_rect(rect, &solid(*color), Transform::identity(), None);
        }
    }

    if let Some(rect) = Rect::from_xywh(x, top, colorbar.bar_width, bottom - top) {
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(
            &PathBuilder::from_rect(rect),
            &solid(colorbar.outline),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    let style = TextStyle::sized(colorbar.label_size)
        .color(colorbar.label_color)
        .align(Align::Left)
        .valign(VAlign::Middle);
    let mut drawn = 0;
    for tick in &colorbar.ticks {
        let Some(j) = scale
            .breakpoints()
            .iter()
            .position(|b| (b - tick.value).abs() < 1e-9)
        else {
            continue;
        };
        if j + 1 < first {
            continue;
        }
        let y = bottom - (j + 1 - first) as f32 * block_height;

        let mut pb = PathBuilder::new();
        pb.move_to(x + colorbar.bar_width, y);
        pb.line_to(x + colorbar.bar_width + 4.0, y);
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(
                &path,
                &solid(colorbar.outline),
                &Stroke::default(),
                Transform::identity(),
                None,
            );
        }
        draw_text(pixmap, &tick.label, x + colorbar.bar_width + 7.0, y, &style);
        drawn += 1;
    }

    debug!(blocks, ticks = drawn, "Drew colorbar");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> ColorScale {
        ColorScale::from_hex(&[1.0, 2.5, 4.0], &["transparent", "#ff0000", "#00ff00", "#0000ff"])
            .unwrap()
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(10.0), "10");
        assert_eq!(format_value(0.5), "0.5");
    }

    #[test]
    fn test_ticks_start_at_first_drawable_breakpoint() {
        let bar = Colorbar::from_breakpoints(&scale(), 1);
        let labels: Vec<_> = bar.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2.5", "4"]);

        let bar = Colorbar::from_breakpoints(&scale(), 2);
        let labels: Vec<_> = bar.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "4"]);
    }
}
