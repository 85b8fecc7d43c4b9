//! Map canvas and page layout.

use std::path::Path;

use projection::{Frame, MapView};
use serde::Deserialize;
use tiny_skia::{Color, FillRule, Mask, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::debug;
use wx_common::{BoundingBox, GeoGrid, Rgba};

use crate::error::{RenderError, RenderResult};
use crate::png::encode_pixmap;
use crate::text::{draw_text, solid, Align, TextStyle, VAlign};

/// Page geometry in pixels.
///
/// ```text
/// ┌──────────────────────────────────────┐
/// │ header                               │
/// ├────────────────────────────┬─────────┤
/// │                            │         │
/// │ map frame                  │colorbar │
/// │                            │         │
/// ├────────────────────────────┴─────────┤
/// │ footer                               │
/// └──────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
    pub margin: f32,
    pub header_height: f32,
    pub footer_height: f32,
    /// Width of the colorbar band; 0 for none.
    pub colorbar_width: f32,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            margin: 20.0,
            header_height: 56.0,
            footer_height: 44.0,
            colorbar_width: 0.0,
        }
    }
}

impl CanvasLayout {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_colorbar(mut self, width: f32) -> Self {
        self.colorbar_width = width;
        self
    }

    /// Space available to the map before aspect fitting.
    pub fn map_area(&self) -> Frame {
        let x = self.margin;
        let y = self.margin + self.header_height;
        Frame::new(
            x,
            y,
            self.width as f32 - 2.0 * self.margin - self.colorbar_width,
            self.height as f32 - y - self.footer_height - self.margin,
        )
    }

    pub fn header_area(&self) -> Frame {
        Frame::new(
            self.margin,
            self.margin,
            self.width as f32 - 2.0 * self.margin,
            self.header_height,
        )
    }

    pub fn footer_area(&self) -> Frame {
        Frame::new(
            self.margin,
            self.height as f32 - self.margin - self.footer_height,
            self.width as f32 - 2.0 * self.margin,
            self.footer_height,
        )
    }
}

/// A pixmap with a fitted Mercator view of one map extent.
///
/// Map layers are clipped to the map frame; header, footer and colorbar
/// drawing is not.
pub struct MapCanvas {
    pixmap: Pixmap,
    layout: CanvasLayout,
    view: MapView,
    clip: Mask,
}

impl MapCanvas {
    /// White canvas with the extent fitted into the map area.
    pub fn new(layout: CanvasLayout, extent: BoundingBox) -> RenderResult<Self> {
        let invalid = || RenderError::InvalidCanvas {
            width: layout.width,
            height: layout.height,
        };
        let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or_else(invalid)?;
        pixmap.fill(Color::WHITE);

        let view = MapView::fit(extent, layout.map_area())?;
        let frame = view.frame();

        let mut clip = Mask::new(layout.width, layout.height).ok_or_else(invalid)?;
        let rect = Rect::from_xywh(frame.x, frame.y, frame.width, frame.height).ok_or_else(invalid)?;
        clip.fill_path(
            &PathBuilder::from_rect(rect),
            FillRule::Winding,
            false,
            Transform::identity(),
        );

        debug!(
            width = layout.width,
            height = layout.height,
            frame_x = frame.x,
            frame_y = frame.y,
            frame_width = frame.width,
            frame_height = frame.height,
            "Created map canvas"
        );

        Ok(Self {
            pixmap,
            layout,
            view,
            clip,
        })
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn frame(&self) -> Frame {
        self.view.frame()
    }

    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Pixel position of every grid node, row-major.
    pub fn project_nodes(&self, geo: &GeoGrid) -> Vec<(f32, f32)> {
        geo.lon
            .data()
            .iter()
            .zip(geo.lat.data())
            .map(|(&lon, &lat)| self.view.to_pixel(lon as f64, lat as f64))
            .collect()
    }

    /// Right-hand band next to the fitted map frame, if the layout has one.
    pub fn colorbar_area(&self) -> Option<Frame> {
        if self.layout.colorbar_width <= 0.0 {
            return None;
        }
        let frame = self.frame();
        Some(Frame::new(
            frame.right(),
            frame.y,
            self.layout.colorbar_width,
            frame.height,
        ))
    }

    /// Fill `path` inside the map frame.
    pub fn fill_map_path(&mut self, path: &tiny_skia::Path, paint: &Paint) {
        self.pixmap.fill_path(
            path,
            paint,
            FillRule::Winding,
            Transform::identity(),
            Some(&self.clip),
        );
    }

    /// Stroke `path` inside the map frame.
    pub fn stroke_map_path(&mut self, path: &tiny_skia::Path, paint: &Paint, stroke: &Stroke) {
        self.pixmap
            .stroke_path(path, paint, stroke, Transform::identity(), Some(&self.clip));
    }

    /// Outline the map frame.
    pub fn draw_frame(&mut self, color: Rgba, width: f32) {
        let frame = self.frame();
        if let Some(rect) = Rect::from_xywh(frame.x, frame.y, frame.width, frame.height) {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap.stroke_path(
                &PathBuilder::from_rect(rect),
                &solid(color),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }

    /// Text in the header band, aligned to its left or right edge. `line` 0
    /// is the top line.
    pub fn header_text(&mut self, line: usize, text: &str, align: Align, style: TextStyle) {
        let area = self.layout.header_area();
        let y = area.y + style.size + line as f32 * style.size * 1.8;
        self.band_text(area, y, text, align, style);
    }

    /// Text in the footer band. `line` 0 is the top line.
    pub fn footer_text(&mut self, line: usize, text: &str, align: Align, style: TextStyle) {
        let area = self.layout.footer_area();
        let y = area.y + style.size * 1.5 + line as f32 * style.size * 1.8;
        self.band_text(area, y, text, align, style);
    }

    fn band_text(&mut self, area: Frame, y: f32, text: &str, align: Align, style: TextStyle) {
        // Bands line up with the fitted map frame, not the page margins.
        let frame = self.frame();
        let (left, right) = (frame.x.max(area.x), frame.right().min(area.right()));
        let x = match align {
            Align::Left => left,
            Align::Center => (left + right) / 2.0,
            Align::Right => right,
        };
        let style = style.align(align).valign(VAlign::Baseline);
        draw_text(&mut self.pixmap, text, x, y, &style);
    }

    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        encode_pixmap(&self.pixmap)
    }

    /// Encode and write to `path`, creating parent directories.
    pub fn save_png(&self, path: &Path) -> RenderResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = self.encode_png()?;
        std::fs::write(path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote PNG");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_map_area() {
        let area = CanvasLayout::default().map_area();
        assert_eq!(area.x, 20.0);
        assert_eq!(area.y, 76.0);
        assert_eq!(area.width, 1160.0);
        assert_eq!(area.height, 760.0);
    }

    #[test]
    fn test_colorbar_band_shrinks_map() {
        let layout = CanvasLayout::default().with_colorbar(90.0);
        assert_eq!(layout.map_area().width, 1070.0);
    }

    #[test]
    fn test_canvas_starts_white() {
        let extent = BoundingBox::from_extent([-85.0, -80.0, 34.0, 37.0]);
        let canvas = MapCanvas::new(CanvasLayout::sized(200, 150), extent).unwrap();
        let p = canvas.pixmap().pixel(0, 0).unwrap();
        assert_eq!((p.red(), p.green(), p.blue(), p.alpha()), (255, 255, 255, 255));
        assert!(canvas.colorbar_area().is_none());
    }

    #[test]
    fn test_zero_size_canvas_rejected() {
        let extent = BoundingBox::from_extent([-85.0, -80.0, 34.0, 37.0]);
        assert!(MapCanvas::new(CanvasLayout::sized(0, 0), extent).is_err());
    }
}
