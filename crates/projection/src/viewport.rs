//! Placement of a lon/lat extent inside a pixel frame.
//!
//! The extent is projected with [`Mercator`] and scaled uniformly so it fits
//! the frame, centered along the axis with slack.

use thiserror::Error;
use wx_common::BoundingBox;

use crate::mercator::Mercator;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("degenerate map extent: {0}")]
    DegenerateExtent(String),

    #[error("frame has no area: {width}x{height}")]
    EmptyFrame { width: f32, height: f32 },
}

/// A pixel rectangle; origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

/// Mercator viewport mapping geographic coordinates to pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    extent: BoundingBox,
    projection: Mercator,
    /// The area the extent actually occupies after aspect fitting.
    frame: Frame,
    min_x: f64,
    max_y: f64,
    scale: f64,
}

impl MapView {
    /// Fit `extent` into `available`, preserving the Mercator aspect ratio.
    pub fn fit(extent: BoundingBox, available: Frame) -> Result<Self, ProjectionError> {
        if !(extent.width() > 0.0 && extent.height() > 0.0) {
            return Err(ProjectionError::DegenerateExtent(format!(
                "[{}, {}, {}, {}]",
                extent.min_x, extent.max_x, extent.min_y, extent.max_y
            )));
        }
        if !(available.width > 0.0 && available.height > 0.0) {
            return Err(ProjectionError::EmptyFrame {
                width: available.width,
                height: available.height,
            });
        }

        let projection = Mercator::new((extent.min_x + extent.max_x) / 2.0);
        let (min_x, min_y) = projection.forward(extent.min_x, extent.min_y);
        let (max_x, max_y) = projection.forward(extent.max_x, extent.max_y);

        let scale = (available.width as f64 / (max_x - min_x))
            .min(available.height as f64 / (max_y - min_y));
        let width = ((max_x - min_x) * scale) as f32;
        let height = ((max_y - min_y) * scale) as f32;
        let frame = Frame::new(
            available.x + (available.width - width) / 2.0,
            available.y + (available.height - height) / 2.0,
            width,
            height,
        );

        Ok(Self {
            extent,
            projection,
            frame,
            min_x,
            max_y,
            scale,
        })
    }

    pub fn extent(&self) -> &BoundingBox {
        &self.extent
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Pixels per projected meter.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Geographic degrees to pixel coordinates. Points outside the extent
    /// map outside the frame.
    pub fn to_pixel(&self, lon: f64, lat: f64) -> (f32, f32) {
        let (x, y) = self.projection.forward(lon, lat);
        (
            self.frame.x + ((x - self.min_x) * self.scale) as f32,
            self.frame.y + ((self.max_y - y) * self.scale) as f32,
        )
    }

    /// Pixel coordinates to geographic degrees.
    pub fn to_lonlat(&self, px: f32, py: f32) -> (f64, f64) {
        let x = self.min_x + (px - self.frame.x) as f64 / self.scale;
        let y = self.max_y - (py - self.frame.y) as f64 / self.scale;
        self.projection.inverse(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carolinas() -> BoundingBox {
        BoundingBox::from_extent([-85.13, -74.74, 31.59, 37.19])
    }

    #[test]
    fn test_corners_map_to_frame_corners() {
        let view = MapView::fit(carolinas(), Frame::new(0.0, 100.0, 1000.0, 700.0)).unwrap();
        let f = view.frame();

        let (x0, y0) = view.to_pixel(-85.13, 37.19);
        assert!((x0 - f.x).abs() < 1e-2);
        assert!((y0 - f.y).abs() < 1e-2);

        let (x1, y1) = view.to_pixel(-74.74, 31.59);
        assert!((x1 - f.right()).abs() < 1e-2);
        assert!((y1 - f.bottom()).abs() < 1e-2);
    }

    #[test]
    fn test_fit_preserves_aspect_and_centers() {
        let available = Frame::new(0.0, 0.0, 1000.0, 1000.0);
        let view = MapView::fit(carolinas(), available).unwrap();
        let f = view.frame();
        // Wider than tall: full width, vertically centered.
        assert!((f.width - 1000.0).abs() < 1e-3);
        assert!(f.height < 1000.0);
        assert!((f.y - (1000.0 - f.height) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_pixel_roundtrip() {
        let view = MapView::fit(carolinas(), Frame::new(10.0, 10.0, 800.0, 600.0)).unwrap();
        let (px, py) = view.to_pixel(-80.0, 35.0);
        let (lon, lat) = view.to_lonlat(px, py);
        assert!((lon + 80.0).abs() < 1e-3);
        assert!((lat - 35.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_inputs() {
        let flat = BoundingBox::from_extent([-80.0, -80.0, 30.0, 35.0]);
        assert!(MapView::fit(flat, Frame::new(0.0, 0.0, 10.0, 10.0)).is_err());
        assert!(MapView::fit(carolinas(), Frame::new(0.0, 0.0, 0.0, 10.0)).is_err());
    }
}
