//! Nearest-index lookup of a lon/lat box in 1-D coordinate axes.

use std::ops::Range;

use wx_common::BoundingBox;

use crate::error::{GridProcessorError, Result};

/// Index of the candidate closest to `target`.
///
/// Ties go to the lowest index. NaN candidates are skipped; `None` only when
/// no candidate is usable. The axis need not be sorted.
pub fn nearest_index(candidates: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &c) in candidates.iter().enumerate() {
        let d = (target - c).abs();
        if d.is_nan() {
            continue;
        }
        match best {
            Some((_, bd)) if bd <= d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Shift a negative longitude into 0..360 when the axis uses that convention.
pub fn align_longitude(lon_axis: &[f64], lon: f64) -> f64 {
    let east_positive = lon_axis.iter().any(|&x| x > 180.0);
    if east_positive && lon < 0.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Axis indices nearest to each edge of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxIndices {
    pub west: usize,
    pub east: usize,
    pub south: usize,
    pub north: usize,
}

impl BoxIndices {
    /// Latitude index range, end-exclusive.
    pub fn row_range(&self) -> Range<usize> {
        self.south.min(self.north)..self.south.max(self.north)
    }

    /// Longitude index range, end-exclusive.
    pub fn col_range(&self) -> Range<usize> {
        self.west.min(self.east)..self.west.max(self.east)
    }

    pub fn is_empty(&self) -> bool {
        self.row_range().is_empty() || self.col_range().is_empty()
    }
}

/// Locate `bbox` in the grid axes: west/east against `lon_axis`,
/// south/north against `lat_axis`.
pub fn locate_box(lon_axis: &[f64], lat_axis: &[f64], bbox: &BoundingBox) -> Result<BoxIndices> {
    let lon = |x: f64| {
        nearest_index(lon_axis, align_longitude(lon_axis, x))
            .ok_or(GridProcessorError::EmptyAxis("lon"))
    };
    let lat = |y: f64| nearest_index(lat_axis, y).ok_or(GridProcessorError::EmptyAxis("lat"));

    Ok(BoxIndices {
        west: lon(bbox.min_x)?,
        east: lon(bbox.max_x)?,
        south: lat(bbox.min_y)?,
        north: lat(bbox.max_y)?,
    })
}
