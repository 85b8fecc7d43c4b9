//! Two-dimensional grids of samples and their coordinates.

use std::ops::Range;

use crate::error::{WxError, WxResult};

/// A row-major 2-D field of `f32` samples.
///
/// Row 0 is the first row delivered by the data source; no orientation is
/// implied. NaN marks fill values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Grid2D {
    /// Wrap row-major data, checking its length against the shape.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> WxResult<Self> {
        if data.len() != rows * cols {
            return Err(WxError::InvalidGridData {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Fail with [`WxError::ShapeMismatch`] unless `other` has this grid's shape.
    pub fn ensure_same_shape(&self, other: &Grid2D) -> WxResult<()> {
        if self.shape() != other.shape() {
            return Err(WxError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        Ok(())
    }

    /// Apply `f` to every sample.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Grid2D {
        Grid2D {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two grids of the same shape cell by cell.
    pub fn zip_map(&self, other: &Grid2D, f: impl Fn(f32, f32) -> f32) -> WxResult<Grid2D> {
        self.ensure_same_shape(other)?;
        Ok(Grid2D {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Add `other` into this grid in place. Shapes must match.
    pub fn add_assign(&mut self, other: &Grid2D) -> WxResult<()> {
        self.ensure_same_shape(other)?;
        for (acc, &v) in self.data.iter_mut().zip(&other.data) {
            *acc += v;
        }
        Ok(())
    }

    /// Copy out the sub-grid covering `rows` x `cols` (end-exclusive).
    pub fn crop(&self, rows: Range<usize>, cols: Range<usize>) -> WxResult<Grid2D> {
        if rows.start > rows.end || rows.end > self.rows {
            return Err(WxError::InvalidWindow(format!(
                "rows {:?} outside 0..{}",
                rows, self.rows
            )));
        }
        if cols.start > cols.end || cols.end > self.cols {
            return Err(WxError::InvalidWindow(format!(
                "cols {:?} outside 0..{}",
                cols, self.cols
            )));
        }

        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for row in rows.clone() {
            let start = row * self.cols;
            data.extend_from_slice(&self.data[start + cols.start..start + cols.end]);
        }
        Ok(Grid2D {
            rows: rows.len(),
            cols: cols.len(),
            data,
        })
    }

    /// Largest non-NaN sample.
    pub fn max_value(&self) -> Option<f32> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f32| m.max(v))))
    }

    /// Smallest non-NaN sample.
    pub fn min_value(&self) -> Option<f32> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f32| m.min(v))))
    }
}

/// Longitude and latitude of every node of a (possibly curvilinear) grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoGrid {
    pub lon: Grid2D,
    pub lat: Grid2D,
}

impl GeoGrid {
    pub fn new(lon: Grid2D, lat: Grid2D) -> WxResult<Self> {
        lon.ensure_same_shape(&lat)?;
        Ok(Self { lon, lat })
    }

    /// Expand 1-D axes of a regular lat/lon grid into node coordinates.
    pub fn from_axes(lon_axis: &[f64], lat_axis: &[f64]) -> Self {
        let rows = lat_axis.len();
        let cols = lon_axis.len();
        Self {
            lon: Grid2D::from_fn(rows, cols, |_, c| lon_axis[c] as f32),
            lat: Grid2D::from_fn(rows, cols, |r, _| lat_axis[r] as f32),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.lon.shape()
    }

    /// `(lon, lat)` of the node at `row`, `col`.
    pub fn node(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        Some((
            self.lon.get(row, col)? as f64,
            self.lat.get(row, col)? as f64,
        ))
    }

    pub fn crop(&self, rows: Range<usize>, cols: Range<usize>) -> WxResult<GeoGrid> {
        Ok(GeoGrid {
            lon: self.lon.crop(rows.clone(), cols.clone())?,
            lat: self.lat.crop(rows, cols)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_length() {
        assert!(matches!(
            Grid2D::new(2, 3, vec![0.0; 5]),
            Err(WxError::InvalidGridData { rows: 2, cols: 3, len: 5 })
        ));
    }

    #[test]
    fn test_crop() {
        let grid = Grid2D::from_fn(4, 5, |r, c| (r * 10 + c) as f32);
        let cropped = grid.crop(1..3, 2..5).unwrap();
        assert_eq!(cropped.shape(), (2, 3));
        assert_eq!(cropped.data(), &[12.0, 13.0, 14.0, 22.0, 23.0, 24.0]);
    }

    #[test]
    fn test_max_ignores_nan() {
        let grid = Grid2D::new(1, 3, vec![1.0, f32::NAN, 4.5]).unwrap();
        assert_eq!(grid.max_value(), Some(4.5));
        assert_eq!(Grid2D::filled(2, 2, f32::NAN).max_value(), None);
    }
}
