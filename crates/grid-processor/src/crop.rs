//! Index windows with start/end bounds relative to either end of an axis.
//!
//! Written as `start:end` per axis, rows first: `"250:-200,700:"` keeps rows
//! 250 up to 200 before the end and columns from 700 onward.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::Deserialize;
use wx_common::{GeoGrid, Grid2D};

use crate::error::{GridProcessorError, Result};

/// Bounds along one axis. Negative values count back from the end; a
/// missing end means "through the last index".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisWindow {
    pub start: isize,
    pub end: Option<isize>,
}

impl AxisWindow {
    pub const fn new(start: isize, end: Option<isize>) -> Self {
        Self { start, end }
    }

    pub const fn full() -> Self {
        Self::new(0, None)
    }

    /// Resolve to an end-exclusive range. Bounds outside the axis, or an
    /// empty result, are errors rather than silently clamped.
    pub fn resolve(&self, len: usize) -> Result<Range<usize>> {
        let out_of_range = || GridProcessorError::WindowOutOfRange {
            window: self.to_string(),
            len,
        };
        let absolute = |i: isize| -> Option<usize> {
            let n = len as isize;
            let i = if i < 0 { n + i } else { i };
            (0..=n).contains(&i).then_some(i as usize)
        };

        let start = absolute(self.start).ok_or_else(out_of_range)?;
        let end = match self.end {
            Some(e) => absolute(e).ok_or_else(out_of_range)?,
            None => len,
        };
        if start >= end {
            return Err(out_of_range());
        }
        Ok(start..end)
    }
}

impl fmt::Display for AxisWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}:{}", self.start, end),
            None => write!(f, "{}:", self.start),
        }
    }
}

impl FromStr for AxisWindow {
    type Err = GridProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GridProcessorError::InvalidWindow(s.to_string());
        let (start, end) = s.trim().split_once(':').ok_or_else(invalid)?;
        let start = match start.trim() {
            "" => 0,
            v => v.parse().map_err(|_| invalid())?,
        };
        let end = match end.trim() {
            "" => None,
            v => Some(v.parse().map_err(|_| invalid())?),
        };
        Ok(Self { start, end })
    }
}

/// A row window and a column window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct IndexWindow {
    pub rows: AxisWindow,
    pub cols: AxisWindow,
}

impl IndexWindow {
    pub const fn new(rows: AxisWindow, cols: AxisWindow) -> Self {
        Self { rows, cols }
    }

    pub const fn full() -> Self {
        Self::new(AxisWindow::full(), AxisWindow::full())
    }

    /// Eastern part of the CONUS404 d01 domain used by the precipitation
    /// maps: rows 250 to 200 before the end, columns 700 onward.
    pub const fn conus404_east() -> Self {
        Self::new(AxisWindow::new(250, Some(-200)), AxisWindow::new(700, None))
    }

    /// Resolve against a `(rows, cols)` shape.
    pub fn resolve(&self, shape: (usize, usize)) -> Result<(Range<usize>, Range<usize>)> {
        Ok((self.rows.resolve(shape.0)?, self.cols.resolve(shape.1)?))
    }

    pub fn apply(&self, grid: &Grid2D) -> Result<Grid2D> {
        let (rows, cols) = self.resolve(grid.shape())?;
        Ok(grid.crop(rows, cols)?)
    }

    pub fn apply_geo(&self, geo: &GeoGrid) -> Result<GeoGrid> {
        let (rows, cols) = self.resolve(geo.shape())?;
        Ok(geo.crop(rows, cols)?)
    }
}

impl Default for IndexWindow {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for IndexWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.rows, self.cols)
    }
}

impl FromStr for IndexWindow {
    type Err = GridProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        let (rows, cols) = s
            .split_once(',')
            .ok_or_else(|| GridProcessorError::InvalidWindow(s.to_string()))?;
        Ok(Self::new(rows.parse()?, cols.parse()?))
    }
}

impl TryFrom<String> for IndexWindow {
    type Error = GridProcessorError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conus404_window_on_full_domain() {
        let (rows, cols) = IndexWindow::conus404_east().resolve((1015, 1367)).unwrap();
        assert_eq!(rows, 250..815);
        assert_eq!(cols, 700..1367);
    }

    #[test]
    fn test_parse_roundtrips_display() {
        let w: IndexWindow = "250:-200,700:".parse().unwrap();
        assert_eq!(w, IndexWindow::conus404_east());
        assert_eq!(w.to_string(), "250:-200,700:");
    }

    #[test]
    fn test_window_larger_than_axis() {
        assert!(AxisWindow::new(250, Some(-200)).resolve(300).is_err());
        assert!(AxisWindow::new(0, Some(11)).resolve(10).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("250".parse::<AxisWindow>().is_err());
        assert!("a:b,1:2".parse::<IndexWindow>().is_err());
    }
}
