//! Test data generators for creating synthetic weather-like data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite. Row 0 is the southern edge,
//! matching the WRF grids the pipelines read.

use wx_common::{BoundingBox, GeoGrid, Grid2D};

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(5, 10);
/// assert_eq!(grid.shape(), (5, 10));
/// assert_eq!(grid.get(0, 1), Some(1000.0));
/// assert_eq!(grid.get(1, 0), Some(1.0));
/// ```
pub fn create_test_grid(rows: usize, cols: usize) -> Grid2D {
    Grid2D::from_fn(rows, cols, |row, col| (col * 1000 + row) as f32)
}

/// Creates a grid where every cell has the same value.
pub fn create_constant_grid(rows: usize, cols: usize, value: f32) -> Grid2D {
    Grid2D::filled(rows, cols, value)
}

/// Evenly spaced axis values: `start, start + step, ...`.
pub fn create_axis(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Node coordinates of a regular grid spanning `extent`, south row first.
pub fn create_geo_grid(rows: usize, cols: usize, extent: BoundingBox) -> GeoGrid {
    let dx = extent.width() / (cols.max(2) - 1) as f64;
    let dy = extent.height() / (rows.max(2) - 1) as f64;
    GeoGrid::from_axes(
        &create_axis(extent.min_x, dx, cols),
        &create_axis(extent.min_y, dy, rows),
    )
}

/// Hourly precipitation (mm) with a rain band in the south and a heavier
/// band in the north, dry in between.
///
/// `seed` shifts the bands so consecutive hours differ.
pub fn create_precipitation_grid(rows: usize, cols: usize, seed: u32) -> Grid2D {
    Grid2D::from_fn(rows, cols, |row, col| {
        let phase = (row + col + seed as usize) % 7;
        if row < rows / 3 {
            0.5 + phase as f32 * 0.25
        } else if row >= 2 * rows / 3 {
            2.0 + phase as f32 * 0.5
        } else {
            0.0
        }
    })
}

/// Frozen fraction: liquid (0.0) in the southern half, frozen (1.0) north,
/// with the boundary row exactly at the 0.5 threshold.
pub fn create_frozen_fraction_grid(rows: usize, cols: usize) -> Grid2D {
    let boundary = rows / 2;
    Grid2D::from_fn(rows, cols, |row, _| match row.cmp(&boundary) {
        std::cmp::Ordering::Less => 0.0,
        std::cmp::Ordering::Equal => 0.5,
        std::cmp::Ordering::Greater => 1.0,
    })
}

/// Surface pressure (Pa), terrain height (m) and temperature (K) with a
/// low-pressure centre in the middle of the grid.
pub fn create_surface_state_grids(rows: usize, cols: usize) -> (Grid2D, Grid2D, Grid2D) {
    let cy = rows as f32 / 2.0;
    let cx = cols as f32 / 2.0;
    let psfc = Grid2D::from_fn(rows, cols, |row, col| {
        let d = ((row as f32 - cy).powi(2) + (col as f32 - cx).powi(2)).sqrt();
        98_000.0 + d * 150.0
    });
    let height = Grid2D::from_fn(rows, cols, |_, col| col as f32 * 10.0);
    let temperature = Grid2D::filled(rows, cols, 275.0);
    (psfc, height, temperature)
}

/// U and V wind components (m/s): westerly flow increasing northward and a
/// weak southerly component.
pub fn create_wind_grids(rows: usize, cols: usize) -> (Grid2D, Grid2D) {
    let u = Grid2D::from_fn(rows, cols, |row, _| 5.0 + row as f32);
    let v = Grid2D::filled(rows, cols, 2.0);
    (u, v)
}

/// Gust speeds (m/s), 5 at the south-west corner rising toward north-east.
pub fn create_gust_grid(rows: usize, cols: usize) -> Grid2D {
    Grid2D::from_fn(rows, cols, |row, col| 5.0 + (row + col) as f32 * 0.5)
}

/// Copy of `grid` with NaN written at every `(row, col)` in `holes`.
pub fn create_grid_with_nans(grid: &Grid2D, holes: &[(usize, usize)]) -> Grid2D {
    let cols = grid.cols();
    let mut data = grid.data().to_vec();
    for &(row, col) in holes {
        data[row * cols + col] = f32::NAN;
    }
    Grid2D::new(grid.rows(), cols, data).expect("shape unchanged")
}
