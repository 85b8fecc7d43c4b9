//! Filled (shaded) fields on a curvilinear lon/lat grid.

use tiny_skia::{Paint, PathBuilder};
use tracing::debug;
use wx_common::{ColorScale, GeoGrid, Grid2D};

use crate::canvas::MapCanvas;
use crate::error::RenderResult;

/// Mean of a cell's four corners, or `None` if any corner is NaN.
pub fn cell_value(field: &Grid2D, row: usize, col: usize) -> Option<f32> {
    let corners = [
        field.get(row, col)?,
        field.get(row, col + 1)?,
        field.get(row + 1, col + 1)?,
        field.get(row + 1, col)?,
    ];
    if corners.iter().any(|v| v.is_nan()) {
        return None;
    }
    Some(corners.iter().sum::<f32>() / 4.0)
}

/// Shade every grid cell with the color of its mean value's bucket.
///
/// Cells with a NaN corner and cells whose bucket is transparent are left
/// untouched, so layers can be stacked. Returns the number of cells drawn.
pub fn fill_field(
    canvas: &mut MapCanvas,
    field: &Grid2D,
    geo: &GeoGrid,
    scale: &ColorScale,
) -> RenderResult<usize> {
    field.ensure_same_shape(&geo.lon)?;
    let (rows, cols) = field.shape();
    if rows < 2 || cols < 2 {
        return Ok(0);
    }

    let nodes = canvas.project_nodes(geo);
    let node = |r: usize, c: usize| nodes[r * cols + c];

    // One path per bucket keeps the number of fill calls small.
    let mut builders: Vec<Option<PathBuilder>> =
        (0..scale.bucket_count()).map(|_| None).collect();
    let mut drawn = 0usize;

    for row in 0..rows - 1 {
        for col in 0..cols - 1 {
            let Some(value) = cell_value(field, row, col) else {
                continue;
            };
            let Some(bucket) = scale.bucket(value as f64) else {
                continue;
            };
            if scale.colors()[bucket][3] == 0 {
                continue;
            }

            let pb = builders[bucket].get_or_insert_with(PathBuilder::new);
            let (x0, y0) = node(row, col);
            pb.move_to(x0, y0);
            for (x, y) in [node(row, col + 1), node(row + 1, col + 1), node(row + 1, col)] {
                pb.line_to(x, y);
            }
            pb.close();
            drawn += 1;
        }
    }

    for (bucket, pb) in builders.into_iter().enumerate() {
        let Some(path) = pb.and_then(PathBuilder::finish) else {
            continue;
        };
        let [r, g, b, a] = scale.colors()[bucket];
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = false;
        canvas.fill_map_path(&path, &paint);
    }

    debug!(rows, cols, cells_drawn = drawn, "Filled field");
    Ok(drawn)
}
