//! Surface wind gust maps for every forecast step of a NAM or HRRR cycle.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use grid_processor::{gust_mph, locate_box};
use renderer::fill::fill_field;
use renderer::{draw_colorbar, Align, Colorbar, MapCanvas};
use tracing::{debug, info};
use wx_common::{BoundingBox, GeoGrid, Grid2D};

use super::{log_progress, note_style, title_style, RunContext};
use crate::model::GustRequest;
use crate::output::gust_path;
use crate::sources::ForecastSource;
use crate::styles::GUST_TICK_EVERY;

/// Parameters of one gust run.
#[derive(Debug, Clone)]
pub struct GustRun {
    pub request: GustRequest,
    /// Map extent
    pub region: BoundingBox,
    /// Degrees added around the region before cropping the grid
    pub padding: f64,
}

/// `Max: 57 mph`, or `None` when every cell is missing.
pub fn max_label(gust_mph: &Grid2D) -> Option<String> {
    gust_mph
        .max_value()
        .map(|max| format!("Max: {} mph", max.floor() as i64))
}

pub fn valid_label(valid: NaiveDateTime) -> String {
    format!("Valid: {}", valid.format("%Hz %a, %b %d, %Y"))
}

/// Draw one forecast step; `gust` is in mph.
pub fn render_step(
    ctx: &RunContext,
    run: &GustRun,
    gust: &Grid2D,
    geo: &GeoGrid,
    valid: NaiveDateTime,
) -> Result<MapCanvas> {
    let scale = &ctx.styles.gust;
    let mut canvas = ctx.canvas(run.region, true)?;

    let cells = fill_field(&mut canvas, gust, geo, scale)?;
    ctx.finish_map(&mut canvas);
    draw_colorbar(&mut canvas, scale, &Colorbar::from_breakpoints(scale, GUST_TICK_EVERY))?;

    let title = format!("{} Surface Wind Gust (mph)", run.request.model.title());
    canvas.header_text(0, &title, Align::Left, title_style());
    canvas.header_text(0, &valid_label(valid), Align::Right, title_style());
    canvas.footer_text(0, &run.request.init_label(), Align::Left, note_style());
    if let Some(max) = max_label(gust) {
        canvas.footer_text(0, &max, Align::Right, note_style());
    }

    debug!(cells, "Rendered gust map");
    Ok(canvas)
}

/// Locate the region once, then fetch, render and write every step.
pub async fn run<F>(ctx: &RunContext, source: &F, run: &GustRun) -> Result<Vec<PathBuf>>
where
    F: ForecastSource + ?Sized,
{
    let request = &run.request;
    let axes = source
        .axes(request)
        .await
        .with_context(|| format!("Failed to read {} {:02}z axes", request.model, request.hour()))?;

    let bbox = run.region.padded(run.padding);
    let indices = locate_box(&axes.lon, &axes.lat, &bbox).context("Failed to locate region in grid")?;
    if indices.is_empty() {
        bail!(
            "Region {} does not cover any {} grid cells",
            bbox.to_acis_param(),
            request.model
        );
    }
    let (rows, cols) = (indices.row_range(), indices.col_range());

    let total = axes.times.len();
    info!(
        model = %request.model,
        init = %request.init,
        steps = total,
        ?rows,
        ?cols,
        "Starting gust run"
    );

    let mut written = Vec::with_capacity(total);
    for (step, &valid) in axes.times.iter().enumerate() {
        let data = source
            .gust(request, step, rows.clone(), cols.clone())
            .await
            .with_context(|| format!("Failed to fetch gust for step {} ({})", step, valid))?;

        let gust = gust_mph(&data.gust);
        let canvas = render_step(ctx, run, &gust, &data.geo, valid)
            .with_context(|| format!("Failed to render step {}", step))?;

        let path = gust_path(&ctx.output_dir, request.model, valid);
        canvas
            .save_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote map");

        written.push(path);
        log_progress(step + 1, total);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_utils::{create_constant_grid, create_grid_with_nans};

    #[test]
    fn test_max_label_floors() {
        let grid = create_grid_with_nans(&create_constant_grid(2, 2, 57.9), &[(0, 0)]);
        assert_eq!(max_label(&grid).as_deref(), Some("Max: 57 mph"));
    }

    #[test]
    fn test_max_label_all_missing() {
        let grid = create_constant_grid(2, 2, f32::NAN);
        assert_eq!(max_label(&grid), None);
    }

    #[test]
    fn test_valid_label() {
        let valid = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap().and_hms_opt(21, 0, 0).unwrap();
        assert_eq!(valid_label(valid), "Valid: 21z Tue, Jan 09, 2024");
    }
}
