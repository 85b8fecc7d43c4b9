//! Storm-total snowfall from CONUS404 with COOP station reports on top.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use grid_processor::{snowfall_inches, Accumulator, IndexWindow};
use renderer::colorbar::format_value;
use renderer::fill::fill_field;
use renderer::labels::{draw_point_labels, PointLabel};
use renderer::{draw_colorbar, Align, MapCanvas, TextStyle, VAlign};
use station_reports::{reconcile, StationTotal};
use tracing::{debug, info, warn};
use wx_common::time::format_date_span;
use wx_common::{BoundingBox, GeoGrid, Grid2D, HourlyRange};

use super::{log_progress, note_style, title_style, RunContext};
use crate::output::{default_snowfall_name, snowfall_path};
use crate::sources::{ReanalysisSource, StationSource};
use crate::styles::snowfall_colorbar;

const SOURCE_NOTE: &str = "Source: CONUS404, COOP";
pub const DISCLAIMER: &str = "This is an automated map, and shaded areas are reanalysis estimates. \
Likewise, COOP reports have not been verified.";

/// Station labels are kept this many degrees inside the map edge.
const LABEL_INSET: f64 = 0.1;

/// Parameters of one snowfall run.
#[derive(Debug, Clone)]
pub struct SnowfallRun {
    pub range: HourlyRange,
    pub extent: BoundingBox,
    pub window: IndexWindow,
    /// Snow-to-liquid ratio
    pub slr: f32,
    /// Output file stem; derived from the range when `None`
    pub name: Option<String>,
}

impl SnowfallRun {
    pub fn title(&self) -> String {
        format!(
            "Total Snowfall ({}:1 SLR) - {}",
            format_value(self.slr as f64),
            format_date_span(self.range.first_day(), self.range.last_day())
        )
    }

    pub fn file_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| default_snowfall_name(self.range.start(), self.range.end()))
    }
}

fn station_label_style() -> TextStyle {
    TextStyle::sized(8.0)
        .bold()
        .color([255, 255, 255, 255])
        .halo([0, 0, 0, 255], 2.5)
        .align(Align::Center)
        .valign(VAlign::Middle)
}

/// Draw the accumulated total with its colorbar and station labels.
pub fn render_total(
    ctx: &RunContext,
    run: &SnowfallRun,
    total: &Grid2D,
    geo: &GeoGrid,
    stations: &[StationTotal],
) -> Result<MapCanvas> {
    let scale = &ctx.styles.snowfall;
    let mut canvas = ctx.canvas(run.extent, true)?;

    let cells = fill_field(&mut canvas, total, geo, scale)?;
    ctx.finish_map(&mut canvas);

    let labels: Vec<PointLabel> = stations
        .iter()
        .map(|s| PointLabel::new(s.label.clone(), s.lon, s.lat))
        .collect();
    let drawn = draw_point_labels(&mut canvas, &labels, LABEL_INSET, &station_label_style());

    draw_colorbar(&mut canvas, scale, &snowfall_colorbar(scale))?;

    canvas.header_text(0, &run.title(), Align::Left, title_style().bold());
    canvas.header_text(0, SOURCE_NOTE, Align::Right, title_style().bold());
    canvas.footer_text(0, DISCLAIMER, Align::Center, note_style());

    debug!(cells, stations = stations.len(), labels = drawn, "Rendered snowfall map");
    Ok(canvas)
}

/// Fetch station totals, accumulate every hour, then write one map.
pub async fn run<R, S>(ctx: &RunContext, reanalysis: &R, stations: &S, run: &SnowfallRun) -> Result<PathBuf>
where
    R: ReanalysisSource + ?Sized,
    S: StationSource + ?Sized,
{
    let total_hours = run.range.len();
    if total_hours == 0 {
        bail!(
            "Time range is empty: end {} is before start {}",
            run.range.end(),
            run.range.start()
        );
    }
    info!(
        start = %run.range.start(),
        end = %run.range.end(),
        hours = total_hours,
        slr = run.slr,
        "Starting snowfall run"
    );

    let (first_day, last_day) = (run.range.first_day(), run.range.last_day());
    let response = stations
        .snowfall_reports(&run.extent, first_day, last_day)
        .await
        .with_context(|| format!("Failed to fetch COOP reports for {} to {}", first_day, last_day))?;

    let reports = reconcile(&response.data);
    for diagnostic in &reports.diagnostics {
        warn!(station = %diagnostic.station, error = %diagnostic.error, "Skipped station report");
    }
    info!(
        included = reports.totals.len(),
        excluded = reports.excluded,
        errors = reports.diagnostics.len(),
        "Reconciled station reports"
    );

    let mut accumulator = Accumulator::new();
    let mut geo = None;
    for (i, ts) in run.range.hours().enumerate() {
        let hour = reanalysis
            .snow_hour(ts, &run.window)
            .await
            .with_context(|| format!("Failed to fetch CONUS404 hour {}", ts))?;

        let snowfall = snowfall_inches(&hour.snow, run.slr)?;
        accumulator
            .push(snowfall)
            .with_context(|| format!("Snow grid for {} does not match the running total", ts))?;
        geo.get_or_insert(hour.geo);

        log_progress(i + 1, total_hours);
    }

    let (Some(total), Some(geo)) = (accumulator.finish(), geo) else {
        bail!("No hours were accumulated");
    };
    if let Some(max) = total.max_value() {
        info!(max_inches = max, "Accumulated snowfall");
    }

    let canvas = render_total(ctx, run, &total, &geo, &reports.totals)?;
    let path = snowfall_path(&ctx.output_dir, &run.file_name());
    canvas
        .save_png(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote map");

    Ok(path)
}
