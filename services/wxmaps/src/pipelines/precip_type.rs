//! Hourly precipitation-type maps from CONUS404.
//!
//! Rain and snow rates are shaded with separate scales, sea-level pressure
//! is contoured in dashed black lines and the 10 m wind is drawn as barbs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use grid_processor::{mean_sea_level_pressure, split_phase, wind_knots, IndexWindow};
use renderer::barbs::{draw_barbs, BarbConfig};
use renderer::contour::{draw_contours, generate_contour_levels, ContourConfig};
use renderer::fill::fill_field;
use renderer::{Align, MapCanvas};
use tracing::{debug, info};
use wx_common::{BoundingBox, HourlyRange};

use super::{log_progress, note_style, title_style, RunContext};
use crate::output::precip_type_path;
use crate::sources::{PrecipHour, ReanalysisSource};

pub const TITLE: &str = "1-Hour Precip Rate (mm/hr), MSLP (hPa), & Sfc Wind (kt)";
const SOURCE_NOTE: &str = "Source: CONUS404";

/// Parameters of one precip-type run.
#[derive(Debug, Clone)]
pub struct PrecipTypeRun {
    pub range: HourlyRange,
    pub extent: BoundingBox,
    pub window: IndexWindow,
}

/// Isobars every 5 hPa from 960 to 1030, dashed and labelled.
pub fn mslp_contours() -> ContourConfig {
    ContourConfig {
        levels: generate_contour_levels(960.0, 1030.0, 5.0),
        line_width: 0.8,
        line_color: [0, 0, 0, 255],
        dash: Some(vec![5.0, 3.0]),
        smoothing_passes: 1,
        labels_enabled: true,
        label_size: 7.0,
        label_spacing: 250.0,
    }
}

/// Header time, e.g. `Mar. 13, 1993 06z`.
pub fn format_valid_time(valid: NaiveDateTime) -> String {
    valid.format("%b. %d, %Y %Hz").to_string()
}

/// Draw one hour. `valid` labels the map.
pub fn render_hour(ctx: &RunContext, hour: &PrecipHour, valid: NaiveDateTime, extent: BoundingBox) -> Result<MapCanvas> {
    let phase = split_phase(&hour.precip, &hour.frozen).context("Failed to split precipitation phase")?;
    let mslp = mean_sea_level_pressure(&hour.pressure, &hour.height, &hour.temperature)
        .context("Failed to reduce pressure to sea level")?;
    let (u_kt, v_kt) = wind_knots(&hour.u, &hour.v).context("Failed to convert wind")?;

    let mut canvas = ctx.canvas(extent, false)?;

    let rain_cells = fill_field(&mut canvas, &phase.rain, &hour.geo, &ctx.styles.rain)?;
    let snow_cells = fill_field(&mut canvas, &phase.snow, &hour.geo, &ctx.styles.snow)?;
    let isobars = draw_contours(&mut canvas, &mslp, &hour.geo, &mslp_contours())?;
    let barbs = draw_barbs(&mut canvas, &u_kt, &v_kt, &hour.geo, &BarbConfig::default())?;
    ctx.finish_map(&mut canvas);

    canvas.header_text(0, TITLE, Align::Left, title_style().bold());
    canvas.header_text(0, &format_valid_time(valid), Align::Right, title_style());
    canvas.footer_text(0, &ctx.credit, Align::Left, note_style());
    canvas.footer_text(0, SOURCE_NOTE, Align::Right, note_style());

    debug!(rain_cells, snow_cells, isobars, barbs, "Rendered precip-type layers");
    Ok(canvas)
}

/// Fetch, render and write every hour of the run.
pub async fn run<S>(ctx: &RunContext, source: &S, run: &PrecipTypeRun) -> Result<Vec<PathBuf>>
where
    S: ReanalysisSource + ?Sized,
{
    let total = run.range.len();
    info!(
        start = %run.range.start(),
        end = %run.range.end(),
        hours = total,
        window = %run.window,
        "Starting precip-type run"
    );

    let mut written = Vec::with_capacity(total);
    for (i, ts) in run.range.hours().enumerate() {
        let hour = source
            .precip_hour(ts, &run.window)
            .await
            .with_context(|| format!("Failed to fetch CONUS404 hour {}", ts))?;

        let valid = hour.valid_time.unwrap_or(ts);
        let canvas = render_hour(ctx, &hour, valid, run.extent)
            .with_context(|| format!("Failed to render {}", ts))?;

        let path = precip_type_path(&ctx.output_dir, valid);
        canvas
            .save_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote map");

        written.push(path);
        log_progress(i + 1, total);
    }

    Ok(written)
}
