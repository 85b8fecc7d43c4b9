//! Output file naming.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::model::ForecastModel;

/// `{out}/precip-type/{YYYYMMDDHH}-mix.png`
pub fn precip_type_path(out: &Path, valid: NaiveDateTime) -> PathBuf {
    out.join("precip-type")
        .join(format!("{}-mix.png", valid.format("%Y%m%d%H")))
}

/// `{start:%Y%m%d}-{end:%Y%m%d}-snowfall`
pub fn default_snowfall_name(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!("{}-{}-snowfall", start.format("%Y%m%d"), end.format("%Y%m%d"))
}

/// `{out}/snowfall/{name}.png`
pub fn snowfall_path(out: &Path, name: &str) -> PathBuf {
    let name = name.strip_suffix(".png").unwrap_or(name);
    out.join("snowfall").join(format!("{}.png", name))
}

/// `{out}/{model}-gusts/{YYYYMMDD-HH}.png`
pub fn gust_path(out: &Path, model: ForecastModel, valid: NaiveDateTime) -> PathBuf {
    out.join(format!("{}-gusts", model.id()))
        .join(format!("{}.png", valid.format("%Y%m%d-%H")))
}
