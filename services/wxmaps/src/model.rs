//! Forecast models served by NOMADS and the validated gust run request.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use clap::ValueEnum;
use thiserror::Error;

/// Errors in the run parameters, caught before any network access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid cycle hour '{0}' (expected two digits, e.g. 06)")]
    InvalidHour(String),

    #[error("{model} has no {hour:02}z cycle (valid: {valid})")]
    OffCycle {
        model: ForecastModel,
        hour: u32,
        valid: String,
    },

    #[error("Invalid date '{0}' (expected YYYYMMDD)")]
    InvalidDate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ForecastModel {
    /// NAM CONUS nest, 3 km
    Nam,
    /// High-Resolution Rapid Refresh
    Hrrr,
}

const NAM_CYCLES: &[u32] = &[0, 6, 12, 18];
const HRRR_CYCLES: &[u32] = &[
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
];

impl ForecastModel {
    /// Map title prefix.
    pub fn title(&self) -> &'static str {
        match self {
            ForecastModel::Nam => "NAM 3km",
            ForecastModel::Hrrr => "HRRR",
        }
    }

    /// Lowercase id used in output paths.
    pub fn id(&self) -> &'static str {
        match self {
            ForecastModel::Nam => "nam",
            ForecastModel::Hrrr => "hrrr",
        }
    }

    pub fn cycles(&self) -> &'static [u32] {
        match self {
            ForecastModel::Nam => NAM_CYCLES,
            ForecastModel::Hrrr => HRRR_CYCLES,
        }
    }

    /// GrADS Data Server dataset for one cycle.
    pub fn dataset_url(&self, base: &str, date: NaiveDate, hour: u32) -> String {
        let base = base.trim_end_matches('/');
        let ymd = date.format("%Y%m%d");
        match self {
            ForecastModel::Nam => format!("{}/nam/nam{}/nam_conusnest_{:02}z", base, ymd, hour),
            ForecastModel::Hrrr => format!("{}/hrrr/hrrr{}/hrrr_sfc.t{:02}z", base, ymd, hour),
        }
    }
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastModel::Nam => write!(f, "NAM"),
            ForecastModel::Hrrr => write!(f, "HRRR"),
        }
    }
}

/// One forecast cycle to map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GustRequest {
    pub model: ForecastModel,
    /// Cycle initialization time
    pub init: NaiveDateTime,
}

impl GustRequest {
    /// Validate a cycle hour like `06` and a date like `20240107`.
    pub fn new(model: ForecastModel, hour: &str, date: &str) -> Result<Self, RequestError> {
        let hour_str = hour.trim();
        if hour_str.is_empty() || hour_str.len() > 2 || !hour_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RequestError::InvalidHour(hour.to_string()));
        }
        let hour: u32 = hour_str
            .parse()
            .map_err(|_| RequestError::InvalidHour(hour.to_string()))?;

        if !model.cycles().contains(&hour) {
            let valid = model
                .cycles()
                .iter()
                .map(|h| format!("{:02}", h))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(RequestError::OffCycle { model, hour, valid });
        }

        let date_str = date.trim();
        if date_str.len() != 8 {
            return Err(RequestError::InvalidDate(date.to_string()));
        }
        let init = NaiveDate::parse_from_str(date_str, "%Y%m%d")
            .map_err(|_| RequestError::InvalidDate(date.to_string()))?
            .and_hms_opt(hour, 0, 0)
            .ok_or_else(|| RequestError::InvalidHour(hour.to_string()))?;

        Ok(Self { model, init })
    }

    pub fn hour(&self) -> u32 {
        self.init.hour()
    }

    pub fn dataset_url(&self, base: &str) -> String {
        self.model.dataset_url(base, self.init.date(), self.hour())
    }

    /// Footer line, e.g. `Init: 06z Sun, Jan 07, 2024`.
    pub fn init_label(&self) -> String {
        format!("Init: {:02}z {}", self.hour(), self.init.format("%a, %b %d, %Y"))
    }
}
