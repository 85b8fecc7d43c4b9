//! Data source abstractions used by the pipelines.
//!
//! Each remote archive is reached through a trait so the pipelines can run
//! against in-memory sources in tests.

use std::ops::Range;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use grid_processor::IndexWindow;
use station_reports::MultiStnResponse;
use wx_common::{BoundingBox, GeoGrid, Grid2D};

use crate::fetch::FetchError;
use crate::model::GustRequest;

/// Fields for one hour of the precipitation-type map, already cropped.
#[derive(Debug, Clone)]
pub struct PrecipHour {
    /// Valid time reported by the file, when present
    pub valid_time: Option<NaiveDateTime>,
    /// Precipitation rate (mm/h)
    pub precip: Grid2D,
    /// Frozen fraction of the precipitation (0..1)
    pub frozen: Grid2D,
    /// Surface pressure (Pa)
    pub pressure: Grid2D,
    /// Terrain height (m)
    pub height: Grid2D,
    /// Near-surface temperature (K)
    pub temperature: Grid2D,
    /// Wind components (m/s)
    pub u: Grid2D,
    pub v: Grid2D,
    pub geo: GeoGrid,
}

/// One hour of snow accumulation, already cropped.
#[derive(Debug, Clone)]
pub struct SnowHour {
    /// Liquid-equivalent snow accumulation over the hour (mm)
    pub snow: Grid2D,
    pub geo: GeoGrid,
}

/// Coordinate axes of a forecast cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct GustAxes {
    /// Valid time of each forecast step
    pub times: Vec<NaiveDateTime>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

/// Gust for one forecast step with its coordinates.
#[derive(Debug, Clone)]
pub struct GustStep {
    /// Surface gust (m/s)
    pub gust: Grid2D,
    pub geo: GeoGrid,
}

/// Hourly reanalysis files (CONUS404).
#[async_trait]
pub trait ReanalysisSource: Send + Sync {
    /// Precipitation-type inputs for `ts`, cropped to `window`.
    async fn precip_hour(&self, ts: NaiveDateTime, window: &IndexWindow) -> Result<PrecipHour, FetchError>;

    /// Snow accumulation for `ts`, cropped to `window`.
    async fn snow_hour(&self, ts: NaiveDateTime, window: &IndexWindow) -> Result<SnowHour, FetchError>;
}

/// Forecast cycles (NOMADS NAM/HRRR).
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn axes(&self, request: &GustRequest) -> Result<GustAxes, FetchError>;

    /// Gust at forecast step `step`, rows and columns as end-exclusive
    /// index ranges into the axes.
    async fn gust(
        &self,
        request: &GustRequest,
        step: usize,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<GustStep, FetchError>;
}

/// Daily station observations (ACIS).
#[async_trait]
pub trait StationSource: Send + Sync {
    /// Daily snowfall for every station in `bbox`, `first` to `last` inclusive.
    async fn snowfall_reports(
        &self,
        bbox: &BoundingBox,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<MultiStnResponse, FetchError>;
}
