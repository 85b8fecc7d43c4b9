//! NAM and HRRR cycles on the NOMADS GrADS Data Server.

use std::ops::Range;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use opendap_parser::{DapDataset, Hyperslab, Projection};
use tracing::{debug, instrument};
use wx_common::GeoGrid;

use crate::fetch::{DapClient, FetchError};
use crate::model::GustRequest;
use crate::sources::{ForecastSource, GustAxes, GustStep};

const GUST: &str = "gustsfc";

/// Valid times from a GrADS time axis (fractional days).
///
/// Only offsets from the first step are used, rounded to whole hours, so the
/// server's calendar epoch never matters.
pub fn valid_times(init: NaiveDateTime, axis: &[f64]) -> Vec<NaiveDateTime> {
    let Some(&t0) = axis.first() else {
        return Vec::new();
    };
    axis.iter()
        .map(|&t| init + Duration::hours(((t - t0) * 24.0).round() as i64))
        .collect()
}

/// `gustsfc[step][rows][cols]`
pub fn gust_projection(step: usize, rows: Range<usize>, cols: Range<usize>) -> Result<Projection, FetchError> {
    Ok(Projection::new(GUST)
        .slab(Hyperslab::index(step))
        .slab(Hyperslab::from_range(rows)?)
        .slab(Hyperslab::from_range(cols)?))
}

/// Gust grid and its coordinates from a hyperslab response. The GrADS
/// server appends the grid's map vectors, which cover exactly the slab.
pub fn gust_step(data: &DapDataset) -> Result<GustStep, FetchError> {
    let gust = data.grid(GUST)?;
    let geo = GeoGrid::from_axes(&data.axis("lon")?, &data.axis("lat")?);
    gust.ensure_same_shape(&geo.lon)?;
    Ok(GustStep { gust, geo })
}

pub struct NomadsClient {
    dap: DapClient,
    base: String,
}

impl NomadsClient {
    pub fn new(dap: DapClient, base: impl Into<String>) -> Self {
        Self {
            dap,
            base: base.into(),
        }
    }
}

#[async_trait]
impl ForecastSource for NomadsClient {
    #[instrument(skip(self), fields(model = %request.model, cycle = request.hour()))]
    async fn axes(&self, request: &GustRequest) -> Result<GustAxes, FetchError> {
        let dataset = request.dataset_url(&self.base);
        let projections = [Projection::new("time"), Projection::new("lat"), Projection::new("lon")];
        let data = self.dap.ascii(&dataset, &projections).await?;

        let axes = GustAxes {
            times: valid_times(request.init, &data.axis("time")?),
            lat: data.axis("lat")?,
            lon: data.axis("lon")?,
        };
        debug!(
            steps = axes.times.len(),
            lat = axes.lat.len(),
            lon = axes.lon.len(),
            "Read forecast axes"
        );
        Ok(axes)
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn gust(
        &self,
        request: &GustRequest,
        step: usize,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<GustStep, FetchError> {
        let dataset = request.dataset_url(&self.base);
        let projection = gust_projection(step, rows, cols)?;
        let data = self.dap.ascii(&dataset, &[projection]).await?;
        gust_step(&data)
    }
}
