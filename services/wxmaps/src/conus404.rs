//! CONUS404 hourly files on the NCAR RDA THREDDS server.
//!
//! Files are organized by water year:
//! `{base}/wy{WY}/{YYYY}{MM}/wrf2d_d01_{YYYY}-{MM}-{DD}_{HH}:00:00.nc`.
//! Every file shares the d01 grid, so the descriptor of the first file
//! requested is reused to resolve crop windows for the rest of the run.

use std::ops::Range;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use grid_processor::IndexWindow;
use opendap_parser::{DapDataset, Dds, Hyperslab, Projection};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};
use wx_common::time::parse_timestamp;
use wx_common::{water_year, GeoGrid};

use crate::fetch::{DapClient, FetchError};
use crate::sources::{PrecipHour, ReanalysisSource, SnowHour};

const LAT: &str = "XLAT";
const LON: &str = "XLONG";
const TIMES: &str = "Times";

const PRECIP_VARIABLES: &[&str] = &["PREC_ACC_NC", "SR", "PSFC", "Z", "TK", "U", "V"];
const SNOW_VARIABLES: &[&str] = &["SNOW_ACC_NC"];

/// Dataset URL for the hour `ts`.
pub fn dataset_url(base: &str, ts: NaiveDateTime) -> String {
    format!(
        "{}/wy{}/{}/wrf2d_d01_{}.nc",
        base.trim_end_matches('/'),
        water_year(&ts),
        ts.format("%Y%m"),
        ts.format("%Y-%m-%d_%H:00:00")
    )
}

/// The file's own valid time from its `Times` string, if present and readable.
pub fn parse_valid_time(data: &DapDataset) -> Option<NaiveDateTime> {
    let times = data.get(TIMES)?.strings().ok()?;
    parse_timestamp(times.first()?).ok()
}

/// `(rows, cols)` of a variable's last two dimensions.
fn spatial_shape(dds: &Dds, name: &str) -> Result<(usize, usize), FetchError> {
    match dds.shape(name)?[..] {
        [.., rows, cols] => Ok((rows, cols)),
        _ => Err(FetchError::Data(format!("{} is not a 2-D field", name))),
    }
}

/// Hyperslab request for `name`: index 0 on every leading (time)
/// dimension, then the row and column ranges.
pub fn field_projection(
    dds: &Dds,
    name: &str,
    rows: &Range<usize>,
    cols: &Range<usize>,
) -> Result<Projection, FetchError> {
    let rank = dds.shape(name)?.len();
    if rank < 2 {
        return Err(FetchError::Data(format!("{} is not a 2-D field", name)));
    }

    let mut projection = Projection::new(name);
    for _ in 2..rank {
        projection = projection.slab(Hyperslab::index(0));
    }
    Ok(projection
        .slab(Hyperslab::from_range(rows.clone())?)
        .slab(Hyperslab::from_range(cols.clone())?))
}

pub struct Conus404Client {
    dap: DapClient,
    base: String,
    descriptor: OnceCell<Dds>,
}

impl Conus404Client {
    pub fn new(dap: DapClient, base: impl Into<String>) -> Self {
        Self {
            dap,
            base: base.into(),
            descriptor: OnceCell::new(),
        }
    }

    async fn descriptor(&self, dataset: &str) -> Result<&Dds, FetchError> {
        self.descriptor
            .get_or_try_init(|| async {
                let dds = self.dap.dds(dataset).await?;
                debug!(variables = dds.variables.len(), "Cached CONUS404 descriptor");
                Ok::<_, FetchError>(dds)
            })
            .await
    }

    /// Request `variables` plus the coordinates, cropped to `window`.
    async fn fetch(
        &self,
        ts: NaiveDateTime,
        window: &IndexWindow,
        variables: &[&str],
    ) -> Result<(DapDataset, GeoGrid), FetchError> {
        let dataset = dataset_url(&self.base, ts);
        let dds = self.descriptor(&dataset).await?;

        let shape = spatial_shape(dds, LAT)?;
        let (rows, cols) = window.resolve(shape)?;
        debug!(%window, ?rows, ?cols, "Resolved crop window");

        let mut projections = Vec::with_capacity(variables.len() + 3);
        for name in variables.iter().copied().chain([LAT, LON]) {
            projections.push(field_projection(dds, name, &rows, &cols)?);
        }
        if dds.get(TIMES).is_some() {
            projections.push(Projection::new(TIMES));
        }

        let data = self.dap.ascii(&dataset, &projections).await?;
        let geo = GeoGrid::new(data.grid(LON)?, data.grid(LAT)?)?;
        Ok((data, geo))
    }
}

#[async_trait]
impl ReanalysisSource for Conus404Client {
    #[instrument(skip(self, window), fields(source = "conus404"))]
    async fn precip_hour(&self, ts: NaiveDateTime, window: &IndexWindow) -> Result<PrecipHour, FetchError> {
        let (data, geo) = self.fetch(ts, window, PRECIP_VARIABLES).await?;
        Ok(PrecipHour {
            valid_time: parse_valid_time(&data),
            precip: data.grid("PREC_ACC_NC")?,
            frozen: data.grid("SR")?,
            pressure: data.grid("PSFC")?,
            height: data.grid("Z")?,
            temperature: data.grid("TK")?,
            u: data.grid("U")?,
            v: data.grid("V")?,
            geo,
        })
    }

    #[instrument(skip(self, window), fields(source = "conus404"))]
    async fn snow_hour(&self, ts: NaiveDateTime, window: &IndexWindow) -> Result<SnowHour, FetchError> {
        let (data, geo) = self.fetch(ts, window, SNOW_VARIABLES).await?;
        Ok(SnowHour {
            snow: data.grid("SNOW_ACC_NC")?,
            geo,
        })
    }
}
