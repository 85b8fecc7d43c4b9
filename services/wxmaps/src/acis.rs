//! COOP station snowfall from the ACIS `MultiStnData` web service.

use async_trait::async_trait;
use chrono::NaiveDate;
use station_reports::MultiStnResponse;
use tracing::{info, instrument};
use wx_common::BoundingBox;

use crate::fetch::{FetchError, HttpFetcher};
use crate::sources::StationSource;

/// `MultiStnData` query for daily snowfall in `bbox`.
pub fn multi_station_url(base: &str, bbox: &BoundingBox, first: NaiveDate, last: NaiveDate) -> String {
    format!(
        "{}/MultiStnData?bbox={}&sdate={}&edate={}&elems=snow&output=json",
        base.trim_end_matches('/'),
        bbox.to_acis_param(),
        first.format("%Y-%m-%d"),
        last.format("%Y-%m-%d")
    )
}

pub struct AcisClient {
    http: HttpFetcher,
    base: String,
}

impl AcisClient {
    pub fn new(http: HttpFetcher, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }
}

#[async_trait]
impl StationSource for AcisClient {
    #[instrument(skip(self, bbox), fields(bbox = %bbox.to_acis_param()))]
    async fn snowfall_reports(
        &self,
        bbox: &BoundingBox,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<MultiStnResponse, FetchError> {
        let url = multi_station_url(&self.base, bbox, first, last);
        let body = self.http.get_text(&url).await?;
        let response =
            MultiStnResponse::from_json(&body).map_err(|source| FetchError::Json { url, source })?;

        info!(stations = response.data.len(), "Fetched station reports");
        Ok(response)
    }
}
