//! HTTP access to the OPeNDAP servers and the ACIS API.
//!
//! One request per call, no retry: any failure aborts the run.

use std::time::Duration;

use opendap_parser::{ascii_url, dds_url, parse_ascii, parse_dds, DapDataset, DapError, Dds, Projection};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors talking to a remote data source.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Unreadable response from {url}: {source}")]
    Dap {
        url: String,
        #[source]
        source: DapError,
    },

    #[error("Unreadable JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed but does not hold what the product needs
    #[error("Unexpected data: {0}")]
    Data(String),
}

impl From<DapError> for FetchError {
    fn from(e: DapError) -> Self {
        FetchError::Data(e.to_string())
    }
}

impl From<wx_common::WxError> for FetchError {
    fn from(e: wx_common::WxError) -> Self {
        FetchError::Data(e.to_string())
    }
}

impl From<grid_processor::GridProcessorError> for FetchError {
    fn from(e: grid_processor::GridProcessorError) -> Self {
        FetchError::Data(e.to_string())
    }
}

/// Plain-text HTTP GETs with a shared client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .map_err(|source| FetchError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }

    /// GET `url` and return the body; a non-success status is an error.
    #[instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let http = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(http)?;
        debug!(bytes = body.len(), "Fetched response");
        Ok(body)
    }
}

/// DAP2 requests against one server.
#[derive(Debug, Clone)]
pub struct DapClient {
    http: HttpFetcher,
}

impl DapClient {
    pub fn new(http: HttpFetcher) -> Self {
        Self { http }
    }

    /// Fetch and parse `{dataset}.dds`.
    #[instrument(skip(self))]
    pub async fn dds(&self, dataset: &str) -> Result<Dds, FetchError> {
        let url = dds_url(dataset);
        let text = self.http.get_text(&url).await?;
        parse_dds(&text).map_err(|source| FetchError::Dap { url, source })
    }

    /// Fetch and parse `{dataset}.ascii?{projections}`.
    #[instrument(skip(self, projections), fields(variables = projections.len()))]
    pub async fn ascii(&self, dataset: &str, projections: &[Projection]) -> Result<DapDataset, FetchError> {
        let url = ascii_url(dataset, projections);
        let text = self.http.get_text(&url).await?;
        parse_ascii(&text).map_err(|source| FetchError::Dap { url, source })
    }
}
