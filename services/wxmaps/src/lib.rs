//! Weather map generator.
//!
//! Three products are rendered to PNG:
//! - hourly precipitation type with sea-level pressure and wind barbs
//!   (CONUS404 reanalysis)
//! - storm-total snowfall with COOP station totals (CONUS404 and ACIS)
//! - surface wind gusts for every step of a NAM or HRRR cycle (NOMADS)

pub mod acis;
pub mod config;
pub mod conus404;
pub mod fetch;
pub mod model;
pub mod nomads;
pub mod output;
pub mod pipelines;
pub mod sources;
pub mod styles;

pub use config::WxmapsConfig;
pub use fetch::FetchError;
pub use model::{ForecastModel, GustRequest, RequestError};
pub use pipelines::RunContext;
