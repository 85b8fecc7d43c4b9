//! Common types and utilities shared by the wxmaps crates.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod style;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{WxError, WxResult};
pub use grid::{GeoGrid, Grid2D};
pub use style::{Color, ColorScale, Rgba, StyleConfig, StyleError};
pub use time::{water_year, HourlyRange, TimeParseError};
