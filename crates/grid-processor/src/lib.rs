//! Grid processing for the map pipelines.
//!
//! Everything here is pure arithmetic on [`Grid2D`] values; fetching and
//! rendering live elsewhere.
//!
//! - [`derive`]: precipitation phase split, mean-sea-level pressure, unit
//!   conversions and snowfall from liquid equivalent
//! - [`accumulate`]: the running total across an hourly sequence
//! - [`locate`]: nearest-index lookup of a lon/lat box in coordinate axes
//! - [`crop`]: index windows with end-relative bounds
//!
//! [`Grid2D`]: wx_common::Grid2D

pub mod accumulate;
pub mod crop;
pub mod derive;
pub mod error;
pub mod locate;

// Re-export commonly used types at crate root
pub use accumulate::{accumulate, Accumulator};
pub use crop::{AxisWindow, IndexWindow};
pub use derive::{
    gust_mph, mean_sea_level_pressure, snowfall_inches, split_phase, wind_knots, PhaseSplit,
};
pub use error::{GridProcessorError, Result};
pub use locate::{align_longitude, locate_box, nearest_index, BoxIndices};
