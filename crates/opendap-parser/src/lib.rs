//! OpenDAP (DAP2) text responses.
//!
//! Remote gridded archives (THREDDS for CONUS404, the GrADS Data Server for
//! NOMADS) are read through three DAP2 requests:
//!
//! - `{dataset}.dds`: the dataset descriptor, parsed by [`dds::parse_dds`]
//!   to learn variable shapes
//! - `{dataset}.ascii?{constraint}`: hyperslabs as text, parsed by
//!   [`ascii::parse_ascii`]
//! - the constraint expression itself, built with [`constraint`]
//!
//! Only the plain-text forms are supported; no binary XDR decoding.

pub mod ascii;
pub mod constraint;
pub mod dds;
pub mod error;

pub use ascii::{parse_ascii, DapArray, DapData, DapDataset};
pub use constraint::{ascii_url, dds_url, Hyperslab, Projection};
pub use dds::{parse_dds, Dds, DdsVariable, Dimension};
pub use error::{DapError, DapResult};
