//! Cooperative-observer station reports.
//!
//! [`acis`] holds the wire types of the ACIS `MultiStnData` endpoint;
//! [`reconcile`] turns each station's daily reports into one display label,
//! voiding stations with a missing day and dropping zero totals.

pub mod acis;
pub mod error;
pub mod reconcile;

pub use acis::{MultiStnResponse, StationMeta, StationRecord};
pub use error::ReportError;
pub use reconcile::{
    format_total, reconcile, reconcile_station, DailyReport, Diagnostic, Exclusion, Outcome,
    Reconciliation, StationTotal, TRACE_AMOUNT,
};
