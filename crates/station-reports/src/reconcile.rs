//! Reconciliation of daily station reports into one total per station.

use std::str::FromStr;

use tracing::{debug, warn};

use crate::acis::StationRecord;
use crate::error::ReportError;

/// Amount a trace report contributes to a station's sum.
pub const TRACE_AMOUNT: f64 = 0.0001;

/// Totals below this (and above zero) are labelled as a trace.
const TRACE_LABEL_CEILING: f64 = 0.1;

/// One day's report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DailyReport {
    Amount(f64),
    Missing,
    Trace,
}

impl DailyReport {
    /// Contribution to the running sum; `None` for a missing day.
    pub fn amount(&self) -> Option<f64> {
        match self {
            DailyReport::Amount(v) => Some(*v),
            DailyReport::Trace => Some(TRACE_AMOUNT),
            DailyReport::Missing => None,
        }
    }
}

impl FromStr for DailyReport {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" => Ok(DailyReport::Missing),
            "T" => Ok(DailyReport::Trace),
            v => match v.parse::<f64>() {
                // `NaN` and `inf` parse as f64 but are not amounts.
                Ok(amount) if amount.is_finite() => Ok(DailyReport::Amount(amount)),
                _ => Err(()),
            },
        }
    }
}

/// A station that made it onto the map.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTotal {
    pub label: String,
    pub lon: f64,
    pub lat: f64,
}

/// Why a well-formed station was left off the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Day index (0-based) of the first missing report.
    MissingDay(usize),
    ZeroTotal,
    NoReports,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Included(StationTotal),
    Excluded(Exclusion),
}

/// A station whose data could not be interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub station: String,
    pub error: ReportError,
}

/// Result of reconciling every station in a response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub totals: Vec<StationTotal>,
    pub excluded: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Display label for a station total.
///
/// A nonzero total below 0.1 is `T`; totals below 1 keep one decimal place;
/// anything else is rounded to a whole number.
pub fn format_total(total: f64) -> String {
    if total != 0.0 && total < TRACE_LABEL_CEILING {
        "T".to_string()
    } else if total < 1.0 {
        format!("{:.1}", total)
    } else {
        format!("{:.0}", total)
    }
}

/// Reconcile one station.
///
/// A missing day voids the station; reports after it are not read. A value
/// that is neither a number nor a sentinel is an error for this station only.
pub fn reconcile_station(record: &StationRecord) -> Result<Outcome, ReportError> {
    let [lon, lat] = record.meta.ll.ok_or(ReportError::MissingLocation)?;

    if record.data.is_empty() {
        return Ok(Outcome::Excluded(Exclusion::NoReports));
    }

    let mut sum = 0.0;
    for (day, value) in record.daily_values().enumerate() {
        let report: DailyReport = value
            .parse()
            .map_err(|_| ReportError::InvalidValue { day, value })?;
        match report.amount() {
            Some(amount) => sum += amount,
            None => return Ok(Outcome::Excluded(Exclusion::MissingDay(day))),
        }
    }

    let label = format_total(sum);
    if label == "0.0" {
        return Ok(Outcome::Excluded(Exclusion::ZeroTotal));
    }
    Ok(Outcome::Included(StationTotal { label, lon, lat }))
}

/// Reconcile every station, collecting per-station errors as diagnostics.
pub fn reconcile(records: &[StationRecord]) -> Reconciliation {
    let mut result = Reconciliation::default();

    for record in records {
        match reconcile_station(record) {
            Ok(Outcome::Included(total)) => result.totals.push(total),
            Ok(Outcome::Excluded(reason)) => {
                debug!(station = %record.display_name(), ?reason, "Station excluded");
                result.excluded += 1;
            }
            Err(error) => {
                let station = record.display_name();
                warn!(station = %station, error = %error, "Skipping station");
                result.diagnostics.push(Diagnostic { station, error });
            }
        }
    }

    debug!(
        included = result.totals.len(),
        excluded = result.excluded,
        errors = result.diagnostics.len(),
        "Reconciled station reports"
    );
    result
}
