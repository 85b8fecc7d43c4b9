use thiserror::Error;

/// A station whose data cannot be interpreted. Isolated to that station.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("unparseable report '{value}' on day {day}")]
    InvalidValue { day: usize, value: String },

    #[error("station has no coordinates")]
    MissingLocation,
}
