//! ACIS `MultiStnData` response types.
//!
//! ```json
//! {"data": [{"meta": {"name": "ASHEVILLE", "ll": [-82.54, 35.43]},
//!            "data": [["0.5"], ["M"], ["T"]]}]}
//! ```

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct MultiStnResponse {
    #[serde(default)]
    pub data: Vec<StationRecord>,
}

impl MultiStnResponse {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    pub meta: StationMeta,

    /// One row per day, one column per requested element.
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationMeta {
    #[serde(default)]
    pub name: Option<String>,

    /// `[lon, lat]`
    #[serde(default)]
    pub ll: Option<[f64; 2]>,

    #[serde(default)]
    pub sids: Vec<String>,
}

impl StationRecord {
    /// Name for diagnostics: the station name, else its first id.
    pub fn display_name(&self) -> String {
        self.meta
            .name
            .clone()
            .or_else(|| self.meta.sids.first().cloned())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// The first element of each daily row as text.
    pub fn daily_values(&self) -> impl Iterator<Item = String> + '_ {
        self.data.iter().map(|row| match row.first() {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        })
    }
}
