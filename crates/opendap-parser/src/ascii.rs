//! DAP2 ASCII response parsing.
//!
//! Two server dialects are accepted. THREDDS echoes the DDS, a dashed
//! separator, then one block per variable:
//!
//! ```text
//! PREC_ACC_NC[1][2][3]
//! [0][0], 0.0, 0.1, 0.2
//! [0][1], 0.3, 0.4, 0.5
//! ```
//!
//! The GrADS Data Server omits the preamble, writes `name, [1][2][3]` headers
//! and appends the grid's map vectors as plain value lines:
//!
//! ```text
//! gustsfc, [1][2][3]
//! [0][0], 9.1, 9.4, 10.2
//! [0][1], 8.7, 9.0, 9.9
//! lat, [2]
//! 34.3, 34.33
//! ```
//!
//! Values are collected in row-major order and checked against the header
//! shape.

use wx_common::Grid2D;

use crate::error::{DapError, DapResult};

/// Samples at or beyond this magnitude are fill values (GrADS writes 9.999e20).
const FILL_THRESHOLD: f64 = 1.0e20;

/// Values of one variable.
#[derive(Debug, Clone, PartialEq)]
pub enum DapData {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl DapData {
    pub fn len(&self) -> usize {
        match self {
            DapData::Numeric(v) => v.len(),
            DapData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named array with its declared shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DapArray {
    pub name: String,
    pub shape: Vec<usize>,
    pub data: DapData,
}

impl DapArray {
    pub fn numbers(&self) -> DapResult<&[f64]> {
        match &self.data {
            DapData::Numeric(values) => Ok(values),
            DapData::Text(_) => Err(DapError::InvalidFormat(format!(
                "{} holds text, expected numbers",
                self.name
            ))),
        }
    }

    pub fn strings(&self) -> DapResult<&[String]> {
        match &self.data {
            DapData::Text(values) => Ok(values),
            DapData::Numeric(_) => Err(DapError::InvalidFormat(format!(
                "{} holds numbers, expected text",
                self.name
            ))),
        }
    }

    /// Shape with leading length-1 dimensions removed.
    pub fn squeezed_shape(&self) -> Vec<usize> {
        let lead = self
            .shape
            .iter()
            .take_while(|&&d| d == 1)
            .count()
            .min(self.shape.len().saturating_sub(2));
        self.shape[lead..].to_vec()
    }

    /// Interpret as a 2-D field; leading singleton dimensions (time) are dropped
    /// and fill values become NaN.
    pub fn to_grid(&self) -> DapResult<Grid2D> {
        let shape = self.squeezed_shape();
        let [rows, cols] = shape[..] else {
            return Err(DapError::InvalidFormat(format!(
                "{} has shape {:?}, expected a 2-D field",
                self.name, self.shape
            )));
        };
        let data = self
            .numbers()?
            .iter()
            .map(|&v| {
                if v.abs() >= FILL_THRESHOLD {
                    f32::NAN
                } else {
                    v as f32
                }
            })
            .collect();
        Ok(Grid2D::new(rows, cols, data)?)
    }
}

/// All arrays of one ASCII response, in response order.
#[derive(Debug, Clone, Default)]
pub struct DapDataset {
    pub arrays: Vec<DapArray>,
}

impl DapDataset {
    pub fn get(&self, name: &str) -> Option<&DapArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    /// Like [`DapDataset::get`] but a missing variable is an error.
    pub fn require(&self, name: &str) -> DapResult<&DapArray> {
        self.get(name)
            .ok_or_else(|| DapError::MissingData(format!("variable {} not in response", name)))
    }

    pub fn grid(&self, name: &str) -> DapResult<Grid2D> {
        self.require(name)?.to_grid()
    }

    /// A 1-D coordinate vector.
    pub fn axis(&self, name: &str) -> DapResult<Vec<f64>> {
        Ok(self.require(name)?.numbers()?.to_vec())
    }
}

struct Block {
    name: String,
    shape: Vec<usize>,
    numbers: Vec<f64>,
    text: Vec<String>,
}

impl Block {
    fn finish(self) -> DapResult<DapArray> {
        let expected: usize = self.shape.iter().product();
        let data = match (self.numbers.is_empty(), self.text.is_empty()) {
            (_, true) => DapData::Numeric(self.numbers),
            (true, false) => DapData::Text(self.text),
            (false, false) => {
                return Err(DapError::InvalidFormat(format!(
                    "{} mixes numbers and text",
                    self.name
                )))
            }
        };
        if data.len() != expected {
            return Err(DapError::ShapeMismatch {
                name: self.name,
                expected,
                actual: data.len(),
            });
        }
        Ok(DapArray {
            name: self.name,
            shape: self.shape,
            data,
        })
    }
}

/// Parse an ASCII response body.
pub fn parse_ascii(text: &str) -> DapResult<DapDataset> {
    let body = match text.lines().position(is_separator) {
        Some(sep) => text.lines().skip(sep + 1).collect::<Vec<_>>(),
        None => text.lines().collect(),
    };

    let mut dataset = DapDataset::default();
    let mut current: Option<Block> = None;

    for (line_no, raw) in body.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((name, shape)) = parse_header(line) {
            if let Some(block) = current.take() {
                push_array(&mut dataset, block.finish()?);
            }
            current = Some(Block {
                name,
                shape,
                numbers: Vec::new(),
                text: Vec::new(),
            });
            continue;
        }

        let block = current.as_mut().ok_or_else(|| {
            DapError::InvalidFormat(format!("values before any header at line {}", line_no + 1))
        })?;

        for token in strip_index_prefix(line).split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if let Some(quoted) = token.strip_prefix('"') {
                block.text.push(quoted.trim_end_matches('"').to_string());
            } else {
                let value = token.parse::<f64>().map_err(|_| {
                    DapError::InvalidFormat(format!(
                        "Failed to parse value '{}' of {} at line {}",
                        token,
                        block.name,
                        line_no + 1
                    ))
                })?;
                block.numbers.push(value);
            }
        }
    }

    if let Some(block) = current.take() {
        push_array(&mut dataset, block.finish()?);
    }

    tracing::debug!(arrays = dataset.arrays.len(), "Parsed DAP ASCII response");
    Ok(dataset)
}

fn push_array(dataset: &mut DapDataset, array: DapArray) {
    if dataset.get(&array.name).is_none() {
        dataset.arrays.push(array);
    }
}

fn is_separator(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 8 && line.chars().all(|c| c == '-')
}

/// Recognize `NAME[1][2]`, `NAME, [1][2]` and `GRID.NAME[1][2]`.
fn parse_header(line: &str) -> Option<(String, Vec<usize>)> {
    if line.starts_with('[') || line.starts_with('"') || !line.ends_with(']') {
        return None;
    }

    let open = line.find('[')?;
    let name = line[..open].trim().trim_end_matches(',').trim();
    let valid_name = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !valid_name {
        return None;
    }

    let mut shape = Vec::new();
    for group in line[open..].split('[').filter(|g| !g.is_empty()) {
        shape.push(group.strip_suffix(']')?.trim().parse().ok()?);
    }

    let short = name.rsplit('.').next().unwrap_or(name);
    Some((short.to_string(), shape))
}

/// Drop a leading `[i][j],` row index.
fn strip_index_prefix(line: &str) -> &str {
    let mut rest = line;
    while rest.starts_with('[') {
        match rest.find(']') {
            Some(end) => rest = &rest[end + 1..],
            None => break,
        }
    }
    rest.trim_start().trim_start_matches(',')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_forms() {
        assert_eq!(
            parse_header("PREC_ACC_NC[1][2][3]"),
            Some(("PREC_ACC_NC".to_string(), vec![1, 2, 3]))
        );
        assert_eq!(
            parse_header("gustsfc, [1][2][3]"),
            Some(("gustsfc".to_string(), vec![1, 2, 3]))
        );
        assert_eq!(
            parse_header("gustsfc.lat[2]"),
            Some(("lat".to_string(), vec![2]))
        );
        assert_eq!(parse_header("[0][1], 1.0, 2.0"), None);
        assert_eq!(parse_header("1.0, 2.0"), None);
    }

    #[test]
    fn test_strip_index_prefix() {
        assert_eq!(strip_index_prefix("[0][12], 1.5, 2.5").trim(), "1.5, 2.5");
        assert_eq!(strip_index_prefix("34.0, 34.5"), "34.0, 34.5");
    }

    #[test]
    fn test_squeezed_shape_keeps_two_dims() {
        let array = DapArray {
            name: "x".into(),
            shape: vec![1, 1, 1],
            data: DapData::Numeric(vec![0.0]),
        };
        assert_eq!(array.squeezed_shape(), vec![1, 1]);
    }
}
