//! Dataset Descriptor Structure (DDS) parsing.
//!
//! A DDS lists every variable with its type and named dimensions:
//!
//! ```text
//! Dataset {
//!     Float32 PREC_ACC_NC[Time = 1][south_north = 1015][west_east = 1367];
//!     Grid {
//!      ARRAY:
//!         Float32 gustsfc[time = 121][lat = 1059][lon = 1799];
//!      MAPS:
//!         Float64 time[time = 121];
//!     } gustsfc;
//! } wrf2d_d01_1993-03-12_00:00:00.nc;
//! ```

use crate::error::{DapError, DapResult};

const ATOMIC_TYPES: &[&str] = &[
    "Byte", "Int16", "UInt16", "Int32", "UInt32", "Float32", "Float64", "String", "Url",
];

/// A named dimension and its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub size: usize,
}

/// One declared variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsVariable {
    pub name: String,
    pub data_type: String,
    pub dims: Vec<Dimension>,
}

impl DdsVariable {
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(|d| d.size).collect()
    }
}

/// Parsed descriptor.
#[derive(Debug, Clone, Default)]
pub struct Dds {
    pub dataset: String,
    pub variables: Vec<DdsVariable>,
}

impl Dds {
    pub fn get(&self, name: &str) -> Option<&DdsVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Dimension sizes of `name`, or [`DapError::MissingData`].
    pub fn shape(&self, name: &str) -> DapResult<Vec<usize>> {
        self.get(name)
            .map(DdsVariable::shape)
            .ok_or_else(|| DapError::MissingData(format!("variable {} not in DDS", name)))
    }
}

/// Parse DDS text. The first declaration of a name wins, so a Grid's array
/// is kept over identically named maps.
pub fn parse_dds(text: &str) -> DapResult<Dds> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    match lines.next() {
        Some(first) if first.starts_with("Dataset") => {}
        other => {
            return Err(DapError::InvalidFormat(format!(
                "DDS must start with 'Dataset {{', found {:?}",
                other
            )))
        }
    }

    let mut dds = Dds::default();
    for line in lines {
        if let Some(rest) = line.strip_prefix('}') {
            // Closing brace of a Grid/Structure or of the Dataset itself
            let name = rest.trim().trim_end_matches(';').trim();
            dds.dataset = name.to_string();
            continue;
        }

        if let Some(variable) = parse_declaration(line)? {
            if dds.get(&variable.name).is_none() {
                dds.variables.push(variable);
            }
        }
    }

    tracing::debug!(
        dataset = %dds.dataset,
        variables = dds.variables.len(),
        "Parsed DDS"
    );
    Ok(dds)
}

fn parse_declaration(line: &str) -> DapResult<Option<DdsVariable>> {
    let Some(decl) = line.strip_suffix(';') else {
        return Ok(None);
    };
    let Some((data_type, rest)) = decl.split_once(char::is_whitespace) else {
        return Ok(None);
    };
    if !ATOMIC_TYPES.contains(&data_type) {
        return Ok(None);
    }

    let rest = rest.trim();
    let (name, dims_text) = match rest.find('[') {
        Some(pos) => (&rest[..pos], &rest[pos..]),
        None => (rest, ""),
    };

    let mut dims = Vec::new();
    for group in dims_text.split('[').filter(|g| !g.is_empty()) {
        let inner = group
            .trim()
            .strip_suffix(']')
            .ok_or_else(|| DapError::InvalidFormat(format!("unterminated dimension in '{}'", line)))?;
        let (dim_name, size) = match inner.split_once('=') {
            Some((n, s)) => (n.trim().to_string(), s.trim()),
            None => (String::new(), inner.trim()),
        };
        let size = size.parse().map_err(|_| {
            DapError::InvalidFormat(format!("Failed to parse dimension size in '{}'", line))
        })?;
        dims.push(Dimension {
            name: dim_name,
            size,
        });
    }

    Ok(Some(DdsVariable {
        name: name.trim().to_string(),
        data_type: data_type.to_string(),
        dims,
    }))
}
