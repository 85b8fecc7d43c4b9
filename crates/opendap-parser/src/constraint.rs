//! DAP2 constraint expressions.

use std::fmt;
use std::ops::Range;

use crate::error::{DapError, DapResult};

/// An index range along one dimension; `stop` is inclusive as in DAP2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hyperslab {
    pub start: usize,
    pub stride: usize,
    pub stop: usize,
}

impl Hyperslab {
    /// A single index.
    pub fn index(i: usize) -> Self {
        Self {
            start: i,
            stride: 1,
            stop: i,
        }
    }

    /// Convert an end-exclusive range.
    pub fn from_range(range: Range<usize>) -> DapResult<Self> {
        if range.is_empty() {
            return Err(DapError::InvalidConstraint(format!(
                "empty range {:?}",
                range
            )));
        }
        Ok(Self {
            start: range.start,
            stride: 1,
            stop: range.end - 1,
        })
    }

    /// Number of indices selected; never zero.
    pub fn len(&self) -> usize {
        (self.stop - self.start) / self.stride.max(1) + 1
    }
}

impl fmt::Display for Hyperslab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stride == 1 {
            write!(f, "[{}:{}]", self.start, self.stop)
        } else {
            write!(f, "[{}:{}:{}]", self.start, self.stride, self.stop)
        }
    }
}

/// One projected variable with a hyperslab per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    name: String,
    slabs: Vec<Hyperslab>,
}

impl Projection {
    /// The whole variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slabs: Vec::new(),
        }
    }

    pub fn slab(mut self, slab: Hyperslab) -> Self {
        self.slabs.push(slab);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for slab in &self.slabs {
            write!(f, "{}", slab)?;
        }
        Ok(())
    }
}

/// `{dataset}.dds`
pub fn dds_url(dataset_url: &str) -> String {
    format!("{}.dds", dataset_url)
}

/// `{dataset}.ascii?{p1},{p2},...`
///
/// Hyperslab brackets are percent-encoded; some servers reject them raw in
/// the query string.
pub fn ascii_url(dataset_url: &str, projections: &[Projection]) -> String {
    let constraint = projections
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
        .replace('[', "%5B")
        .replace(']', "%5D");
    format!("{}.ascii?{}", dataset_url, constraint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_display() {
        let p = Projection::new("PREC_ACC_NC")
            .slab(Hyperslab::index(0))
            .slab(Hyperslab::from_range(250..815).unwrap())
            .slab(Hyperslab::from_range(700..1367).unwrap());
        assert_eq!(p.to_string(), "PREC_ACC_NC[0:0][250:814][700:1366]");
    }

    #[test]
    fn test_strided_slab() {
        let slab = Hyperslab {
            start: 0,
            stride: 20,
            stop: 100,
        };
        assert_eq!(slab.to_string(), "[0:20:100]");
        assert_eq!(slab.len(), 6);
    }

    #[test]
    fn test_empty_range_rejected() {
        assert!(Hyperslab::from_range(5..5).is_err());
    }

    #[test]
    fn test_ascii_url() {
        let url = ascii_url(
            "http://nomads.ncep.noaa.gov:80/dods/hrrr/hrrr20240115/hrrr_sfc.t12z",
            &[Projection::new("lat"), Projection::new("lon")],
        );
        assert_eq!(
            url,
            "http://nomads.ncep.noaa.gov:80/dods/hrrr/hrrr20240115/hrrr_sfc.t12z.ascii?lat,lon"
        );
    }

    #[test]
    fn test_ascii_url_encodes_brackets() {
        let url = ascii_url(
            "https://thredds.rda.ucar.edu/thredds/dodsC/files/g/ds559.0/wy1993/199303/wrf2d_d01_1993-03-13_00:00:00.nc",
            &[
                Projection::new("T2")
                    .slab(Hyperslab::index(0))
                    .slab(Hyperslab::from_range(250..252).unwrap()),
                Projection::new("XLAT"),
            ],
        );
        assert!(url.ends_with(".nc.ascii?T2%5B0:0%5D%5B250:251%5D,XLAT"));
        assert!(!url.contains('[') && !url.contains(']'));
    }
}
