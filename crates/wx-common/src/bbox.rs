//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// `min_x`/`max_x` are the west/east longitudes, `min_y`/`max_y` the
/// south/north latitudes. Map extents are usually written in the
/// `[west, east, south, north]` order; see [`BoundingBox::from_extent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create from a map extent ordered `[west, east, south, north]`.
    pub fn from_extent(extent: [f64; 4]) -> Self {
        let [west, east, south, north] = extent;
        Self::new(west, south, east, north)
    }

    /// The map extent `[west, east, south, north]`.
    pub fn to_extent(&self) -> [f64; 4] {
        [self.min_x, self.max_x, self.min_y, self.max_y]
    }

    /// Parse an extent string: "west,east,south,north"
    pub fn parse_extent(s: &str) -> Result<Self, BboxParseError> {
        let [west, east, south, north] = parse_four(s)?;
        let bbox = Self::new(west, south, east, north);
        if bbox.min_x >= bbox.max_x || bbox.min_y >= bbox.max_y {
            return Err(BboxParseError::Inverted(s.to_string()));
        }
        Ok(bbox)
    }

    /// Width of the bounding box in degrees.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grow the box by `margin` degrees on every side.
    pub fn padded(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    /// Check if a point lies strictly inside the box shrunk by `inset` on every side.
    pub fn contains_inset(&self, x: f64, y: f64, inset: f64) -> bool {
        x > self.min_x + inset
            && x < self.max_x - inset
            && y > self.min_y + inset
            && y < self.max_y - inset
    }

    /// Format as the ACIS `bbox` query value: "west,south,east,north".
    pub fn to_acis_param(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

fn parse_four(s: &str) -> Result<[f64; 4], BboxParseError> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(BboxParseError::InvalidFormat(s.to_string()));
    }

    let mut values = [0.0; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
    }
    Ok(values)
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid extent format: {0}. Expected 'west,east,south,north'")]
    InvalidFormat(String),

    #[error("Invalid number in extent: {0}")]
    InvalidNumber(String),

    #[error("Extent edges are inverted: {0}")]
    Inverted(String),
}
