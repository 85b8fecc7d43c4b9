//! Spherical Mercator (EPSG:3857 formulas on a sphere).

use std::f64::consts::PI;

/// Sphere radius used by Web Mercator (meters).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitudes are clamped to this before projecting; the poles map to infinity.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Spherical Mercator with a configurable central meridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    /// Central meridian in degrees
    pub lon0: f64,
    /// Sphere radius in meters
    pub radius: f64,
}

impl Default for Mercator {
    fn default() -> Self {
        Self {
            lon0: 0.0,
            radius: EARTH_RADIUS_M,
        }
    }
}

impl Mercator {
    pub fn new(lon0: f64) -> Self {
        Self {
            lon0,
            ..Self::default()
        }
    }

    /// Geographic (degrees) to projected (meters).
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = self.radius * (lon - self.lon0).to_radians();
        let y = self.radius * (PI / 4.0 + lat / 2.0).tan().ln();
        (x, y)
    }

    /// Projected (meters) to geographic (degrees).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = (x / self.radius).to_degrees() + self.lon0;
        let lat = (2.0 * (y / self.radius).exp().atan() - PI / 2.0).to_degrees();
        (lon, lat)
    }
}
