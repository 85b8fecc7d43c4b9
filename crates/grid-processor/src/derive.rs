//! Derived diagnostic fields.
//!
//! All functions are element-wise and never modify their inputs. Functions
//! taking more than one grid reject inputs whose shapes differ.

use wx_common::Grid2D;

use crate::error::{GridProcessorError, Result};

/// Frozen fraction at or above which a cell's precipitation counts as snow.
pub const FROZEN_THRESHOLD: f32 = 0.5;

/// Constant of the simplified barometric reduction, valid for Pa, m and K.
pub const MSLP_CONSTANT: f64 = 29.3;

pub const MPS_TO_MPH: f32 = 2.236_936_29;
pub const MPS_TO_KNOTS: f32 = 1.943_844;
pub const MM_PER_INCH: f32 = 25.4;

/// Default snow-to-liquid ratio (12:1).
pub const DEFAULT_SLR: f32 = 12.0;

/// Precipitation attributed to rain and to snow.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSplit {
    pub rain: Grid2D,
    pub snow: Grid2D,
}

/// Attribute each cell's precipitation to snow when the frozen fraction is
/// at least [`FROZEN_THRESHOLD`], to rain otherwise. The other side is 0.
///
/// This is a per-cell threshold, not a microphysical partition: a cell is
/// never split between the two phases.
pub fn split_phase(precip: &Grid2D, frozen_fraction: &Grid2D) -> Result<PhaseSplit> {
    let snow = precip.zip_map(frozen_fraction, |p, fr| {
        if fr >= FROZEN_THRESHOLD {
            p
        } else {
            0.0
        }
    })?;
    let rain = precip.zip_map(frozen_fraction, |p, fr| {
        if fr >= FROZEN_THRESHOLD {
            0.0
        } else {
            p
        }
    })?;
    Ok(PhaseSplit { rain, snow })
}

/// Reduce surface pressure to sea level:
/// `pressure * exp(height / (29.3 * temperature)) / 100`.
///
/// Pressure in Pa, height in m and temperature in K; the result is in hPa.
pub fn mean_sea_level_pressure(
    pressure: &Grid2D,
    height: &Grid2D,
    temperature: &Grid2D,
) -> Result<Grid2D> {
    pressure.ensure_same_shape(height)?;
    pressure.ensure_same_shape(temperature)?;

    let data = pressure
        .data()
        .iter()
        .zip(height.data())
        .zip(temperature.data())
        .map(|((&p, &z), &t)| {
            let (p, z, t) = (p as f64, z as f64, t as f64);
            (p * (z / (MSLP_CONSTANT * t)).exp() / 100.0) as f32
        })
        .collect();
    Ok(Grid2D::new(pressure.rows(), pressure.cols(), data)?)
}

/// Convert m/s to mph.
pub fn gust_mph(gust: &Grid2D) -> Grid2D {
    gust.map(|v| v * MPS_TO_MPH)
}

/// Convert wind components from m/s to knots.
pub fn wind_knots(u: &Grid2D, v: &Grid2D) -> Result<(Grid2D, Grid2D)> {
    u.ensure_same_shape(v)?;
    Ok((u.map(|x| x * MPS_TO_KNOTS), v.map(|x| x * MPS_TO_KNOTS)))
}

/// Snow depth (inches) from liquid-equivalent accumulation (mm):
/// `(accumulation / 25.4) * slr`.
pub fn snowfall_inches(accumulation_mm: &Grid2D, slr: f32) -> Result<Grid2D> {
    if !(slr.is_finite() && slr > 0.0) {
        return Err(GridProcessorError::InvalidRatio(slr));
    }
    Ok(accumulation_mm.map(|mm| (mm / MM_PER_INCH) * slr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_phase_threshold_is_inclusive() {
        let precip = Grid2D::new(1, 3, vec![1.0, 2.0, 3.0]).unwrap();
        let frozen = Grid2D::new(1, 3, vec![0.49, 0.5, 0.51]).unwrap();
        let split = split_phase(&precip, &frozen).unwrap();
        assert_eq!(split.rain.data(), &[1.0, 0.0, 0.0]);
        assert_eq!(split.snow.data(), &[0.0, 2.0, 3.0]);
    }

    #[test]
    fn test_mslp_sea_level_station() {
        let p = Grid2D::filled(1, 1, 101_325.0);
        let z = Grid2D::filled(1, 1, 0.0);
        let t = Grid2D::filled(1, 1, 288.15);
        let mslp = mean_sea_level_pressure(&p, &z, &t).unwrap();
        assert!((mslp.data()[0] - 1013.25).abs() < 1e-3);
    }

    #[test]
    fn test_snowfall_rejects_bad_ratio() {
        let acc = Grid2D::filled(1, 1, 25.4);
        assert!(snowfall_inches(&acc, 0.0).is_err());
        assert!(snowfall_inches(&acc, f32::NAN).is_err());
        assert_eq!(snowfall_inches(&acc, 12.0).unwrap().data(), &[12.0]);
    }
}
