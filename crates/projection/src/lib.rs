//! Coordinate transformations for map rendering.
//!
//! Implements spherical Mercator and the viewport that places a lon/lat
//! extent inside a pixel frame, without external projection libraries.

pub mod mercator;
pub mod viewport;

pub use mercator::{Mercator, EARTH_RADIUS_M, MAX_LATITUDE};
pub use viewport::{Frame, MapView, ProjectionError};
