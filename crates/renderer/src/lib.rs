//! Static map rendering for the wxmaps products.
//!
//! A [`MapCanvas`] owns a `tiny-skia` pixmap laid out as a header band, a
//! Mercator map frame, an optional colorbar band and a footer band. Layers
//! are drawn onto it in call order:
//!
//! ```text
//!   fill::fill_field        ─┐
//!   contour::draw_contours   │
//!   barbs::draw_barbs        ├──▶ MapCanvas ──▶ png::encode_pixmap ──▶ file
//!   overlay::draw_boundaries │
//!   labels::draw_point_labels│
//!   colorbar::draw_colorbar ─┘
//! ```

pub mod barbs;
pub mod canvas;
pub mod colorbar;
pub mod contour;
pub mod error;
pub mod fill;
pub mod labels;
pub mod overlay;
pub mod png;
pub mod text;

pub use canvas::{CanvasLayout, MapCanvas};
pub use colorbar::{draw_colorbar, Colorbar, Tick};
pub use error::{RenderError, RenderResult};
pub use overlay::{BoundaryLayer, LineStyle};
pub use text::{Align, TextStyle, VAlign};
