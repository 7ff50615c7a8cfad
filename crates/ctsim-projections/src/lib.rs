//! The sinogram container and its file format, plus helical rebin and
//! half-scan feathering.

mod error;
mod geometry;
mod projections;
mod rebin;

pub use error::{Error, Result};
pub use geometry::Geometry;
pub use projections::{DetectorArray, Projections, SIGNATURE};
pub use rebin::{half_scan_feather, helical180_li, interpolate_helical_views, interpolate_to_parallel};
