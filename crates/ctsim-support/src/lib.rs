//! Shared numeric and error primitives used by every CTSim crate.
//!
//! This crate has no dependency on file formats, phantoms, or scanners; it
//! is the one piece every other crate in the workspace is allowed to depend
//! on without creating a cycle.

mod error;
mod fourier;
mod geom;
mod math;

pub use error::CoreError;
pub use fourier::{shuffle_fourier_to_natural, shuffle_natural_to_fourier};
pub use geom::{element_transforms, Mat3};
pub use math::{clamp, integral_abscos, integrate_simpson, sinc, sinc_pi, HALF_PI, PI, TWO_PI};
