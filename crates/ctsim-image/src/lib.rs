//! `ImageFile`: arithmetic, statistics, and FFT operations on the pixel
//! plane, built atop `ctsim-io`'s `Array2dFile` container.

mod error;
mod image;

pub use error::{Error, Result};
pub use image::{ComparativeStatistics, ImageFile, Statistics};
