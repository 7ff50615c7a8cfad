//! Filtered backprojection and direct-Fourier reconstruction, built on
//! `ctsim-projections`, `ctsim-filter`, and `ctsim-image`.

mod backproject;
mod error;
mod fourier_recon;
mod reconstructor;

pub use backproject::{Backprojector, BackprojectAlgorithm, GeometryParams, Interpolation, PolarTable, PostProcessing};
pub use error::{Error, Result};
pub use fourier_recon::{convert_fft_polar, convert_polar, PolarInterp};
pub use reconstructor::{combine_partial_images, reconstruct_view_range, PixelGeometry, Reconstructor, ReconstructionOptions};
