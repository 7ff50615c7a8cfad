//! Ramp-filter family and per-view convolution/Fourier signal processing.

mod filter;
mod process;

pub use filter::{FilterId, FilterOptions, SignalFilter};
pub use process::{add_zeropad_factor, FilterGeneration, FilterMethod, ProcessSignal};
