//! CTSim is a computed-tomography simulator and reconstruction workbench.
//!
//! This facade crate re-exports the public surface of the per-stage crates
//! so that an embedder (a GUI, a CLI tool, a notebook kernel) can depend on
//! a single `ctsim` crate instead of wiring up every stage by hand:
//!
//! ```text
//! Phantom -> Scanner::collect_projections -> Projections
//!         -> (optional rebin) -> Reconstructor{ProcessSignal, Backprojector}
//!         -> ImageFile
//! ```
//!
//! The numeric core is synchronous and carries no global mutable state;
//! see [`ctsim_recon::Reconstructor`] for the primitives that external
//! collaborators (MPI scatter/reduce, a thread-pool supervisor) build on.

pub use ctsim_support as support;

pub use ctsim_io as io;

pub use ctsim_phantom as phantom;
pub use ctsim_phantom::{Phantom, PhantomElement};

pub use ctsim_projections as projections;
pub use ctsim_projections::{DetectorArray, Projections};

pub use ctsim_scanner as scanner;
pub use ctsim_scanner::Scanner;

pub use ctsim_filter as filter;
pub use ctsim_filter::{ProcessSignal, SignalFilter};

pub use ctsim_image as image;
pub use ctsim_image::ImageFile;

pub use ctsim_recon as recon;
pub use ctsim_recon::{Backprojector, Reconstructor};
