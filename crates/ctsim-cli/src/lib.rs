//! Shared plumbing for the `ctsim-cli` command-line tools.

pub mod common;
mod error;

pub use error::{Error, Result};
