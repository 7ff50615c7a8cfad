//! Shared plumbing for the `ctsim-cli` binaries: tracing setup, the
//! success/failure-to-exit-code wrapper, and small name-to-enum parsers
//! every tool needs.

use crate::error::{Error, Result};
use ctsim_filter::{FilterGeneration, FilterId, FilterMethod};
use ctsim_projections::Geometry;
use ctsim_recon::{BackprojectAlgorithm, Interpolation};

/// Initializes `tracing-subscriber` from `RUST_LOG`, defaulting to `warn`
/// unless `--trace` raised it.
pub fn init_tracing(trace_level: u32) {
    let default = if trace_level == 0 {
        tracing::level_filters::LevelFilter::WARN
    } else if trace_level == 1 {
        tracing::level_filters::LevelFilter::INFO
    } else {
        tracing::level_filters::LevelFilter::DEBUG
    };
    let env_filter = tracing_subscriber::EnvFilter::builder().with_default_directive(default.into()).from_env_lossy();
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}

/// Runs `f`, printing its error to stderr and exiting 1 on failure, or
/// exiting 0 on success. Every binary's `main` is exactly this call.
pub fn run_main(f: impl FnOnce() -> Result<()>) {
    if let Err(e) = f() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

pub fn parse_geometry(name: &str) -> Result<Geometry> {
    Geometry::from_name(name).ok_or_else(|| Error::Args(format!("unknown geometry {name:?}")))
}

pub fn parse_filter_id(name: &str) -> Result<FilterId> {
    FilterId::from_name(name).map_err(Error::Filter)
}

pub fn parse_filter_method(name: &str) -> Result<FilterMethod> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "convolution" => FilterMethod::Convolution,
        "fourier" => FilterMethod::Fourier,
        "fourier_table" => FilterMethod::FourierTable,
        "fft" => FilterMethod::Fft,
        "fftw" => FilterMethod::Fftw,
        "rfftw" => FilterMethod::Rfftw,
        other => return Err(Error::Args(format!("unknown filter method {other:?}"))),
    })
}

pub fn parse_filter_generation(name: &str) -> Result<FilterGeneration> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "direct" => FilterGeneration::Direct,
        "inverse_fourier" => FilterGeneration::InverseFourier,
        other => return Err(Error::Args(format!("unknown filter generation {other:?}"))),
    })
}

pub fn parse_interpolation(name: &str) -> Result<Interpolation> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "nearest" => Interpolation::Nearest,
        "linear" => Interpolation::Linear,
        "cubic" => Interpolation::Cubic,
        "freq_preinterpolation" => Interpolation::FreqPreinterpolation,
        other => return Err(Error::Args(format!("unknown interpolation {other:?}"))),
    })
}

pub fn parse_backproject(name: &str) -> Result<BackprojectAlgorithm> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "trig" => BackprojectAlgorithm::Trig,
        "table" => BackprojectAlgorithm::Table,
        "diff" => BackprojectAlgorithm::Diff,
        "idiff" => BackprojectAlgorithm::Idiff,
        other => return Err(Error::Args(format!("unknown backprojector {other:?}"))),
    })
}

/// Writes `img`'s real plane as an 8-bit binary PGM, linearly scaled from
/// `(min, max)` to `(0, 255)`. A flat image (`min == max`) writes mid-gray.
pub fn write_pgm<W: std::io::Write>(w: &mut W, img: &ctsim_image::ImageFile) -> std::io::Result<()> {
    let stats = img.statistics();
    let nx = img.nx();
    let ny = img.ny();
    writeln!(w, "P5")?;
    writeln!(w, "{nx} {ny}")?;
    writeln!(w, "255")?;
    let span = stats.max - stats.min;
    let mut row = vec![0u8; nx as usize];
    for iy in 0..ny {
        for ix in 0..nx {
            let v = *img.inner.real.get(ix, iy);
            let byte = if span.abs() < 1e-12 {
                128
            } else {
                (((v - stats.min) / span) * 255.0).round().clamp(0.0, 255.0) as u8
            };
            row[ix as usize] = byte;
        }
        w.write_all(&row)?;
    }
    Ok(())
}
