//! Applies a unary operation to an image file.

use clap::Parser;
use ctsim_cli::common::{init_tracing, run_main};
use ctsim_cli::Error;
use ctsim_image::ImageFile;
use std::fs::File;
use std::path::PathBuf;

/// Unary image arithmetic, complex-plane extraction, FFT, and resampling.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    imagefile: PathBuf,
    outfile: PathBuf,
    /// sqrt, log, exp, square, invert, magnitude, phase, real, imaginary,
    /// fft, ifft, fft-rows, ifft-rows, fft-cols, ifft-cols,
    /// shuffle-to-centered, shuffle-to-natural, scale.
    #[arg(long)]
    op: String,
    /// Target width/height for `--op scale`.
    #[arg(long)]
    nx: Option<u32>,
    #[arg(long)]
    ny: Option<u32>,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let mut f = File::open(&args.imagefile)?;
        let mut image = ImageFile::read(&mut f)?;

        let out = match args.op.as_str() {
            "sqrt" => image.sqrt(),
            "log" => image.log(),
            "exp" => image.exp(),
            "square" => image.square(),
            "invert" => image.invert(),
            "magnitude" => image.magnitude(),
            "phase" => image.phase(),
            "real" => image.real_part(),
            "imaginary" => image.imaginary_part(),
            "fft" => {
                image.fft();
                image
            }
            "ifft" => {
                image.ifft();
                image
            }
            "fft-rows" => {
                image.fft_rows();
                image
            }
            "ifft-rows" => {
                image.ifft_rows();
                image
            }
            "fft-cols" => {
                image.fft_cols();
                image
            }
            "ifft-cols" => {
                image.ifft_cols();
                image
            }
            "shuffle-to-centered" => {
                image.shuffle_to_centered();
                image
            }
            "shuffle-to-natural" => {
                image.shuffle_to_natural();
                image
            }
            "scale" => {
                let nx = args.nx.ok_or_else(|| Error::Args("--op scale requires --nx".into()))?;
                let ny = args.ny.ok_or_else(|| Error::Args("--op scale requires --ny".into()))?;
                image.scale_image(nx, ny)
            }
            other => return Err(Error::Args(format!("unknown op {other:?}"))),
        };

        let mut w = File::create(&args.outfile)?;
        out.write(&mut w)?;
        tracing::info!(op = %args.op, path = %args.outfile.display(), "wrote image");
        Ok(())
    });
}
