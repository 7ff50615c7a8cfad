//! Applies a binary (elementwise) operation across two image files.

use clap::Parser;
use ctsim_cli::common::{init_tracing, run_main};
use ctsim_cli::Error;
use ctsim_image::ImageFile;
use std::fs::File;
use std::path::PathBuf;

/// Elementwise arithmetic between two same-sized images.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    imagefile1: PathBuf,
    imagefile2: PathBuf,
    outfile: PathBuf,
    /// add, sub, mul, div.
    #[arg(long)]
    op: String,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let a = ImageFile::read(&mut File::open(&args.imagefile1)?)?;
        let b = ImageFile::read(&mut File::open(&args.imagefile2)?)?;

        let out = match args.op.as_str() {
            "add" => ImageFile::add(&a, &b)?,
            "sub" => ImageFile::sub(&a, &b)?,
            "mul" => ImageFile::mul(&a, &b)?,
            "div" => ImageFile::div(&a, &b)?,
            other => return Err(Error::Args(format!("unknown op {other:?}"))),
        };

        out.write(&mut File::create(&args.outfile)?)?;
        tracing::info!(op = %args.op, path = %args.outfile.display(), "wrote image");
        Ok(())
    });
}
