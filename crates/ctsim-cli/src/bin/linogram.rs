//! Retags a sinogram's geometry as `Linogram`.
//!
//! `ctsim-scanner` cannot collect a true linogram scan (see
//! `Geometry::Linogram`'s doc comment) and `ctsim-recon` has no
//! linogram-specific backprojector; this tool only round-trips a
//! sinogram's metadata, matching the source's documented limitation.

use clap::Parser;
use ctsim_cli::common::init_tracing;
use ctsim_cli::common::run_main;
use ctsim_projections::{Geometry, Projections};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// Retags a projection file's geometry field as `linogram`.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    infile: PathBuf,
    outfile: PathBuf,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let mut r = BufReader::new(File::open(&args.infile)?);
        let mut proj = Projections::read(&mut r)?;
        proj.geometry = Geometry::Linogram;

        let mut w = BufWriter::new(File::create(&args.outfile)?);
        proj.write(&mut w)?;
        tracing::info!(path = %args.outfile.display(), "retagged projections as linogram");
        Ok(())
    });
}
