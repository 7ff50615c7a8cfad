//! Exports an image file's real plane as an 8-bit PGM for viewing outside
//! CTSim.

use clap::Parser;
use ctsim_cli::common::{init_tracing, run_main, write_pgm};
use ctsim_image::ImageFile;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Exports an image file to a binary PGM (P5), min/max-normalized to
/// `[0, 255]`.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    imagefile: PathBuf,
    outfile: PathBuf,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let image = ImageFile::read(&mut File::open(&args.imagefile)?)?;
        let mut out = BufWriter::new(File::create(&args.outfile)?);
        write_pgm(&mut out, &image)?;
        tracing::info!(path = %args.outfile.display(), "wrote pgm");
        Ok(())
    });
}
