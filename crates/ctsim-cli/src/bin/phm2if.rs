//! Rasterizes a phantom into an image file.

use clap::Parser;
use ctsim_cli::common::{init_tracing, run_main};
use ctsim_cli::Error;
use ctsim_io::Array2dFileLabel;
use ctsim_phantom::{rasterize, Phantom};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Rasterizes a phantom into a pixel-plane image file.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    outfile: PathBuf,
    nx: u32,
    ny: u32,
    /// Built-in phantom name (shepplogan, herman, unitpulse).
    #[arg(long, conflicts_with = "phmfile")]
    phantom: Option<String>,
    /// Phantom definition file (`type cx cy u v rot_deg atten` records).
    #[arg(long)]
    phmfile: Option<PathBuf>,
    #[arg(long, default_value_t = 1)]
    nsample: u32,
    #[arg(long = "view-ratio", default_value_t = 1.0)]
    view_ratio: f64,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let phm = match (&args.phantom, &args.phmfile) {
            (Some(name), None) => Phantom::by_name(name).map_err(Error::Phantom)?,
            (None, Some(path)) => {
                let f = BufReader::new(File::open(path)?);
                Phantom::create_from_file(&path.to_string_lossy(), f).map_err(Error::Phantom)?
            }
            _ => return Err(Error::Args("specify exactly one of --phantom or --phmfile".into())),
        };

        let mut image = ctsim_image::ImageFile::new_real(args.nx, args.ny);
        let (min_x, max_x, min_y, max_y) = rasterize(&phm, &mut image.inner.real, args.view_ratio, args.nsample, 0..args.nx);
        image.inner.set_axis_extent(min_x, max_x, min_y, max_y);
        image.add_label(Array2dFileLabel::history(
            format!("rasterize {}", phm.name),
            0.0,
            (2026, 7, 30, 0, 0, 0),
        ));

        let mut out = File::create(&args.outfile)?;
        image.write(&mut out)?;
        tracing::info!(path = %args.outfile.display(), "wrote image");
        Ok(())
    });
}
