//! Reconstructs an image from a projection file via filtered
//! backprojection.

use clap::Parser;
use ctsim_cli::common::{init_tracing, parse_backproject, parse_filter_generation, parse_filter_id, parse_filter_method, parse_interpolation, run_main};
use ctsim_filter::{FilterOptions, SignalFilter};
use ctsim_io::Array2dFileLabel;
use ctsim_projections::Projections;
use ctsim_recon::{Backprojector, Reconstructor, ReconstructionOptions};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Filters and backprojects a sinogram into a reconstructed image.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    projfile: PathBuf,
    imagefile: PathBuf,
    nx: u32,
    ny: u32,
    #[arg(long, default_value = "abs_bandlimit")]
    filter: String,
    /// Filter bandwidth; defaults to the Nyquist rate of the detector
    /// spacing read from `projfile`.
    #[arg(long = "filter-param")]
    filter_param: Option<f64>,
    #[arg(long = "filter-method", default_value = "convolution")]
    filter_method: String,
    #[arg(long = "filter-generation", default_value = "direct")]
    filter_generation: String,
    #[arg(long, default_value_t = 0)]
    zeropad: u32,
    #[arg(long, default_value = "linear")]
    interp: String,
    #[arg(long = "preinterpolation-factor", default_value_t = 1)]
    preinterpolation_factor: u32,
    #[arg(long = "backproj", default_value = "trig")]
    backproj: String,
    /// Rebins a fan-beam sinogram onto the parallel grid before filtering.
    #[arg(long = "rebin-to-parallel", default_value_t = false)]
    rebin_to_parallel: bool,
    #[arg(long = "view-ratio", default_value_t = 1.0)]
    view_ratio: f64,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let mut r = BufReader::new(File::open(&args.projfile)?);
        let proj = Projections::read(&mut r)?;

        let filter_id = parse_filter_id(&args.filter)?;
        let bw = args.filter_param.unwrap_or_else(|| 1.0 / proj.det_inc.max(1e-12));
        let filter = SignalFilter::new(filter_id, bw, FilterOptions::default());

        let backproj_algo = parse_backproject(&args.backproj)?;
        let interp = parse_interpolation(&args.interp)?;
        let backprojector = Backprojector::new(backproj_algo, interp);

        let mut options = ReconstructionOptions::new(filter, backprojector);
        options.filter_method = parse_filter_method(&args.filter_method)?;
        options.filter_generation = parse_filter_generation(&args.filter_generation)?;
        options.zeropad = args.zeropad;
        options.preinterp_factor = args.preinterpolation_factor;
        options.view_ratio = args.view_ratio;
        options.rebin_to_parallel = args.rebin_to_parallel;

        let recon = Reconstructor::new(&proj, options);
        let mut image = recon.reconstruct(args.nx, args.ny)?;
        image.add_label(Array2dFileLabel::history(
            format!("reconstruct {} {}", args.filter, args.backproj),
            0.0,
            (2026, 7, 30, 0, 0, 0),
        ));

        let mut out = File::create(&args.imagefile)?;
        image.write(&mut out)?;
        tracing::info!(path = %args.imagefile.display(), "wrote reconstructed image");
        Ok(())
    });
}
