//! Scans a phantom into a projection (sinogram) file.

use clap::Parser;
use ctsim_cli::common::{init_tracing, parse_geometry, run_main};
use ctsim_cli::Error;
use ctsim_phantom::Phantom;
use ctsim_scanner::Scanner;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Scans a phantom at a chosen geometry into a sinogram file.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    outfile: PathBuf,
    ndet: u32,
    nview: u32,
    #[arg(long)]
    phantom: String,
    #[arg(long, default_value = "parallel")]
    geometry: String,
    /// Sub-ray samples per detector cell.
    #[arg(long, default_value_t = 1)]
    nray: u32,
    /// Total rotation span, in radians.
    #[arg(long = "rotangle", default_value_t = std::f64::consts::PI)]
    rot_angle: f64,
    #[arg(long = "focal-length", default_value_t = 0.0)]
    focal_length: f64,
    #[arg(long = "center-detector-length", default_value_t = 0.0)]
    center_detector_length: f64,
    /// Scales the recorded `view_diameter` used to size reconstructions.
    #[arg(long = "view-ratio", default_value_t = 1.0)]
    view_ratio: f64,
    /// Scales the scanned field of view relative to the phantom's
    /// bounding circle.
    #[arg(long = "scan-ratio", default_value_t = 1.0)]
    scan_ratio: f64,
    /// Starting view index, in units of the per-view rotation increment.
    #[arg(long = "offsetview", default_value_t = 0)]
    offset_view: i64,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let geometry = parse_geometry(&args.geometry)?;
        let phm = Phantom::by_name(&args.phantom).map_err(Error::Phantom)?;
        let scan_diameter = phm.diameter_boundary_circle() * args.scan_ratio;
        let rot_inc = args.rot_angle / args.nview as f64;
        let rot_start = args.offset_view as f64 * rot_inc;

        let mut scanner = Scanner::new(
            geometry,
            scan_diameter,
            args.ndet,
            args.nview,
            args.nray,
            rot_start,
            args.rot_angle,
            args.focal_length,
            args.center_detector_length,
        )
        .map_err(Error::Scanner)?;
        scanner.view_diameter = phm.diameter_boundary_circle() * args.view_ratio;

        let mut proj = scanner.collect_projections(&phm);
        proj.remark = format!("phm2pj {} {}", args.phantom, geometry.name());

        let mut out = BufWriter::new(File::create(&args.outfile)?);
        proj.write(&mut out)?;
        tracing::info!(path = %args.outfile.display(), nview = args.nview, ndet = args.ndet, "wrote projections");
        Ok(())
    });
}
