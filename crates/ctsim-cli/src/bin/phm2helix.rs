//! Scans a phantom across a single rotation turn and tapers the redundant
//! ends for a short-scan (fan-beam, less than a full turn) acquisition.
//!
//! `ctsim-scanner` has no z-axis/table-feed model (an explicit
//! simplification, see `DESIGN.md`); this tool covers the in-plane half
//! of a helical short scan, which is what `half_scan_feather` addresses.

use clap::Parser;
use ctsim_cli::common::{init_tracing, parse_geometry, run_main};
use ctsim_cli::Error;
use ctsim_phantom::Phantom;
use ctsim_projections::half_scan_feather;
use ctsim_scanner::Scanner;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Scans a phantom over a short-scan rotation and feathers its
/// overlapping ends.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    outfile: PathBuf,
    ndet: u32,
    nview: u32,
    #[arg(long)]
    phantom: String,
    #[arg(long, default_value = "equiangular")]
    geometry: String,
    #[arg(long, default_value_t = 1)]
    nray: u32,
    /// Total rotation span, in radians; should exceed `pi` for a fan-beam
    /// short scan.
    #[arg(long = "rotangle", default_value_t = std::f64::consts::PI)]
    rot_angle: f64,
    #[arg(long = "focal-length", default_value_t = 2.0)]
    focal_length: f64,
    #[arg(long = "center-detector-length", default_value_t = 1.0)]
    center_detector_length: f64,
    #[arg(long = "scan-ratio", default_value_t = 1.0)]
    scan_ratio: f64,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let geometry = parse_geometry(&args.geometry)?;
        if geometry == ctsim_projections::Geometry::Parallel {
            return Err(Error::Args("phm2helix requires a fan-beam geometry (equilinear/equiangular)".into()));
        }
        let phm = Phantom::by_name(&args.phantom).map_err(Error::Phantom)?;
        let scan_diameter = phm.diameter_boundary_circle() * args.scan_ratio;

        let scanner = Scanner::new(
            geometry,
            scan_diameter,
            args.ndet,
            args.nview,
            args.nray,
            0.0,
            args.rot_angle,
            args.focal_length,
            args.center_detector_length,
        )
        .map_err(Error::Scanner)?;

        let mut proj = scanner.collect_projections(&phm);
        half_scan_feather(&mut proj, scanner.fan_beam_angle);
        proj.remark = format!("phm2helix {} {}", args.phantom, geometry.name());

        let mut out = BufWriter::new(File::create(&args.outfile)?);
        proj.write(&mut out)?;
        tracing::info!(path = %args.outfile.display(), "wrote feathered short-scan projections");
        Ok(())
    });
}
