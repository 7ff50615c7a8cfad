//! Prints a projection file's geometry metadata.

use clap::Parser;
use ctsim_cli::common::init_tracing;
use ctsim_cli::common::run_main;
use ctsim_projections::Projections;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Dumps a sinogram's header metadata.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    projfile: PathBuf,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let mut r = BufReader::new(File::open(&args.projfile)?);
        let proj = Projections::read(&mut r)?;

        println!("geometry: {}", proj.geometry.name());
        println!("nView={} nDet={}", proj.n_view(), proj.n_det());
        println!("detStart={} detInc={}", proj.det_start, proj.det_inc);
        println!("rotStart={} rotInc={}", proj.rot_start, proj.rot_inc);
        println!("focalLength={} sourceDetectorLength={}", proj.focal_length, proj.source_detector_length);
        println!("viewDiameter={} fanBeamAngle={}", proj.view_diameter, proj.fan_beam_angle);
        if !proj.remark.is_empty() {
            println!("remark: {}", proj.remark);
        }
        Ok(())
    });
}
