//! Resamples a helically collected sinogram's views onto `nview` uniform
//! target angles via 180-degree linear interpolation.

use clap::Parser;
use ctsim_cli::common::{init_tracing, run_main};
use ctsim_cli::Error;
use ctsim_projections::{interpolate_helical_views, Projections};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// Interpolates a helical sinogram's collected views onto a uniform
/// target-angle grid.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    projfile: PathBuf,
    outfile: PathBuf,
    /// Number of uniformly spaced target views over `[rotStart, rotStart + pi)`.
    #[arg(long, default_value_t = 180)]
    nview: u32,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let mut r = BufReader::new(File::open(&args.projfile)?);
        let proj = Projections::read(&mut r)?;
        if args.nview == 0 {
            return Err(Error::Args("--nview must be >= 1".into()));
        }

        let target_angles: Vec<f64> = (0..args.nview)
            .map(|i| proj.rot_start + i as f64 * std::f64::consts::PI / args.nview as f64)
            .collect();
        let interpolated = interpolate_helical_views(proj.views(), &target_angles);
        if interpolated.len() != target_angles.len() as usize {
            tracing::warn!(
                requested = target_angles.len(),
                produced = interpolated.len(),
                "some target angles fell outside the collected view range and were dropped"
            );
        }

        let mut out = Projections::new(proj.geometry, interpolated.len() as u32, proj.n_det());
        out.det_start = proj.det_start;
        out.det_inc = proj.det_inc;
        out.rot_start = proj.rot_start;
        out.rot_inc = std::f64::consts::PI / args.nview as f64;
        out.focal_length = proj.focal_length;
        out.source_detector_length = proj.source_detector_length;
        out.view_diameter = proj.view_diameter;
        out.fan_beam_angle = proj.fan_beam_angle;
        out.remark = format!("pjHinterp of {}", args.projfile.display());
        for (i, view) in interpolated.into_iter().enumerate() {
            *out.view_mut(i as u32) = view;
        }

        let mut w = BufWriter::new(File::create(&args.outfile)?);
        out.write(&mut w)?;
        tracing::info!(path = %args.outfile.display(), nview = out.n_view(), "wrote interpolated projections");
        Ok(())
    });
}
