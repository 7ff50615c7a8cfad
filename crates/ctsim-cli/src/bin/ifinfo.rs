//! Prints an image file's header metadata and statistics.

use clap::Parser;
use ctsim_cli::common::{init_tracing, run_main};
use ctsim_image::ImageFile;
use std::fs::File;
use std::path::PathBuf;

/// Dumps an image file's header, labels, and pixel statistics.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    imagefile: PathBuf,
    /// Also print comparative statistics (d, r, e) against this image.
    #[arg(long)]
    compare: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    trace: u32,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);
    run_main(|| {
        let image = ImageFile::read(&mut File::open(&args.imagefile)?)?;

        println!("{}x{}, complex={}", image.nx(), image.ny(), image.is_complex());
        if image.inner.axis.extent_known {
            let a = image.inner.axis;
            println!("extent: x=[{}, {}], y=[{}, {}]", a.min_x, a.max_x, a.min_y, a.max_y);
        }
        if image.inner.axis.increment_known {
            println!("increment: dx={}, dy={}", image.inner.axis.increment_x, image.inner.axis.increment_y);
        }
        for (i, label) in image.inner.labels.iter().enumerate() {
            println!("label[{i}]: {:?} {}", label.label_type, label.text);
        }

        let stats = image.statistics();
        println!(
            "min={:.6} max={:.6} mean={:.6} mode={:.6} median={:.6} stddev={:.6}",
            stats.min, stats.max, stats.mean, stats.mode, stats.median, stats.stddev
        );

        if let Some(other_path) = &args.compare {
            let other = ImageFile::read(&mut File::open(other_path)?)?;
            let cmp = ImageFile::comparative_statistics(&image, &other)?;
            println!("vs {}: d={:.6} r={:.6} e={:.6}", other_path.display(), cmp.d, cmp.r, cmp.e);
        }
        Ok(())
    });
}
