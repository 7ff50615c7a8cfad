//! End-to-end scenarios spanning phantom rasterization, scanning, and
//! reconstruction — the only crate depending on every pipeline stage.

use ctsim_filter::{FilterId, FilterOptions, SignalFilter};
use ctsim_image::ImageFile;
use ctsim_io::Array2d;
use ctsim_phantom::{rasterize, Phantom};
use ctsim_projections::Geometry;
use ctsim_recon::{BackprojectAlgorithm, Backprojector, Interpolation, ReconstructionOptions, Reconstructor};
use ctsim_scanner::Scanner;

#[test]
fn shepp_logan_rasterization_matches_the_documented_mean_and_range() {
    let phm = Phantom::shepp_logan();
    let mut image: Array2d<f64> = Array2d::new(256, 256);
    rasterize(&phm, &mut image, 1.0, 2, 0..256);

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for ix in 0..256 {
        for iy in 0..256 {
            let v = *image.get(ix, iy);
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
    }
    let mean = sum / (256.0 * 256.0);

    assert!(min > -0.2, "min={min}");
    assert!((1.7..=2.2).contains(&max), "max={max}");
    assert!((mean - 0.212).abs() < 0.05, "mean={mean}");
}

#[test]
fn filtered_backprojection_correlates_with_the_rasterized_phantom() {
    let phm = Phantom::shepp_logan();
    let mut rasterized_image = ImageFile::new_real(256, 256);
    rasterize(&phm, &mut rasterized_image.inner.real, 1.0, 2, 0..256);
    let rasterized = &rasterized_image.inner.real;

    let scan_diameter = phm.diameter_boundary_circle();
    let scanner = Scanner::new(
        Geometry::Parallel,
        scan_diameter,
        367,
        320,
        2,
        0.0,
        std::f64::consts::PI,
        0.0,
        0.0,
    )
    .unwrap();
    let proj = scanner.collect_projections(&phm);

    let filter = SignalFilter::new(FilterId::AbsBandlimit, 1.0 / proj.det_inc, FilterOptions::default());
    let backproject = Backprojector::new(BackprojectAlgorithm::Idiff, Interpolation::Linear);
    let options = ReconstructionOptions::new(filter, backproject);
    let recon = Reconstructor::new(&proj, options);
    let reconstructed = recon.reconstruct(256, 256).unwrap();

    let radius = 0.9 * (proj.view_diameter / 2.0);
    let half = 256.0 / 2.0;
    let mut num = 0.0;
    let mut ra = 0.0;
    let mut rb = 0.0;
    for ix in 0..256u32 {
        for iy in 0..256u32 {
            let x = (ix as f64 - half) / half;
            let y = (iy as f64 - half) / half;
            if (x * x + y * y).sqrt() * (proj.view_diameter / 2.0) > radius {
                continue;
            }
            let a = *reconstructed.inner.real.get(ix, iy);
            let b = *rasterized.get(ix, iy);
            num += a * b;
            ra += a * a;
            rb += b * b;
        }
    }
    let correlation = num / (ra.sqrt() * rb.sqrt()).max(1e-12);
    assert!(correlation >= 0.85, "correlation={correlation}");
}

#[test]
fn unit_pulse_reconstruction_has_a_concentrated_point_spread() {
    let phm = Phantom::unit_pulse();
    let scan_diameter = phm.diameter_boundary_circle().max(2.0);
    let scanner = Scanner::new(Geometry::Parallel, scan_diameter, 257, 200, 2, 0.0, std::f64::consts::PI, 0.0, 0.0).unwrap();
    let proj = scanner.collect_projections(&phm);

    let filter = SignalFilter::new(FilterId::AbsBandlimit, 1.0 / proj.det_inc, FilterOptions::default());
    let backproject = Backprojector::new(BackprojectAlgorithm::Trig, Interpolation::Linear);
    let options = ReconstructionOptions::new(filter, backproject);
    let recon = Reconstructor::new(&proj, options);
    let image = recon.reconstruct(65, 65).unwrap();

    let center = *image.inner.real.get(32, 32);
    let mut ring_sum = 0.0;
    let mut ring_count = 0u32;
    for (dx, dy) in [(5i32, 0i32), (-5, 0), (0, 5), (0, -5), (4, 3), (-4, 3), (4, -3), (-4, -3)] {
        let ix = (32 + dx) as u32;
        let iy = (32 + dy) as u32;
        ring_sum += *image.inner.real.get(ix, iy);
        ring_count += 1;
    }
    let ring_mean = ring_sum / ring_count as f64;
    assert!(center >= 5.0 * ring_mean.max(1e-9), "center={center} ring_mean={ring_mean}");
}
