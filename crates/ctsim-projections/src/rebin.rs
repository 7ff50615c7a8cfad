//! Helical interpolation, half-scan feathering, and fan-to-parallel rebin.

use crate::geometry::Geometry;
use crate::projections::{DetectorArray, Projections};
use ctsim_support::PI;

fn lerp(a: f32, b: f32, t: f64) -> f32 {
    a + ((b - a) as f64 * t) as f32
}

/// Linearly interpolates a view at `target_angle` (radians) from the two
/// views whose `view_angle` bracket it along the helical trajectory.
/// `views` must be sorted by ascending `view_angle`.
pub fn helical180_li(views: &[DetectorArray], target_angle: f64) -> Option<DetectorArray> {
    if views.len() < 2 {
        return None;
    }
    let idx = views
        .windows(2)
        .position(|w| target_angle >= w[0].view_angle && target_angle <= w[1].view_angle)?;
    let (prev, next) = (&views[idx], &views[idx + 1]);
    let span = next.view_angle - prev.view_angle;
    let t = if span.abs() < 1e-12 { 0.0 } else { (target_angle - prev.view_angle) / span };
    let values = prev
        .values
        .iter()
        .zip(next.values.iter())
        .map(|(&a, &b)| lerp(a, b, t))
        .collect();
    Some(DetectorArray { view_angle: target_angle, values })
}

/// Fills the missing views of a 180-degree-pitch helical acquisition by
/// interpolating from its collected views at the requested angles.
pub fn interpolate_helical_views(collected: &[DetectorArray], target_angles: &[f64]) -> Vec<DetectorArray> {
    target_angles
        .iter()
        .filter_map(|&angle| helical180_li(collected, angle))
        .collect()
}

/// A smooth cosine-squared taper over `[0, width]`, 0 at the boundary and
/// 1 once `x >= width`.
fn cosine_taper(x: f64, width: f64) -> f64 {
    if width <= 0.0 {
        return 1.0;
    }
    let t = (x / width).clamp(0.0, 1.0);
    (std::f64::consts::FRAC_PI_2 * t).sin().powi(2)
}

/// Tapers the redundant rays at the two ends of a short (< 360 degree) fan
/// scan with a cosine-squared weight so the duplicate coverage at each end
/// falls smoothly to zero rather than stepping, mirroring `HalfScanFeather`.
pub fn half_scan_feather(proj: &mut Projections, fan_beam_angle: f64) {
    let n_view = proj.n_view();
    if n_view == 0 {
        return;
    }
    let scan_range = PI + 2.0 * fan_beam_angle;
    let feather_width = fan_beam_angle;
    let start_angle = proj.view(0).view_angle;
    for v in 0..n_view {
        let angle = proj.view(v).view_angle - start_angle;
        let from_start = angle;
        let from_end = scan_range - angle;
        let weight = cosine_taper(from_start, feather_width).min(cosine_taper(from_end, feather_width));
        let view = proj.view_mut(v);
        for val in &mut view.values {
            *val = (*val as f64 * weight) as f32;
        }
    }
}

fn bilinear_sample(proj: &Projections, view_f: f64, det_f: f64) -> f32 {
    let n_view = proj.n_view();
    let n_det = proj.n_det();
    if n_view == 0 || n_det == 0 {
        return 0.0;
    }
    let v0 = (view_f.floor() as i64).rem_euclid(n_view as i64) as u32;
    let v1 = (v0 + 1) % n_view;
    let tv = view_f - view_f.floor();

    let d0f = det_f.clamp(0.0, (n_det - 1) as f64);
    let d0 = d0f.floor() as u32;
    let d1 = (d0 + 1).min(n_det - 1);
    let td = d0f - d0 as f64;

    let row = |vi: u32| -> (f32, f32) {
        let view = proj.view(vi);
        (view.values[d0 as usize], view.values[d1 as usize])
    };
    let (a0, a1) = row(v0);
    let (b0, b1) = row(v1);
    let top = lerp(a0, a1, td);
    let bottom = lerp(b0, b1, td);
    lerp(top, bottom, tv)
}

/// Rebins a fan-beam sinogram onto a regular parallel `(t, theta)` grid by
/// resampling: for each parallel ray `(t, theta)` the corresponding fan
/// angle/view is located analytically and bilinearly sampled.
///
/// An already-parallel sinogram rebins to (within floating rounding) the
/// same geometry, satisfying the documented idempotence property.
pub fn interpolate_to_parallel(proj: &Projections) -> Projections {
    if proj.geometry == Geometry::Parallel {
        return proj.clone();
    }

    let n_view = proj.n_view();
    let n_det = proj.n_det();
    let mut out = Projections::new(Geometry::Parallel, n_view, n_det);
    out.det_start = proj.det_start;
    out.det_inc = proj.det_inc;
    out.rot_start = proj.rot_start;
    out.rot_inc = proj.rot_inc;
    out.view_diameter = proj.view_diameter;
    out.remark = proj.remark.clone();

    let focal_length = proj.focal_length;
    let sdd = proj.source_detector_length;

    for v in 0..n_view {
        let beta = proj.rot_start + v as f64 * proj.rot_inc;
        let out_view = out.view_mut(v);
        out_view.view_angle = beta;
        for d in 0..n_det {
            let t = proj.det_start + d as f64 * proj.det_inc;
            let (gamma, fan_view_angle) = match proj.geometry {
                Geometry::Equiangular => {
                    let gamma = (t / focal_length).asin();
                    (gamma, beta - gamma)
                }
                Geometry::Equilinear => {
                    let gamma = (t / sdd).atan();
                    (gamma, beta - gamma)
                }
                Geometry::Parallel | Geometry::Linogram => (0.0, beta),
            };
            let det_f = if proj.det_inc.abs() > 1e-12 {
                let fan_det = focal_length * gamma.sin();
                (fan_det - proj.det_start) / proj.det_inc
            } else {
                d as f64
            };
            let view_f = if proj.rot_inc.abs() > 1e-12 {
                (fan_view_angle - proj.rot_start) / proj.rot_inc
            } else {
                v as f64
            };
            out_view.values[d as usize] = bilinear_sample(proj, view_f, det_f);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinning_an_already_parallel_sinogram_is_idempotent() {
        let mut proj = Projections::new(Geometry::Parallel, 4, 8);
        proj.det_inc = 1.0;
        proj.rot_inc = 0.5;
        for v in 0..4 {
            let view = proj.view_mut(v);
            view.view_angle = v as f64 * 0.5;
            for d in 0..8 {
                view.values[d as usize] = (v * 8 + d) as f32;
            }
        }
        let rebinned = interpolate_to_parallel(&proj);
        assert_eq!(rebinned, proj);
    }

    #[test]
    fn half_scan_feather_zeroes_the_very_edges() {
        let mut proj = Projections::new(Geometry::Equiangular, 5, 3);
        let fan_angle = 0.3;
        for v in 0..5 {
            proj.view_mut(v).view_angle = v as f64 * 0.1;
            for val in &mut proj.view_mut(v).values {
                *val = 1.0;
            }
        }
        half_scan_feather(&mut proj, fan_angle);
        assert_eq!(proj.view(0).values[0], 0.0);
    }
}
