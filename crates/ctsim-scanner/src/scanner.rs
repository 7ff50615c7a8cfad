//! `Scanner`: geometry setup (parallel / equilinear / equiangular) and
//! per-view projection collection.

use ctsim_phantom::{project_line, Composition, Phantom};
use ctsim_projections::{DetectorArray, Geometry, Projections};
use ctsim_support::{CoreError, Mat3, PI};

/// A ray-sampling position, either a linear detector offset (parallel,
/// equilinear) or an angular one (equiangular).
#[derive(Debug, Clone, Copy)]
enum DetParam {
    Linear { start: f64, inc: f64 },
    Angular { start: f64, inc: f64 },
}

#[derive(Debug, Clone)]
pub struct Scanner {
    pub geometry: Geometry,
    pub n_view: u32,
    pub n_det: u32,
    pub n_sample: u32,
    pub rot_start: f64,
    pub rot_inc: f64,
    pub focal_length: f64,
    pub center_detector_length: f64,
    pub source_detector_length: f64,
    pub scan_diameter: f64,
    pub view_diameter: f64,
    pub fan_beam_angle: f64,
    det_param: DetParam,
}

/// Picks `det_inc` (and `det_start` centered so index `n_det/2` is the
/// central ray) for a detector array of linear length `det_len`, per the
/// even/odd adjustment rule.
fn even_odd_linear(det_len: f64, n_det: u32) -> (f64, f64) {
    let det_inc = if n_det % 2 == 0 {
        det_len / (n_det - 1) as f64
    } else {
        det_len / n_det as f64
    };
    let det_start = -((n_det / 2) as f64) * det_inc;
    (det_inc, det_start)
}

impl Scanner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        geometry: Geometry,
        scan_diameter: f64,
        n_det: u32,
        n_view: u32,
        n_sample: u32,
        rot_start: f64,
        rot_total: f64,
        focal_length: f64,
        center_detector_length: f64,
    ) -> Result<Self, CoreError> {
        if n_view < 1 {
            return Err(CoreError::InvalidGeometry("nView must be >= 1".into()));
        }
        if n_det < 1 {
            return Err(CoreError::InvalidGeometry("nDet must be >= 1".into()));
        }
        if n_sample < 1 {
            return Err(CoreError::InvalidArgument("nSample must be >= 1".into()));
        }

        let source_detector_length = focal_length + center_detector_length;
        let (det_param, fan_beam_angle) = match geometry {
            Geometry::Parallel => {
                let (det_inc, det_start) = even_odd_linear(scan_diameter, n_det);
                (DetParam::Linear { start: det_start, inc: det_inc }, 0.0)
            }
            Geometry::Equilinear => {
                if scan_diameter / 2.0 >= focal_length {
                    return Err(CoreError::InvalidGeometry(
                        "equilinear geometry requires scan_diameter/2 < focal_length".into(),
                    ));
                }
                let alpha = (scan_diameter / 2.0 / focal_length).asin();
                let half_det_len = source_detector_length * alpha.tan();
                let (det_inc, det_start) = even_odd_linear(2.0 * half_det_len, n_det);
                (DetParam::Linear { start: det_start, inc: det_inc }, alpha)
            }
            Geometry::Equiangular => {
                if scan_diameter / 2.0 >= focal_length {
                    return Err(CoreError::InvalidGeometry(
                        "equiangular geometry requires scan_diameter/2 < focal_length".into(),
                    ));
                }
                let alpha = (scan_diameter / 2.0 / focal_length).asin();
                let (det_inc_lin, det_len_lin) = even_odd_linear(scan_diameter, n_det);
                let angular_half_range = PI / 2.0 + alpha - (scan_diameter / 2.0 / center_detector_length).acos();
                let angular_det_inc = 2.0 * angular_half_range / det_len_lin * det_inc_lin;
                let angular_start = -((n_det / 2) as f64) * angular_det_inc;
                (DetParam::Angular { start: angular_start, inc: angular_det_inc }, alpha)
            }
            Geometry::Linogram => {
                return Err(CoreError::InvalidGeometry(
                    "ctsim-scanner cannot collect a linogram scan; only parallel/equilinear/equiangular are supported".into(),
                ))
            }
        };

        Ok(Self {
            geometry,
            n_view,
            n_det,
            n_sample,
            rot_start,
            rot_inc: rot_total / n_view as f64,
            focal_length,
            center_detector_length,
            source_detector_length,
            scan_diameter,
            view_diameter: scan_diameter,
            fan_beam_angle,
            det_param,
        })
    }

    /// Collects a full sinogram of `phm` across every view.
    pub fn collect_projections(&self, phm: &Phantom) -> Projections {
        let mut proj = Projections::new(self.geometry, self.n_view, self.n_det);
        proj.det_start = match self.det_param {
            DetParam::Linear { start, .. } => start,
            DetParam::Angular { start, .. } => start,
        };
        proj.det_inc = match self.det_param {
            DetParam::Linear { inc, .. } => inc,
            DetParam::Angular { inc, .. } => inc,
        };
        proj.rot_start = self.rot_start;
        proj.rot_inc = self.rot_inc;
        proj.focal_length = self.focal_length;
        proj.source_detector_length = self.source_detector_length;
        proj.view_diameter = self.view_diameter;
        proj.fan_beam_angle = self.fan_beam_angle;

        for v in 0..self.n_view {
            let angle = self.rot_start + v as f64 * self.rot_inc;
            let view = self.project_single_view(phm, angle);
            *proj.view_mut(v) = view;
        }
        proj
    }

    fn project_single_view(&self, phm: &Phantom, angle: f64) -> DetectorArray {
        let mut view = DetectorArray::new(self.n_det, angle);

        if phm.composition == Composition::UnitPulse {
            view.values[(self.n_det / 2) as usize] = 1.0;
            return view;
        }

        let rot = Mat3::rotate(angle);
        let big = self.scan_diameter.max(self.source_detector_length) * 2.0 + 1.0;

        for d in 0..self.n_det {
            let mut sum = 0.0;
            for s in 0..self.n_sample {
                let (src, dst) = self.sub_ray(d, s, angle, &rot, big);
                sum += project_line(phm, src.0, src.1, dst.0, dst.1);
            }
            view.values[d as usize] = (sum / self.n_sample as f64) as f32;
        }
        view
    }

    /// The world-space endpoints of sub-ray `s` of detector cell `d`,
    /// already rotated by the current view's angle.
    fn sub_ray(&self, d: u32, s: u32, angle: f64, rot: &Mat3, big: f64) -> ((f64, f64), (f64, f64)) {
        match (self.geometry, self.det_param) {
            (Geometry::Parallel, DetParam::Linear { start, inc }) => {
                let sub_inc = inc / self.n_sample as f64;
                let t = start + d as f64 * inc - inc / 2.0 + sub_inc / 2.0 + s as f64 * sub_inc;
                let e_perp = (-angle.sin(), angle.cos());
                let e_ray = (angle.cos(), angle.sin());
                let base = (t * e_perp.0, t * e_perp.1);
                (
                    (base.0 - big * e_ray.0, base.1 - big * e_ray.1),
                    (base.0 + big * e_ray.0, base.1 + big * e_ray.1),
                )
            }
            (Geometry::Equilinear, DetParam::Linear { start, inc }) => {
                let sub_inc = inc / self.n_sample as f64;
                let t = start + d as f64 * inc - inc / 2.0 + sub_inc / 2.0 + s as f64 * sub_inc;
                let unrotated_src = (0.0, self.focal_length);
                let unrotated_dst = (t, -self.center_detector_length);
                (rot.apply(unrotated_src.0, unrotated_src.1), rot.apply(unrotated_dst.0, unrotated_dst.1))
            }
            (Geometry::Equiangular, DetParam::Angular { start, inc }) => {
                let sub_inc = inc / self.n_sample as f64;
                let gamma = start + d as f64 * inc - inc / 2.0 + sub_inc / 2.0 + s as f64 * sub_inc;
                let unrotated_src = (0.0, self.focal_length);
                let unrotated_dst = (
                    unrotated_src.0 + self.source_detector_length * gamma.sin(),
                    unrotated_src.1 - self.source_detector_length * gamma.cos(),
                );
                (rot.apply(unrotated_src.0, unrotated_src.1), rot.apply(unrotated_dst.0, unrotated_dst.1))
            }
            _ => unreachable!("det_param is set consistently with geometry in Scanner::new"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_geometry_rejects_too_wide_a_scan_diameter() {
        let err = Scanner::new(Geometry::Equilinear, 10.0, 64, 32, 1, 0.0, 2.0 * PI, 4.0, 4.0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidGeometry(_)));
    }

    #[test]
    fn unit_pulse_composition_bypasses_integration() {
        let scanner = Scanner::new(Geometry::Parallel, 2.0, 7, 4, 1, 0.0, PI, 0.0, 0.0).unwrap();
        let phm = Phantom::unit_pulse();
        let proj = scanner.collect_projections(&phm);
        assert_eq!(proj.view(0).values[3], 1.0);
        assert_eq!(proj.view(0).values[0], 0.0);
    }

    #[test]
    fn parallel_projection_is_nonnegative_for_unit_attenuation() {
        let scanner = Scanner::new(Geometry::Parallel, 2.2, 31, 16, 2, 0.0, PI, 0.0, 0.0).unwrap();
        let phm = Phantom::shepp_logan();
        let proj = scanner.collect_projections(&phm);
        for d in 0..proj.n_det() {
            assert!(proj.view(0).values[d as usize] >= -1e-4);
        }
    }

    #[test]
    fn shepp_logan_parallel_view_zero_peaks_near_the_central_detector() {
        let scanner = Scanner::new(Geometry::Parallel, 2.2, 367, 320, 2, 0.0, PI, 0.0, 0.0).unwrap();
        let phm = Phantom::shepp_logan();
        let proj = scanner.collect_projections(&phm);
        let view = proj.view(0);
        let (peak_idx, _) = view
            .values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        let center_idx = (-proj.det_start / proj.det_inc).round() as i64;
        assert!((peak_idx as i64 - center_idx).abs() <= 1, "peak at {peak_idx}, center at {center_idx}");
    }
}
