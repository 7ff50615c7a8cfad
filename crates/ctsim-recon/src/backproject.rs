//! The `Backproject*` family: one pixel-update formula per scanner
//! geometry, dispatched through a tagged-variant algorithm choice instead
//! of four leaf subclasses.

use ctsim_io::Array2d;
use ctsim_projections::Geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackprojectAlgorithm {
    /// Recompute `L = x cos(theta) + y sin(theta)` and
    /// `M = x sin(theta) - y cos(theta)` from scratch at every pixel.
    Trig,
    /// Precompute each pixel's polar `(r, phi)` once per reconstruction;
    /// per view, `L = r cos(phi - theta)`, `M = r sin(theta - phi)`.
    Table,
    /// Walk each image row with `L`/`M` updated by a constant per-pixel
    /// increment instead of being recomputed.
    Diff,
    /// Same incremental update as `Diff`. The original used fixed-point
    /// accumulation here for speed; plain `f64` gives no room to improve
    /// on that in a Rust port, so this variant reuses `Diff`'s code path.
    Idiff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Nearest,
    Linear,
    Cubic,
    /// Sample the pre-interpolated (zero-stuffed spectrum) buffer
    /// directly at `round(s * preinterp_factor)`.
    FreqPreinterpolation,
}

/// Per-pixel world-to-detector-index geometry, built from `Projections`
/// metadata and reused across every view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryParams {
    pub geometry: Geometry,
    pub focal_length: f64,
    pub det_inc: f64,
    pub n_det: u32,
}

impl GeometryParams {
    fn det_center(&self) -> f64 {
        (self.n_det / 2) as f64
    }

    /// `(detector index, backprojection weight)` for world point `(x, y)`
    /// at view angle `theta`, given the affine base terms `l`/`m`.
    fn index_and_weight(&self, l: f64, m: f64) -> (f64, f64) {
        match self.geometry {
            Geometry::Parallel | Geometry::Linogram => (self.det_center() + l / self.det_inc, 1.0),
            Geometry::Equilinear => {
                let denom = self.focal_length - m;
                let s = self.focal_length * l / denom;
                let weight = (self.focal_length / denom).powi(2);
                (self.det_center() + s / self.det_inc, weight)
            }
            Geometry::Equiangular => {
                let denom = self.focal_length - m;
                let gamma = l.atan2(denom);
                let weight = 1.0 / (denom * denom + l * l);
                (self.det_center() + gamma / self.det_inc, weight)
            }
        }
    }
}

/// Per-pixel `(r, phi)` cache for [`BackprojectAlgorithm::Table`].
#[derive(Debug, Clone)]
pub struct PolarTable {
    r: Array2d<f64>,
    phi: Array2d<f64>,
}

impl PolarTable {
    pub fn build(nx: u32, ny: u32, min_x: f64, dx: f64, min_y: f64, dy: f64) -> Self {
        let mut r = Array2d::new(nx, ny);
        let mut phi = Array2d::new(nx, ny);
        for ix in 0..nx {
            let x = min_x + (ix as f64 + 0.5) * dx;
            for iy in 0..ny {
                let y = min_y + (iy as f64 + 0.5) * dy;
                r.set(ix, iy, (x * x + y * y).sqrt());
                phi.set(ix, iy, y.atan2(x));
            }
        }
        Self { r, phi }
    }
}

fn cubic_interpolate(p: [f64; 4], t: f64) -> f64 {
    p[1] + 0.5 * t * (p[2] - p[0] + t * (2.0 * p[0] - 5.0 * p[1] + 4.0 * p[2] - p[3] + t * (3.0 * (p[1] - p[2]) + p[3] - p[0])))
}

/// Samples filtered detector values at fractional index `s`, where `s` is
/// expressed in the *original* (un-preinterpolated) detector spacing.
/// Out-of-range `s` is silently treated as 0 per the original's documented
/// behavior.
fn sample(filtered: &[f32], s: f64, interp: Interpolation, preinterp_factor: u32) -> f64 {
    match interp {
        Interpolation::FreqPreinterpolation => {
            let idx = (s * preinterp_factor as f64).round();
            if idx < 0.0 || idx as usize >= filtered.len() {
                0.0
            } else {
                filtered[idx as usize] as f64
            }
        }
        Interpolation::Nearest => {
            let n = filtered.len();
            if s < -0.5 || s > n as f64 - 0.5 {
                return 0.0;
            }
            let idx = s.round();
            if idx < 0.0 || idx as usize >= n {
                0.0
            } else {
                filtered[idx as usize] as f64
            }
        }
        Interpolation::Linear => {
            let n = filtered.len();
            if n == 0 || s < 0.0 || s > (n - 1) as f64 {
                return 0.0;
            }
            let i0 = s.floor() as usize;
            let i1 = (i0 + 1).min(n - 1);
            let a = s - i0 as f64;
            (1.0 - a) * filtered[i0] as f64 + a * filtered[i1] as f64
        }
        Interpolation::Cubic => {
            let n = filtered.len() as i64;
            if n == 0 || s < 0.0 || s > (n - 1) as f64 {
                return 0.0;
            }
            let i1 = s.floor() as i64;
            let a = s - i1 as f64;
            if i1 - 1 < 0 || i1 + 2 >= n {
                let i0 = i1.max(0) as usize;
                let i1u = ((i0 + 1) as i64).min(n - 1) as usize;
                (1.0 - a) * filtered[i0] as f64 + a * filtered[i1u] as f64
            } else {
                let p = [
                    filtered[(i1 - 1) as usize] as f64,
                    filtered[i1 as usize] as f64,
                    filtered[(i1 + 1) as usize] as f64,
                    filtered[(i1 + 2) as usize] as f64,
                ];
                cubic_interpolate(p, a)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Backprojector {
    pub algorithm: BackprojectAlgorithm,
    pub interpolation: Interpolation,
    polar_table: Option<PolarTable>,
}

impl Backprojector {
    pub fn new(algorithm: BackprojectAlgorithm, interpolation: Interpolation) -> Self {
        Self { algorithm, interpolation, polar_table: None }
    }

    /// Builds the per-pixel `(r, phi)` cache `Table` needs. A no-op for
    /// the other three algorithms.
    pub fn prepare(&mut self, nx: u32, ny: u32, min_x: f64, dx: f64, min_y: f64, dy: f64) {
        if self.algorithm == BackprojectAlgorithm::Table {
            self.polar_table = Some(PolarTable::build(nx, ny, min_x, dx, min_y, dy));
        }
    }

    /// Adds one filtered view's contribution into `image`.
    #[allow(clippy::too_many_arguments)]
    pub fn backproject_view(
        &self,
        image: &mut Array2d<f64>,
        filtered: &[f32],
        preinterp_factor: u32,
        view_angle: f64,
        geom: &GeometryParams,
        nx: u32,
        ny: u32,
        min_x: f64,
        dx: f64,
        min_y: f64,
        dy: f64,
    ) {
        let cos_t = view_angle.cos();
        let sin_t = view_angle.sin();

        match self.algorithm {
            BackprojectAlgorithm::Table => {
                let table = self.polar_table.as_ref().expect("prepare() must run before Table backprojection");
                for ix in 0..nx {
                    for iy in 0..ny {
                        let r = *table.r.get(ix, iy);
                        let phi = *table.phi.get(ix, iy);
                        let l = r * (phi - view_angle).cos();
                        let m = r * (view_angle - phi).sin();
                        let (s, weight) = geom.index_and_weight(l, m);
                        let v = sample(filtered, s, self.interpolation, preinterp_factor);
                        *image.get_mut(ix, iy) += weight * v;
                    }
                }
            }
            BackprojectAlgorithm::Diff | BackprojectAlgorithm::Idiff => {
                for iy in 0..ny {
                    let y = min_y + (iy as f64 + 0.5) * dy;
                    let x0 = min_x + 0.5 * dx;
                    let mut l = x0 * cos_t + y * sin_t;
                    let mut m = x0 * sin_t - y * cos_t;
                    let dl = dx * cos_t;
                    let dm = dx * sin_t;
                    for ix in 0..nx {
                        let (s, weight) = geom.index_and_weight(l, m);
                        let v = sample(filtered, s, self.interpolation, preinterp_factor);
                        *image.get_mut(ix, iy) += weight * v;
                        l += dl;
                        m += dm;
                    }
                }
            }
            BackprojectAlgorithm::Trig => {
                for ix in 0..nx {
                    let x = min_x + (ix as f64 + 0.5) * dx;
                    for iy in 0..ny {
                        let y = min_y + (iy as f64 + 0.5) * dy;
                        let l = x * cos_t + y * sin_t;
                        let m = x * sin_t - y * cos_t;
                        let (s, weight) = geom.index_and_weight(l, m);
                        let v = sample(filtered, s, self.interpolation, preinterp_factor);
                        *image.get_mut(ix, iy) += weight * v;
                    }
                }
            }
        }
    }
}

/// Multiplies the accumulated image by `rot_inc` exactly once. Calling
/// this twice on the same accumulator is a protocol violation — the image
/// would be scaled twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostProcessing {
    applied: bool,
}

impl PostProcessing {
    pub fn apply(&mut self, image: &mut Array2d<f64>, rot_inc: f64) -> Result<(), ctsim_support::CoreError> {
        if self.applied {
            return Err(ctsim_support::CoreError::InvalidArgument("PostProcessing applied more than once".into()));
        }
        for v in image.as_mut_slice() {
            *v *= rot_inc;
        }
        self.applied = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(geometry: Geometry) -> GeometryParams {
        GeometryParams { geometry, focal_length: 10.0, det_inc: 0.1, n_det: 101 }
    }

    #[test]
    fn trig_and_diff_agree_on_parallel_geometry() {
        let filtered: Vec<f32> = (0..101).map(|i| (i as f32 - 50.0) * 0.01).collect();
        let g = geom(Geometry::Parallel);
        let mut img_trig = Array2d::new(8, 8);
        let mut img_diff = Array2d::new(8, 8);
        let trig = Backprojector::new(BackprojectAlgorithm::Trig, Interpolation::Linear);
        let diff = Backprojector::new(BackprojectAlgorithm::Diff, Interpolation::Linear);
        trig.backproject_view(&mut img_trig, &filtered, 1, 0.3, &g, 8, 8, -1.0, 0.25, -1.0, 0.25);
        diff.backproject_view(&mut img_diff, &filtered, 1, 0.3, &g, 8, 8, -1.0, 0.25, -1.0, 0.25);
        for ix in 0..8 {
            for iy in 0..8 {
                assert!((img_trig.get(ix, iy) - img_diff.get(ix, iy)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn table_matches_trig_on_equiangular_geometry() {
        let filtered: Vec<f32> = (0..101).map(|i| ((i as f32 - 50.0) * 0.01).sin()).collect();
        let g = geom(Geometry::Equiangular);
        let mut img_trig = Array2d::new(6, 6);
        let mut img_table = Array2d::new(6, 6);
        let trig = Backprojector::new(BackprojectAlgorithm::Trig, Interpolation::Linear);
        let mut table = Backprojector::new(BackprojectAlgorithm::Table, Interpolation::Linear);
        table.prepare(6, 6, -1.0, 1.0 / 3.0, -1.0, 1.0 / 3.0);
        trig.backproject_view(&mut img_trig, &filtered, 1, 0.7, &g, 6, 6, -1.0, 1.0 / 3.0, -1.0, 1.0 / 3.0);
        table.backproject_view(&mut img_table, &filtered, 1, 0.7, &g, 6, 6, -1.0, 1.0 / 3.0, -1.0, 1.0 / 3.0);
        for ix in 0..6 {
            for iy in 0..6 {
                assert!((img_trig.get(ix, iy) - img_table.get(ix, iy)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn post_processing_rejects_a_second_call() {
        let mut pp = PostProcessing::default();
        let mut image = Array2d::new(2, 2);
        pp.apply(&mut image, 1.0).unwrap();
        assert!(pp.apply(&mut image, 1.0).is_err());
    }

    #[test]
    fn out_of_range_index_samples_to_zero() {
        let filtered = vec![1.0f32; 10];
        assert_eq!(sample(&filtered, 100.0, Interpolation::Linear, 1), 0.0);
        assert_eq!(sample(&filtered, -5.0, Interpolation::Nearest, 1), 0.0);
    }
}
