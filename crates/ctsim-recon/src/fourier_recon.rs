//! Direct-Fourier reconstruction: polar-to-rectangular resampling of the
//! sinogram and its Fourier-domain ("gridding") counterpart.

use ctsim_filter::add_zeropad_factor;
use ctsim_image::ImageFile;
use ctsim_projections::Projections;
use ctsim_support::{shuffle_fourier_to_natural, shuffle_natural_to_fourier};
use num_complex::Complex64;
use rustfft::FftPlanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarInterp {
    Nearest,
    Bilinear,
    /// No 4-point stencil is defined over a one-dimensional view axis
    /// here; falls back to `Bilinear`.
    Bicubic,
}

fn sample_view_axis(proj: &Projections, det: u32, view_f: f64, interp: PolarInterp) -> f32 {
    let n_view = proj.n_view();
    if n_view == 0 {
        return 0.0;
    }
    match interp {
        PolarInterp::Nearest => {
            let v = (view_f.round() as i64).rem_euclid(n_view as i64) as u32;
            proj.view(v).values[det as usize]
        }
        PolarInterp::Bilinear | PolarInterp::Bicubic => {
            let v0 = (view_f.floor() as i64).rem_euclid(n_view as i64) as u32;
            let v1 = (v0 + 1) % n_view;
            let t = view_f - view_f.floor();
            let a = proj.view(v0).values[det as usize];
            let b = proj.view(v1).values[det as usize];
            a + ((b - a) as f64 * t) as f32
        }
    }
}

/// Resamples the sinogram onto a rectangular `(t, theta)` grid: the image
/// column is the detector index, and the row is the view index after
/// unwrapping view angle into `n_theta` uniform steps over `[0, 2*pi)`.
pub fn convert_polar(proj: &Projections, n_theta: u32, interp: PolarInterp) -> ImageFile {
    let n_det = proj.n_det();
    let mut out = ImageFile::new_real(n_det, n_theta);
    if proj.rot_inc.abs() < 1e-12 || n_det == 0 {
        return out;
    }
    for j in 0..n_theta {
        let theta = j as f64 * std::f64::consts::TAU / n_theta as f64;
        let view_f = (theta - proj.rot_start) / proj.rot_inc;
        for d in 0..n_det {
            let v = sample_view_axis(proj, d, view_f, interp);
            out.inner.real.set(d, j, v as f64);
        }
    }
    out
}

/// Per-view FFT of the (zero-padded) sinogram rows, centered to Fourier
/// order, ready for polar-to-Cartesian regridding.
fn view_spectra(proj: &Projections, zeropad: u32) -> (Vec<Vec<Complex64>>, usize) {
    let n_det = proj.n_det() as usize;
    let padded_n = add_zeropad_factor(n_det, zeropad);
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(padded_n);
    let spectra = (0..proj.n_view())
        .map(|v| {
            let mut buf: Vec<Complex64> = proj.view(v).values.iter().map(|&x| Complex64::new(x as f64, 0.0)).collect();
            buf.resize(padded_n, Complex64::new(0.0, 0.0));
            fft.process(&mut buf);
            shuffle_natural_to_fourier(&mut buf);
            buf
        })
        .collect();
    (spectra, padded_n)
}

fn sample_spectrum(spectra: &[Vec<Complex64>], padded_n: usize, det_inc: f64, view_f: f64, u: f64, interp: PolarInterp) -> Complex64 {
    let n_view = spectra.len();
    if n_view == 0 {
        return Complex64::new(0.0, 0.0);
    }
    let idx_f = u * (padded_n as f64 * det_inc) + (padded_n / 2) as f64;
    if idx_f < 0.0 || idx_f > (padded_n - 1) as f64 {
        return Complex64::new(0.0, 0.0);
    }
    let sample_at = |v: u32, idx_f: f64| -> Complex64 {
        match interp {
            PolarInterp::Nearest => spectra[v as usize][idx_f.round() as usize],
            PolarInterp::Bilinear | PolarInterp::Bicubic => {
                let i0 = idx_f.floor() as usize;
                let i1 = (i0 + 1).min(padded_n - 1);
                let t = idx_f - i0 as f64;
                spectra[v as usize][i0] * (1.0 - t) + spectra[v as usize][i1] * t
            }
        }
    };
    match interp {
        PolarInterp::Nearest => {
            let v = (view_f.round() as i64).rem_euclid(n_view as i64) as u32;
            sample_at(v, idx_f)
        }
        PolarInterp::Bilinear | PolarInterp::Bicubic => {
            let v0 = (view_f.floor() as i64).rem_euclid(n_view as i64) as u32;
            let v1 = (v0 + 1) % n_view as u32;
            let t = view_f - view_f.floor();
            sample_at(v0, idx_f) * (1.0 - t) + sample_at(v1, idx_f) * t
        }
    }
}

/// Direct-Fourier reconstruction: FFTs each view, regrids the polar
/// Fourier samples onto a Cartesian `nx x ny` grid using the central-slice
/// theorem (reflecting `theta` by `pi` and negating `u` for angles outside
/// the sinogram's collected span), then 2-D inverse-FFTs and takes the
/// magnitude.
///
/// The exact regridding kernel isn't in the surviving original source;
/// this uses the standard nearest/bilinear polar-to-Cartesian gridding
/// technique, documented as an invented-but-consistent resolution.
pub fn convert_fft_polar(proj: &Projections, nx: u32, ny: u32, interp: PolarInterp, zeropad: u32) -> ImageFile {
    let (spectra, padded_n) = view_spectra(proj, zeropad);
    let fmax = 1.0 / (2.0 * proj.det_inc.max(1e-12));
    let view_span = proj.rot_inc * proj.n_view() as f64;

    let mut out = ImageFile::new_complex(nx, ny);
    for ix in 0..nx {
        let kx = (ix as f64 / (nx - 1).max(1) as f64 * 2.0 - 1.0) * fmax;
        for iy in 0..ny {
            let ky = (iy as f64 / (ny - 1).max(1) as f64 * 2.0 - 1.0) * fmax;
            let rho = (kx * kx + ky * ky).sqrt();
            if rho > fmax {
                continue;
            }
            let mut theta = ky.atan2(kx);
            if theta < 0.0 {
                theta += std::f64::consts::TAU;
            }
            let mut rel = theta - proj.rot_start;
            rel = rel.rem_euclid(std::f64::consts::TAU);
            let (theta_used, u) = if view_span.abs() > 1e-12 && rel < view_span.abs() {
                (theta, rho)
            } else {
                (theta - std::f64::consts::PI, -rho)
            };
            let rel_used = (theta_used - proj.rot_start).rem_euclid(std::f64::consts::TAU);
            let view_f = if proj.rot_inc.abs() > 1e-12 { rel_used / proj.rot_inc } else { 0.0 };
            let c = sample_spectrum(&spectra, padded_n, proj.det_inc, view_f, u, interp);
            out.inner.real.set(ix, iy, c.re);
            out.inner.imaginary.as_mut().unwrap().set(ix, iy, c.im);
        }
    }

    out.shuffle_to_natural();
    out.ifft();
    out.magnitude()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctsim_projections::Geometry;

    #[test]
    fn convert_polar_of_a_uniform_sinogram_is_uniform() {
        let mut proj = Projections::new(Geometry::Parallel, 4, 5);
        proj.rot_start = 0.0;
        proj.rot_inc = std::f64::consts::PI / 4.0;
        for v in 0..4 {
            proj.view_mut(v).view_angle = v as f64 * proj.rot_inc;
            for d in 0..5 {
                proj.view_mut(v).values[d as usize] = 3.0;
            }
        }
        let out = convert_polar(&proj, 8, PolarInterp::Bilinear);
        for d in 0..5 {
            for j in 0..8 {
                assert!((out.inner.real.get(d, j) - 3.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn fft_polar_of_an_empty_sinogram_is_zero() {
        let mut proj = Projections::new(Geometry::Parallel, 8, 16);
        proj.det_inc = 0.05;
        proj.rot_inc = std::f64::consts::PI / 8.0;
        for v in 0..8 {
            proj.view_mut(v).view_angle = v as f64 * proj.rot_inc;
        }
        let out = convert_fft_polar(&proj, 16, 16, PolarInterp::Bilinear, 0);
        for &v in out.inner.real.as_slice() {
            assert!(v.abs() < 1e-6);
        }
    }
}
