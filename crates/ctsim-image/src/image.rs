//! `ImageFile`: arithmetic, unary ops, FFT, resampling and statistics on
//! the pixel plane backing an [`Array2dFile`].

use crate::error::{Error, Result};
use ctsim_io::{Array2d, Array2dFile, Array2dFileLabel, DataType};
use ctsim_support::{shuffle_fourier_to_natural, shuffle_natural_to_fourier, CoreError};
use num_complex::Complex64;
use rustfft::FftPlanner;
use std::io::{Read, Seek, Write};

#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub inner: Array2dFile,
}

fn check_dims(a: &ImageFile, b: &ImageFile) -> Result<()> {
    if a.nx() != b.nx() || a.ny() != b.ny() {
        return Err(Error::Core(CoreError::DimensionMismatch {
            a: (a.nx(), a.ny()),
            b: (b.nx(), b.ny()),
        }));
    }
    Ok(())
}

impl ImageFile {
    pub fn new_real(nx: u32, ny: u32) -> Self {
        Self { inner: Array2dFile::new_real(nx, ny) }
    }

    pub fn new_complex(nx: u32, ny: u32) -> Self {
        Self { inner: Array2dFile::new_complex(nx, ny) }
    }

    pub fn nx(&self) -> u32 {
        self.inner.nx()
    }

    pub fn ny(&self) -> u32 {
        self.inner.ny()
    }

    pub fn is_complex(&self) -> bool {
        self.inner.data_type == DataType::Complex
    }

    pub fn add_label(&mut self, label: Array2dFileLabel) {
        self.inner.add_label(label);
    }

    pub fn write<W: Write + Seek>(&self, w: &mut W) -> Result<()> {
        self.inner.write(w)?;
        Ok(())
    }

    pub fn read<R: Read + Seek>(r: &mut R) -> Result<Self> {
        Ok(Self { inner: Array2dFile::read(r)? })
    }

    /// Allocates a zeroed imaginary plane if one isn't present yet,
    /// without disturbing any existing imaginary data.
    fn ensure_complex(&mut self) {
        if self.inner.imaginary.is_none() {
            self.inner.imaginary = Some(Array2d::new(self.nx(), self.ny()));
        }
        self.inner.data_type = DataType::Complex;
    }

    fn elementwise(a: &ImageFile, b: &ImageFile, op: impl Fn(f64, f64) -> f64) -> Result<ImageFile> {
        check_dims(a, b)?;
        let (nx, ny) = (a.nx(), a.ny());
        let mut out = ImageFile::new_real(nx, ny);
        for ix in 0..nx {
            for iy in 0..ny {
                out.inner.real.set(ix, iy, op(*a.inner.real.get(ix, iy), *b.inner.real.get(ix, iy)));
            }
        }
        if a.is_complex() && b.is_complex() {
            out.ensure_complex();
            let ai = a.inner.imaginary.as_ref().unwrap();
            let bi = b.inner.imaginary.as_ref().unwrap();
            let out_imag = out.inner.imaginary.as_mut().unwrap();
            for ix in 0..nx {
                for iy in 0..ny {
                    out_imag.set(ix, iy, op(*ai.get(ix, iy), *bi.get(ix, iy)));
                }
            }
        }
        Ok(out)
    }

    pub fn add(a: &ImageFile, b: &ImageFile) -> Result<ImageFile> {
        Self::elementwise(a, b, |x, y| x + y)
    }

    pub fn sub(a: &ImageFile, b: &ImageFile) -> Result<ImageFile> {
        Self::elementwise(a, b, |x, y| x - y)
    }

    pub fn mul(a: &ImageFile, b: &ImageFile) -> Result<ImageFile> {
        Self::elementwise(a, b, |x, y| x * y)
    }

    /// Element-wise division; a zero divisor yields 0 rather than `inf`/`NaN`.
    pub fn div(a: &ImageFile, b: &ImageFile) -> Result<ImageFile> {
        Self::elementwise(a, b, |x, y| if y == 0.0 { 0.0 } else { x / y })
    }

    fn map_planes(&self, f: impl Fn(f64) -> f64) -> ImageFile {
        let (nx, ny) = (self.nx(), self.ny());
        let mut out = self.clone();
        for ix in 0..nx {
            for iy in 0..ny {
                let v = *out.inner.real.get(ix, iy);
                out.inner.real.set(ix, iy, f(v));
            }
        }
        if let Some(imag) = out.inner.imaginary.as_mut() {
            for ix in 0..nx {
                for iy in 0..ny {
                    let v = *imag.get(ix, iy);
                    imag.set(ix, iy, f(v));
                }
            }
        }
        out
    }

    pub fn sqrt(&self) -> ImageFile {
        self.map_planes(|x| if x < 0.0 { 0.0 } else { x.sqrt() })
    }

    pub fn log(&self) -> ImageFile {
        self.map_planes(|x| if x <= 0.0 { 0.0 } else { x.ln() })
    }

    pub fn exp(&self) -> ImageFile {
        self.map_planes(f64::exp)
    }

    pub fn square(&self) -> ImageFile {
        self.map_planes(|x| x * x)
    }

    /// `1/x`, with a zero input mapped to 0 rather than `inf`.
    pub fn invert(&self) -> ImageFile {
        self.map_planes(|x| if x == 0.0 { 0.0 } else { 1.0 / x })
    }

    fn complex_unary(&self, f: impl Fn(f64, f64) -> f64) -> ImageFile {
        let (nx, ny) = (self.nx(), self.ny());
        let mut out = ImageFile::new_real(nx, ny);
        for ix in 0..nx {
            for iy in 0..ny {
                let re = *self.inner.real.get(ix, iy);
                let im = self.inner.imaginary.as_ref().map(|p| *p.get(ix, iy)).unwrap_or(0.0);
                out.inner.real.set(ix, iy, f(re, im));
            }
        }
        out
    }

    pub fn magnitude(&self) -> ImageFile {
        self.complex_unary(|re, im| (re * re + im * im).sqrt())
    }

    pub fn phase(&self) -> ImageFile {
        self.complex_unary(|re, im| im.atan2(re))
    }

    pub fn real_part(&self) -> ImageFile {
        self.complex_unary(|re, _im| re)
    }

    pub fn imaginary_part(&self) -> ImageFile {
        self.complex_unary(|_re, im| im)
    }

    fn fft1d(signal: &mut [Complex64], inverse: bool) {
        let mut planner = FftPlanner::new();
        let fft = if inverse {
            planner.plan_fft_inverse(signal.len())
        } else {
            planner.plan_fft_forward(signal.len())
        };
        fft.process(signal);
        if inverse {
            let n = signal.len() as f64;
            for c in signal.iter_mut() {
                *c /= n;
            }
        }
    }

    /// FFTs (or inverse-FFTs) every column (fixed `ix`, varying `iy`) in
    /// place.
    fn transform_cols(&mut self, inverse: bool) {
        self.ensure_complex();
        let (nx, ny) = (self.nx(), self.ny());
        for ix in 0..nx {
            let mut buf: Vec<Complex64> = (0..ny)
                .map(|iy| Complex64::new(*self.inner.real.get(ix, iy), *self.inner.imaginary.as_ref().unwrap().get(ix, iy)))
                .collect();
            Self::fft1d(&mut buf, inverse);
            for (iy, c) in buf.into_iter().enumerate() {
                self.inner.real.set(ix, iy as u32, c.re);
                self.inner.imaginary.as_mut().unwrap().set(ix, iy as u32, c.im);
            }
        }
    }

    /// FFTs (or inverse-FFTs) every row (fixed `iy`, varying `ix`) in
    /// place.
    fn transform_rows(&mut self, inverse: bool) {
        self.ensure_complex();
        let (nx, ny) = (self.nx(), self.ny());
        for iy in 0..ny {
            let mut buf: Vec<Complex64> = (0..nx)
                .map(|ix| Complex64::new(*self.inner.real.get(ix, iy), *self.inner.imaginary.as_ref().unwrap().get(ix, iy)))
                .collect();
            Self::fft1d(&mut buf, inverse);
            for (ix, c) in buf.into_iter().enumerate() {
                self.inner.real.set(ix as u32, iy, c.re);
                self.inner.imaginary.as_mut().unwrap().set(ix as u32, iy, c.im);
            }
        }
    }

    pub fn fft_cols(&mut self) {
        self.transform_cols(false);
    }

    pub fn ifft_cols(&mut self) {
        self.transform_cols(true);
    }

    pub fn fft_rows(&mut self) {
        self.transform_rows(false);
    }

    pub fn ifft_rows(&mut self) {
        self.transform_rows(true);
    }

    /// Full 2-D transform: every column then every row, matching the
    /// natural/Fourier shuffle's documented column-then-row order.
    pub fn fft(&mut self) {
        self.fft_cols();
        self.fft_rows();
    }

    pub fn ifft(&mut self) {
        self.ifft_rows();
        self.ifft_cols();
    }

    /// Shuffles both axes from natural (DC-first) order to centered order,
    /// in place.
    pub fn shuffle_to_centered(&mut self) {
        let (nx, ny) = (self.nx(), self.ny());
        self.ensure_complex();
        for ix in 0..nx {
            let mut col: Vec<Complex64> =
                (0..ny).map(|iy| Complex64::new(*self.inner.real.get(ix, iy), *self.inner.imaginary.as_ref().unwrap().get(ix, iy))).collect();
            shuffle_natural_to_fourier(&mut col);
            for (iy, c) in col.into_iter().enumerate() {
                self.inner.real.set(ix, iy as u32, c.re);
                self.inner.imaginary.as_mut().unwrap().set(ix, iy as u32, c.im);
            }
        }
        for iy in 0..ny {
            let mut row: Vec<Complex64> =
                (0..nx).map(|ix| Complex64::new(*self.inner.real.get(ix, iy), *self.inner.imaginary.as_ref().unwrap().get(ix, iy))).collect();
            shuffle_natural_to_fourier(&mut row);
            for (ix, c) in row.into_iter().enumerate() {
                self.inner.real.set(ix as u32, iy, c.re);
                self.inner.imaginary.as_mut().unwrap().set(ix as u32, iy, c.im);
            }
        }
    }

    pub fn shuffle_to_natural(&mut self) {
        let (nx, ny) = (self.nx(), self.ny());
        self.ensure_complex();
        for iy in 0..ny {
            let mut row: Vec<Complex64> =
                (0..nx).map(|ix| Complex64::new(*self.inner.real.get(ix, iy), *self.inner.imaginary.as_ref().unwrap().get(ix, iy))).collect();
            shuffle_fourier_to_natural(&mut row);
            for (ix, c) in row.into_iter().enumerate() {
                self.inner.real.set(ix as u32, iy, c.re);
                self.inner.imaginary.as_mut().unwrap().set(ix as u32, iy, c.im);
            }
        }
        for ix in 0..nx {
            let mut col: Vec<Complex64> =
                (0..ny).map(|iy| Complex64::new(*self.inner.real.get(ix, iy), *self.inner.imaginary.as_ref().unwrap().get(ix, iy))).collect();
            shuffle_fourier_to_natural(&mut col);
            for (iy, c) in col.into_iter().enumerate() {
                self.inner.real.set(ix, iy as u32, c.re);
                self.inner.imaginary.as_mut().unwrap().set(ix, iy as u32, c.im);
            }
        }
    }

    /// Bilinear resample to `(new_nx, new_ny)`.
    pub fn scale_image(&self, new_nx: u32, new_ny: u32) -> ImageFile {
        let mut out = ImageFile::new_real(new_nx, new_ny);
        let (nx, ny) = (self.nx(), self.ny());
        if new_nx == 0 || new_ny == 0 || nx == 0 || ny == 0 {
            return out;
        }
        let sx = nx as f64 / new_nx as f64;
        let sy = ny as f64 / new_ny as f64;
        for ox in 0..new_nx {
            let fx = ((ox as f64 + 0.5) * sx - 0.5).clamp(0.0, (nx - 1) as f64);
            let ix0 = fx.floor() as u32;
            let ix1 = (ix0 + 1).min(nx - 1);
            let tx = fx - ix0 as f64;
            for oy in 0..new_ny {
                let fy = ((oy as f64 + 0.5) * sy - 0.5).clamp(0.0, (ny - 1) as f64);
                let iy0 = fy.floor() as u32;
                let iy1 = (iy0 + 1).min(ny - 1);
                let ty = fy - iy0 as f64;

                let v00 = *self.inner.real.get(ix0, iy0);
                let v10 = *self.inner.real.get(ix1, iy0);
                let v01 = *self.inner.real.get(ix0, iy1);
                let v11 = *self.inner.real.get(ix1, iy1);
                let top = v00 * (1.0 - tx) + v10 * tx;
                let bottom = v01 * (1.0 - tx) + v11 * tx;
                out.inner.real.set(ox, oy, top * (1.0 - ty) + bottom * ty);
            }
        }
        out
    }

    pub fn statistics(&self) -> Statistics {
        let values = self.inner.real.as_slice();
        statistics_of(values)
    }

    /// `d` = RMS difference, `r` = cosine-similarity correlation, `e` =
    /// max absolute error, all over the real plane.
    pub fn comparative_statistics(a: &ImageFile, b: &ImageFile) -> Result<ComparativeStatistics> {
        check_dims(a, b)?;
        let av = a.inner.real.as_slice();
        let bv = b.inner.real.as_slice();
        let n = av.len() as f64;
        let mut sum_sq_diff = 0.0;
        let mut sum_ab = 0.0;
        let mut sum_aa = 0.0;
        let mut sum_bb = 0.0;
        let mut max_err = 0.0f64;
        for (&x, &y) in av.iter().zip(bv.iter()) {
            let diff = x - y;
            sum_sq_diff += diff * diff;
            sum_ab += x * y;
            sum_aa += x * x;
            sum_bb += y * y;
            max_err = max_err.max(diff.abs());
        }
        let d = (sum_sq_diff / n).sqrt();
        let denom = (sum_aa * sum_bb).sqrt();
        let r = if denom == 0.0 { 0.0 } else { sum_ab / denom };
        Ok(ComparativeStatistics { d, r, e: max_err })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub mode: f64,
    pub median: f64,
    pub stddev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparativeStatistics {
    pub d: f64,
    pub r: f64,
    pub e: f64,
}

fn statistics_of(values: &[f64]) -> Statistics {
    let n = values.len();
    if n == 0 {
        return Statistics { min: 0.0, max: 0.0, mean: 0.0, mode: 0.0, median: 0.0, stddev: 0.0 };
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / n as f64;

    const BINS: usize = 256;
    let mode = if max > min {
        let mut hist = [0usize; BINS];
        let scale = BINS as f64 / (max - min);
        for &v in values {
            let mut bin = ((v - min) * scale) as usize;
            if bin >= BINS {
                bin = BINS - 1;
            }
            hist[bin] += 1;
        }
        let (best_bin, _) = hist.iter().enumerate().max_by_key(|&(_, &count)| count).unwrap();
        min + (best_bin as f64 + 0.5) / scale
    } else {
        min
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let median = if n % 2 == 1 { sorted[n / 2] } else { (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0 };

    let variance = values.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    let stddev = variance.sqrt();

    Statistics { min, max, mean, mode, median, stddev }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_sums_matching_pixels() {
        let mut a = ImageFile::new_real(2, 2);
        let mut b = ImageFile::new_real(2, 2);
        a.inner.real.set(0, 0, 1.0);
        b.inner.real.set(0, 0, 2.0);
        let sum = ImageFile::add(&a, &b).unwrap();
        assert_eq!(*sum.inner.real.get(0, 0), 3.0);
    }

    #[test]
    fn mismatched_dims_are_rejected() {
        let a = ImageFile::new_real(2, 2);
        let b = ImageFile::new_real(3, 2);
        assert!(ImageFile::add(&a, &b).is_err());
    }

    #[test]
    fn division_by_zero_yields_zero() {
        let mut a = ImageFile::new_real(1, 1);
        let b = ImageFile::new_real(1, 1);
        a.inner.real.set(0, 0, 5.0);
        let out = ImageFile::div(&a, &b).unwrap();
        assert_eq!(*out.inner.real.get(0, 0), 0.0);
    }

    #[test]
    fn ifft_of_fft_recovers_the_original_image() {
        let mut img = ImageFile::new_real(4, 8);
        for ix in 0..4 {
            for iy in 0..8 {
                img.inner.real.set(ix, iy, (ix * 8 + iy) as f64);
            }
        }
        let original = img.clone();
        img.fft();
        img.ifft();
        for ix in 0..4 {
            for iy in 0..8 {
                assert!((img.inner.real.get(ix, iy) - original.inner.real.get(ix, iy)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn ifft_of_fft_recovers_a_vector_for_even_and_odd_lengths() {
        for n in [64u32, 63u32] {
            let mut img = ImageFile::new_real(n, 1);
            for ix in 0..n {
                img.inner.real.set(ix, 0, (ix as f64 * 0.37).sin());
            }
            let original = img.clone();
            img.fft_rows();
            img.ifft_rows();
            for ix in 0..n {
                assert!(
                    (img.inner.real.get(ix, 0) - original.inner.real.get(ix, 0)).abs() < 1e-10,
                    "n={n} ix={ix}"
                );
            }
        }
    }

    #[test]
    fn statistics_match_a_known_small_sample() {
        let mut img = ImageFile::new_real(2, 2);
        img.inner.real.set(0, 0, 1.0);
        img.inner.real.set(1, 0, 2.0);
        img.inner.real.set(0, 1, 3.0);
        img.inner.real.set(1, 1, 4.0);
        let stats = img.statistics();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn scale_image_preserves_a_uniform_field() {
        let img = ImageFile::new_real(4, 4);
        let mut uniform = img.clone();
        for ix in 0..4 {
            for iy in 0..4 {
                uniform.inner.real.set(ix, iy, 7.0);
            }
        }
        let scaled = uniform.scale_image(8, 8);
        for ix in 0..8 {
            for iy in 0..8 {
                assert!((scaled.inner.real.get(ix, iy) - 7.0).abs() < 1e-9);
            }
        }
    }
}
