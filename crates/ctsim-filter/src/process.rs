//! `ProcessSignal`: per-view convolution/Fourier-domain ramp filtering.

use crate::filter::SignalFilter;
use ctsim_support::{shuffle_fourier_to_natural, shuffle_natural_to_fourier};
use num_complex::Complex64;
use rustfft::FftPlanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMethod {
    Convolution,
    Fourier,
    FourierTable,
    Fft,
    Fftw,
    Rfftw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterGeneration {
    Direct,
    InverseFourier,
}

/// The smallest `2^k >= n`, then multiplied by `2^zeropad` — the
/// original program's `addZeropadFactor`.
pub fn add_zeropad_factor(n: usize, zeropad: u32) -> usize {
    let mut p = 1usize;
    while p < n {
        p <<= 1;
    }
    p << zeropad
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSignal {
    pub filter: SignalFilter,
    pub method: FilterMethod,
    pub generation: FilterGeneration,
    pub zeropad: u32,
    pub preinterp_factor: u32,
    /// Detector spacing; the convolution method's `detInc` factor and the
    /// unit that frequency-domain bins are expressed in (cycles per unit
    /// length).
    pub det_inc: f64,
}

impl ProcessSignal {
    pub fn new(filter: SignalFilter, method: FilterMethod, generation: FilterGeneration, det_inc: f64) -> Self {
        Self {
            filter,
            method,
            generation,
            zeropad: 0,
            preinterp_factor: 1,
            det_inc,
        }
    }

    /// Filters one view's detector signal, returning a vector of length
    /// `input.len() * preinterp_factor`.
    pub fn filter_signal(&self, input: &[f32]) -> Vec<f32> {
        match self.method {
            FilterMethod::Convolution => self.convolve(input),
            _ => self.filter_via_fourier(input),
        }
    }

    fn convolve(&self, input: &[f32]) -> Vec<f32> {
        let n = input.len();
        match self.generation {
            FilterGeneration::Direct => (0..n as i64)
                .map(|i| {
                    let mut sum = 0.0f64;
                    for j in 0..n as i64 {
                        sum += input[j as usize] as f64 * self.filter.spatial_response(i - j);
                    }
                    (self.det_inc * sum) as f32
                })
                .collect(),
            FilterGeneration::InverseFourier => {
                let kernel = self.kernel_via_inverse_fourier(n.max(1));
                (0..n as i64)
                    .map(|i| {
                        let mut sum = 0.0f64;
                        for j in 0..n as i64 {
                            let lag = (i - j).rem_euclid(n as i64) as usize;
                            sum += input[j as usize] as f64 * kernel[lag];
                        }
                        (self.det_inc * sum) as f32
                    })
                    .collect()
            }
        }
    }

    /// Builds the convolution kernel for [`FilterGeneration::InverseFourier`]
    /// by sampling `frequency_response` on a periodic grid and
    /// inverse-FFTing it, instead of `SignalFilter::spatial_response`'s
    /// analytic/Simpson-integrated form. Returned in natural (unshifted)
    /// order: index `k <= n/2` is lag `k`, the rest wrap to negative lags.
    fn kernel_via_inverse_fourier(&self, n: usize) -> Vec<f64> {
        let mut spectrum: Vec<Complex64> = (0..n)
            .map(|k| {
                let lag = if k <= n / 2 { k as i64 } else { k as i64 - n as i64 };
                let u = lag as f64 / (n as f64 * self.det_inc.max(1e-12));
                Complex64::new(self.filter.frequency_response(u), 0.0)
            })
            .collect();
        let mut planner = FftPlanner::new();
        planner.plan_fft_inverse(n).process(&mut spectrum);
        let scale = 1.0 / n as f64;
        spectrum.iter().map(|c| c.re * scale).collect()
    }

    /// Builds the spectral multiplier for [`FilterGeneration::InverseFourier`]
    /// by forward-FFTing `spatial_response` sampled on the same natural-order
    /// lag grid, instead of evaluating `frequency_response` per bin directly.
    fn spatial_kernel_spectrum(&self, padded_n: usize) -> Vec<Complex64> {
        let mut h: Vec<Complex64> = (0..padded_n)
            .map(|k| {
                let lag = if k <= padded_n / 2 { k as i64 } else { k as i64 - padded_n as i64 };
                Complex64::new(self.filter.spatial_response(lag), 0.0)
            })
            .collect();
        let mut planner = FftPlanner::new();
        planner.plan_fft_forward(padded_n).process(&mut h);
        h
    }

    /// Builds the zero-padded, frequency-domain filtered spectrum common
    /// to every non-convolution method. `Direct` generation evaluates
    /// `H(u)` per bin in shuffled (centered) order; `InverseFourier`
    /// generation multiplies by the forward FFT of the spatial kernel
    /// instead, in natural order (no shuffle needed for a circular
    /// convolution).
    fn filtered_spectrum(&self, input: &[f32], padded_n: usize) -> Vec<Complex64> {
        let mut buf: Vec<Complex64> = input.iter().map(|&v| Complex64::new(v as f64, 0.0)).collect();
        buf.resize(padded_n, Complex64::new(0.0, 0.0));

        let mut planner = FftPlanner::new();
        planner.plan_fft_forward(padded_n).process(&mut buf);

        match self.generation {
            FilterGeneration::Direct => {
                shuffle_natural_to_fourier(&mut buf);
                for (k, c) in buf.iter_mut().enumerate() {
                    let idx = k as i64 - (padded_n / 2) as i64;
                    let u = idx as f64 / (padded_n as f64 * self.det_inc);
                    *c *= self.filter.frequency_response(u);
                }
                shuffle_fourier_to_natural(&mut buf);
            }
            FilterGeneration::InverseFourier => {
                let h = self.spatial_kernel_spectrum(padded_n);
                for (c, hv) in buf.iter_mut().zip(h) {
                    *c *= hv;
                }
            }
        }
        buf
    }

    fn filter_via_fourier(&self, input: &[f32]) -> Vec<f32> {
        let n = input.len();
        let padded_n = add_zeropad_factor(n, self.zeropad);
        let mut spectrum = self.filtered_spectrum(input, padded_n);
        let mut planner = FftPlanner::new();

        let out_len = if self.preinterp_factor > 1 {
            let inflated_n = padded_n * self.preinterp_factor as usize;
            shuffle_natural_to_fourier(&mut spectrum);
            let mut inflated = vec![Complex64::new(0.0, 0.0); inflated_n];
            let start = inflated_n / 2 - padded_n / 2;
            inflated[start..start + padded_n].copy_from_slice(&spectrum);
            shuffle_fourier_to_natural(&mut inflated);
            planner.plan_fft_inverse(inflated_n).process(&mut inflated);
            let scale = self.preinterp_factor as f64 / inflated_n as f64;
            spectrum = inflated;
            for c in &mut spectrum {
                *c *= scale;
            }
            n * self.preinterp_factor as usize
        } else {
            planner.plan_fft_inverse(padded_n).process(&mut spectrum);
            for c in &mut spectrum {
                *c /= padded_n as f64;
            }
            n
        };

        spectrum.iter().take(out_len).map(|c| c.re as f32).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterId, FilterOptions};

    #[test]
    fn zeropad_factor_rounds_up_to_a_power_of_two() {
        assert_eq!(add_zeropad_factor(300, 0), 512);
        assert_eq!(add_zeropad_factor(256, 0), 256);
        assert_eq!(add_zeropad_factor(300, 1), 1024);
    }

    #[test]
    fn convolution_of_a_zero_signal_is_zero() {
        let filter = SignalFilter::new(FilterId::AbsBandlimit, 1.0, FilterOptions::default());
        let ps = ProcessSignal::new(filter, FilterMethod::Convolution, FilterGeneration::Direct, 0.01);
        let out = ps.filter_signal(&vec![0.0f32; 64]);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn fourier_path_preserves_signal_length() {
        let filter = SignalFilter::new(FilterId::Bandlimit, 50.0, FilterOptions::default());
        let ps = ProcessSignal::new(filter, FilterMethod::Fft, FilterGeneration::Direct, 0.02);
        let input: Vec<f32> = (0..37).map(|i| (i as f32).sin()).collect();
        let out = ps.filter_signal(&input);
        assert_eq!(out.len(), 37);
    }

    #[test]
    fn preinterpolation_scales_output_length() {
        let filter = SignalFilter::new(FilterId::Bandlimit, 50.0, FilterOptions::default());
        let mut ps = ProcessSignal::new(filter, FilterMethod::Fft, FilterGeneration::Direct, 0.02);
        ps.preinterp_factor = 2;
        let input: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let out = ps.filter_signal(&input);
        assert_eq!(out.len(), 32);
    }

    #[test]
    fn convolution_generation_changes_output() {
        let filter = SignalFilter::new(FilterId::AbsBandlimit, 50.0, FilterOptions::default());
        let direct = ProcessSignal::new(filter, FilterMethod::Convolution, FilterGeneration::Direct, 0.02);
        let inverse = ProcessSignal::new(filter, FilterMethod::Convolution, FilterGeneration::InverseFourier, 0.02);
        let input: Vec<f32> = (0..32).map(|i| (i as f32 * 0.3).sin()).collect();

        let direct_out = direct.filter_signal(&input);
        let inverse_out = inverse.filter_signal(&input);
        assert_eq!(direct_out.len(), inverse_out.len());
        assert!(
            direct_out.iter().zip(&inverse_out).any(|(a, b)| (a - b).abs() > 1e-4),
            "Direct and InverseFourier generation produced identical convolution output"
        );

        // Both approximate the same ideal ramp filter, so their outputs should
        // still correlate strongly even though the numeric path differs.
        let dot: f32 = direct_out.iter().zip(&inverse_out).map(|(a, b)| a * b).sum();
        let na: f32 = direct_out.iter().map(|v| v * v).sum::<f32>().sqrt();
        let nb: f32 = inverse_out.iter().map(|v| v * v).sum::<f32>().sqrt();
        let correlation = dot / (na * nb).max(1e-9);
        assert!(correlation > 0.8, "correlation={correlation}");
    }

    #[test]
    fn fourier_generation_changes_spectrum() {
        let filter = SignalFilter::new(FilterId::AbsBandlimit, 50.0, FilterOptions::default());
        let direct = ProcessSignal::new(filter, FilterMethod::Fft, FilterGeneration::Direct, 0.02);
        let inverse = ProcessSignal::new(filter, FilterMethod::Fft, FilterGeneration::InverseFourier, 0.02);
        let input: Vec<f32> = (0..32).map(|i| (i as f32 * 0.3).sin()).collect();

        let direct_out = direct.filter_signal(&input);
        let inverse_out = inverse.filter_signal(&input);
        assert_eq!(direct_out.len(), inverse_out.len());
        assert!(
            direct_out.iter().zip(&inverse_out).any(|(a, b)| (a - b).abs() > 1e-4),
            "Direct and InverseFourier generation produced identical Fourier-method output"
        );
    }
}
