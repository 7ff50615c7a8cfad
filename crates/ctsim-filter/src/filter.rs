//! `SignalFilter`: the twelve ramp-filter variants, their frequency
//! responses, and (where tractable) their closed-form spatial responses.

use ctsim_support::{clamp, integrate_simpson, sinc_pi, CoreError, PI};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterId {
    AbsBandlimit,
    AbsSinc,
    AbsCosine,
    AbsHamming,
    AbsHanning,
    Shepp,
    Bandlimit,
    Sinc,
    Cosine,
    Hamming,
    Hanning,
    Triangle,
}

impl FilterId {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Ok(match name.to_ascii_lowercase().as_str() {
            "abs_bandlimit" => Self::AbsBandlimit,
            "abs_sinc" => Self::AbsSinc,
            "abs_cosine" => Self::AbsCosine,
            "abs_hamming" | "abs_g_hamming" => Self::AbsHamming,
            "abs_hanning" => Self::AbsHanning,
            "shepp" => Self::Shepp,
            "bandlimit" => Self::Bandlimit,
            "sinc" => Self::Sinc,
            "cosine" => Self::Cosine,
            "hamming" => Self::Hamming,
            "hanning" => Self::Hanning,
            "triangle" => Self::Triangle,
            other => return Err(CoreError::InvalidArgument(format!("unknown filter name {other:?}"))),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::AbsBandlimit => "abs_bandlimit",
            Self::AbsSinc => "abs_sinc",
            Self::AbsCosine => "abs_cosine",
            Self::AbsHamming => "abs_hamming",
            Self::AbsHanning => "abs_hanning",
            Self::Shepp => "shepp",
            Self::Bandlimit => "bandlimit",
            Self::Sinc => "sinc",
            Self::Cosine => "cosine",
            Self::Hamming => "hamming",
            Self::Hanning => "hanning",
            Self::Triangle => "triangle",
        }
    }

    /// Whether [`SignalFilter::spatial_response`] has a closed form for
    /// this filter. The rest fall back to Simpson's-rule numeric
    /// integration of the frequency response.
    fn has_analytic_spatial(self) -> bool {
        matches!(self, Self::Bandlimit | Self::AbsBandlimit | Self::Triangle | Self::Shepp)
    }
}

/// Tunables that replace the original program's `N_INTEGRAL` global.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOptions {
    pub n_integral: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self { n_integral: 500 }
    }
}

/// A ramp-filter variant with a fixed bandlimit `bw`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalFilter {
    pub id: FilterId,
    pub bw: f64,
    pub options: FilterOptions,
}

impl SignalFilter {
    pub fn new(id: FilterId, bw: f64, options: FilterOptions) -> Self {
        Self { id, bw, options }
    }

    /// `H(u)`, the filter's frequency response; 0 outside `|u| < bw/2`.
    pub fn frequency_response(&self, u: f64) -> f64 {
        let au = u.abs();
        if au >= self.bw / 2.0 {
            return 0.0;
        }
        match self.id {
            FilterId::AbsBandlimit => au,
            FilterId::AbsSinc | FilterId::Shepp => au * self.bw * sinc_pi(self.bw * au),
            FilterId::AbsCosine => au * (PI * au / self.bw).cos(),
            FilterId::AbsHamming => au * (0.54 + 0.46 * (2.0 * PI * au / self.bw).cos()),
            FilterId::AbsHanning => au * (0.5 + 0.5 * (2.0 * PI * au / self.bw).cos()),
            FilterId::Bandlimit => 1.0,
            FilterId::Sinc => self.bw * sinc_pi(self.bw * au),
            FilterId::Cosine => (PI * au / self.bw).cos(),
            FilterId::Hamming => 0.54 + 0.46 * (2.0 * PI * au / self.bw).cos(),
            FilterId::Hanning => 0.5 + 0.5 * (2.0 * PI * au / self.bw).cos(),
            FilterId::Triangle => clamp(1.0 - 2.0 * au / self.bw, 0.0, 1.0),
        }
    }

    /// The spatial-domain response at integer convolution lag `i`,
    /// matching the discrete kernel `ProcessSignal`'s convolution method
    /// indexes `h` by.
    pub fn spatial_response(&self, i: i64) -> f64 {
        if self.id.has_analytic_spatial() {
            self.spatial_response_analytic(i)
        } else {
            self.spatial_response_numeric(i as f64)
        }
    }

    fn spatial_response_analytic(&self, i: i64) -> f64 {
        let x = i as f64;
        let a = self.bw / 2.0;
        let c = 2.0 * PI * x;
        match self.id {
            FilterId::Bandlimit => self.bw * sinc_pi(self.bw * x),
            FilterId::AbsBandlimit => {
                if x.abs() < 1e-10 {
                    a * a
                } else {
                    2.0 * ((c * a).cos() - 1.0) / (c * c) + 2.0 * a * (c * a).sin() / c
                }
            }
            FilterId::Triangle => {
                if x.abs() < 1e-10 {
                    a
                } else {
                    2.0 * (1.0 - (c * a).cos()) / (a * c * c)
                }
            }
            FilterId::Shepp => {
                // Mirrors `createSpatialFilter`'s direct array fill:
                // center = 4/a^2, off-center h[i] = -4/(a^2*(4*i^2 - 1)).
                let a = 2.0 * self.bw;
                if i == 0 {
                    4.0 / (a * a)
                } else {
                    let c = -4.0 / (a * a);
                    c / (4.0 * (i * i) as f64 - 1.0)
                }
            }
            _ => unreachable!("has_analytic_spatial gates this match"),
        }
    }

    fn spatial_response_numeric(&self, x: f64) -> f64 {
        2.0 * integrate_simpson(|z| self.frequency_response(z) * (2.0 * PI * z * x).cos(), 0.0, self.bw / 2.0, self.options.n_integral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_filter_is_even_in_frequency() {
        for name in [
            "abs_bandlimit", "abs_sinc", "abs_cosine", "abs_hamming", "abs_hanning", "shepp", "bandlimit", "sinc", "cosine",
            "hamming", "hanning", "triangle",
        ] {
            let f = SignalFilter::new(FilterId::from_name(name).unwrap(), 1.0, FilterOptions::default());
            for u in [0.1, 0.2, 0.35, 0.49] {
                assert!((f.frequency_response(u) - f.frequency_response(-u)).abs() < 1e-12, "{name}");
            }
        }
    }

    #[test]
    fn analytic_and_numeric_bandlimit_responses_agree() {
        let f = SignalFilter::new(FilterId::Bandlimit, 1.0, FilterOptions::default());
        for i in [0, 1, 2, 5] {
            let analytic = f.spatial_response_analytic(i);
            let numeric = f.spatial_response_numeric(i as f64);
            assert!((analytic - numeric).abs() < 1e-6, "lag {i}: {analytic} vs {numeric}");
        }
    }

    #[test]
    fn ramp_spatial_response_peaks_at_zero_lag() {
        let f = SignalFilter::new(FilterId::AbsBandlimit, 1.0, FilterOptions::default());
        let peak = f.spatial_response(0);
        for i in 1..8 {
            assert!(peak >= f.spatial_response(i).abs());
        }
    }
}
