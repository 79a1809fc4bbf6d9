//! Shared descriptive-statistics helpers used across every engine.
//!
//! Mirrors the `descriptive::moments::StatisticalMoments` trait shape
//! (`impl StatisticalMoments for [f64]`), keeping only the moments
//! actually consumed downstream (sample variance/std with `ddof = 1`).

/// Fundamental descriptive moments over a slice of finite floats.
pub trait Moments {
    /// Arithmetic mean. NaN for an empty slice.
    fn mean(&self) -> f64;
    /// Sample variance (`ddof = 1`). Zero for fewer than 2 elements.
    fn sample_variance(&self) -> f64;
    /// Sample standard deviation (`ddof = 1`).
    fn sample_std(&self) -> f64;
    /// Sample skewness (adjusted Fisher-Pearson `G1`). Zero when std is ~0.
    fn skewness(&self) -> f64;
    /// Sample excess kurtosis. Zero when std is ~0.
    fn excess_kurtosis(&self) -> f64;
    /// Median of the slice (not assumed sorted).
    fn median(&self) -> f64;
    /// Linear-interpolated percentile, `p` in `[0, 100]` (not assumed sorted).
    fn percentile(&self, p: f64) -> f64;
}

impl Moments for [f64] {
    fn mean(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        self.iter().sum::<f64>() / self.len() as f64
    }

    fn sample_variance(&self) -> f64 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self.iter().map(|&x| (x - mean) * (x - mean)).sum();
        sum_sq / (n as f64 - 1.0)
    }

    fn sample_std(&self) -> f64 {
        self.sample_variance().sqrt()
    }

    fn skewness(&self) -> f64 {
        let n = self.len();
        if n < 3 {
            return 0.0;
        }
        let mean = self.mean();
        let std = self.sample_std();
        if std < 1e-14 {
            return 0.0;
        }
        let n_f = n as f64;
        let sum_cubed: f64 = self.iter().map(|&x| (x - mean).powi(3)).sum();
        (n_f * sum_cubed) / ((n_f - 1.0) * (n_f - 2.0) * std.powi(3))
    }

    fn excess_kurtosis(&self) -> f64 {
        let n = self.len();
        if n < 4 {
            return 0.0;
        }
        let n_f = n as f64;
        let mean = self.mean();
        let var = self.sample_variance();
        if var < 1e-14 {
            return 0.0;
        }
        let m4: f64 = self.iter().map(|&x| (x - mean).powi(4)).sum::<f64>() / n_f;
        m4 / var.powi(2) - 3.0
    }

    fn median(&self) -> f64 {
        self.percentile(50.0)
    }

    fn percentile(&self, p: f64) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        let mut sorted = self.to_vec();
        sorted.sort_by(f64::total_cmp);
        percentile_sorted(&sorted, p)
    }
}

/// Linear-interpolated percentile over an already-sorted slice.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n as f64 - 1.0);
    let lower = rank.floor().max(0.0) as usize;
    let upper = rank.ceil().min(n as f64 - 1.0) as usize;
    if lower == upper {
        return sorted[lower];
    }
    let frac = rank - lower as f64;
    sorted[lower] + frac * (sorted[upper] - sorted[lower])
}

/// Moving ranges `|x[i+1] - x[i]|` of a series, per spec.md §4.6.
#[must_use]
pub fn moving_ranges(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| (w[1] - w[0]).abs()).collect()
}
