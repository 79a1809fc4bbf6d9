//! Process Capability engine (spec.md §4.7): Cp/Cpk/Pp/Ppk, classification,
//! and PPM, both for the normal path and the percentile-based non-normal
//! path.
//!
//! Mirrors `ProcessCapability`/`calculate_process_capability`'s shape
//! (same six-index layout, same classification ladder), generalized to
//! add Pp/Ppk alongside Cp/Cpk, the non-normal percentile path, and PPM
//! via a fitted CDF (spec.md §9: "keep both; consumers rely on the flag
//! `method`").

use serde::{Deserialize, Serialize};

use crate::constants::{CPK_ADEQUATE, CPK_EXCELLENT, CPK_INADEQUATE, CPK_MARGINAL};
use crate::distributions::Distribution;
use crate::primitives::Primitives;
use crate::stats::Moments;

/// Basic descriptive statistics reported alongside every Capability
/// analysis (spec.md §2.2 ambient stack: every analysis reports its
/// input shape even before normality/stability/capability run).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasicStatistics {
    /// Sample size.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (`ddof = 1`).
    pub std_dev: f64,
    /// Minimum.
    pub min: f64,
    /// Maximum.
    pub max: f64,
    /// Median.
    pub median: f64,
    /// Sample skewness.
    pub skewness: f64,
    /// Sample excess kurtosis.
    pub excess_kurtosis: f64,
}

/// Computes [`BasicStatistics`] over `values`.
#[must_use]
pub fn basic_statistics(values: &[f64]) -> BasicStatistics {
    BasicStatistics {
        n: values.len(),
        mean: values.mean(),
        std_dev: values.sample_std(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        median: values.median(),
        skewness: values.skewness(),
        excess_kurtosis: values.excess_kurtosis(),
    }
}

/// Specification limits for a Process Capability analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecLimits {
    /// Lower engineering limit.
    pub lei: f64,
    /// Upper engineering limit.
    pub les: f64,
}

/// Capability-index classification (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityLevel {
    /// `>= 1.67`.
    Excellent,
    /// `[1.33, 1.67)`.
    Adequate,
    /// `[1.00, 1.33)`.
    Marginal,
    /// `[0.67, 1.00)`.
    Inadequate,
    /// `< 0.67`.
    Poor,
    /// The index was `None`/NaN.
    Unknown,
}

impl CapabilityLevel {
    /// Hex color for this level (spec.md §4.7 classification table).
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent | Self::Adequate => "#2ecc71",
            Self::Marginal => "#f1c40f",
            Self::Inadequate | Self::Poor => "#e74c3c",
            Self::Unknown => "#95a5a6",
        }
    }

    /// Classifies an optional Cpk/Ppk value (`None`/NaN maps to `Unknown`).
    #[must_use]
    pub fn classify(index: Option<f64>) -> Self {
        let Some(value) = index.filter(|v| v.is_finite()) else {
            return Self::Unknown;
        };
        if value >= CPK_EXCELLENT {
            Self::Excellent
        } else if value >= CPK_ADEQUATE {
            Self::Adequate
        } else if value >= CPK_MARGINAL {
            Self::Marginal
        } else if value >= CPK_INADEQUATE {
            Self::Inadequate
        } else {
            Self::Poor
        }
    }
}

/// Parts-per-million out-of-spec estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ppm {
    /// PPM below `lei`.
    pub below: i64,
    /// PPM above `les`.
    pub above: i64,
    /// Total PPM, `below + above`.
    pub total: i64,
}

/// Which path produced the reported indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityMethod {
    /// Classical Cp/Cpk/Pp/Ppk with a normal-theory PPM.
    Normal,
    /// Classical indices plus percentile-based non-normal indices and a
    /// fitted-CDF PPM.
    NonNormal,
}

/// Non-normal (percentile-based) capability indices (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NonNormalIndices {
    /// `Pp` computed from the 0.135/99.865 percentile spread.
    pub pp_nn: f64,
    /// `Ppk` computed from percentile distances to the median.
    pub ppk_nn: f64,
    /// The 0.135th percentile.
    pub p_low: f64,
    /// The median (50th percentile).
    pub p_median: f64,
    /// The 99.865th percentile.
    pub p_high: f64,
}

/// The full Process Capability result (spec.md §3, §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityResult {
    /// `(les - lei) / (6 * sigma_within)`.
    pub cp: Option<f64>,
    /// `min(cpu, cpl)`.
    pub cpk: Option<f64>,
    /// `(les - mean) / (3 * sigma_within)`.
    pub cpu: Option<f64>,
    /// `(mean - lei) / (3 * sigma_within)`.
    pub cpl: Option<f64>,
    /// `(les - lei) / (6 * sigma_overall)`.
    pub pp: Option<f64>,
    /// `min(ppu, ppl)`.
    pub ppk: Option<f64>,
    /// `(les - mean) / (3 * sigma_overall)`.
    pub ppu: Option<f64>,
    /// `(mean - lei) / (3 * sigma_overall)`.
    pub ppl: Option<f64>,
    /// Within-subgroup sigma (`MR̄ / d2`).
    pub sigma_within: f64,
    /// Overall sample sigma (`ddof = 1`).
    pub sigma_overall: f64,
    /// Sample mean.
    pub mean: f64,
    /// Lower engineering limit.
    pub lei: f64,
    /// Upper engineering limit.
    pub les: f64,
    /// Cpk classification.
    pub cpk_classification: CapabilityLevel,
    /// Ppk classification.
    pub ppk_classification: CapabilityLevel,
    /// PPM estimate (normal-theory, or fitted-CDF when non-normal).
    pub ppm: Ppm,
    /// Non-normal percentile indices, present when `method = non_normal`.
    pub non_normal: Option<NonNormalIndices>,
    /// Which path produced `ppm`/`non_normal`.
    pub method: CapabilityMethod,
}

/// A validation failure from [`compute_capability`] (spec.md §4.7:
/// "Require finite lei, les with lei < les... no partial indices
/// computed when validation fails").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLimitsError(pub String);

fn divide_or_none(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 { Some(numerator / denominator) } else { None }
}

/// Computes Cp/Cpk/Pp/Ppk and PPM for `values` against `spec` (spec.md
/// §4.7). `sigma_within` is the stability engine's `MR̄ / d2` estimate.
/// `fitted` is the non-normal distribution fit, `Some` iff the normality
/// orchestrator did not find the original/transformed data normal.
///
/// # Errors
/// Returns [`SpecLimitsError`] if `lei`/`les` are non-finite or
/// `lei >= les`.
pub fn compute_capability(
    values: &[f64],
    spec: SpecLimits,
    sigma_within: f64,
    fitted: Option<&Distribution>,
) -> Result<CapabilityResult, SpecLimitsError> {
    if !spec.lei.is_finite() || !spec.les.is_finite() {
        return Err(SpecLimitsError("los límites de especificación deben ser valores finitos".to_string()));
    }
    if spec.lei >= spec.les {
        return Err(SpecLimitsError("el límite inferior debe ser menor que el límite superior".to_string()));
    }

    let mean = values.mean();
    let sigma_overall = if values.len() >= 2 { values.sample_std() } else { 0.0 };

    let cp = divide_or_none(spec.les - spec.lei, 6.0 * sigma_within);
    let cpu = divide_or_none(spec.les - mean, 3.0 * sigma_within);
    let cpl = divide_or_none(mean - spec.lei, 3.0 * sigma_within);
    let cpk = match (cpu, cpl) {
        (Some(u), Some(l)) => Some(u.min(l)),
        _ => None,
    };

    let pp = divide_or_none(spec.les - spec.lei, 6.0 * sigma_overall);
    let ppu = divide_or_none(spec.les - mean, 3.0 * sigma_overall);
    let ppl = divide_or_none(mean - spec.lei, 3.0 * sigma_overall);
    let ppk = match (ppu, ppl) {
        (Some(u), Some(l)) => Some(u.min(l)),
        _ => None,
    };

    let (ppm, method, non_normal) = if let Some(distribution) = fitted {
        let ppm = crate::distributions::ppm_from_fit(distribution, spec.lei, spec.les);
        let p_low = values.percentile(0.135);
        let p_median = values.percentile(50.0);
        let p_high = values.percentile(99.865);
        let pp_nn = divide_or_none(spec.les - spec.lei, p_high - p_low).unwrap_or(0.0);
        let ppk_nn = divide_or_none(spec.les - p_median, p_high - p_median)
            .zip(divide_or_none(p_median - spec.lei, p_median - p_low))
            .map_or(0.0, |(u, l)| u.min(l));
        (
            Ppm { below: ppm.ppm_below, above: ppm.ppm_above, total: ppm.ppm_total },
            CapabilityMethod::NonNormal,
            Some(NonNormalIndices { pp_nn, ppk_nn, p_low, p_median, p_high }),
        )
    } else {
        (normal_ppm(mean, sigma_overall, spec), CapabilityMethod::Normal, None)
    };

    Ok(CapabilityResult {
        cp,
        cpk,
        cpu,
        cpl,
        pp,
        ppk,
        ppu,
        ppl,
        sigma_within,
        sigma_overall,
        mean,
        lei: spec.lei,
        les: spec.les,
        cpk_classification: CapabilityLevel::classify(cpk),
        ppk_classification: CapabilityLevel::classify(ppk),
        ppm,
        non_normal,
        method,
    })
}

/// Normal-theory PPM (spec.md §4.7), with the documented zero-σ special
/// case: in-spec mean contributes nothing, an out-of-spec mean
/// contributes the full 1,000,000 ppm on that side.
#[allow(clippy::cast_possible_truncation, reason = "ppm counts are bounded to [0, 1_000_000] per spec.md §4.7/§8")]
fn normal_ppm(mean: f64, sigma: f64, spec: SpecLimits) -> Ppm {
    if sigma <= 0.0 {
        let below = if mean < spec.lei { 1_000_000 } else { 0 };
        let above = if mean > spec.les { 1_000_000 } else { 0 };
        return Ppm { below, above, total: below + above };
    }
    let below = (1e6 * Primitives::normal_cdf((spec.lei - mean) / sigma)).round() as i64;
    let above = (1e6 * (1.0 - Primitives::normal_cdf((spec.les - mean) / sigma))).round() as i64;
    Ppm { below, above, total: below + above }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg64;

    fn normal_sample(mean: f64, std: f64, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = Pcg64::seed_from_u64(seed);
        let dist = Normal::new(mean, std).expect("valid normal parameters");
        (0..n).map(|_| dist.sample(&mut rng)).collect()
    }

    #[test]
    fn rejects_inverted_spec_limits() {
        let values = vec![1.0, 2.0, 3.0];
        let err = compute_capability(&values, SpecLimits { lei: 10.0, les: 5.0 }, 1.0, None);
        assert!(err.is_err());
    }

    #[test]
    fn cpk_never_exceeds_cp_and_ppk_never_exceeds_pp() {
        let values = normal_sample(100.0, 10.0, 200, 42);
        let sigma_within = values.sample_std();
        let result = compute_capability(&values, SpecLimits { lei: 70.0, les: 130.0 }, sigma_within, None).expect("valid spec");
        if let (Some(cp), Some(cpk)) = (result.cp, result.cpk) {
            assert!(cpk <= cp + 1e-3);
        }
        if let (Some(pp), Some(ppk)) = (result.pp, result.ppk) {
            assert!(ppk <= pp + 1e-3);
        }
    }

    #[test]
    fn zero_sigma_mean_in_spec_has_zero_ppm() {
        let ppm = normal_ppm(100.0, 0.0, SpecLimits { lei: 90.0, les: 110.0 });
        assert_eq!(ppm.total, 0);
    }

    #[test]
    fn zero_sigma_mean_below_spec_is_full_ppm() {
        let ppm = normal_ppm(50.0, 0.0, SpecLimits { lei: 90.0, les: 110.0 });
        assert_eq!(ppm.below, 1_000_000);
        assert_eq!(ppm.above, 0);
    }

    #[test]
    fn ppm_split_matches_total_and_is_bounded() {
        let values = normal_sample(5.0, 0.5, 200, 7);
        let sigma_within = values.sample_std();
        let result = compute_capability(&values, SpecLimits { lei: 2.0, les: 8.0 }, sigma_within, None).expect("valid spec");
        assert_eq!(result.ppm.total, result.ppm.below + result.ppm.above);
        assert!(result.ppm.below >= 0 && result.ppm.below <= 1_000_000);
        assert!(result.ppm.above >= 0 && result.ppm.above <= 1_000_000);
    }

    #[test]
    fn boundary_cpk_classification_matches_table() {
        assert_eq!(CapabilityLevel::classify(Some(1.67)), CapabilityLevel::Excellent);
        assert_eq!(CapabilityLevel::classify(Some(1.33)), CapabilityLevel::Adequate);
        assert_eq!(CapabilityLevel::classify(Some(1.00)), CapabilityLevel::Marginal);
        assert_eq!(CapabilityLevel::classify(Some(0.67)), CapabilityLevel::Inadequate);
        assert_eq!(CapabilityLevel::classify(Some(0.50)), CapabilityLevel::Poor);
        assert_eq!(CapabilityLevel::classify(None), CapabilityLevel::Unknown);
    }
}
