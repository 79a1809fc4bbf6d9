//! Johnson-SU transformation search (spec.md §4.4).

use crate::config::EngineLimits;
use crate::normality::anderson_darling::{AndersonDarlingResult, anderson_darling_normality};
use crate::stats::Moments;

/// Johnson-SU parameters and the Anderson-Darling result of the
/// transformed data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JohnsonSuAttempt {
    /// Shape parameter γ.
    pub gamma: f64,
    /// Shape parameter δ.
    pub delta: f64,
    /// Location parameter ξ (fixed at the moment-matching estimate).
    pub xi: f64,
    /// Scale parameter λ (fixed at the moment-matching estimate).
    pub lambda: f64,
    /// Anderson-Darling result on the transformed data.
    pub ad: AndersonDarlingResult,
}

fn asinh(y: f64) -> f64 {
    (y + (y * y + 1.0).sqrt()).ln()
}

fn transform(data: &[f64], gamma: f64, delta: f64, xi: f64, lambda: f64) -> Vec<f64> {
    data.iter().map(|&x| gamma + delta * asinh((x - xi) / lambda)).collect()
}

/// Runs the Johnson-SU search per spec.md §4.4: moment-matched initial
/// estimates for ξ, λ, δ, γ, then a `(2·radius_γ/0.5 + 1) ×
/// (2·radius_δ/0.25 + 1)`-ish local grid refinement over γ and δ only — ξ
/// and λ stay fixed at the moment-matching estimates (preserved exactly
/// per spec.md §9's explicit "do not silently fix" note).
#[must_use]
pub fn johnson_su_search(data: &[f64], limits: &EngineLimits) -> Option<JohnsonSuAttempt> {
    if data.len() < 4 {
        return None;
    }

    let xi = data.median();
    let p75 = data.percentile(75.0);
    let p25 = data.percentile(25.0);
    let iqr = p75 - p25;
    let lambda = if iqr.abs() < 1e-12 { 1.0 } else { iqr / 1.35 };
    if lambda <= 0.0 || !lambda.is_finite() {
        return None;
    }

    let kurtosis = data.excess_kurtosis();
    let delta0 = (1.0 / (kurtosis.abs() + 1.0)).mul_add(2.0, 0.5).clamp(0.1, 3.0);
    let skew = data.skewness();
    let gamma0 = -0.5 * skew * delta0;

    let mut best: Option<JohnsonSuAttempt> = None;
    let gamma_step = limits.johnson_gamma_radius / 2.0;
    let delta_step = limits.johnson_delta_radius / 2.0;
    let mut dg = -limits.johnson_gamma_radius;
    while dg <= limits.johnson_gamma_radius + 1e-9 {
        let gamma = gamma0 + dg;
        let mut dd = -limits.johnson_delta_radius;
        while dd <= limits.johnson_delta_radius + 1e-9 {
            let delta = delta0 + dd;
            if delta > 0.0 {
                let transformed = transform(data, gamma, delta, xi, lambda);
                if transformed.iter().all(|v| v.is_finite()) {
                    let ad = anderson_darling_normality(&transformed);
                    if best.is_none_or(|b| ad.ad_statistic < b.ad.ad_statistic) {
                        best = Some(JohnsonSuAttempt { gamma, delta, xi, lambda, ad });
                    }
                }
            }
            dd += delta_step;
        }
        dg += gamma_step;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_skewed_data_finds_some_candidate() {
        let data = [1.2, 1.5, 1.8, 2.3, 2.9, 3.5, 4.2, 5.1, 6.3, 8.0, 10.5, 14.0, 19.0, 25.0, 35.0];
        let attempt = johnson_su_search(&data, &EngineLimits::default());
        assert!(attempt.is_some());
    }

    #[test]
    fn too_few_points_returns_none() {
        assert!(johnson_su_search(&[1.0, 2.0, 3.0], &EngineLimits::default()).is_none());
    }
}
