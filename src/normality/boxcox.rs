//! Box-Cox transformation search (spec.md §4.4).
//!
//! Mirrors `transformations.rs`'s transform-then-score loop shape, but
//! the search itself is a plain grid search rather than an `argmin`-based
//! MLE optimizer — SPEC_FULL.md §3 documents this divergence.

use crate::config::EngineLimits;
use crate::normality::anderson_darling::{AndersonDarlingResult, anderson_darling_normality};

/// The Box-Cox transform attempted, its result, and whether it succeeded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCoxAttempt {
    /// Best λ found by the grid search.
    pub lambda: f64,
    /// Shift applied before transforming (0 if `min(x) > 0`).
    pub shift: f64,
    /// Anderson-Darling result on the best-transformed data.
    pub ad: AndersonDarlingResult,
}

/// Transforms `x` by Box-Cox with parameter `lambda` (and pre-applied
/// `shift`): `ln(x)` for `|lambda| < 0.01`, else `(x^lambda - 1) / lambda`.
fn transform_one(x: f64, lambda: f64) -> f64 {
    if lambda.abs() < 0.01 { x.ln() } else { (x.powf(lambda) - 1.0) / lambda }
}

/// Runs the Box-Cox grid search over `data` per spec.md §4.4: shifts
/// non-positive data by `|min| + 1`, then scores each λ in
/// `[limits.boxcox_lambda_min, limits.boxcox_lambda_max]` by its
/// Anderson-Darling A²* (lower is better), discarding any λ that produces
/// a non-finite transform.
#[must_use]
pub fn box_cox_search(data: &[f64], limits: &EngineLimits) -> Option<BoxCoxAttempt> {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let shift = if min <= 0.0 { min.abs() + 1.0 } else { 0.0 };
    let shifted: Vec<f64> = data.iter().map(|&x| x + shift).collect();

    let mut best: Option<BoxCoxAttempt> = None;
    let mut lambda = limits.boxcox_lambda_min;
    while lambda <= limits.boxcox_lambda_max + 1e-9 {
        let transformed: Vec<f64> = shifted.iter().map(|&x| transform_one(x, lambda)).collect();
        if transformed.iter().all(|v| v.is_finite()) {
            let ad = anderson_darling_normality(&transformed);
            if best.is_none_or(|b| ad.ad_statistic < b.ad.ad_statistic) {
                best = Some(BoxCoxAttempt { lambda, shift, ad });
            }
        }
        lambda += limits.boxcox_lambda_step;
    }
    best
}
