//! Distribution fitting for Process Capability's non-normal path
//! (spec.md §4.5).
//!
//! Six families, each estimated independently and scored by a
//! Stephens-uncorrected Anderson-Darling sorted-U statistic so their A²
//! values are directly comparable across families.

use serde::{Deserialize, Serialize};

use crate::constants::EULER_MASCHERONI;
use crate::primitives::Primitives;
use crate::stats::Moments;

/// A fitted probability distribution and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "snake_case")]
pub enum Distribution {
    /// Weibull(k, λ).
    Weibull {
        /// Shape.
        k: f64,
        /// Scale.
        lambda: f64,
    },
    /// Lognormal(μ, σ) over `ln x`.
    Lognormal {
        /// Mean of `ln x`.
        mu: f64,
        /// Std of `ln x`.
        sigma: f64,
    },
    /// Gamma(α, β).
    Gamma {
        /// Shape.
        alpha: f64,
        /// Scale.
        beta: f64,
    },
    /// Exponential(λ).
    Exponential {
        /// Rate.
        lambda: f64,
    },
    /// Logistic(μ, s).
    Logistic {
        /// Location.
        mu: f64,
        /// Scale.
        s: f64,
    },
    /// Gumbel(μ, β) (minimum-unbounded, maximum-type per spec.md §4.5's CDF).
    Gumbel {
        /// Location.
        mu: f64,
        /// Scale.
        beta: f64,
    },
}

impl Distribution {
    /// Evaluates the family's CDF at `x`. Positive-support families
    /// return 0 for `x <= 0` per spec.md §4.5's "rejects... treated as
    /// F(x) = 0" rule.
    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        match *self {
            Self::Weibull { k, lambda } => {
                if x <= 0.0 || lambda <= 0.0 {
                    0.0
                } else {
                    1.0 - (-(x / lambda).powf(k)).exp()
                }
            }
            Self::Lognormal { mu, sigma } => {
                if x <= 0.0 {
                    0.0
                } else {
                    Primitives::normal_cdf((x.ln() - mu) / sigma.max(1e-12))
                }
            }
            Self::Gamma { alpha, beta } => {
                if x <= 0.0 || beta <= 0.0 {
                    0.0
                } else {
                    Primitives::regularized_incomplete_gamma(alpha, x / beta).unwrap_or(0.0)
                }
            }
            Self::Exponential { lambda } => {
                if x <= 0.0 {
                    0.0
                } else {
                    1.0 - (-lambda * x).exp()
                }
            }
            Self::Logistic { mu, s } => {
                let z = (x - mu) / s;
                // Stable form: avoids overflow for large |z|.
                if z >= 0.0 { 1.0 / (1.0 + (-z).exp()) } else { z.exp() / (1.0 + z.exp()) }
            }
            Self::Gumbel { mu, beta } => (-(-(x - mu) / beta).exp()).exp(),
        }
    }

    fn k_params(&self) -> usize {
        match self {
            Self::Exponential { .. } => 1,
            _ => 2,
        }
    }

    fn log_likelihood(&self, data: &[f64]) -> f64 {
        match *self {
            Self::Weibull { k, lambda } => data
                .iter()
                .map(|&x| if x <= 0.0 { f64::NEG_INFINITY } else { (k / lambda).ln() + (k - 1.0) * (x / lambda).ln() - (x / lambda).powf(k) })
                .sum(),
            Self::Lognormal { mu, sigma } => {
                let sigma = sigma.max(1e-12);
                data.iter()
                    .map(|&x| {
                        if x <= 0.0 {
                            f64::NEG_INFINITY
                        } else {
                            let z = (x.ln() - mu) / sigma;
                            -0.5 * z * z - sigma.ln() - x.ln() - 0.5 * (2.0 * std::f64::consts::PI).ln()
                        }
                    })
                    .sum()
            }
            Self::Gamma { alpha, beta } => {
                let log_gamma_alpha = Primitives::log_gamma(alpha).unwrap_or(0.0);
                data.iter()
                    .map(|&x| {
                        if x <= 0.0 {
                            f64::NEG_INFINITY
                        } else {
                            (alpha - 1.0) * x.ln() - x / beta - alpha * beta.ln() - log_gamma_alpha
                        }
                    })
                    .sum()
            }
            Self::Exponential { lambda } => {
                data.iter().map(|&x| if x <= 0.0 { f64::NEG_INFINITY } else { lambda.ln() - lambda * x }).sum()
            }
            Self::Logistic { mu, s } => data
                .iter()
                .map(|&x| {
                    let z = (x - mu) / s;
                    -z - s.ln() - 2.0 * (1.0 + (-z).exp()).ln()
                })
                .sum(),
            Self::Gumbel { mu, beta } => {
                data.iter().map(|&x| -((x - mu) / beta) - beta.ln() - (-(x - mu) / beta).exp()).sum()
            }
        }
    }
}

/// A distribution fit result (spec.md §4.5: "{distribution, params,
/// ad_statistic, aic}").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionFit {
    /// The fitted family and its parameters.
    pub distribution: Distribution,
    /// Sorted-U Anderson-Darling statistic (no Stephens correction).
    /// `+∞` when the fit failed.
    pub ad_statistic: f64,
    /// Akaike information criterion.
    pub aic: f64,
    /// Whether this fit is the degenerate fallback (no family converged).
    pub degenerate: bool,
}

/// Sorted-U Anderson-Darling statistic applied to `distribution`'s CDF
/// (spec.md §4.5: the same estimator as §4.4, without the Stephens
/// small-sample correction).
fn sorted_u_ad_statistic(data: &[f64], distribution: &Distribution) -> f64 {
    let n = data.len();
    if n < 2 {
        return f64::INFINITY;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let u: Vec<f64> = sorted.iter().map(|&x| distribution.cdf(x).clamp(1e-15, 1.0 - 1e-15)).collect();

    let n_f = n as f64;
    let mut sum = 0.0_f64;
    for i in 0..n {
        let i_f = (i + 1) as f64;
        sum += (2.0 * i_f - 1.0) * (u[i].ln() + (1.0 - u[n - 1 - i]).ln());
    }
    let ad = -n_f - sum / n_f;
    if ad.is_finite() { ad } else { f64::INFINITY }
}

#[allow(clippy::cast_precision_loss, reason = "k_params is always 1 or 2, exact in f64")]
fn aic_of(distribution: &Distribution, data: &[f64]) -> f64 {
    let ll = distribution.log_likelihood(data);
    if ll.is_finite() { -2.0 * ll + 2.0 * distribution.k_params() as f64 } else { f64::INFINITY }
}

fn fit_weibull(data: &[f64]) -> Option<Distribution> {
    if data.iter().any(|&x| x <= 0.0) {
        return None;
    }
    let mean = data.mean();
    let std = data.sample_std();
    if mean <= 0.0 {
        return None;
    }
    let cv = std / mean;
    let mut k = if cv > 1.2 {
        0.5
    } else if cv > 0.8 {
        1.0
    } else if cv > 0.5 {
        2.0
    } else {
        3.5
    };

    // Newton-Raphson on the MLE profile equation for k, central-difference derivative.
    let ln_x: Vec<f64> = data.iter().map(|&x| x.ln()).collect();
    let mean_ln_x = ln_x.iter().sum::<f64>() / data.len() as f64;
    let profile = |k: f64| -> f64 {
        let xk: Vec<f64> = data.iter().map(|&x| x.powf(k)).collect();
        let sum_xk: f64 = xk.iter().sum();
        let sum_xk_lnx: f64 = xk.iter().zip(&ln_x).map(|(&v, &l)| v * l).sum();
        if sum_xk <= 0.0 { f64::NAN } else { sum_xk_lnx / sum_xk - 1.0 / k - mean_ln_x }
    };

    for _ in 0..50 {
        let f = profile(k);
        if !f.is_finite() {
            break;
        }
        let h = (k * 1e-4).max(1e-6);
        let f_prime = (profile(k + h) - profile(k - h)) / (2.0 * h);
        if !f_prime.is_finite() || f_prime.abs() < 1e-12 {
            break;
        }
        let next = (k - f / f_prime).clamp(0.1, 20.0);
        if (next - k).abs() < 1e-8 {
            k = next;
            break;
        }
        k = next;
    }
    k = k.clamp(0.1, 20.0);

    let mean_xk: f64 = data.iter().map(|&x| x.powf(k)).sum::<f64>() / data.len() as f64;
    if mean_xk <= 0.0 {
        return None;
    }
    let lambda = mean_xk.powf(1.0 / k);
    if !lambda.is_finite() || lambda <= 0.0 {
        return None;
    }
    Some(Distribution::Weibull { k, lambda })
}

fn fit_lognormal(data: &[f64]) -> Option<Distribution> {
    if data.iter().any(|&x| x <= 0.0) {
        return None;
    }
    let ln_x: Vec<f64> = data.iter().map(|&x| x.ln()).collect();
    let mu = ln_x.mean();
    let sigma = ln_x.sample_std().max(0.001);
    Some(Distribution::Lognormal { mu, sigma })
}

fn fit_gamma(data: &[f64]) -> Option<Distribution> {
    if data.iter().any(|&x| x <= 0.0) {
        return None;
    }
    let mean = data.mean();
    let var = data.sample_variance();
    if mean <= 0.0 || var <= 0.0 {
        return None;
    }
    let alpha = (mean * mean / var).max(1e-6);
    let beta = (var / mean).max(1e-6);
    Some(Distribution::Gamma { alpha, beta })
}

fn fit_exponential(data: &[f64]) -> Option<Distribution> {
    let mean = data.mean();
    if mean <= 0.0 {
        return None;
    }
    Some(Distribution::Exponential { lambda: 1.0 / mean })
}

fn fit_logistic(data: &[f64]) -> Option<Distribution> {
    let mu = data.mean();
    let var = data.sample_variance();
    let s = (3.0 * var).sqrt() / std::f64::consts::PI;
    if s <= 0.0 {
        return None;
    }
    Some(Distribution::Logistic { mu, s })
}

fn fit_gumbel(data: &[f64]) -> Option<Distribution> {
    let mean = data.mean();
    let var = data.sample_variance();
    let beta = (6.0 * var).sqrt() / std::f64::consts::PI;
    if beta <= 0.0 {
        return None;
    }
    let mu = beta.mul_add(-EULER_MASCHERONI, mean);
    Some(Distribution::Gumbel { mu, beta })
}

/// Fits all six families to `data`, returning one [`DistributionFit`] per
/// family (a failed fit is recorded with `ad_statistic = +∞`, per
/// spec.md §4.5, rather than omitted).
#[must_use]
pub fn fit_all(data: &[f64]) -> Vec<DistributionFit> {
    let candidates: Vec<Option<Distribution>> =
        vec![fit_weibull(data), fit_lognormal(data), fit_gamma(data), fit_exponential(data), fit_logistic(data), fit_gumbel(data)];

    candidates
        .into_iter()
        .map(|candidate| match candidate {
            Some(distribution) => {
                let ad_statistic = sorted_u_ad_statistic(data, &distribution);
                let aic = aic_of(&distribution, data);
                DistributionFit { distribution, ad_statistic, aic, degenerate: false }
            }
            None => DistributionFit {
                distribution: Distribution::Lognormal { mu: 0.0, sigma: 1.0 },
                ad_statistic: f64::INFINITY,
                aic: f64::INFINITY,
                degenerate: true,
            },
        })
        .collect()
}

/// Selects the best fit among `fit_all`'s candidates: filters out `+∞` A²
/// results and returns the smallest. Falls back to a degenerate
/// Lognormal(μ = mean(ln|x|+1), σ = 1) when every family failed
/// (spec.md §4.5).
#[must_use]
pub fn best_fit(data: &[f64]) -> DistributionFit {
    let fits = fit_all(data);
    let best = fits.iter().filter(|f| f.ad_statistic.is_finite()).min_by(|a, b| a.ad_statistic.total_cmp(&b.ad_statistic)).copied();

    best.unwrap_or_else(|| {
        let mu = data.iter().map(|&x| (x.abs() + 1.0).ln()).sum::<f64>() / data.len().max(1) as f64;
        DistributionFit {
            distribution: Distribution::Lognormal { mu, sigma: 1.0 },
            ad_statistic: f64::INFINITY,
            aic: f64::INFINITY,
            degenerate: true,
        }
    })
}

/// Parts-per-million estimate from a fitted distribution's CDF evaluated
/// at the spec limits (spec.md §4.5, §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedPpm {
    /// PPM below `lei`.
    pub ppm_below: i64,
    /// PPM above `les`.
    pub ppm_above: i64,
    /// Total PPM.
    pub ppm_total: i64,
}

/// Computes PPM from a fitted distribution's CDF (spec.md §4.5).
#[must_use]
#[allow(clippy::cast_possible_truncation, reason = "ppm counts are bounded to [0, 1_000_000] per spec.md §4.5/§8")]
pub fn ppm_from_fit(distribution: &Distribution, lei: f64, les: f64) -> FittedPpm {
    let below = (1e6 * distribution.cdf(lei)).round() as i64;
    let above = (1e6 * (1.0 - distribution.cdf(les))).round() as i64;
    FittedPpm { ppm_below: below, ppm_above: above, ppm_total: below + above }
}
