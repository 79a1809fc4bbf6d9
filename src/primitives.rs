//! Dependency-free numeric primitives: error function, normal CDF/PPF,
//! log-gamma, regularized incomplete gamma/beta, and the F-survival
//! function (spec.md §4.1).
//!
//! `statrs` is the teacher's usual route to this functionality
//! (`layer4_primitives::special_functions`), but spec.md §4.1 is explicit
//! that this subsystem is "pure functions, vectorizable, no external
//! numerics dependencies beyond array math" — see `SPEC_FULL.md` §3 for
//! the divergence rationale. The shape (a `struct` of associated
//! functions, domain errors failing fast) still follows the teacher.

use crate::error::AnalysisError;

/// Dependency-free numeric primitives used throughout the engine.
///
/// Grouped as associated functions on a unit struct, matching the
/// teacher's `SpecialFunctions`/`StatisticalDistributions` convention,
/// even though none of them hold state.
pub struct Primitives;

impl Primitives {
    /// Error function via the Abramowitz & Stegun 7.1.26 rational
    /// approximation (maximum absolute error ~1.5e-7).
    #[must_use]
    pub fn erf(x: f64) -> f64 {
        let sign = if x < 0.0 { -1.0 } else { 1.0 };
        let x = x.abs();

        const A1: f64 = 0.254_829_592;
        const A2: f64 = -0.284_496_736;
        const A3: f64 = 1.421_413_741;
        const A4: f64 = -1.453_152_027;
        const A5: f64 = 1.061_405_429;
        const P: f64 = 0.327_591_1;

        let t = 1.0 / P.mul_add(x, 1.0);
        let poly = t.mul_add(A5.mul_add(t, A4).mul_add(t, A3).mul_add(t, A2).mul_add(t, A1), 0.0);
        let y = 1.0 - poly * (-x * x).exp();
        sign * y
    }

    /// Standard normal cumulative distribution function, built on
    /// [`Self::erf`].
    #[must_use]
    pub fn normal_cdf(x: f64) -> f64 {
        0.5 * (1.0 + Self::erf(x / std::f64::consts::SQRT_2))
    }

    /// Standard normal percent-point function (inverse CDF) via the
    /// Abramowitz & Stegun 26.2.23 rational approximation.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidDomain`] when `p` is not in the
    /// open interval `(0, 1)`.
    pub fn normal_ppf(p: f64) -> Result<f64, AnalysisError> {
        if !(p > 0.0 && p < 1.0) {
            return Err(AnalysisError::InvalidDomain(format!(
                "normal_ppf requires p in (0, 1), got {p}"
            )));
        }

        const C0: f64 = 2.515_517;
        const C1: f64 = 0.802_853;
        const C2: f64 = 0.010_328;
        const D1: f64 = 1.432_788;
        const D2: f64 = 0.189_269;
        const D3: f64 = 0.001_308;

        let (tail_p, sign) = if p < 0.5 { (p, -1.0) } else { (1.0 - p, 1.0) };
        let t = (-2.0 * tail_p.ln()).sqrt();
        let numerator = C2.mul_add(t, C1).mul_add(t, C0);
        let denominator = D3.mul_add(t, D2).mul_add(t, D1).mul_add(t, 1.0);
        Ok(sign * (t - numerator / denominator))
    }

    /// Natural log of the gamma function via the Lanczos approximation
    /// (g = 7, n = 9 coefficients).
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidDomain`] when `x` is not strictly
    /// positive.
    pub fn log_gamma(x: f64) -> Result<f64, AnalysisError> {
        if x <= 0.0 {
            return Err(AnalysisError::InvalidDomain(format!(
                "log_gamma requires x > 0, got {x}"
            )));
        }

        const LANCZOS_G: f64 = 7.0;
        const COEFFICIENTS: [f64; 9] = [
            0.999_999_999_999_809_9,
            676.520_368_121_885_1,
            -1_259.139_216_722_402_8,
            771.323_428_777_653_1,
            -176.615_029_162_140_6,
            12.507_343_278_686_905,
            -0.138_571_095_265_720_12,
            9.984_369_578_019_572e-6,
            1.505_632_735_149_311_6e-7,
        ];

        // Lanczos is defined for x > 0.5; reflect via the duplication-free
        // shift x -> x - 1 used by the standard g=7/n=9 coefficient table.
        let x = x - 1.0;
        let mut a = COEFFICIENTS[0];
        for (i, coefficient) in COEFFICIENTS.iter().enumerate().skip(1) {
            a += coefficient / (x + i as f64);
        }
        let t = x + LANCZOS_G + 0.5;
        let half_log_two_pi = 0.5 * (2.0 * std::f64::consts::PI).ln();
        Ok(half_log_two_pi + (x + 0.5) * t.ln() - t + a.ln())
    }

    /// Regularized lower incomplete gamma function `P(a, x)`.
    ///
    /// Uses the series expansion for `x < a + 1` and the modified Lentz
    /// continued-fraction evaluation of `Q(a, x) = 1 - P(a, x)` otherwise,
    /// following Numerical Recipes' `gammp`/`gcf`.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidDomain`] when `a <= 0` or `x < 0`.
    pub fn regularized_incomplete_gamma(a: f64, x: f64) -> Result<f64, AnalysisError> {
        if a <= 0.0 || x < 0.0 {
            return Err(AnalysisError::InvalidDomain(format!(
                "regularized_incomplete_gamma requires a > 0 and x >= 0, got a={a}, x={x}"
            )));
        }
        if x == 0.0 {
            return Ok(0.0);
        }

        if x < a + 1.0 {
            Self::gamma_series(a, x)
        } else {
            Ok(1.0 - Self::gamma_continued_fraction(a, x)?)
        }
    }

    /// Series expansion of `P(a, x)` for `x < a + 1`.
    fn gamma_series(a: f64, x: f64) -> Result<f64, AnalysisError> {
        const MAX_ITERATIONS: u32 = 200;
        const EPSILON: f64 = 1e-14;

        let log_gamma_a = Self::log_gamma(a)?;
        let mut term = 1.0 / a;
        let mut sum = term;
        let mut ap = a;
        for _ in 0..MAX_ITERATIONS {
            ap += 1.0;
            term *= x / ap;
            sum += term;
            if term.abs() < sum.abs() * EPSILON {
                break;
            }
        }
        let log_prefactor = -x + a * x.ln() - log_gamma_a;
        Ok(sum * log_prefactor.exp())
    }

    /// Continued-fraction expansion of `Q(a, x)` for `x >= a + 1`, via the
    /// modified Lentz algorithm.
    fn gamma_continued_fraction(a: f64, x: f64) -> Result<f64, AnalysisError> {
        const MAX_ITERATIONS: u32 = 200;
        const EPSILON: f64 = 1e-14;
        const TINY: f64 = 1e-300;

        let log_gamma_a = Self::log_gamma(a)?;
        let mut b = x + 1.0 - a;
        let mut c = 1.0 / TINY;
        let mut d = 1.0 / b;
        let mut h = d;
        for i in 1..=MAX_ITERATIONS {
            let an = -(f64::from(i)) * (f64::from(i) - a);
            b += 2.0;
            d = an.mul_add(d, b);
            if d.abs() < TINY {
                d = TINY;
            }
            c = b + an / c;
            if c.abs() < TINY {
                c = TINY;
            }
            d = 1.0 / d;
            let delta = d * c;
            h *= delta;
            if (delta - 1.0).abs() < EPSILON {
                break;
            }
        }
        let log_prefactor = -x + a * x.ln() - log_gamma_a;
        Ok(h * log_prefactor.exp())
    }

    /// Regularized incomplete beta function `I_x(a, b)`, via the
    /// continued-fraction evaluation in Numerical Recipes' `betai`/`betacf`,
    /// with the standard symmetry reflection for `x > (a + 1) / (a + b + 2)`.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidDomain`] when `a <= 0`, `b <= 0`, or
    /// `x` is outside `[0, 1]`.
    pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> Result<f64, AnalysisError> {
        if a <= 0.0 || b <= 0.0 || !(0.0..=1.0).contains(&x) {
            return Err(AnalysisError::InvalidDomain(format!(
                "regularized_incomplete_beta requires a > 0, b > 0, x in [0, 1], got a={a}, b={b}, x={x}"
            )));
        }
        if x == 0.0 || x == 1.0 {
            return Ok(x);
        }

        let log_beta = Self::log_gamma(a)? + Self::log_gamma(b)? - Self::log_gamma(a + b)?;
        let log_prefactor = a * x.ln() + b * (1.0 - x).ln() - log_beta;

        if x < (a + 1.0) / (a + b + 2.0) {
            Ok(log_prefactor.exp() * Self::beta_continued_fraction(a, b, x)? / a)
        } else {
            Ok(1.0 - log_prefactor.exp() * Self::beta_continued_fraction(b, a, 1.0 - x)? / b)
        }
    }

    /// Continued-fraction factor used by [`Self::regularized_incomplete_beta`]
    /// (Numerical Recipes' `betacf`).
    fn beta_continued_fraction(a: f64, b: f64, x: f64) -> Result<f64, AnalysisError> {
        const MAX_ITERATIONS: u32 = 200;
        const EPSILON: f64 = 1e-14;
        const TINY: f64 = 1e-300;

        let qab = a + b;
        let qap = a + 1.0;
        let qam = a - 1.0;
        let mut c = 1.0;
        let mut d = 1.0 - qab * x / qap;
        if d.abs() < TINY {
            d = TINY;
        }
        d = 1.0 / d;
        let mut h = d;

        for m in 1..=MAX_ITERATIONS {
            let m_f = f64::from(m);
            let m2 = 2.0 * m_f;

            let aa_even = m_f * (b - m_f) * x / ((qam + m2) * (a + m2));
            d = aa_even.mul_add(d, 1.0);
            if d.abs() < TINY {
                d = TINY;
            }
            c = aa_even.mul_add(1.0 / c, 1.0);
            if c.abs() < TINY {
                c = TINY;
            }
            d = 1.0 / d;
            h *= d * c;

            let aa_odd = -(a + m_f) * (qab + m_f) * x / ((a + m2) * (qap + m2));
            d = aa_odd.mul_add(d, 1.0);
            if d.abs() < TINY {
                d = TINY;
            }
            c = aa_odd.mul_add(1.0 / c, 1.0);
            if c.abs() < TINY {
                c = TINY;
            }
            d = 1.0 / d;
            let delta = d * c;
            h *= delta;

            if (delta - 1.0).abs() < EPSILON {
                break;
            }
        }
        Ok(h)
    }

    /// Survival function (upper tail) of the F distribution with `d1`/`d2`
    /// degrees of freedom, via the regularized incomplete beta function.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidDomain`] when `d1 <= 0`, `d2 <= 0`,
    /// or `f < 0`.
    pub fn f_survival(f: f64, d1: f64, d2: f64) -> Result<f64, AnalysisError> {
        if d1 <= 0.0 || d2 <= 0.0 || f < 0.0 {
            return Err(AnalysisError::InvalidDomain(format!(
                "f_survival requires d1 > 0, d2 > 0, f >= 0, got d1={d1}, d2={d2}, f={f}"
            )));
        }
        if f == 0.0 {
            return Ok(1.0);
        }
        let x = d2 / (d2 + d1 * f);
        Self::regularized_incomplete_beta(d2 / 2.0, d1 / 2.0, x)
    }
}

#[cfg(test)]
mod tests {
    use super::Primitives;
    use approx::assert_relative_eq;

    #[test]
    fn erf_at_zero_is_zero() {
        assert_relative_eq!(Primitives::erf(0.0), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn erf_saturates_near_one() {
        assert!(Primitives::erf(3.0) > 0.999);
        assert!(Primitives::erf(-3.0) < -0.999);
    }

    #[test]
    fn normal_cdf_is_monotonic_and_centered() {
        assert_relative_eq!(Primitives::normal_cdf(0.0), 0.5, epsilon = 1e-9);
        assert!(Primitives::normal_cdf(-1.0) < Primitives::normal_cdf(0.0));
        assert!(Primitives::normal_cdf(0.0) < Primitives::normal_cdf(1.0));
    }

    #[test]
    fn normal_ppf_inverts_normal_cdf() {
        for p in [0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99] {
            let z = Primitives::normal_ppf(p).expect("p is in (0, 1)");
            let back = Primitives::normal_cdf(z);
            assert_relative_eq!(back, p, epsilon = 1e-3);
        }
    }

    #[test]
    fn normal_ppf_rejects_out_of_domain() {
        assert!(Primitives::normal_ppf(0.0).is_err());
        assert!(Primitives::normal_ppf(1.0).is_err());
        assert!(Primitives::normal_ppf(-0.1).is_err());
    }

    #[test]
    fn log_gamma_matches_factorials() {
        // log(n!) = log_gamma(n + 1)
        assert_relative_eq!(Primitives::log_gamma(1.0).unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(Primitives::log_gamma(5.0).unwrap(), 24.0_f64.ln(), epsilon = 1e-8);
        assert_relative_eq!(Primitives::log_gamma(10.0).unwrap(), 362_880.0_f64.ln(), epsilon = 1e-7);
    }

    #[test]
    fn log_gamma_rejects_non_positive() {
        assert!(Primitives::log_gamma(0.0).is_err());
        assert!(Primitives::log_gamma(-1.0).is_err());
    }

    #[test]
    fn regularized_incomplete_gamma_boundaries() {
        assert_relative_eq!(
            Primitives::regularized_incomplete_gamma(2.0, 0.0).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert!(Primitives::regularized_incomplete_gamma(2.0, 100.0).unwrap() > 0.999);
    }

    #[test]
    fn regularized_incomplete_gamma_matches_chi_square_known_value() {
        // P(1, x) = 1 - exp(-x) for the chi-square/gamma family with a=1.
        let x = 2.0;
        let got = Primitives::regularized_incomplete_gamma(1.0, x).unwrap();
        let expected = 1.0 - (-x).exp();
        assert_relative_eq!(got, expected, epsilon = 1e-9);
    }

    #[test]
    fn regularized_incomplete_beta_boundaries() {
        assert_relative_eq!(
            Primitives::regularized_incomplete_beta(2.0, 3.0, 0.0).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            Primitives::regularized_incomplete_beta(2.0, 3.0, 1.0).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn regularized_incomplete_beta_symmetric_case() {
        // I_0.5(a, a) = 0.5 for any a by symmetry.
        let got = Primitives::regularized_incomplete_beta(3.0, 3.0, 0.5).unwrap();
        assert_relative_eq!(got, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn f_survival_at_zero_is_one() {
        assert_relative_eq!(Primitives::f_survival(0.0, 3.0, 10.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn f_survival_is_monotonically_decreasing() {
        let low = Primitives::f_survival(1.0, 3.0, 10.0).unwrap();
        let high = Primitives::f_survival(5.0, 3.0, 10.0).unwrap();
        assert!(high < low);
    }

    #[test]
    fn f_survival_rejects_invalid_degrees_of_freedom() {
        assert!(Primitives::f_survival(1.0, 0.0, 10.0).is_err());
        assert!(Primitives::f_survival(1.0, 3.0, 0.0).is_err());
        assert!(Primitives::f_survival(-1.0, 3.0, 10.0).is_err());
    }
}
