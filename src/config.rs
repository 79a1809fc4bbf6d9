//! Runtime-tunable bounds that spec.md names by literal number.
//!
//! These are ergonomic knobs, not behavior-redesign surfaces: passing
//! [`EngineLimits::default`] reproduces spec.md's documented numbers
//! exactly. See `SPEC_FULL.md` §2.3.

/// Bounds on validator reporting and on the normality-transformation
/// search grids, threaded through the pipeline so a host application can
/// (for example) widen the offender report for a debugging session
/// without recompiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineLimits {
    /// Maximum number of offending cells/rows a validator collects before
    /// truncating its report (spec.md §4.2: "up to 20").
    pub max_reported_offenders: usize,
    /// Lower bound of the Box-Cox λ grid search (spec.md §4.4).
    pub boxcox_lambda_min: f64,
    /// Upper bound of the Box-Cox λ grid search.
    pub boxcox_lambda_max: f64,
    /// Step size of the Box-Cox λ grid search.
    pub boxcox_lambda_step: f64,
    /// Half-width of the Johnson-SU local refinement grid for γ.
    pub johnson_gamma_radius: f64,
    /// Half-width of the Johnson-SU local refinement grid for δ.
    pub johnson_delta_radius: f64,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_reported_offenders: 20,
            boxcox_lambda_min: -2.0,
            boxcox_lambda_max: 2.0,
            boxcox_lambda_step: 0.1,
            johnson_gamma_radius: 1.0,
            johnson_delta_radius: 0.5,
        }
    }
}
