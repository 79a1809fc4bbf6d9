//! AIAG control-chart factors and classification thresholds.
//!
//! These are immutable, module-level data (spec.md §9: "inject them as
//! configuration structs if the host language prefers" — kept as plain
//! `const`/`static` tables here, following the convention of naming AIAG
//! factors once at a single point of use).

/// Upper control limit factor for an I-chart built from moving ranges
/// of width 2 (AIAG SPC manual, n = 2).
pub const E2: f64 = 2.66;

/// Upper control limit factor for the MR-chart (n = 2).
pub const D4_IMR: f64 = 3.267;

/// Lower control limit factor for the MR-chart (n = 2). Always zero.
pub const D3_IMR: f64 = 0.0;

/// Sigma estimation factor (MR̄ / d2 gives the within-subgroup sigma).
pub const D2: f64 = 1.128;

/// Euler–Mascheroni constant, used by the Gumbel moment estimator.
pub const EULER_MASCHERONI: f64 = 0.5772_156_649_015_329;

/// `D4` control-chart factor for an R-chart, indexed by subgroup size
/// (number of replicates `r`). Unknown `r` falls back to the `r = 3` entry
/// per spec.md §4.3.
#[must_use]
pub fn r_chart_d4(r: usize) -> f64 {
    match r {
        2 => 3.267,
        3 => 2.574,
        4 => 2.282,
        5 => 2.114,
        6 => 2.004,
        _ => 2.574,
    }
}

/// `D3` control-chart factor for an R-chart. Zero for subgroup sizes up to 6.
#[must_use]
pub fn r_chart_d3(_r: usize) -> f64 {
    0.0
}

/// `A2` control-chart factor for an X̄-chart, indexed by subgroup size.
/// Unknown `r` falls back to the `r = 3` entry.
#[must_use]
pub fn x_bar_chart_a2(r: usize) -> f64 {
    match r {
        2 => 1.880,
        3 => 1.023,
        4 => 0.729,
        5 => 0.577,
        6 => 0.483,
        _ => 1.023,
    }
}

/// GRR% classification boundaries (spec.md §4.3).
///
/// Boundary semantics: `< 10.0` is acceptable, `10.0..=30.0` is marginal,
/// `> 30.0` is unacceptable. The boundaries themselves belong to the
/// stricter neighboring class (9.9 → aceptable, 10.0 and 30.0 → marginal).
pub const GRR_ACCEPTABLE_MAX: f64 = 10.0;
/// Upper boundary of the marginal GRR% band (inclusive).
pub const GRR_MARGINAL_MAX: f64 = 30.0;

/// Capability-index classification thresholds (spec.md §4.7), shared by
/// both Cpk and Ppk.
pub const CPK_EXCELLENT: f64 = 1.67;
/// Lower bound of the "adequate" capability band.
pub const CPK_ADEQUATE: f64 = 1.33;
/// Lower bound of the "marginal" capability band.
pub const CPK_MARGINAL: f64 = 1.00;
/// Lower bound of the "inadequate" capability band; below this is "poor".
pub const CPK_INADEQUATE: f64 = 0.67;

/// `ndc` cap applied when the GRR standard deviation is degenerate
/// (spec.md §4.3, §9: "arbitrary; preserve it for compatibility").
pub const NDC_CAP: u32 = 999;

/// Threshold below which a standard deviation is treated as zero for
/// percentage-of-total-variation and `ndc` purposes.
pub const SIGMA_ZERO_EPSILON: f64 = 1e-10;
