//! I-MR stability engine (spec.md §4.6): control limits plus the seven
//! Western Electric-style out-of-control rules, tracked by violation
//! position rather than by count.
//!
//! Mirrors `QualityControlEngine::assess_stability`'s shape (same
//! seven-rule battery, AIAG I-MR constants), generalized from boolean
//! counts to structured `{index/start/end, ...}` violation records per
//! spec.md §4.6.

use serde::{Deserialize, Serialize};

use crate::constants::{D2, D3_IMR, D4_IMR, E2};
use crate::stats::{Moments, moving_ranges};

/// Which control limit a rule-1 point violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LimitKind {
    /// Upper control limit.
    Ucl,
    /// Lower control limit.
    Lcl,
}

/// Monotone run direction (rule 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Increasing run.
    Up,
    /// Decreasing run.
    Down,
}

/// Which side of the center line a rule-7 run sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Above center.
    Above,
    /// Below center.
    Below,
}

/// A single rule-1 (out-of-limits point) violation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointViolation {
    /// Index of the offending point.
    pub index: usize,
    /// Its value.
    pub value: f64,
    /// Which limit it crossed.
    pub limit: LimitKind,
}

/// A violating run, used by rules 2-7.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunViolation {
    /// First index of the run.
    pub start: usize,
    /// Last index of the run.
    pub end: usize,
    /// Monotone direction (rule 2 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Side of center (rule 7 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Fixed `"alternating"` tag (rule 6 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<&'static str>,
}

/// Result of one Western Electric-style rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult<V> {
    /// Whether the rule passed (no violations).
    pub cumple: bool,
    /// Violation records, empty when `cumple`.
    pub violations: Vec<V>,
}

fn rule_result<V>(violations: Vec<V>) -> RuleResult<V> {
    RuleResult { cumple: violations.is_empty(), violations }
}

/// I-chart (individuals) limits and out-of-control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IChart {
    /// Center line, the grand mean.
    pub center: f64,
    /// Upper control limit.
    pub ucl: f64,
    /// Lower control limit.
    pub lcl: f64,
    /// Average moving range, `MR̄`.
    pub mr_bar: f64,
    /// Points outside `[lcl, ucl]`, identical to `rule_1`'s violations.
    pub ooc_points: Vec<PointViolation>,
}

/// MR-chart (moving range) limits and out-of-control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MrChart {
    /// Moving ranges, `MR_i = |x_{i+1} - x_i|`, one shorter than `values`.
    pub values: Vec<f64>,
    /// Center line, `MR̄`.
    pub center: f64,
    /// Upper control limit, `D4 * MR̄`.
    pub ucl: f64,
    /// Lower control limit, always `0` (`D3 = 0` for subgroup size 2).
    pub lcl: f64,
    /// Moving ranges exceeding `ucl`.
    pub ooc_points: Vec<PointViolation>,
}

/// The full I-MR stability result (spec.md §4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityResult {
    /// I-chart (individuals) limits.
    pub i_chart: IChart,
    /// MR-chart (moving range) limits.
    pub mr_chart: MrChart,
    /// Within-subgroup sigma, `MR̄ / d2` (0 when `MR̄ <= 0`).
    pub sigma_within: f64,
    /// Rule 1: points outside `[LCL, UCL]`.
    pub rule_1: RuleResult<PointViolation>,
    /// Rule 2: 8 consecutive monotone points.
    pub rule_2: RuleResult<RunViolation>,
    /// Rule 3: 7+ consecutive points inside `center ± 1σ`.
    pub rule_3: RuleResult<RunViolation>,
    /// Rule 4: 7+ consecutive points in `[center+2σ, UCL]`.
    pub rule_4: RuleResult<RunViolation>,
    /// Rule 5: 7+ consecutive points in `[LCL, center-2σ]`.
    pub rule_5: RuleResult<RunViolation>,
    /// Rule 6: 7+ consecutive alternating-direction transitions.
    pub rule_6: RuleResult<RunViolation>,
    /// Rule 7: 7+ consecutive points strictly on one side of center.
    pub rule_7: RuleResult<RunViolation>,
    /// `true` iff every rule passes and both OOC lists are empty.
    pub is_stable: bool,
}

/// Runs the full I-MR stability analysis over `values` (spec.md §4.6).
#[must_use]
pub fn analyze_stability(values: &[f64]) -> StabilityResult {
    let mean = values.mean();
    let mr = moving_ranges(values);
    let mr_bar = if mr.is_empty() { 0.0 } else { mr.mean() };
    let sigma_within = if mr_bar > 0.0 { mr_bar / D2 } else { 0.0 };

    let limits = ControlLimits { center: mean, ucl: mean + E2 * mr_bar, lcl: mean - E2 * mr_bar };
    let mr_limits = ControlLimits { center: mr_bar, ucl: D4_IMR * mr_bar, lcl: D3_IMR * mr_bar };

    let rule_1 = evaluate_rule_1(values, &limits);
    let rule_2 = evaluate_rule_2(values);
    let sigma_zone = (limits.ucl - limits.center) / 3.0;
    let rule_3 = evaluate_zone_run(values, limits.center, limits.center - sigma_zone, limits.center + sigma_zone, sigma_zone);
    let rule_4 = evaluate_side_zone_run(values, limits.center + 2.0 * sigma_zone, limits.ucl, sigma_zone, Direction::Up);
    let rule_5 = evaluate_side_zone_run(values, limits.lcl, limits.center - 2.0 * sigma_zone, sigma_zone, Direction::Down);
    let rule_6 = evaluate_rule_6(values);
    let rule_7 = evaluate_rule_7(values, limits.center);

    let mr_ooc_points = evaluate_mr_ooc(&mr, &mr_limits);

    let i_chart = IChart { center: limits.center, ucl: limits.ucl, lcl: limits.lcl, mr_bar, ooc_points: rule_1.violations.clone() };
    let mr_chart =
        MrChart { values: mr, center: mr_limits.center, ucl: mr_limits.ucl, lcl: mr_limits.lcl, ooc_points: mr_ooc_points };

    let is_stable = rule_1.cumple
        && rule_2.cumple
        && rule_3.cumple
        && rule_4.cumple
        && rule_5.cumple
        && rule_6.cumple
        && rule_7.cumple
        && i_chart.ooc_points.is_empty()
        && mr_chart.ooc_points.is_empty();

    StabilityResult { i_chart, mr_chart, sigma_within, rule_1, rule_2, rule_3, rule_4, rule_5, rule_6, rule_7, is_stable }
}

/// Control limits for a single chart, used only while computing `analyze_stability`.
struct ControlLimits {
    center: f64,
    ucl: f64,
    lcl: f64,
}

/// MR-chart out-of-control points: moving ranges exceeding the MR UCL
/// (spec.md §4.6, §8: `is_stable ⇔ ... (no OOC on either chart)`).
fn evaluate_mr_ooc(mr: &[f64], limits: &ControlLimits) -> Vec<PointViolation> {
    mr.iter()
        .enumerate()
        .filter_map(|(index, &value)| (value > limits.ucl).then_some(PointViolation { index, value, limit: LimitKind::Ucl }))
        .collect()
}

fn evaluate_rule_1(values: &[f64], limits: &ControlLimits) -> RuleResult<PointViolation> {
    let violations = values
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            if value > limits.ucl {
                Some(PointViolation { index, value, limit: LimitKind::Ucl })
            } else if value < limits.lcl {
                Some(PointViolation { index, value, limit: LimitKind::Lcl })
            } else {
                None
            }
        })
        .collect();
    rule_result(violations)
}

/// Rule 2: 7 consecutive non-zero differences of the same sign, i.e. 8
/// monotone points.
fn evaluate_rule_2(values: &[f64]) -> RuleResult<RunViolation> {
    if values.len() < 8 {
        return rule_result(Vec::new());
    }
    let signs: Vec<i8> = values.windows(2).map(|w| if w[1] > w[0] { 1 } else if w[1] < w[0] { -1 } else { 0 }).collect();

    let mut violations = Vec::new();
    let mut run_start = 0usize;
    let mut run_sign = signs[0];
    let mut run_len = if run_sign != 0 { 1 } else { 0 };

    for (i, &s) in signs.iter().enumerate().skip(1) {
        if s != 0 && s == run_sign {
            run_len += 1;
        } else {
            run_start = i;
            run_sign = s;
            run_len = if s != 0 { 1 } else { 0 };
        }
        if run_len == 7 {
            let direction = if run_sign > 0 { Direction::Up } else { Direction::Down };
            violations.push(RunViolation { start: run_start, end: i + 1, direction: Some(direction), side: None, pattern: None });
        }
    }
    rule_result(violations)
}

/// Shared helper for rules 3-5: runs of points whose values fall in
/// `[lo, hi]`, length 7+. Passes trivially when the zone is degenerate
/// (`sigma_zone <= 0`, i.e. constant data, `UCL == center`).
fn evaluate_zone_run(values: &[f64], _center: f64, lo: f64, hi: f64, sigma_zone: f64) -> RuleResult<RunViolation> {
    if sigma_zone <= 0.0 {
        return rule_result(Vec::new());
    }
    find_runs(values, |v| v >= lo && v <= hi, None)
}

fn evaluate_side_zone_run(values: &[f64], lo: f64, hi: f64, sigma_zone: f64, direction: Direction) -> RuleResult<RunViolation> {
    if sigma_zone <= 0.0 {
        return rule_result(Vec::new());
    }
    find_runs(values, |v| v >= lo && v <= hi, Some(direction))
}

fn find_runs(values: &[f64], predicate: impl Fn(f64) -> bool, direction: Option<Direction>) -> RuleResult<RunViolation> {
    let mut violations = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, &v) in values.iter().enumerate() {
        if predicate(v) {
            if run_start.is_none() {
                run_start = Some(i);
            }
        } else if let Some(start) = run_start.take() {
            push_if_long_enough(&mut violations, start, i - 1, direction);
        }
    }
    if let Some(start) = run_start {
        push_if_long_enough(&mut violations, start, values.len() - 1, direction);
    }
    rule_result(violations)
}

fn push_if_long_enough(violations: &mut Vec<RunViolation>, start: usize, end: usize, direction: Option<Direction>) {
    if end + 1 - start >= 7 {
        violations.push(RunViolation { start, end, direction, side: None, pattern: None });
    }
}

/// Rule 6: alternating direction for 7+ consecutive transitions.
fn evaluate_rule_6(values: &[f64]) -> RuleResult<RunViolation> {
    if values.len() < 8 {
        return rule_result(Vec::new());
    }
    let signs: Vec<i8> = values.windows(2).map(|w| if w[1] > w[0] { 1 } else if w[1] < w[0] { -1 } else { 0 }).collect();

    let mut violations = Vec::new();
    let mut run_start = 0usize;
    let mut run_len = 1usize;

    for i in 1..signs.len() {
        let alternating = signs[i] != 0 && signs[i - 1] != 0 && signs[i] != signs[i - 1];
        if alternating {
            run_len += 1;
        } else {
            run_start = i;
            run_len = 1;
        }
        if run_len == 7 {
            violations.push(RunViolation { start: run_start, end: i + 1, direction: None, side: None, pattern: Some("alternating") });
        }
    }
    rule_result(violations)
}

/// Rule 7: 7+ consecutive points strictly on one side of center.
fn evaluate_rule_7(values: &[f64], center: f64) -> RuleResult<RunViolation> {
    let mut violations = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut run_side: Option<Side> = None;

    let side_of = |v: f64| -> Option<Side> {
        if v > center {
            Some(Side::Above)
        } else if v < center {
            Some(Side::Below)
        } else {
            None
        }
    };

    for (i, &v) in values.iter().enumerate() {
        let side = side_of(v);
        match (side, run_side) {
            (Some(s), Some(rs)) if s == rs => {}
            (Some(s), _) => {
                if let (Some(start), Some(rs)) = (run_start, run_side) {
                    push_side_run(&mut violations, start, i - 1, rs);
                }
                run_start = Some(i);
                run_side = Some(s);
            }
            (None, _) => {
                if let (Some(start), Some(rs)) = (run_start, run_side) {
                    push_side_run(&mut violations, start, i - 1, rs);
                }
                run_start = None;
                run_side = None;
            }
        }
    }
    if let (Some(start), Some(rs)) = (run_start, run_side) {
        push_side_run(&mut violations, start, values.len() - 1, rs);
    }
    rule_result(violations)
}

fn push_side_run(violations: &mut Vec<RunViolation>, start: usize, end: usize, side: Side) {
    if end + 1 - start >= 7 {
        violations.push(RunViolation { start, end, direction: None, side: Some(side), pattern: None });
    }
}
