//! Deterministic Process Capability chart-series builder (spec.md §4.8).
//! No rendering; plain structured data, emitted conditionally on which
//! subsystems ran.
//!
//! Grounded on the same shape as [`crate::msa::charts`] (plain labeled
//! structs wrapped by [`ChartEntry`]); the histogram/Q-Q series have no
//! MSA counterpart and are built fresh from spec.md §4.8's formulas.

use serde::Serialize;

use crate::capability::SpecLimits;
use crate::primitives::Primitives;
use crate::report::ChartEntry;
use crate::stability::{PointViolation, StabilityResult};
use crate::stats::Moments;

/// One histogram bin, half-open `[lower, upper)` except the last bin
/// which includes `upper`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HistogramBin {
    /// Bin lower edge.
    pub lower: f64,
    /// Bin upper edge.
    pub upper: f64,
    /// Count of values falling in the bin.
    pub count: usize,
}

/// Histogram of the raw data against the specification limits.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// Bins in ascending order.
    pub bins: Vec<HistogramBin>,
    /// Lower engineering limit (vertical reference line).
    pub lei: f64,
    /// Upper engineering limit (vertical reference line).
    pub les: f64,
}

/// Builds a histogram of `values`, bin count by Sturges' rule, spanning
/// `[min(values, lei), max(values, les)]` so the spec limits always fall
/// within the plotted range.
fn histogram(values: &[f64], spec: SpecLimits) -> Histogram {
    let data_min = values.iter().copied().fold(f64::INFINITY, f64::min).min(spec.lei);
    let data_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max).max(spec.les);

    // Sturges' rule: k = floor(log2(n)) + 1.
    let bin_count = if values.is_empty() { 1 } else { (values.len() as f64).log2().floor() as usize + 1 }.max(1);

    let width = if data_max > data_min { (data_max - data_min) / bin_count as f64 } else { 1.0 };
    let mut counts = vec![0usize; bin_count];
    for &v in values {
        let idx = if width <= 0.0 {
            0
        } else {
            (((v - data_min) / width).floor() as usize).min(bin_count - 1)
        };
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin { lower: data_min + i as f64 * width, upper: data_min + (i as f64 + 1.0) * width, count })
        .collect();

    Histogram { bins, lei: spec.lei, les: spec.les }
}

/// I-chart or MR-chart series: raw point values, control limits, and an
/// out-of-control overlay (spec.md §4.8: "violation overlays").
#[derive(Debug, Clone, Serialize)]
pub struct ControlChartSeries {
    /// Charted values, in index order.
    pub values: Vec<f64>,
    /// Center line.
    pub center: f64,
    /// Upper control limit.
    pub ucl: f64,
    /// Lower control limit.
    pub lcl: f64,
    /// Out-of-control points, for overlay rendering.
    pub ooc_points: Vec<PointViolation>,
}

/// One Q-Q plot point: theoretical quantile vs. observed value, with a
/// 95% confidence band around the OLS fit line (spec.md §4.8).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QqPoint {
    /// Expected standard-normal quantile, `normal_ppf(p_i)`.
    pub expected: f64,
    /// Observed (sorted) value.
    pub observed: f64,
    /// Lower 95% band around the fitted line at this quantile.
    pub band_lower: f64,
    /// Upper 95% band around the fitted line at this quantile.
    pub band_upper: f64,
}

/// Normal Q-Q plot: Blom plotting positions, an OLS fit line, and 95%
/// confidence bands (spec.md §4.8).
#[derive(Debug, Clone, Serialize)]
pub struct NormalityPlot {
    /// One point per sorted observation.
    pub points: Vec<QqPoint>,
    /// OLS fit slope.
    pub slope: f64,
    /// OLS fit intercept.
    pub intercept: f64,
}

/// Builds the Q-Q plot for `values` (spec.md §4.8: Blom positions,
/// `normal_ppf`, OLS fit, 95% bands). Returns `None` when a quantile
/// falls outside `normal_ppf`'s domain, which cannot happen for `n >= 2`
/// since Blom's positions always lie strictly inside `(0, 1)`.
fn normality_plot(values: &[f64]) -> Option<NormalityPlot> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n_f = n as f64;
    let std = values.sample_std();

    let expected: Vec<f64> = (1..=n)
        .map(|i| {
            let p = (i as f64 - 0.375) / (n_f + 0.25);
            Primitives::normal_ppf(p)
        })
        .collect::<Result<_, _>>()
        .ok()?;

    let mean_z = expected.mean();
    let mean_y = sorted.mean();
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (&z, &y) in expected.iter().zip(&sorted) {
        numerator += (z - mean_z) * (y - mean_y);
        denominator += (z - mean_z) * (z - mean_z);
    }
    let slope = if denominator > 0.0 { numerator / denominator } else { 0.0 };
    let intercept = mean_y - slope * mean_z;

    let se = std / n_f.sqrt();
    let points = expected
        .iter()
        .zip(&sorted)
        .map(|(&z, &observed)| {
            let fitted = slope.mul_add(z, intercept);
            let half_band = 1.96 * se * (1.0 + z * z / (2.0 * n_f)).sqrt();
            QqPoint { expected: z, observed, band_lower: fitted - half_band, band_upper: fitted + half_band }
        })
        .collect();

    Some(NormalityPlot { points, slope, intercept })
}

/// Builds the conditional Process Capability chart list (spec.md §4.8):
/// histogram when spec limits are given, I/MR charts whenever stability
/// ran, the Q-Q plot whenever normality ran over `n >= 2` points.
#[must_use]
pub fn build_capacidad_charts(values: &[f64], spec: Option<SpecLimits>, stability: &StabilityResult) -> Vec<ChartEntry> {
    let mut charts = Vec::new();

    if let Some(spec) = spec {
        charts.push(ChartEntry::new("histogram", &histogram(values, spec)));
    }

    let i_chart = ControlChartSeries {
        values: values.to_vec(),
        center: stability.i_chart.center,
        ucl: stability.i_chart.ucl,
        lcl: stability.i_chart.lcl,
        ooc_points: stability.i_chart.ooc_points.clone(),
    };
    let mr_chart = ControlChartSeries {
        values: stability.mr_chart.values.clone(),
        center: stability.mr_chart.center,
        ucl: stability.mr_chart.ucl,
        lcl: stability.mr_chart.lcl,
        ooc_points: stability.mr_chart.ooc_points.clone(),
    };
    charts.push(ChartEntry::new("i_chart", &i_chart));
    charts.push(ChartEntry::new("mr_chart", &mr_chart));

    if let Some(plot) = normality_plot(values) {
        charts.push(ChartEntry::new("normality_plot", &plot));
    }

    charts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stability::analyze_stability;

    #[test]
    fn histogram_spans_spec_limits() {
        let values: Vec<f64> = (0..30).map(f64::from).collect();
        let hist = histogram(&values, SpecLimits { lei: -5.0, les: 35.0 });
        assert!((hist.bins.first().expect("at least one bin").lower - (-5.0)).abs() < 1e-9);
        assert!(hist.bins.iter().map(|b| b.count).sum::<usize>() == values.len());
    }

    #[test]
    fn normality_plot_is_none_for_fewer_than_two_points() {
        assert!(normality_plot(&[1.0]).is_none());
    }

    #[test]
    fn chart_list_includes_histogram_only_with_spec_limits() {
        let values: Vec<f64> = (0..25).map(|i| 10.0 + f64::from(i) * 0.1).collect();
        let stability = analyze_stability(&values);
        let without_spec = build_capacidad_charts(&values, None, &stability);
        assert!(!without_spec.iter().any(|c| c.chart_type == "histogram"));

        let with_spec = build_capacidad_charts(&values, Some(SpecLimits { lei: 9.0, les: 13.0 }), &stability);
        assert!(with_spec.iter().any(|c| c.chart_type == "histogram"));
        assert!(with_spec.iter().any(|c| c.chart_type == "i_chart"));
        assert!(with_spec.iter().any(|c| c.chart_type == "mr_chart"));
        assert!(with_spec.iter().any(|c| c.chart_type == "normality_plot"));
    }

    #[test]
    fn i_chart_overlay_carries_the_out_of_control_point() {
        let mut values: Vec<f64> = (0..25).map(|i| 10.0 + f64::from(i) * 0.1).collect();
        values.push(1000.0);
        let stability = analyze_stability(&values);
        let charts = build_capacidad_charts(&values, None, &stability);
        let i_chart = charts.iter().find(|c| c.chart_type == "i_chart").expect("i_chart present");
        let ooc_points = i_chart.data.get("ooc_points").and_then(serde_json::Value::as_array).expect("ooc_points array");
        assert!(!ooc_points.is_empty());
    }
}
