//! Deterministic MSA chart-series builder (spec.md §4.3). No rendering;
//! plain structured data in the fixed order spec.md §4.3 lists.

use serde::Serialize;

use crate::constants::{r_chart_d4, x_bar_chart_a2};
use crate::msa::reshape::LongForm;
use crate::msa::types::{GrrClassification, GrrPercentages, OperatorStats, VarianceComponents};
use crate::report::ChartEntry;
use crate::stats::Moments;

/// One labeled bar in the variation-breakdown chart.
#[derive(Debug, Clone, Serialize)]
pub struct VariationBar {
    /// Bar label.
    pub label: String,
    /// Percentage-of-total value.
    pub value: f64,
    /// Hex color, classification-derived only for the GRR Total bar.
    pub color: String,
}

/// (a) Variation breakdown: four labeled bars.
#[derive(Debug, Clone, Serialize)]
pub struct VariationBreakdown {
    /// Bars in order: Repeatability, Reproducibility, GRR Total, Part-to-Part.
    pub bars: Vec<VariationBar>,
}

fn classification_color(classification: GrrClassification) -> &'static str {
    match classification {
        GrrClassification::Aceptable => "#2ecc71",
        GrrClassification::Marginal => "#f1c40f",
        GrrClassification::Inaceptable => "#e74c3c",
    }
}

fn variation_breakdown(pct: &GrrPercentages, classification: GrrClassification) -> VariationBreakdown {
    VariationBreakdown {
        bars: vec![
            VariationBar { label: "Repetibilidad".to_string(), value: pct.repeatability, color: "#95a5a6".to_string() },
            VariationBar { label: "Reproducibilidad".to_string(), value: pct.reproducibility, color: "#95a5a6".to_string() },
            VariationBar {
                label: "GRR Total".to_string(),
                value: pct.grr_total,
                color: classification_color(classification).to_string(),
            },
            VariationBar { label: "Parte a Parte".to_string(), value: pct.part_to_part, color: "#95a5a6".to_string() },
        ],
    }
}

/// (b) Per-operator mean/std bars.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorMeanStd {
    /// Operator label.
    pub operator: String,
    /// Operator mean.
    pub mean: f64,
    /// Operator sample std.
    pub std_dev: f64,
}

/// (c) R-chart data: per-operator-part ranges with AIAG control limits.
#[derive(Debug, Clone, Serialize)]
pub struct RChart {
    /// Ranges in long-row order (one per part×operator cell).
    pub ranges: Vec<f64>,
    /// R̄: mean of ranges.
    pub r_bar: f64,
    /// Upper control limit, `D4 * r_bar`.
    pub ucl: f64,
    /// Lower control limit, `D3 * r_bar`.
    pub lcl: f64,
}

/// (d) X̄-chart data: per-cell means with AIAG `A2 * R̄` limits.
#[derive(Debug, Clone, Serialize)]
pub struct XBarChart {
    /// Per-part×operator cell means, in cell order.
    pub means: Vec<f64>,
    /// Grand mean (center line).
    pub center: f64,
    /// Upper control limit, `center + A2 * r_bar`.
    pub ucl: f64,
    /// Lower control limit, `center - A2 * r_bar`.
    pub lcl: f64,
}

/// (e)/(f) Box-plot data for one part or operator group.
#[derive(Debug, Clone, Serialize)]
pub struct BoxData {
    /// Group label (part or operator).
    pub label: String,
    /// Raw values in the group, for client-side box-plot computation.
    pub values: Vec<f64>,
}

/// (g) Interaction means grid: one row per part, one value per operator.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionGrid {
    /// Part labels, row order.
    pub part_labels: Vec<String>,
    /// Operator labels, column order.
    pub operator_labels: Vec<String>,
    /// `means[part_idx][operator_idx]` cell means.
    pub means: Vec<Vec<f64>>,
}

/// Builds the fixed-order MSA chart series (a)-(g) from long-form data,
/// variance percentages, classification, and per-operator stats.
#[must_use]
pub fn build_msa_charts(
    long: &LongForm,
    pct: &GrrPercentages,
    classification: GrrClassification,
    operator_stats: &[OperatorStats],
    _vc: &VarianceComponents,
) -> Vec<ChartEntry> {
    let n_parts = long.part_labels.len();
    let n_operators = long.operator_labels.len();

    let mut cell_values: Vec<Vec<f64>> = vec![Vec::new(); n_parts * n_operators];
    for row in &long.rows {
        cell_values[row.part * n_operators + row.operator].push(row.value);
    }
    let replicate_count = cell_values.iter().map(Vec::len).max().unwrap_or(0);

    let ranges: Vec<f64> = cell_values
        .iter()
        .map(|values| {
            if values.is_empty() {
                0.0
            } else {
                values.iter().copied().fold(f64::NEG_INFINITY, f64::max) - values.iter().copied().fold(f64::INFINITY, f64::min)
            }
        })
        .collect();
    let r_bar = if ranges.is_empty() { 0.0 } else { ranges.iter().sum::<f64>() / ranges.len() as f64 };
    let d4 = r_chart_d4(replicate_count);
    let r_chart = RChart { ranges: ranges.clone(), r_bar, ucl: d4 * r_bar, lcl: 0.0 };

    let all_values: Vec<f64> = long.rows.iter().map(|r| r.value).collect();
    let grand_mean = all_values.mean();
    let cell_means: Vec<f64> = cell_values.iter().map(|v| if v.is_empty() { f64::NAN } else { v.mean() }).collect();
    let a2 = x_bar_chart_a2(replicate_count);
    let x_bar_chart =
        XBarChart { means: cell_means.clone(), center: grand_mean, ucl: grand_mean + a2 * r_bar, lcl: grand_mean - a2 * r_bar };

    let part_boxes: Vec<BoxData> = (0..n_parts)
        .map(|p| {
            let values: Vec<f64> =
                (0..n_operators).flat_map(|o| cell_values[p * n_operators + o].iter().copied()).collect();
            BoxData { label: long.part_labels[p].clone(), values }
        })
        .collect();
    let operator_boxes: Vec<BoxData> = (0..n_operators)
        .map(|o| {
            let values: Vec<f64> = (0..n_parts).flat_map(|p| cell_values[p * n_operators + o].iter().copied()).collect();
            BoxData { label: long.operator_labels[o].clone(), values }
        })
        .collect();

    let interaction_means: Vec<Vec<f64>> =
        (0..n_parts).map(|p| (0..n_operators).map(|o| cell_means[p * n_operators + o]).collect()).collect();
    let interaction_grid =
        InteractionGrid { part_labels: long.part_labels.clone(), operator_labels: long.operator_labels.clone(), means: interaction_means };

    let operator_mean_std: Vec<OperatorMeanStd> = operator_stats
        .iter()
        .map(|s| OperatorMeanStd { operator: s.operator.clone(), mean: s.mean, std_dev: s.std_dev })
        .collect();

    vec![
        ChartEntry::new("variation_breakdown", &variation_breakdown(pct, classification)),
        ChartEntry::new("operator_mean_std", &operator_mean_std),
        ChartEntry::new("r_chart", &r_chart),
        ChartEntry::new("x_bar_chart", &x_bar_chart),
        ChartEntry::new("part_box_data", &part_boxes),
        ChartEntry::new("operator_box_data", &operator_boxes),
        ChartEntry::new("interaction_grid", &interaction_grid),
    ]
}
