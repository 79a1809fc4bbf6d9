//! Per-operator descriptive stats (spec.md §4.3).

use crate::msa::reshape::LongForm;
use crate::msa::types::OperatorStats;
use crate::stats::Moments;

/// Computes per-operator mean, sample std, average per-part range, a
/// CV-based consistency score, and a 1-based ascending rank by
/// consistency (1 = most consistent).
#[must_use]
pub fn operator_stats(long: &LongForm) -> Vec<OperatorStats> {
    let n_operators = long.operator_labels.len();
    let n_parts = long.part_labels.len();

    let mut per_operator_values: Vec<Vec<f64>> = vec![Vec::new(); n_operators];
    let mut per_operator_per_part: Vec<Vec<Vec<f64>>> = vec![vec![Vec::new(); n_parts]; n_operators];

    for row in &long.rows {
        per_operator_values[row.operator].push(row.value);
        per_operator_per_part[row.operator][row.part].push(row.value);
    }

    let mut stats: Vec<OperatorStats> = (0..n_operators)
        .map(|op| {
            let values = &per_operator_values[op];
            let mean = values.mean();
            let std_dev = values.sample_std();

            let ranges: Vec<f64> = per_operator_per_part[op]
                .iter()
                .filter(|part_values| !part_values.is_empty())
                .map(|part_values| {
                    let max = part_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    let min = part_values.iter().copied().fold(f64::INFINITY, f64::min);
                    max - min
                })
                .collect();
            let average_range = if ranges.is_empty() { 0.0 } else { ranges.iter().sum::<f64>() / ranges.len() as f64 };

            let consistency_score = if mean.abs() < 1e-12 { std_dev * 100.0 } else { std_dev / mean.abs() * 100.0 };

            OperatorStats { operator: long.operator_labels[op].clone(), mean, std_dev, average_range, consistency_score, rank: 0 }
        })
        .collect();

    let mut order: Vec<usize> = (0..stats.len()).collect();
    order.sort_by(|&a, &b| stats[a].consistency_score.total_cmp(&stats[b].consistency_score));
    for (rank, &idx) in order.iter().enumerate() {
        stats[idx].rank = rank as u32 + 1;
    }

    stats
}
