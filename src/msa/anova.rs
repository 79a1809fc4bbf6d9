//! Two-way crossed ANOVA over long-form MSA data (spec.md §4.3).

use crate::error::AnalysisError;
use crate::msa::reshape::LongForm;
use crate::msa::types::{AnovaRow, AnovaTable};
use crate::primitives::Primitives;

/// Computes the two-way crossed ANOVA table for a balanced Part × Operator
/// design with `r` replicates per cell.
///
/// F-statistics for every effect use `MS_Equipment` as the denominator
/// (Type-II, fixed-effects convention, spec.md §4.3).
///
/// # Errors
/// Returns [`AnalysisError::Calculation`] if the design is not balanced
/// (each Part × Operator cell must have the same replicate count) or has
/// fewer than 2 parts/operators/replicates.
pub fn two_way_anova(long: &LongForm) -> Result<AnovaTable, AnalysisError> {
    let n_parts = long.part_labels.len();
    let n_operators = long.operator_labels.len();
    let n_total = long.rows.len();

    if n_parts < 2 || n_operators < 2 {
        return Err(AnalysisError::Calculation("ANOVA requires at least 2 parts and 2 operators".to_string()));
    }
    let cells = n_parts * n_operators;
    if cells == 0 || n_total % cells != 0 {
        return Err(AnalysisError::Calculation("unbalanced Part x Operator design is not supported".to_string()));
    }
    let r = n_total / cells;
    if r < 2 {
        return Err(AnalysisError::Calculation("ANOVA requires at least 2 replicates per cell".to_string()));
    }

    let mut cell_sum = vec![0.0_f64; cells];
    let mut cell_count = vec![0_usize; cells];
    let mut part_sum = vec![0.0_f64; n_parts];
    let mut part_count = vec![0_usize; n_parts];
    let mut operator_sum = vec![0.0_f64; n_operators];
    let mut operator_count = vec![0_usize; n_operators];
    let mut grand_sum = 0.0_f64;

    for row in &long.rows {
        let cell_idx = row.part * n_operators + row.operator;
        cell_sum[cell_idx] += row.value;
        cell_count[cell_idx] += 1;
        part_sum[row.part] += row.value;
        part_count[row.part] += 1;
        operator_sum[row.operator] += row.value;
        operator_count[row.operator] += 1;
        grand_sum += row.value;
    }

    let grand_mean = grand_sum / n_total as f64;
    let part_means: Vec<f64> = part_sum.iter().zip(&part_count).map(|(&s, &c)| s / c as f64).collect();
    let operator_means: Vec<f64> = operator_sum.iter().zip(&operator_count).map(|(&s, &c)| s / c as f64).collect();
    let cell_means: Vec<f64> = cell_sum.iter().zip(&cell_count).map(|(&s, &c)| s / c as f64).collect();

    let ss_total: f64 = long.rows.iter().map(|row| (row.value - grand_mean).powi(2)).sum();
    let ss_part: f64 = (n_operators * r) as f64 * part_means.iter().map(|&m| (m - grand_mean).powi(2)).sum::<f64>();
    let ss_operator: f64 = (n_parts * r) as f64 * operator_means.iter().map(|&m| (m - grand_mean).powi(2)).sum::<f64>();
    let ss_interaction: f64 = r as f64
        * (0..n_parts)
            .flat_map(|p| (0..n_operators).map(move |o| (p, o)))
            .map(|(p, o)| {
                let cell_mean = cell_means[p * n_operators + o];
                (cell_mean - part_means[p] - operator_means[o] + grand_mean).powi(2)
            })
            .sum::<f64>();
    let ss_equipment = ss_total - (ss_part + ss_operator + ss_interaction);

    let df_part = (n_parts - 1) as f64;
    let df_operator = (n_operators - 1) as f64;
    let df_interaction = ((n_parts - 1) * (n_operators - 1)) as f64;
    let df_equipment = (n_total - cells) as f64;
    let df_total = (n_total - 1) as f64;

    let ms_part = ss_part / df_part;
    let ms_operator = ss_operator / df_operator;
    let ms_interaction = ss_interaction / df_interaction;
    let ms_equipment = ss_equipment / df_equipment;

    let row_with_f = |ss: f64, df: f64, ms: f64| -> Result<AnovaRow, AnalysisError> {
        let f_statistic = if ms_equipment > 0.0 { ms / ms_equipment } else { f64::INFINITY };
        let p_value = if f_statistic.is_finite() { Some(Primitives::f_survival(f_statistic, df, df_equipment)?) } else { Some(0.0) };
        Ok(AnovaRow { sum_of_squares: ss, degrees_of_freedom: df, mean_square: ms, f_statistic: Some(f_statistic), p_value })
    };

    let part = row_with_f(ss_part, df_part, ms_part)?;
    let operator = row_with_f(ss_operator, df_operator, ms_operator)?;
    let interaction = row_with_f(ss_interaction, df_interaction, ms_interaction)?;
    let equipment = AnovaRow {
        sum_of_squares: ss_equipment,
        degrees_of_freedom: df_equipment,
        mean_square: ms_equipment,
        f_statistic: None,
        p_value: None,
    };
    let total =
        AnovaRow { sum_of_squares: ss_total, degrees_of_freedom: df_total, mean_square: ss_total / df_total, f_statistic: None, p_value: None };

    Ok(AnovaTable { part, operator, interaction, equipment, total })
}
