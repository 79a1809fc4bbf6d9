//! ANOVA-method variance components (AIAG), spec.md §4.3.

use crate::msa::types::{AnovaTable, VarianceComponents};

/// Derives non-negative variance components from an ANOVA table and the
/// design's part/operator/replicate counts. Negative method-of-moments
/// estimates are truncated to zero per the AIAG convention (spec.md §9).
#[must_use]
pub fn variance_components(anova: &AnovaTable, n_parts: usize, n_operators: usize, r: usize) -> VarianceComponents {
    let n_parts_f = n_parts as f64;
    let n_operators_f = n_operators as f64;
    let r_f = r as f64;

    let repeatability = anova.equipment.mean_square;
    let interaction = ((anova.interaction.mean_square - anova.equipment.mean_square) / r_f).max(0.0);
    let operator = ((anova.operator.mean_square - anova.interaction.mean_square) / (n_parts_f * r_f)).max(0.0);
    let part = ((anova.part.mean_square - anova.interaction.mean_square) / (n_operators_f * r_f)).max(0.0);
    let reproducibility = operator + interaction;
    let total = repeatability + reproducibility + part;

    VarianceComponents { repeatability, operator, interaction, reproducibility, part, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msa::types::AnovaRow;

    fn row(ss: f64, df: f64) -> AnovaRow {
        AnovaRow { sum_of_squares: ss, degrees_of_freedom: df, mean_square: ss / df, f_statistic: None, p_value: None }
    }

    #[test]
    fn all_components_are_non_negative() {
        let anova = AnovaTable {
            part: row(10.0, 4.0),
            operator: row(0.1, 1.0),
            interaction: row(0.05, 4.0),
            equipment: row(1.0, 20.0),
            total: row(11.15, 29.0),
        };
        let vc = variance_components(&anova, 5, 2, 3);
        assert!(vc.repeatability >= 0.0);
        assert!(vc.operator >= 0.0);
        assert!(vc.interaction >= 0.0);
        assert!(vc.part >= 0.0);
        assert!((vc.total - (vc.repeatability + vc.reproducibility + vc.part)).abs() < 1e-9);
    }

    #[test]
    fn negative_mom_estimate_truncates_to_zero() {
        // Operator MS smaller than interaction MS would go negative without truncation.
        let anova = AnovaTable {
            part: row(10.0, 4.0),
            operator: row(0.01, 1.0),
            interaction: row(1.0, 4.0),
            equipment: row(1.0, 20.0),
            total: row(12.01, 29.0),
        };
        let vc = variance_components(&anova, 5, 2, 3);
        assert_eq!(vc.operator, 0.0);
    }
}
