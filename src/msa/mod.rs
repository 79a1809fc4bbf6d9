//! MSA (Measurement System Analysis / Gauge R&R) engine (spec.md §4.3).
//!
//! Orchestrates reshape → ANOVA → variance components → GRR metrics →
//! per-operator stats → chart series → narrative, mirroring
//! `QualityControlEngine::analyze_process`'s pipeline shape.

pub mod anova;
pub mod charts;
pub mod grr;
pub mod narrative;
pub mod operator_stats;
pub mod reshape;
pub mod types;
mod variance;

use tracing::debug;

use crate::config::EngineLimits;
use crate::error::{AnalysisError, MsaErrorCode, MsaValidationError};
use crate::report::MsaDocument;
use crate::table::Table;
use crate::validators::{ColumnMapping, validate_msa};

use self::types::MsaResults;

/// Runs the complete MSA pipeline over `table`.
///
/// If `column_mapping` is `None`, the MSA validator (spec.md §4.2) runs
/// first. `specification` is an optional nominal value that enables the
/// bias side-panel in the narrative (spec.md §4.3).
///
/// # Errors
/// Returns the validator's [`MsaValidationError`] on a structural/data
/// problem. An unexpected pipeline fault (unbalanced design, missing
/// mapped column) collapses to
/// [`MsaErrorCode::CalculationError`](crate::error::MsaErrorCode::CalculationError)
/// rather than panicking (spec.md §6, §7).
pub fn analyze_msa(
    table: &Table,
    column_mapping: Option<ColumnMapping>,
    specification: Option<f64>,
    limits: &EngineLimits,
) -> Result<MsaDocument, MsaValidationError> {
    let mapping = match column_mapping {
        Some(m) => m,
        None => validate_msa(table, limits)?,
    };

    debug!(part = %mapping.part, operator = %mapping.operator, measurements = mapping.measurements.len(), "MSA validated");

    run_pipeline(table, &mapping, specification)
        .map_err(|e| MsaValidationError::new(MsaErrorCode::CalculationError, format!("error de cálculo: {e}")))
}

fn run_pipeline(table: &Table, mapping: &ColumnMapping, specification: Option<f64>) -> Result<MsaDocument, AnalysisError> {
    let long = reshape::reshape_to_long(table, mapping)?;
    debug!(rows = long.rows.len(), "reshaped to long form");

    let anova_table = anova::two_way_anova(&long)?;
    let n_parts = long.part_labels.len();
    let n_operators = long.operator_labels.len();
    let replicate_count = long.rows.len() / (n_parts * n_operators);

    let vc = variance::variance_components(&anova_table, n_parts, n_operators, replicate_count);
    let pct = grr::grr_percentages(&vc);
    let classification = grr::classify(&pct);
    let dominant = grr::dominant_source(&pct);
    let ndc = grr::number_of_distinct_categories(&vc);
    let stats = operator_stats::operator_stats(&long);

    let results = MsaResults {
        anova: anova_table,
        variance_components: vc,
        percentages: pct,
        ndc,
        classification,
        operator_stats: stats.clone(),
        part_count: n_parts,
        operator_count: n_operators,
        replicate_count,
    };

    let chart_data = charts::build_msa_charts(&long, &pct, classification, &stats, &results.variance_components);
    let instructions = narrative::build_narrative(&results, &pct, classification, dominant, specification);

    Ok(MsaDocument { results, chart_data, instructions, dominant_variation: dominant, classification })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn balanced_table(part_means: &[f64], operator_shift: f64) -> Table {
        let headers = vec!["Parte".to_string(), "Operador".to_string(), "Medicion1".to_string(), "Medicion2".to_string(), "Medicion3".to_string()];
        let mut rows = Vec::new();
        for (p, &mean) in part_means.iter().enumerate() {
            for (o, op) in ["A", "B"].iter().enumerate() {
                let shift = if o == 1 { operator_shift } else { 0.0 };
                rows.push(vec![
                    json!(p + 1),
                    json!(op),
                    json!(mean + shift - 0.3),
                    json!(mean + shift),
                    json!(mean + shift + 0.3),
                ]);
            }
        }
        Table::new(headers, rows)
    }

    #[test]
    fn reference_scenario_produces_sane_non_negative_components() {
        let table = balanced_table(&[10.1, 12.5, 8.8, 15.2, 11.0], 0.1);
        let doc = analyze_msa(&table, None, None, &EngineLimits::default()).expect("valid MSA document");
        let vc = doc.results.variance_components;
        assert!(vc.repeatability >= 0.0);
        assert!(vc.operator >= 0.0);
        assert!(vc.interaction >= 0.0);
        assert!(vc.part >= 0.0);
        assert!(doc.results.ndc < 1000);
    }

    #[test]
    fn high_grr_scenario_is_inaceptable_with_reproducibility_dominant() {
        let table = balanced_table(&[10.1, 12.5, 8.8, 15.2, 11.0], 5.0);
        let doc = analyze_msa(&table, None, None, &EngineLimits::default()).expect("valid MSA document");
        assert_eq!(doc.classification, types::GrrClassification::Inaceptable);
        assert_eq!(doc.dominant_variation, types::DominantSource::Reproducibility);
    }

    #[test]
    fn low_grr_scenario_is_aceptable_with_part_to_part_dominant() {
        let headers = vec!["Parte".to_string(), "Operador".to_string(), "Medicion1".to_string(), "Medicion2".to_string(), "Medicion3".to_string()];
        let mut rows = Vec::new();
        for (p, &mean) in [10.0, 30.0, 50.0, 70.0, 90.0].iter().enumerate() {
            for op in ["A", "B"] {
                rows.push(vec![json!(p + 1), json!(op), json!(mean - 0.01), json!(mean), json!(mean + 0.01)]);
            }
        }
        let table = Table::new(headers, rows);
        let doc = analyze_msa(&table, None, None, &EngineLimits::default()).expect("valid MSA document");
        assert_eq!(doc.classification, types::GrrClassification::Aceptable);
        assert_eq!(doc.dominant_variation, types::DominantSource::PartToPart);
        assert!(doc.results.ndc >= 5);
    }
}
