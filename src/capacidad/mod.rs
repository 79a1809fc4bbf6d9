//! Process Capability orchestrator (spec.md §4.7, §4.8): validate →
//! basic statistics → normality → (non-normal) distribution fit →
//! stability → (optional) capability indices → charts → narrative.
//!
//! Mirrors the shape of [`crate::msa::analyze_msa`]: a thin public
//! entry point that runs the validator when needed and collapses
//! pipeline faults to a structured error instead of panicking.

pub mod charts;
pub mod narrative;

use tracing::debug;

use crate::capability::{self, SpecLimits};
use crate::config::EngineLimits;
use crate::distributions::best_fit;
use crate::error::{CapacidadErrorCode, CapacidadValidationError};
use crate::normality::analyze_normality;
use crate::report::{CapacidadDocument, CapacidadResults};
use crate::stability::analyze_stability;
use crate::table::Table;
use crate::validators::{ValidatedSeries, validate_capacidad};

/// Runs the complete Process Capability pipeline over `table`.
///
/// `spec_limits` is optional; when given, it enables the Cp/Cpk/Pp/Ppk
/// subsection and the histogram chart (spec.md §4.7, §4.8).
///
/// # Errors
/// Returns the validator's [`CapacidadValidationError`] on a
/// structural/data problem, or
/// [`CapacidadErrorCode::InvalidSpecLimits`] when `spec_limits` is
/// non-finite or inverted (`lei >= les`).
pub fn analyze_capacidad_proceso(
    table: &Table,
    spec_limits: Option<SpecLimits>,
    limits: &EngineLimits,
) -> Result<CapacidadDocument, CapacidadValidationError> {
    let series = validate_capacidad(table, limits)?;
    debug!(column = %series.column_name, n = series.values.len(), "Capability series validated");

    run_pipeline(&series, spec_limits, limits)
}

fn run_pipeline(
    series: &ValidatedSeries,
    spec_limits: Option<SpecLimits>,
    limits: &EngineLimits,
) -> Result<CapacidadDocument, CapacidadValidationError> {
    let values = &series.values;

    let basic = capability::basic_statistics(values);
    let normality = analyze_normality(values, limits);

    let distribution_fit = if normality.is_normal { None } else { Some(best_fit(values)) };

    let stability = analyze_stability(values);

    let capability_result = match spec_limits {
        Some(spec) => {
            let fitted = distribution_fit.as_ref().map(|fit| &fit.distribution);
            let result = capability::compute_capability(values, spec, stability.sigma_within, fitted)
                .map_err(|e| CapacidadValidationError::new(CapacidadErrorCode::InvalidSpecLimits, e.0))?;
            Some(result)
        }
        None => None,
    };

    let chart_data = charts::build_capacidad_charts(values, spec_limits, &stability);
    let instructions = narrative::build_narrative(&basic, &normality, &stability, capability_result.as_ref());

    let results = CapacidadResults {
        basic_statistics: basic,
        normality,
        distribution_fit,
        stability,
        capability: capability_result,
    };

    Ok(CapacidadDocument { results, chart_data, instructions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg64;
    use serde_json::json;

    fn normal_table(mean: f64, std: f64, n: usize, seed: u64) -> Table {
        let mut rng = Pcg64::seed_from_u64(seed);
        let dist = Normal::new(mean, std).expect("valid normal parameters");
        let headers = vec!["Valores".to_string()];
        let rows = (0..n).map(|_| vec![json!(dist.sample(&mut rng))]).collect();
        Table::new(headers, rows)
    }

    #[test]
    fn normal_capable_process_reports_normal_method_and_high_cpk() {
        let table = normal_table(100.0, 1.0, 200, 1);
        let doc = analyze_capacidad_proceso(&table, Some(SpecLimits { lei: 90.0, les: 110.0 }), &EngineLimits::default())
            .expect("valid Capability document");
        let capability = doc.results.capability.expect("spec limits were provided");
        assert_eq!(capability.method, crate::capability::CapabilityMethod::Normal);
        assert!(capability.cpk.expect("sigma_within is positive") > 1.0);
        assert!(doc.chart_data.iter().any(|c| c.chart_type == "histogram"));
    }

    #[test]
    fn without_spec_limits_capability_subsection_is_absent() {
        let table = normal_table(50.0, 2.0, 40, 2);
        let doc =
            analyze_capacidad_proceso(&table, None, &EngineLimits::default()).expect("valid Capability document");
        assert!(doc.results.capability.is_none());
        assert!(!doc.chart_data.iter().any(|c| c.chart_type == "histogram"));
    }

    #[test]
    fn inverted_spec_limits_are_rejected() {
        let table = normal_table(50.0, 2.0, 30, 3);
        let err = analyze_capacidad_proceso(&table, Some(SpecLimits { lei: 100.0, les: 0.0 }), &EngineLimits::default())
            .unwrap_err();
        assert_eq!(err.code, CapacidadErrorCode::InvalidSpecLimits);
    }

    #[test]
    fn fewer_than_twenty_values_still_produces_a_document_with_a_warning() {
        let table = normal_table(10.0, 1.0, 8, 4);
        let doc = analyze_capacidad_proceso(&table, None, &EngineLimits::default()).expect("valid Capability document");
        assert_eq!(doc.results.basic_statistics.n, 8);
    }
}
