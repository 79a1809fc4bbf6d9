//! End-to-end Process Capability scenarios (spec.md §8, scenarios 7-9),
//! driven through the public [`analyze_capacidad_proceso`] entry point.

use calidad_stats::capability::{CapabilityLevel, CapabilityMethod, SpecLimits};
use calidad_stats::{EngineLimits, Table, analyze_capacidad_proceso};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64;
use serde_json::json;

fn column_table(values: &[f64]) -> Table {
    let headers = vec!["Valores".to_string()];
    let rows = values.iter().map(|&v| vec![json!(v)]).collect();
    Table::new(headers, rows)
}

fn normal_sample(mean: f64, std: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let normal = Normal::new(mean, std).expect("valid normal parameters");
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

#[test]
fn capable_normal_process_reports_cp_near_one_and_matching_cpk() {
    let values = normal_sample(100.0, 10.0, 300, 21);
    let table = column_table(&values);
    let spec = SpecLimits { lei: 70.0, les: 130.0 };

    let doc = analyze_capacidad_proceso(&table, Some(spec), &EngineLimits::default()).expect("valid document");
    let capability = doc.results.capability.expect("spec limits were provided");

    assert_eq!(capability.method, CapabilityMethod::Normal);
    let cp = capability.cp.expect("sigma_within is positive for a real sample");
    assert!((cp - 1.0).abs() < 0.3, "Cp should be near 1.0, got {cp}");
    let cpk = capability.cpk.expect("sigma_within is positive");
    assert!(cpk <= cp + 1e-3);
}

#[test]
fn six_sigma_process_has_negligible_ppm() {
    let values = normal_sample(5.0, 0.5, 300, 22);
    let table = column_table(&values);
    let spec = SpecLimits { lei: 2.0, les: 8.0 };

    let doc = analyze_capacidad_proceso(&table, Some(spec), &EngineLimits::default()).expect("valid document");
    let capability = doc.results.capability.expect("spec limits were provided");

    assert!(capability.ppm.total < 100, "expected a near-zero PPM estimate, got {}", capability.ppm.total);
    assert_eq!(capability.ppm.total, capability.ppm.below + capability.ppm.above);
}

#[test]
fn boundary_cpk_values_map_to_the_documented_classification_ladder() {
    assert_eq!(CapabilityLevel::classify(Some(1.67)), CapabilityLevel::Excellent);
    assert_eq!(CapabilityLevel::classify(Some(1.33)), CapabilityLevel::Adequate);
    assert_eq!(CapabilityLevel::classify(Some(1.00)), CapabilityLevel::Marginal);
    assert_eq!(CapabilityLevel::classify(Some(0.67)), CapabilityLevel::Inadequate);
}

#[test]
fn without_spec_limits_no_capability_subsection_is_produced() {
    let values = normal_sample(50.0, 2.0, 50, 23);
    let table = column_table(&values);

    let doc = analyze_capacidad_proceso(&table, None, &EngineLimits::default()).expect("valid document");
    assert!(doc.results.capability.is_none());
    assert!(!doc.chart_data.iter().any(|c| c.chart_type == "histogram"));
}

#[test]
fn inverted_spec_limits_are_a_structured_error_not_a_panic() {
    let values = normal_sample(50.0, 2.0, 30, 24);
    let table = column_table(&values);

    let err = analyze_capacidad_proceso(&table, Some(SpecLimits { lei: 100.0, les: 0.0 }), &EngineLimits::default())
        .unwrap_err();
    assert_eq!(err.code, calidad_stats::error::CapacidadErrorCode::InvalidSpecLimits);
}

#[test]
fn analysis_is_pure_for_fixed_input() {
    let values = normal_sample(100.0, 10.0, 100, 25);
    let table = column_table(&values);
    let spec = SpecLimits { lei: 70.0, les: 130.0 };

    let first = analyze_capacidad_proceso(&table, Some(spec), &EngineLimits::default()).expect("valid document");
    let second = analyze_capacidad_proceso(&table, Some(spec), &EngineLimits::default()).expect("valid document");

    assert_eq!(first.results.capability, second.results.capability);
    assert_eq!(first.results.basic_statistics.mean, second.results.basic_statistics.mean);
}
