//! End-to-end MSA scenarios (spec.md §8, scenarios 1-3) driven through the
//! public API only.

use calidad_stats::msa::types::{DominantSource, GrrClassification};
use calidad_stats::{EngineLimits, Table, analyze_msa};
use serde_json::json;

fn balanced_table(part_means: &[f64], operator_shift: f64, replicate_spread: f64) -> Table {
    let headers = vec![
        "Parte".to_string(),
        "Operador".to_string(),
        "Medicion1".to_string(),
        "Medicion2".to_string(),
        "Medicion3".to_string(),
    ];
    let mut rows = Vec::new();
    for (part, &mean) in part_means.iter().enumerate() {
        for (op_index, operator) in ["A", "B"].iter().enumerate() {
            let shift = if op_index == 1 { operator_shift } else { 0.0 };
            rows.push(vec![
                json!(part + 1),
                json!(operator),
                json!(mean + shift - replicate_spread),
                json!(mean + shift),
                json!(mean + shift + replicate_spread),
            ]);
        }
    }
    Table::new(headers, rows)
}

#[test]
fn reference_msa_scenario_has_sane_non_negative_components() {
    let table = balanced_table(&[10.1, 12.5, 8.8, 15.2, 11.0], 0.1, 0.3);
    let doc = analyze_msa(&table, None, None, &EngineLimits::default()).expect("valid MSA document");

    let vc = doc.results.variance_components;
    assert!(vc.repeatability >= 0.0);
    assert!(vc.operator >= 0.0);
    assert!(vc.interaction >= 0.0);
    assert!(vc.part >= 0.0);
    assert!(vc.reproducibility >= 0.0);
    assert!(vc.total >= 0.0);

    let pct = doc.results.percentages;
    let total_pct = pct.grr_total + pct.part_to_part;
    assert!((total_pct - 100.0).abs() < 1.0, "percentages should sum near 100, got {total_pct}");

    assert!(matches!(
        doc.classification,
        GrrClassification::Aceptable | GrrClassification::Marginal | GrrClassification::Inaceptable
    ));
    assert!(doc.results.ndc <= 999);
}

#[test]
fn high_grr_scenario_is_inaceptable_with_reproducibility_dominant() {
    let table = balanced_table(&[10.1, 12.5, 8.8, 15.2, 11.0], 5.0, 0.3);
    let doc = analyze_msa(&table, None, None, &EngineLimits::default()).expect("valid MSA document");

    assert_eq!(doc.classification, GrrClassification::Inaceptable);
    assert_eq!(doc.dominant_variation, DominantSource::Reproducibility);
}

#[test]
fn low_grr_scenario_is_aceptable_with_part_to_part_dominant_and_large_ndc() {
    let table = balanced_table(&[10.0, 30.0, 50.0, 70.0, 90.0], 0.0, 0.01);
    let doc = analyze_msa(&table, None, None, &EngineLimits::default()).expect("valid MSA document");

    assert_eq!(doc.classification, GrrClassification::Aceptable);
    assert_eq!(doc.dominant_variation, DominantSource::PartToPart);
    assert!(doc.results.ndc >= 5);
}

#[test]
fn analysis_is_pure_for_fixed_input() {
    let table = balanced_table(&[10.1, 12.5, 8.8, 15.2, 11.0], 0.1, 0.3);
    let first = analyze_msa(&table, None, None, &EngineLimits::default()).expect("valid MSA document");
    let second = analyze_msa(&table, None, None, &EngineLimits::default()).expect("valid MSA document");

    assert_eq!(first.results.variance_components, second.results.variance_components);
    assert_eq!(first.classification, second.classification);
    assert_eq!(first.dominant_variation, second.dominant_variation);
}

#[test]
fn missing_operator_column_is_a_structured_validation_error() {
    let headers = vec!["Parte".to_string(), "Medicion1".to_string(), "Medicion2".to_string()];
    let rows = vec![vec![json!(1), json!(10.0), json!(10.1)], vec![json!(2), json!(11.0), json!(11.1)]];
    let table = Table::new(headers, rows);

    let err = analyze_msa(&table, None, None, &EngineLimits::default()).unwrap_err();
    assert_eq!(err.code, calidad_stats::error::MsaErrorCode::MissingColumns);
}
