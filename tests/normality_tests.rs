//! End-to-end normality scenarios (spec.md §8, scenarios 4-5).

use calidad_stats::EngineLimits;
use calidad_stats::normality::{NormalityMethod, analyze_normality};

#[test]
fn clear_normal_data_tests_normal_under_the_original_method() {
    let data: Vec<f64> = (0..20).map(|i| 100.0 + (f64::from(i) - 9.5) * 0.1).collect();
    let result = analyze_normality(&data, &EngineLimits::default());

    assert!(result.is_normal);
    assert!(result.p_value >= 0.05);
    assert_eq!(result.method, NormalityMethod::Original);
}

#[test]
fn right_skewed_data_attempts_a_transform_before_giving_up() {
    let data = [1.2, 1.5, 1.8, 2.3, 2.9, 3.5, 4.2, 5.1, 6.3, 8.0, 10.5, 14.0, 19.0, 25.0, 35.0];
    let result = analyze_normality(&data, &EngineLimits::default());

    assert_ne!(result.method, NormalityMethod::Original);
    assert!(result.boxcox.is_some(), "Box-Cox metadata should be retained even when the method fails overall");
}

#[test]
fn is_normal_is_consistent_with_the_reported_p_value() {
    let normal_data: Vec<f64> = (0..25).map(|i| 50.0 + (f64::from(i) - 12.0) * 0.2).collect();
    let result = analyze_normality(&normal_data, &EngineLimits::default());
    assert_eq!(result.is_normal, result.p_value >= 0.05);
}
