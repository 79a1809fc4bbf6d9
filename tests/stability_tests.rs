//! End-to-end I-MR stability scenario (spec.md §8, scenario 6).

use calidad_stats::stability::analyze_stability;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64;

fn stable_draws(n: usize, mean: f64, std: f64, seed: u64) -> Vec<f64> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let normal = Normal::new(mean, std).expect("valid normal parameters");
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

#[test]
fn a_stable_process_passes_all_seven_rules() {
    let values = stable_draws(30, 50.0, 4.0, 11);
    let result = analyze_stability(&values);
    assert!(result.is_stable);
    assert!(result.rule_1.violations.is_empty());
}

#[test]
fn appending_extreme_points_fires_rule_1_and_breaks_stability() {
    let mut values = stable_draws(30, 50.0, 4.0, 11);
    values.push(65.0);
    values.push(35.0);

    let result = analyze_stability(&values);
    assert!(!result.rule_1.violations.is_empty());
    assert!(!result.is_stable);
}

#[test]
fn is_stable_matches_the_conjunction_of_all_rules_and_chart_limits() {
    let values = stable_draws(30, 50.0, 4.0, 12);
    let result = analyze_stability(&values);

    let all_rules_pass = result.rule_1.violations.is_empty()
        && result.rule_2.violations.is_empty()
        && result.rule_3.violations.is_empty()
        && result.rule_4.violations.is_empty()
        && result.rule_5.violations.is_empty()
        && result.rule_6.violations.is_empty()
        && result.rule_7.violations.is_empty();
    let no_ooc = result.i_chart.ooc_points.is_empty() && result.mr_chart.ooc_points.is_empty();

    assert_eq!(result.is_stable, all_rules_pass && no_ooc);
}
