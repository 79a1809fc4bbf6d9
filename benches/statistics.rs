//! Performance benchmarks for the statistical engine
//!
//! Run with: cargo bench

use calidad_stats::distributions::best_fit;
use calidad_stats::normality::analyze_normality;
use calidad_stats::{EngineLimits, Table, analyze_capacidad_proceso, analyze_msa};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::prelude::*;
use rand_pcg::Pcg64;
use serde_json::json;

/// Generates synthetic normal data for benchmarking.
fn generate_normal_data(n: usize, mean: f64, std_dev: f64, seed: u64) -> Vec<f64> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let normal = rand_distr::Normal::new(mean, std_dev).expect("valid normal parameters");
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

/// Builds a balanced two-operator, three-replicate MSA table with `n_parts`
/// parts, matching the shape `msa::reshape` expects.
fn msa_table(n_parts: usize, seed: u64) -> Table {
    let mut rng = Pcg64::seed_from_u64(seed);
    let normal = rand_distr::Normal::new(0.0, 0.3).expect("valid normal parameters");
    let headers =
        vec!["Parte".to_string(), "Operador".to_string(), "Medicion1".to_string(), "Medicion2".to_string(), "Medicion3".to_string()];
    let mut rows = Vec::new();
    for part in 1..=n_parts {
        for operator in ["A", "B"] {
            let base = f64::from(u32::try_from(part).expect("part index fits in u32")) * 2.0;
            rows.push(vec![
                json!(part),
                json!(operator),
                json!(base + normal.sample(&mut rng)),
                json!(base + normal.sample(&mut rng)),
                json!(base + normal.sample(&mut rng)),
            ]);
        }
    }
    Table::new(headers, rows)
}

fn bench_msa_pipeline(c: &mut Criterion) {
    let small = msa_table(5, 1);
    let large = msa_table(25, 1);

    c.bench_function("msa_pipeline_small", |b| {
        b.iter(|| {
            let _result = analyze_msa(black_box(&small), None, None, &EngineLimits::default());
        });
    });

    c.bench_function("msa_pipeline_large", |b| {
        b.iter(|| {
            let _result = analyze_msa(black_box(&large), None, None, &EngineLimits::default());
        });
    });
}

fn bench_normality_tests(c: &mut Criterion) {
    let small_data = generate_normal_data(30, 0.0, 1.0, 42);
    let medium_data = generate_normal_data(200, 0.0, 1.0, 42);
    let large_data = generate_normal_data(2000, 0.0, 1.0, 42);
    let limits = EngineLimits::default();

    c.bench_function("normality_tests_small", |b| {
        b.iter(|| {
            let _result = analyze_normality(black_box(&small_data), &limits);
        });
    });

    c.bench_function("normality_tests_medium", |b| {
        b.iter(|| {
            let _result = analyze_normality(black_box(&medium_data), &limits);
        });
    });

    c.bench_function("normality_tests_large", |b| {
        b.iter(|| {
            let _result = analyze_normality(black_box(&large_data), &limits);
        });
    });
}

fn bench_distribution_fitting(c: &mut Criterion) {
    let data = generate_normal_data(300, 10.0, 2.0, 7).into_iter().map(f64::abs).collect::<Vec<_>>();

    c.bench_function("distribution_fit_all_families", |b| {
        b.iter(|| {
            let _result = best_fit(black_box(&data));
        });
    });
}

fn bench_capacidad_pipeline(c: &mut Criterion) {
    let data = generate_normal_data(500, 100.0, 1.0, 3);
    let headers = vec!["Valores".to_string()];
    let rows = data.into_iter().map(|v| vec![json!(v)]).collect();
    let table = Table::new(headers, rows);
    let spec = calidad_stats::capability::SpecLimits { lei: 90.0, les: 110.0 };
    let limits = EngineLimits::default();

    c.bench_function("capacidad_pipeline_with_spec_limits", |b| {
        b.iter(|| {
            let _result = analyze_capacidad_proceso(black_box(&table), Some(spec), &limits);
        });
    });
}

criterion_group!(benches, bench_msa_pipeline, bench_normality_tests, bench_distribution_fitting, bench_capacidad_pipeline);
criterion_main!(benches);
