//! Criterion benchmarks for the Sobol kernel.
//!
//! Measures sequence generation alone and full integration in both
//! evaluation modes, for a cheap integrand and a deliberately expensive one.

use std::convert::Infallible;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sobol_kernel::sobol::{DirectionSet, GrayCodeIndices, SobolPoints};
use sobol_kernel::{IntegrationConfig, SampleSizes, SobolIntegrator};

fn circle4(x: f64, y: f64) -> Result<f64, Infallible> {
    Ok(if x * x + y * y < 1.0 { 4.0 } else { 0.0 })
}

/// Integrand with enough arithmetic per call for parallel evaluation to pay off.
fn heavy(x: f64, y: f64) -> Result<f64, Infallible> {
    let mut acc = 0.0;
    for k in 1..200 {
        let k = k as f64;
        acc += (k * x).sin() * (k * y).cos() / k;
    }
    Ok(acc)
}

/// Benchmark direction numbers, Gray-code indices and point generation.
fn bench_sequence_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_generation");

    for n in [1_000usize, 100_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let directions = DirectionSet::for_points(black_box(n));
                let gray = GrayCodeIndices::new(n);
                SobolPoints::generate(&directions, &gray)
            });
        });
    }

    group.finish();
}

/// Benchmark end-to-end integration, sequential versus concurrent.
fn bench_integration(c: &mut Criterion) {
    let sequential = SobolIntegrator::new(IntegrationConfig::sequential()).unwrap();
    let concurrent = SobolIntegrator::new(IntegrationConfig::concurrent()).unwrap();

    let mut group = c.benchmark_group("integration_cheap");
    for n in [10_000usize, 100_000] {
        let sizes = SampleSizes::new(vec![n / 100, n / 10, n]).unwrap();
        group.bench_with_input(BenchmarkId::new("sequential", n), &sizes, |b, sizes| {
            b.iter(|| sequential.integrate(black_box(sizes), circle4).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("concurrent", n), &sizes, |b, sizes| {
            b.iter(|| concurrent.integrate(black_box(sizes), circle4).unwrap());
        });
    }
    group.finish();

    let mut group = c.benchmark_group("integration_heavy");
    group.sample_size(10);
    let sizes = SampleSizes::new(vec![1_000, 10_000]).unwrap();
    group.bench_function("sequential", |b| {
        b.iter(|| sequential.integrate(black_box(&sizes), heavy).unwrap());
    });
    group.bench_function("concurrent", |b| {
        b.iter(|| concurrent.integrate(black_box(&sizes), heavy).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_sequence_generation, bench_integration);
criterion_main!(benches);
