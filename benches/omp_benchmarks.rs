//! Benchmarks for sparse reconstruction
//!
//! Compares performance of:
//! - Single-signal OMP over growing grids
//! - Joint OMP with a growing number of channels
//! - The FFT correlation step against the dense dictionary product

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use omp_recon::dictionary::{FourierDictionary, Periodicity};
use omp_recon::matrix::SampleMatrix;
use omp_recon::{omp, omp_joint};
use num_complex::Complex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::PI;

/// Four-tone signal on a `linspace(0, 1, n)` grid
fn generate_tones(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            2.0 + 3.0 * (10.0 * PI * t).sin() + 4.0 * (24.0 * PI * t).sin() + (40.0 * PI * t).sin()
        })
        .collect()
}

/// Random sorted subset of `n` rows
fn generate_indices(n: usize, fraction: f64, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let m = (fraction * n as f64) as usize;
    let mut indices = rand::seq::index::sample(&mut rng, n, m).into_vec();
    indices.sort_unstable();
    indices
}

/// Benchmark single-signal OMP with different grid sizes
fn bench_omp(c: &mut Criterion) {
    let mut group = c.benchmark_group("OMP");

    for size in [256, 1000, 4096, 16384].iter() {
        let signal = generate_tones(*size);
        let indices = generate_indices(*size, 0.8, 1);
        let observed: Vec<f64> = indices.iter().map(|&i| signal[i]).collect();

        group.bench_with_input(BenchmarkId::new("four_tone", size), size, |b, &n| {
            b.iter(|| omp(black_box(&observed), black_box(&indices), n, Some(16)))
        });
    }

    group.finish();
}

/// Benchmark joint OMP with different channel counts
fn bench_omp_joint(c: &mut Criterion) {
    let mut group = c.benchmark_group("OMP_Joint");
    let n = 1000;
    let indices = generate_indices(n, 0.8, 2);
    let signal = generate_tones(n);

    for channels in [1, 4, 16, 64].iter() {
        let columns: Vec<Vec<f64>> = (0..*channels)
            .map(|c| indices.iter().map(|&i| (1.0 + c as f64) * signal[i]).collect())
            .collect();
        let y = SampleMatrix::from_columns(&columns).unwrap();

        group.bench_with_input(BenchmarkId::new("channels", channels), channels, |b, _| {
            b.iter(|| omp_joint(black_box(&y), black_box(&indices), n, Some(16)))
        });
    }

    group.finish();
}

/// Benchmark the correlation step: FFT vs dense product
fn bench_correlate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Correlate");

    for size in [256, 1024].iter() {
        let dict = FourierDictionary::new(*size, Periodicity::EndpointInclusive).unwrap();
        let rows = generate_indices(*size, 0.8, 3);
        let residual: Vec<Complex<f64>> = rows
            .iter()
            .map(|&i| Complex::new((i as f64 * 0.1).sin(), 0.0))
            .collect();
        let atoms: Vec<usize> = (0..dict.n_atoms()).collect();
        let dense = dict.restricted(&rows, &atoms).adjoint();
        let r = nalgebra::DVector::from_column_slice(&residual);

        group.bench_with_input(BenchmarkId::new("fft", size), size, |b, _| {
            b.iter(|| dict.correlate(black_box(&rows), black_box(&residual)))
        });
        group.bench_with_input(BenchmarkId::new("dense", size), size, |b, _| {
            b.iter(|| black_box(&dense) * black_box(&r))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_omp, bench_omp_joint, bench_correlate);
criterion_main!(benches);
