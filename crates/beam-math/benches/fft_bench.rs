// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — FFT Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use beam_math::bit_reverse::BitReversalIndex;
use beam_math::FftEngine;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ndarray::Array2;
use num_complex::Complex64;
use std::hint::black_box;

fn test_field(n: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((n, n), |(y, x)| {
        Complex64::new((x as f64 * 0.37).sin(), (y as f64 * 0.11).cos())
    })
}

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft_forward");
    for n in [64usize, 256, 512] {
        let engine = FftEngine::new(n).expect("power of two");
        let field = test_field(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter_batched(
                || field.clone(),
                |mut f| engine.forward(black_box(&mut f)),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_roundtrip_256(c: &mut Criterion) {
    let engine = FftEngine::new(256).expect("power of two");
    let mut field = test_field(256);

    c.bench_function("fft_roundtrip_256x256", |b| {
        b.iter(|| {
            engine.forward(&mut field).ok();
            engine.inverse(&mut field).ok();
            black_box(field[[128, 128]]);
        })
    });
}

fn bench_bit_reversal_256(c: &mut Criterion) {
    let index = BitReversalIndex::new(256).expect("power of two");
    let mut field = test_field(256);

    c.bench_function("bit_reversal_256x256", |b| {
        b.iter(|| index.apply(black_box(&mut field)))
    });
}

criterion_group!(
    benches,
    bench_forward,
    bench_roundtrip_256,
    bench_bit_reversal_256
);
criterion_main!(benches);
