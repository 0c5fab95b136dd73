//! Benchmarks for the output smoother.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use vertex_synth::dsp::smoothing::Smoother;

use crate::BLOCK_SIZES;

pub fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/smoothing");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size)
            .map(|i| if (i / 16) % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let mut output = vec![0.0f32; size];
        let mut smoother = Smoother::new(0.5);

        group.bench_with_input(BenchmarkId::new("process", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in output.iter_mut().zip(black_box(&signal)) {
                    *out = smoother.process(x);
                }
            })
        });
    }

    group.finish();
}
