//! Benchmarks for the vertex waveform engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use vertex_synth::dsp::{InterpolationMode, VertexSet, WaveformEngine};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn engine(vertices: VertexSet, mode: InterpolationMode) -> WaveformEngine {
    let mut engine = WaveformEngine::new(SAMPLE_RATE);
    engine.set_vertices(vertices);
    engine.set_interpolation(mode);
    engine.retrigger();
    engine
}

/// Evenly spaced vertices alternating in sign
fn dense_vertices(count: usize) -> VertexSet {
    let points: Vec<(f32, f32)> = (0..count)
        .map(|i| {
            let phase = i as f32 / count as f32;
            let amplitude = if i % 2 == 0 { 0.8 } else { -0.8 };
            (phase, amplitude)
        })
        .collect();
    VertexSet::from_points(&points).unwrap()
}

pub fn bench_waveform(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/waveform");

    for &size in BLOCK_SIZES {
        let mut output = vec![0.0f32; size];

        for mode in InterpolationMode::ALL {
            let mut triangle = engine(VertexSet::default(), mode);
            group.bench_with_input(BenchmarkId::new(mode.name(), size), &size, |b, _| {
                b.iter(|| triangle.render(black_box(&mut output)))
            });
        }

        // Many short segments: segment setup dominates
        let mut dense = engine(dense_vertices(32), InterpolationMode::Cubic);
        group.bench_with_input(BenchmarkId::new("32_vertices", size), &size, |b, _| {
            b.iter(|| dense.render(black_box(&mut output)))
        });

        // Retune every block, rescaling the segment in flight
        let mut sweep = engine(VertexSet::default(), InterpolationMode::Linear);
        let mut hz = 110.0f32;
        group.bench_with_input(BenchmarkId::new("retune_per_block", size), &size, |b, _| {
            b.iter(|| {
                hz = if hz > 880.0 { 110.0 } else { hz * 1.01 };
                sweep.set_frequency(black_box(hz));
                sweep.render(black_box(&mut output))
            })
        });
    }

    group.finish();
}
