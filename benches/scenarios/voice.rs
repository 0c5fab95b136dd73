//! Benchmarks for complete voice rendering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use vertex_synth::{
    dsp::{InterpolationMode, VertexSet},
    synth::{SharedVoice, Voice},
    SynthConfig,
};

use crate::BLOCK_SIZES;

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");

    for &size in BLOCK_SIZES {
        let config = SynthConfig::default()
            .with_sample_rate(48_000.0)
            .with_buffer_size(size);
        let mut output = vec![0.0f32; size];

        // === PLAIN: default shape, no smoothing ===
        let mut plain = Voice::new(&config);
        plain.note_on();
        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, _| {
            b.iter(|| plain.render(black_box(&mut output)))
        });

        // === SHAPED: cubic segments through smoothing ===
        let mut shaped = Voice::new(
            &config
                .clone()
                .with_interpolation(InterpolationMode::Cubic)
                .with_smoothing(0.6),
        );
        shaped.set_vertices(
            VertexSet::from_points(&[(0.0, 0.0), (0.1, 0.9), (0.3, -0.4), (0.6, 0.2), (0.8, -0.9)])
                .unwrap(),
        );
        shaped.note_on();
        group.bench_with_input(BenchmarkId::new("shaped", size), &size, |b, _| {
            b.iter(|| shaped.render(black_box(&mut output)))
        });

        // === STEREO via the control ring, one message per block ===
        let (mut shared, mut handle) = SharedVoice::new(&config);
        handle.note_on();
        let mut interleaved = vec![0.0f32; size * 2];
        let mut tune = 0;
        group.bench_with_input(BenchmarkId::new("shared_stereo", size), &size, |b, _| {
            b.iter(|| {
                tune = (tune + 1) % 12;
                handle.set_tune(tune);
                shared.render_interleaved(black_box(&mut interleaved), 2)
            })
        });
    }

    group.finish();
}
