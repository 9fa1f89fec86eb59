//! Benchmarks for a single piano voice (five partials plus envelope).

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use earshot::synth::voice::Voice;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut voice = Voice::new(SAMPLE_RATE);
        voice.start(1, 261.63, 3600.0, 0);
        group.bench_with_input(BenchmarkId::new("sounding", size), &size, |b, _| {
            b.iter(|| {
                buffer.fill(0.0);
                voice.render_add(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
