//! Benchmarks for the piano envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use earshot::dsp::envelope::Envelope;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack (restarted every iteration)
        let mut env = Envelope::new(0.6);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.note_on();
                env.render(black_box(&mut buffer), SAMPLE_RATE);
            })
        });

        // Tail (very long tone, so it never runs out)
        let mut env = Envelope::new(3600.0);
        env.note_on();
        for _ in 0..(SAMPLE_RATE as usize) {
            env.next_sample(SAMPLE_RATE);
        }
        group.bench_with_input(BenchmarkId::new("tail", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), SAMPLE_RATE);
            })
        });

        // Stop fade
        let mut env = Envelope::new(3600.0);
        group.bench_with_input(BenchmarkId::new("fade", size), &size, |b, _| {
            b.iter(|| {
                env.note_on();
                env.note_off(SAMPLE_RATE);
                env.render(black_box(&mut buffer), SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
