//! Benchmarks for the sine partial oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use earshot::dsp::oscillator::SineOscillator;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut osc = SineOscillator::new(440.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render_add(black_box(&mut buffer), 0.8, SAMPLE_RATE);
            })
        });

        // Five partials, as one piano voice renders them
        let mut partials: Vec<SineOscillator> =
            (1..=5).map(|h| SineOscillator::new(261.63 * h as f32)).collect();
        group.bench_with_input(BenchmarkId::new("partials", size), &size, |b, _| {
            b.iter(|| {
                for osc in partials.iter_mut() {
                    osc.render_add(black_box(&mut buffer), 0.2, SAMPLE_RATE);
                }
            })
        });
    }

    group.finish();
}
