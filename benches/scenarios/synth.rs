//! Benchmarks for the polyphonic synth as the audio callback drives it.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use earshot::{
    synth::{PianoSynth, SynthMessage},
    Pitch,
};
use rtrb::RingBuffer;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Silence: the cost of an idle callback
        let (_tx, rx) = RingBuffer::<SynthMessage>::new(64);
        let mut synth = PianoSynth::new(SAMPLE_RATE, 16, rx);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| synth.render_block(black_box(&mut buffer)))
        });

        // Passage overlap: the scale's seven notes all ringing
        let (mut tx, rx) = RingBuffer::<SynthMessage>::new(64);
        for (i, pitch) in Pitch::ALL.iter().enumerate() {
            let _ = tx.push(SynthMessage::Play {
                id: i as u64 + 1,
                frequency: pitch.frequency(),
                duration: 3600.0,
            });
        }
        let mut synth = PianoSynth::new(SAMPLE_RATE, 16, rx);
        group.bench_with_input(BenchmarkId::new("seven_tones", size), &size, |b, _| {
            b.iter(|| synth.render_block(black_box(&mut buffer)))
        });

        // Every voice busy
        let (mut tx, rx) = RingBuffer::<SynthMessage>::new(64);
        for i in 0..16u64 {
            let _ = tx.push(SynthMessage::Play {
                id: i + 1,
                frequency: 220.0 + 20.0 * i as f32,
                duration: 3600.0,
            });
        }
        let mut synth = PianoSynth::new(SAMPLE_RATE, 16, rx);
        group.bench_with_input(BenchmarkId::new("full", size), &size, |b, _| {
            b.iter(|| synth.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
