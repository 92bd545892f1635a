//! Benchmarks for the ADSR envelope generator.

use std::hint::black_box;

use analog_voice::dsp::envelope::Envelope;
use analog_voice::params::EnvelopeParams;
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn envelope(attack: f32, decay: f32, sustain: f32, release: f32) -> Envelope {
    let mut env = Envelope::with_params(EnvelopeParams {
        attack,
        decay,
        sustain,
        release,
    });
    env.set_sample_rate(SAMPLE_RATE);
    env
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = envelope(1.0, 0.5, 0.7, 0.5);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Sustain phase (holding steady)
        let mut env = envelope(0.0, 0.0, 0.7, 0.5);
        env.note_on();
        for _ in 0..10_000 {
            env.update();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Release phase (ramping down)
        let mut env = envelope(0.0, 0.0, 0.7, 1.0);
        env.note_on();
        for _ in 0..10_000 {
            env.update();
        }
        env.note_off();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}
