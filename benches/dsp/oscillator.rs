//! Benchmarks for the four-waveform oscillator.

use std::f64::consts::TAU;
use std::hint::black_box;

use analog_voice::dsp::oscillator::{wrap_angle, Oscillator, OscillatorGains};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn render(osc: &Oscillator, angle: &mut f64, delta: f64, shape: f64, buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = osc.value_with_shape(*angle, shape) as f32;
        *angle = wrap_angle(*angle + delta);
    }
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let delta = 220.0 / SAMPLE_RATE * TAU;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine only - one transcendental per sample
        let sine = Oscillator::new();
        let mut angle = 0.0;
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| render(&sine, &mut angle, delta, 0.0, black_box(&mut buffer)))
        });

        // All four waveforms mixed
        let full = Oscillator::with_gains(OscillatorGains {
            sin: 1.0,
            square: 0.5,
            saw: 0.5,
            sub_square: 0.5,
        });
        let mut angle = 0.0;
        group.bench_with_input(BenchmarkId::new("full_mix", size), &size, |b, _| {
            b.iter(|| render(&full, &mut angle, delta, 0.0, black_box(&mut buffer)))
        });

        // Pulse-width modulated
        let mut angle = 0.0;
        group.bench_with_input(BenchmarkId::new("full_mix_pwm", size), &size, |b, _| {
            b.iter(|| render(&full, &mut angle, delta, 0.4, black_box(&mut buffer)))
        });
    }

    group.finish();
}
