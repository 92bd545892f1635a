//! Benchmarks for the biquad filters.

use std::hint::black_box;

use analog_voice::dsp::filter::{Filter, Hpf};
use analog_voice::io::AudioOutput;
use analog_voice::params::{FilterParams, HpfParams};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f64> = (0..size)
            .map(|i| (i as f64 / size as f64) * 2.0 - 1.0)
            .collect();
        let mut output = vec![0.0f64; size];

        // Per-sample coefficient recompute with a static cutoff
        let mut filter = Filter::new();
        filter.set_sample_rate(SAMPLE_RATE);
        filter.parameter_changed(&FilterParams {
            frequency: 0.5,
            resonance: 0.5,
            envelope_depth: 0.0,
        });
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                for (o, &x) in output.iter_mut().zip(&input) {
                    *o = filter.process(black_box(x), 0.0, 0.0);
                }
            })
        });

        // Envelope sweeping the cutoff every sample
        let mut filter = Filter::new();
        filter.set_sample_rate(SAMPLE_RATE);
        filter.parameter_changed(&FilterParams {
            frequency: 0.3,
            resonance: 0.7,
            envelope_depth: 0.5,
        });
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            b.iter(|| {
                for (i, (o, &x)) in output.iter_mut().zip(&input).enumerate() {
                    let env = i as f64 / size as f64;
                    *o = filter.process(black_box(x), env, 0.0);
                }
            })
        });

        // Stereo high-pass, coefficients once per block
        let mut hpf = Hpf::new(2);
        hpf.set_sample_rate(SAMPLE_RATE);
        let params = HpfParams { frequency: 0.2 };
        let mut out = AudioOutput::new(2, size);
        group.bench_with_input(BenchmarkId::new("highpass_stereo", size), &size, |b, _| {
            b.iter(|| {
                out.fill(0.5);
                hpf.render(black_box(&mut out), 0, size, black_box(&params));
            })
        });
    }

    group.finish();
}
