//! Benchmarks for the LFO.

use std::hint::black_box;

use analog_voice::dsp::lfo::{Lfo, LfoShape, Transport};
use analog_voice::params::ParameterSnapshot;
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_lfo(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/lfo");
    let defaults = ParameterSnapshot::default().lfo;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        for (name, index) in [("sine", 0), ("sample_and_hold", 5)] {
            let mut params = defaults;
            params.shape = index as f32 / (LfoShape::ALL.len() - 1) as f32;
            params.pitch_depth = 0.1;
            params.filter_depth = 0.3;

            let mut lfo = Lfo::new();
            lfo.set_sample_rate(SAMPLE_RATE);
            lfo.parameter_changed(&params, None);
            lfo.note_on();

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for value in buffer.iter_mut() {
                        *value = lfo.modulation().pitch_ratio;
                        lfo.advance();
                    }
                    black_box(&buffer);
                })
            });
        }

        // Tempo-synced, realigned to the transport each block
        let mut params = defaults;
        params.tempo_sync = 1.0;
        let mut lfo = Lfo::new();
        lfo.set_sample_rate(SAMPLE_RATE);
        let mut beat = 0.0;
        group.bench_with_input(BenchmarkId::new("tempo_synced", size), &size, |b, _| {
            b.iter(|| {
                let transport = Transport {
                    bpm: 128.0,
                    beat_position: beat,
                };
                lfo.parameter_changed(black_box(&params), Some(transport));
                for value in buffer.iter_mut() {
                    *value = lfo.value();
                    lfo.advance();
                }
                beat += size as f64 / SAMPLE_RATE * 128.0 / 60.0;
            })
        });
    }

    group.finish();
}
