//! Benchmarks for gain mapping and the master stage.

use std::hint::black_box;

use analog_voice::dsp::amplify::{self, MasterVolume};
use analog_voice::io::AudioOutput;
use analog_voice::params::ParameterSnapshot;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");
    let params = ParameterSnapshot::default().master;

    for &size in BLOCK_SIZES {
        // Volume, headroom and clip over a stereo block
        let master = MasterVolume::new();
        let mut out = AudioOutput::new(2, size);
        group.bench_with_input(BenchmarkId::new("master_volume", size), &size, |b, _| {
            b.iter(|| {
                out.fill(0.75);
                master.render(black_box(&mut out), 0, size, black_box(&params));
            })
        });
    }

    group.bench_function("linear_gain", |b| {
        b.iter(|| amplify::linear_gain(black_box(0.42)))
    });

    group.finish();
}
