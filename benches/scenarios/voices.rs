//! Benchmarks for complete voices.
//!
//! Each voice is held in sustain so every iteration renders a full block.

use std::hint::black_box;

use analog_voice::dsp::{amplify::MasterVolume, filter::Hpf};
use analog_voice::io::AudioOutput;
use analog_voice::params::{ParamId, ParameterRegistry, ParameterSnapshot};
use analog_voice::synth::{pitch::PITCH_WHEEL_CENTER, RenderCtx, Voice};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn held_voice(note: u8) -> Voice {
    let mut voice = Voice::new(SAMPLE_RATE);
    voice.start_note(note, 1.0, PITCH_WHEEL_CENTER);
    voice
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    // === PLAIN SINE ===
    // baseline: default patch, static filter
    let plain = ParameterSnapshot::default();

    // === ACID BASS ===
    // saw + sub through a resonant filter swept by the envelope and LFO
    let registry = ParameterRegistry::new();
    registry.set(ParamId::SinGain, 0.0);
    registry.set(ParamId::SawGain, 1.0);
    registry.set(ParamId::SubSquareGain, 0.8);
    registry.set(ParamId::FilterFrequency, 0.3);
    registry.set(ParamId::FilterResonance, 0.8);
    registry.set(ParamId::FilterEnvelope, 0.4);
    registry.set(ParamId::LfoFilter, 0.3);
    registry.set(ParamId::LfoPitch, 0.02);
    registry.set(ParamId::LfoShapeDepth, 0.5);
    let acid = ParameterSnapshot::capture(&registry);

    for &size in BLOCK_SIZES {
        let mut out = AudioOutput::new(2, size);

        let mut voice = held_voice(57);
        let ctx = RenderCtx::new(&plain);
        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, _| {
            b.iter(|| {
                out.clear();
                voice.render(black_box(&mut out), 0, size, black_box(&ctx))
            })
        });

        let mut voice = held_voice(45);
        let ctx = RenderCtx::new(&acid);
        group.bench_with_input(BenchmarkId::new("acid_bass", size), &size, |b, _| {
            b.iter(|| {
                out.clear();
                voice.render(black_box(&mut out), 0, size, black_box(&ctx))
            })
        });

        // === FULL POOL ===
        // eight voices summed, then the master bus
        let mut voices: Vec<Voice> = (0..8).map(|i| held_voice(48 + 3 * i)).collect();
        let mut hpf = Hpf::new(2);
        hpf.set_sample_rate(SAMPLE_RATE);
        let master = MasterVolume::new();
        group.bench_with_input(BenchmarkId::new("pool_of_8", size), &size, |b, _| {
            b.iter(|| {
                out.clear();
                for voice in voices.iter_mut() {
                    voice.render(&mut out, 0, size, &ctx);
                }
                hpf.render(&mut out, 0, size, &acid.hpf);
                master.render(black_box(&mut out), 0, size, &acid.master);
            })
        });
    }

    group.finish();
}
