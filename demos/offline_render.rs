/// Renders one voice offline through the master bus and reports levels.
/// Shows the note lifecycle: attack, sustain, release tail, finish.
use analog_voice::{
    dsp::{amplify::MasterVolume, filter::Hpf},
    io::AudioOutput,
    params::{ParamId, ParameterRegistry, ParameterSnapshot},
    synth::{pitch::PITCH_WHEEL_CENTER, RenderCtx, Voice},
    EngineConfig,
};

fn peak(out: &AudioOutput, frames: usize) -> f32 {
    out.channel(0)[..frames]
        .iter()
        .fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

fn main() {
    println!("=== Offline Voice Render ===\n");

    let config = EngineConfig::default();
    let block_size = config.max_block_size;

    let registry = ParameterRegistry::new();
    registry.set(ParamId::SawGain, 1.0);
    registry.set(ParamId::FilterEnvelope, 0.4);
    registry.set(ParamId::Release, 0.2);
    let params = ParameterSnapshot::capture(&registry);

    let mut voice = Voice::new(config.sample_rate);
    let mut hpf = Hpf::new(config.channels);
    hpf.set_sample_rate(config.sample_rate);
    let master = MasterVolume::new();
    let mut out = AudioOutput::new(config.channels, block_size);

    println!("Note On: C4 (60)");
    voice.start_note(60, 1.0, PITCH_WHEEL_CENTER);

    let ctx = RenderCtx::new(&params);
    let held_blocks = (config.sample_rate / block_size as f64) as usize;
    let mut block = 0;

    loop {
        if block == held_blocks {
            println!("\nNote Off after {block} blocks, tail allowed");
            voice.stop_note(0.0, true);
        }

        out.clear();
        let result = voice.render(&mut out, 0, block_size, &ctx);
        hpf.render(&mut out, 0, block_size, &params.hpf);
        master.render(&mut out, 0, block_size, &params.master);

        if block % 16 == 0 || result.finished {
            println!(
                "  block {block:4}: {:3} samples, peak {:.4}",
                result.samples_written,
                peak(&out, block_size)
            );
        }

        block += 1;
        if result.finished {
            break;
        }
    }

    let seconds = (block * block_size) as f64 / config.sample_rate;
    println!("\nVoice finished after {block} blocks (~{seconds:.2} s)");
}
