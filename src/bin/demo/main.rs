//! demo - plays an arpeggio through the default output device while sweeping
//! the filter from the control thread.
//!
//! Run with: RUST_LOG=debug cargo run --bin demo

mod dispatcher;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Producer, RingBuffer};

use analog_voice::params::{ParamId, ParameterRegistry};
use analog_voice::synth::SynthMessage;
use analog_voice::EngineConfig;

use dispatcher::Dispatcher;

const ARPEGGIO: [u8; 8] = [48, 55, 60, 63, 67, 63, 60, 55];
const STEPS: usize = 32;
const NOTE_LENGTH: Duration = Duration::from_millis(140);
const NOTE_GAP: Duration = Duration::from_millis(60);

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let supported = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let config = EngineConfig {
        sample_rate: supported.sample_rate().0 as f64,
        channels: supported.channels() as usize,
        ..EngineConfig::default()
    };
    config.validate().wrap_err("device reported an unusable config")?;

    log::info!(
        "output: {} Hz, {} channels, {} voices",
        config.sample_rate,
        config.channels,
        config.voices
    );

    let registry = ParameterRegistry::shared();
    patch(&registry);

    let (tx, rx) = RingBuffer::<SynthMessage>::new(256);
    let mut dispatcher = Dispatcher::new(&config, Arc::clone(&registry), rx);

    let stream = device
        .build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _| dispatcher.render(data),
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    play(tx, &registry);
    Ok(())
}

/// A bright, slightly resonant saw with a filter envelope and slow vibrato.
fn patch(registry: &ParameterRegistry) {
    registry.set(ParamId::SinGain, 0.6);
    registry.set(ParamId::SawGain, 1.0);
    registry.set(ParamId::SubSquareGain, 0.8);
    registry.set(ParamId::Attack, 0.05);
    registry.set(ParamId::Decay, 0.4);
    registry.set(ParamId::Sustain, 0.5);
    registry.set(ParamId::Release, 0.3);
    registry.set(ParamId::FilterResonance, 0.45);
    registry.set(ParamId::FilterEnvelope, 0.3);
    registry.set(ParamId::LfoRate, 0.45);
    registry.set(ParamId::LfoPitch, 0.01);
    registry.set(ParamId::LfoDelay, 0.1);
    registry.set(ParamId::HpfFrequency, 0.1);
}

fn play(mut tx: Producer<SynthMessage>, registry: &Arc<ParameterRegistry>) {
    let cutoff = registry.handle(ParamId::FilterFrequency);

    for step in 0..STEPS {
        let note = ARPEGGIO[step % ARPEGGIO.len()];
        let sweep = step as f32 / STEPS as f32;
        cutoff.set(0.2 + 0.6 * sweep);

        send(&mut tx, SynthMessage::NoteOn { note, velocity: 110 });
        thread::sleep(NOTE_LENGTH);
        send(&mut tx, SynthMessage::NoteOff { note, velocity: 0 });
        thread::sleep(NOTE_GAP);
    }

    send(&mut tx, SynthMessage::AllNotesOff);
    thread::sleep(Duration::from_secs(1));
}

fn send(tx: &mut Producer<SynthMessage>, msg: SynthMessage) {
    if tx.push(msg).is_err() {
        log::warn!("message queue full, dropped {msg:?}");
    }
}
