//! Minimal voice pool: round-robin allocation with oldest-slot stealing.

use std::sync::Arc;

use analog_voice::dsp::amplify::MasterVolume;
use analog_voice::dsp::filter::Hpf;
use analog_voice::io::converter::midi_velocity_to_unit;
use analog_voice::io::AudioOutput;
use analog_voice::params::{ParameterRegistry, ParameterSnapshot};
use analog_voice::synth::pitch::PITCH_WHEEL_CENTER;
use analog_voice::synth::{MessageReceiver, RenderCtx, SynthMessage, Voice};
use analog_voice::EngineConfig;

pub struct Dispatcher<R: MessageReceiver> {
    voices: Vec<Voice>,
    next_voice: usize,
    pitch_wheel: u16,
    rx: R,
    registry: Arc<ParameterRegistry>,
    snapshot: ParameterSnapshot,
    hpf: Hpf,
    master: MasterVolume,
    block: AudioOutput,
}

impl<R: MessageReceiver> Dispatcher<R> {
    pub fn new(config: &EngineConfig, registry: Arc<ParameterRegistry>, rx: R) -> Self {
        let voices = (0..config.voices)
            .map(|i| Voice::with_lfo_seed(config.sample_rate, i as u64))
            .collect();

        let mut hpf = Hpf::new(config.channels);
        hpf.set_sample_rate(config.sample_rate);

        Self {
            voices,
            next_voice: 0,
            pitch_wheel: PITCH_WHEEL_CENTER,
            rx,
            snapshot: ParameterSnapshot::capture(&registry),
            registry,
            hpf,
            master: MasterVolume::new(),
            block: AudioOutput::new(config.channels, config.max_block_size),
        }
    }

    /// Fill an interleaved device buffer.
    pub fn render(&mut self, data: &mut [f32]) {
        let channels = self.block.num_channels();
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(self.block.num_samples());

            self.drain_messages();
            self.render_block(frames);

            let offset = frames_written * channels;
            for i in 0..frames {
                for ch in 0..channels {
                    data[offset + i * channels + ch] = self.block.sample(ch, i);
                }
            }

            frames_written += frames;
        }
    }

    fn drain_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                SynthMessage::NoteOn { note, velocity } => {
                    let velocity = midi_velocity_to_unit(velocity);
                    let wheel = self.pitch_wheel;
                    self.allocate_voice().start_note(note, velocity, wheel);
                }
                SynthMessage::NoteOff { note, velocity } => {
                    let velocity = midi_velocity_to_unit(velocity);
                    self.voices
                        .iter_mut()
                        .filter(|v| v.current_note() == Some(note))
                        .for_each(|v| v.stop_note(velocity, true));
                }
                SynthMessage::PitchWheel { value } => {
                    self.pitch_wheel = value;
                    self.voices
                        .iter_mut()
                        .for_each(|v| v.pitch_wheel_moved(value));
                }
                SynthMessage::AllNotesOff => {
                    self.voices
                        .iter_mut()
                        .for_each(|v| v.stop_note(0.0, true));
                }
            }
        }
    }

    /// First free voice after the last one used, or the next in line if all are busy.
    fn allocate_voice(&mut self) -> &mut Voice {
        let count = self.voices.len();
        let free = (0..count)
            .map(|offset| (self.next_voice + offset) % count)
            .find(|&i| !self.voices[i].is_active());

        let index = match free {
            Some(i) => i,
            None => {
                let i = self.next_voice;
                log::debug!("stealing voice {i}");
                self.voices[i].stop_note(0.0, false);
                i
            }
        };

        self.next_voice = (index + 1) % count;
        &mut self.voices[index]
    }

    fn render_block(&mut self, frames: usize) {
        self.block.clear();
        self.snapshot.refresh(&self.registry);

        let ctx = RenderCtx::new(&self.snapshot);
        for voice in self.voices.iter_mut() {
            voice.render(&mut self.block, 0, frames, &ctx);
        }

        self.hpf
            .render(&mut self.block, 0, frames, &self.snapshot.hpf);
        self.master
            .render(&mut self.block, 0, frames, &self.snapshot.master);
    }

    #[cfg(test)]
    fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }
}
