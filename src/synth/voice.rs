use std::f64::consts::TAU;

use crate::dsp::envelope::Envelope;
use crate::dsp::filter::Filter;
use crate::dsp::lfo::{Lfo, Transport};
use crate::dsp::oscillator::{wrap_angle, Oscillator};
use crate::io::converter::midi_note_to_freq;
use crate::io::AudioOutput;
use crate::params::ParameterSnapshot;
use crate::synth::message::VoiceEvent;
use crate::synth::pitch::{pitch_bend_multiplier, PITCH_WHEEL_CENTER};

/// Amplitude-envelope level below which a sounding note counts as finished.
pub const AUDIBILITY_THRESHOLD: f64 = 0.005;

/// Scale from note velocity to the voice's constant output level.
pub const VELOCITY_LEVEL: f64 = 0.15;

/// The voice phase runs at half the note frequency; the main waves double it.
const NOTE_OCTAVE_DIVISOR: f64 = 2.0;

/// Context passed to a voice for one render call.
///
/// - params: parameter values captured once for this block
/// - transport: host clock, when there is one, for tempo-synced LFOs
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx<'a> {
    pub params: &'a ParameterSnapshot,
    pub transport: Option<Transport>,
}

impl<'a> RenderCtx<'a> {
    pub fn new(params: &'a ParameterSnapshot) -> Self {
        Self {
            params,
            transport: None,
        }
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }
}

/// Outcome of one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderResult {
    /// Samples accumulated into the output, counted from `start`.
    pub samples_written: usize,
    /// The voice holds no note after this call and may be reassigned.
    pub finished: bool,
}

/// One monophonic synthesis path, reused across notes.
pub struct Voice {
    sample_rate: f64,
    oscillator: Oscillator,
    envelope: Envelope,
    gate: Envelope,
    lfo: Lfo,
    filter: Filter,

    current_note: Option<u8>,
    current_angle: f64,
    angle_delta: f64,
    level: f64,
    pitch_wheel: u16,
    pitch_bend_width_ratio: f64,
    pitch_bend: f64,
    lfo_retrigger: bool,
}

impl Voice {
    /// Voices built here share one sample-and-hold sequence; pooled voices
    /// should use [`Voice::with_lfo_seed`] with distinct seeds.
    pub fn new(sample_rate: f64) -> Self {
        let mut voice = Self {
            sample_rate,
            oscillator: Oscillator::new(),
            envelope: Envelope::new(),
            gate: Envelope::gate(),
            lfo: Lfo::new(),
            filter: Filter::new(),
            current_note: None,
            current_angle: 0.0,
            angle_delta: 0.0,
            level: 0.0,
            pitch_wheel: PITCH_WHEEL_CENTER,
            pitch_bend_width_ratio: ParameterSnapshot::default()
                .master
                .pitch_bend_width_ratio(),
            pitch_bend: 1.0,
            lfo_retrigger: false,
        };
        voice.set_sample_rate(sample_rate);
        voice
    }

    /// Voice whose sample-and-hold LFO runs its own random sequence.
    pub fn with_lfo_seed(sample_rate: f64, seed: u64) -> Self {
        let mut voice = Self::new(sample_rate);
        voice.lfo = Lfo::with_seed(seed);
        voice.lfo.set_sample_rate(sample_rate);
        voice
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        log::debug!("voice sample rate set to {sample_rate} Hz");

        self.sample_rate = sample_rate;
        self.envelope.set_sample_rate(sample_rate);
        self.gate.set_sample_rate(sample_rate);
        self.lfo.set_sample_rate(sample_rate);
        self.filter.set_sample_rate(sample_rate);
    }

    /// Begin `note` from phase zero. `velocity` is 0.0 - 1.0.
    pub fn start_note(&mut self, note: u8, velocity: f32, pitch_wheel: u16) {
        log::trace!("start note {note} velocity {velocity}");

        self.pitch_wheel_moved(pitch_wheel);

        self.current_angle = 0.0;
        self.level = velocity.clamp(0.0, 1.0) as f64 * VELOCITY_LEVEL;
        self.envelope.note_on();
        self.gate.note_on();
        self.filter.reset();

        let cycles_per_second = midi_note_to_freq(note) / NOTE_OCTAVE_DIVISOR;
        self.angle_delta = cycles_per_second / self.sample_rate * TAU;

        // The LFO restarts at the next render, with that block's parameters.
        self.lfo_retrigger = true;
        self.current_note = Some(note);
    }

    /// Release the note, or silence it immediately when tail-off is not allowed.
    pub fn stop_note(&mut self, _velocity: f32, allow_tail_off: bool) {
        log::trace!("stop note {:?} tail off {allow_tail_off}", self.current_note);

        if allow_tail_off {
            self.envelope.note_off();
            self.gate.note_off();
        } else {
            self.clear_current_note();
        }
    }

    pub fn pitch_wheel_moved(&mut self, value: u16) {
        self.pitch_wheel = value;
        self.pitch_bend = pitch_bend_multiplier(value, self.pitch_bend_width_ratio);
    }

    pub fn handle(&mut self, event: VoiceEvent) {
        match event {
            VoiceEvent::StartNote {
                note,
                velocity,
                pitch_wheel,
            } => self.start_note(note, velocity, pitch_wheel),
            VoiceEvent::StopNote {
                velocity,
                allow_tail_off,
            } => self.stop_note(velocity, allow_tail_off),
            VoiceEvent::PitchWheel(value) => self.pitch_wheel_moved(value),
        }
    }

    pub fn is_active(&self) -> bool {
        self.angle_delta != 0.0
    }

    pub fn current_note(&self) -> Option<u8> {
        self.current_note
    }

    /// Current pitch-wheel frequency multiplier.
    pub fn pitch_bend(&self) -> f64 {
        self.pitch_bend
    }

    /// Level of whichever envelope currently shapes the amplitude.
    pub fn amp_level(&self, params: &ParameterSnapshot) -> f64 {
        if params.master.amp_follows_envelope() {
            self.envelope.level()
        } else {
            self.gate.level()
        }
    }

    /// Accumulate this voice into `[start, start + num_samples)` of every channel.
    ///
    /// Stops early, mid-block if need be, as soon as the amplitude envelope
    /// falls below [`AUDIBILITY_THRESHOLD`]. Samples after that point are left
    /// untouched; the returned [`RenderResult`] says how far rendering got.
    pub fn render(
        &mut self,
        out: &mut AudioOutput,
        start: usize,
        num_samples: usize,
        ctx: &RenderCtx<'_>,
    ) -> RenderResult {
        if !self.is_active() {
            return RenderResult {
                samples_written: 0,
                finished: true,
            };
        }

        let params = ctx.params;
        self.oscillator.parameter_changed(&params.oscillator);
        self.envelope.parameter_changed(&params.envelope);
        self.filter.parameter_changed(&params.filter);
        self.lfo.parameter_changed(&params.lfo, ctx.transport);
        if self.lfo_retrigger {
            self.lfo.note_on();
            self.lfo_retrigger = false;
        }

        let width_ratio = params.master.pitch_bend_width_ratio();
        if width_ratio != self.pitch_bend_width_ratio {
            self.pitch_bend_width_ratio = width_ratio;
            self.pitch_bend = pitch_bend_multiplier(self.pitch_wheel, width_ratio);
        }
        let freq_ratio = params.master.freq_ratio();
        let amp_follows_envelope = params.master.amp_follows_envelope();

        let end = (start + num_samples).min(out.num_samples());
        let mut samples_written = 0;

        for idx in start..end {
            let modulation = self.lfo.modulation();
            let amp_level = if amp_follows_envelope {
                self.envelope.level()
            } else {
                self.gate.level()
            };

            let sample = self
                .oscillator
                .value_with_shape(self.current_angle, modulation.shape)
                * self.level
                * amp_level;
            let sample = self
                .filter
                .process(sample, self.envelope.level(), modulation.filter);

            for channel in out.buffers.iter_mut() {
                channel[idx] += sample as f32;
            }
            samples_written += 1;

            self.current_angle = wrap_angle(
                self.current_angle
                    + self.angle_delta * freq_ratio * self.pitch_bend * modulation.pitch_ratio,
            );

            self.envelope.update();
            self.gate.update();
            self.lfo.advance();

            let amp_level = if amp_follows_envelope {
                self.envelope.level()
            } else {
                self.gate.level()
            };
            if amp_level < AUDIBILITY_THRESHOLD {
                self.clear_current_note();
                break;
            }
        }

        RenderResult {
            samples_written,
            finished: !self.is_active(),
        }
    }

    fn clear_current_note(&mut self) {
        if let Some(note) = self.current_note.take() {
            log::trace!("note {note} finished");
        }
        self.angle_delta = 0.0;
    }
}
