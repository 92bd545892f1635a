//! Low Frequency Oscillator (LFO) for per-voice modulation.

use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::LfoParams;
use crate::DEFAULT_SAMPLE_RATE;

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running at sub-audio frequencies. Nobody listens to it
directly; it moves other parameters over time.

Vocabulary
----------

  control-rate    Frequencies below hearing, here 0.1 Hz to 20 Hz.

  phase           Position inside one cycle, in cycles: [0, 1).

  bipolar         Output swings both ways, -1.0 to +1.0. Every shape here is
                  bipolar so a depth of zero is exactly "no modulation".

  depth           How far a destination moves at full LFO swing.


Shapes
------

    p = phase in [0, 1)

    SINE        sin(2πp)
    TRIANGLE    0 → +1 → -1 → 0, in phase with the sine
    SAW UP      2p - 1          ╱╱╱╱
    SAW DOWN    1 - 2p          ╲╲╲╲
    SQUARE      +1 for p < ½, else -1
    S&H         a fresh random value at every cycle start, held until the next


Rate
----

Free-running, the rate knob maps exponentially to frequency:

    f = 0.1 Hz · 200^rate         (0.1 Hz … 20 Hz)

Tempo-synced, the same knob selects a cycle length in beats from
{1/16, 1/8, 1/4, 1/2, 1, 2, 4}, and the phase is read off the host transport
once per block:

    phase = fract(beat_position / cycle_beats + phase_offset)
    Δphase per sample = bpm / 60 / cycle_beats / sample_rate

Without a transport the LFO falls back to free-running.


Key Sync and Delay
------------------

KEY SYNC on:   note_on restarts the cycle at the phase-offset knob, so every
               note gets the same modulation shape.
KEY SYNC off:  the LFO keeps running across notes.

DELAY holds the output at zero (and the phase still) for delay · 2 s after each
note_on before the LFO starts moving.


Destinations
------------

    pitch   ratio = 2^(value · depth · 12 / 12)     up to ±1 octave
    filter  value · depth added to the normalized cutoff
    shape   value · depth fed to the oscillator pulse width
*/

/// LFO waveform.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfoShape {
    Sine,
    Triangle,
    SawUp,
    SawDown,
    Square,
    SampleAndHold,
}

impl LfoShape {
    /// Every shape, in knob order.
    pub const ALL: [LfoShape; 6] = [
        LfoShape::Sine,
        LfoShape::Triangle,
        LfoShape::SawUp,
        LfoShape::SawDown,
        LfoShape::Square,
        LfoShape::SampleAndHold,
    ];

    /// Shape value at `phase` (cycles). `held` is returned for sample-and-hold.
    #[inline]
    pub fn value_at(self, phase: f64, held: f64) -> f64 {
        match self {
            LfoShape::Sine => (TAU * phase).sin(),
            LfoShape::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
            LfoShape::SawUp => 2.0 * phase - 1.0,
            LfoShape::SawDown => 1.0 - 2.0 * phase,
            LfoShape::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            LfoShape::SampleAndHold => held,
        }
    }
}

/// External clock used for tempo-synced rates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    pub bpm: f64,
    /// Beats since the start of the song at the first sample of the block.
    pub beat_position: f64,
}

/// Current LFO output translated to each destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfoModulation {
    pub value: f64,
    /// Frequency multiplier for the voice phase increment, exponential in
    /// pitch: `2^(value · semitones / 12)`, so zero depth is exactly 1.0.
    pub pitch_ratio: f64,
    /// Offset added to the normalized filter cutoff.
    pub filter: f64,
    /// Pulse-width input for the oscillator.
    pub shape: f64,
}

impl LfoModulation {
    pub const NONE: LfoModulation = LfoModulation {
        value: 0.0,
        pitch_ratio: 1.0,
        filter: 0.0,
        shape: 0.0,
    };
}

const DEFAULT_SEED: u64 = 0x5eed_1f0a;

pub struct Lfo {
    params: LfoParams,
    shape: LfoShape,
    sample_rate: f64,
    phase: f64,
    increment: f64,
    tempo_locked: bool,
    delay_remaining: usize,
    held: f64,
    rng: SmallRng,
}

impl Lfo {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// LFO whose sample-and-hold sequence is seeded with `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let params = LfoParams {
            shape: 0.0,
            rate: 0.5,
            tempo_sync: 0.0,
            key_sync: 1.0,
            phase: 0.0,
            delay: 0.0,
            pitch_depth: 0.0,
            filter_depth: 0.0,
            shape_depth: 0.0,
        };
        let mut lfo = Self {
            params,
            shape: params.shape(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            phase: 0.0,
            increment: 0.0,
            tempo_locked: false,
            delay_remaining: 0,
            held: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        };
        lfo.increment = lfo.free_increment();
        lfo
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        self.sample_rate = sample_rate;
        self.increment = self.free_increment();
    }

    /// Pick up the block's parameters. With tempo sync on and a transport
    /// available, the phase is realigned to the transport here.
    pub fn parameter_changed(&mut self, params: &LfoParams, transport: Option<Transport>) {
        self.params = *params;
        self.shape = params.shape();

        match transport.filter(|t| params.tempo_synced() && t.bpm > 0.0) {
            Some(t) => {
                let beats = params.sync_beats();
                let aligned = (t.beat_position / beats + params.phase_offset()).rem_euclid(1.0);
                if aligned < self.phase {
                    self.resample();
                }
                self.phase = aligned;
                self.increment = t.bpm / 60.0 / beats / self.sample_rate;
                self.tempo_locked = true;
            }
            None => {
                self.increment = self.free_increment();
                self.tempo_locked = false;
            }
        }
    }

    /// Restart the delay and, when key-synced, the cycle.
    pub fn note_on(&mut self) {
        self.delay_remaining = (self.params.delay_seconds() * self.sample_rate).round() as usize;
        if self.params.key_synced() && !self.tempo_locked {
            self.phase = self.params.phase_offset();
            self.resample();
        }
    }

    /// Output at the current sample, zero while delayed.
    #[inline]
    pub fn value(&self) -> f64 {
        if self.delay_remaining > 0 {
            0.0
        } else {
            self.shape.value_at(self.phase, self.held)
        }
    }

    /// Current output scaled for every destination.
    #[inline]
    pub fn modulation(&self) -> LfoModulation {
        let value = self.value();
        LfoModulation {
            value,
            pitch_ratio: 2.0_f64.powf(value * self.params.pitch_semitones() / 12.0),
            filter: value * self.params.filter_amount(),
            shape: value * self.params.shape_amount(),
        }
    }

    /// Step one sample.
    #[inline]
    pub fn advance(&mut self) {
        if self.delay_remaining > 0 {
            self.delay_remaining -= 1;
            return;
        }

        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase = self.phase.fract();
            self.resample();
        }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn shape(&self) -> LfoShape {
        self.shape
    }

    pub fn is_delayed(&self) -> bool {
        self.delay_remaining > 0
    }

    fn free_increment(&self) -> f64 {
        self.params.frequency_hz() / self.sample_rate
    }

    fn resample(&mut self) {
        if self.shape == LfoShape::SampleAndHold {
            self.held = self.rng.random_range(-1.0..=1.0);
        }
    }
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Lfo {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let value = self.value();
        self.advance();
        Some(value)
    }
}
