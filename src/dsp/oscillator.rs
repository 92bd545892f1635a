use std::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::OscillatorParams;

/*
Four-Waveform Mixing Oscillator
===============================

The voice's raw tone is a weighted sum of four naive waveforms, all derived
from the same phase angle so they stay locked together:

    sample = sin(2θ)·g_sin + square(2θ)·g_square + saw(2θ)·g_saw + square(θ)·g_sub

θ is the voice's phase angle in radians, [0, 2π). The voice runs θ at HALF the
note frequency, so the three main waves (evaluated at 2θ) sound at the note's
pitch while the sub-square (evaluated at θ) sounds one octave below.

    θ:        0 ─────────── π ─────────── 2π
    main:     one cycle      one cycle
    sub:      ─── +1 ───────┘─── -1 ──────

Waveforms (a = angle in [0, 2π)):

  sine      sin(a)
  square    +1 while a < edge, else -1          (edge = π → 50% duty)
  saw       min(2a / 2π, 2) - 1                 (ramp -1 → +1)

These are naive (non band-limited) shapes; at high notes the square and saw
alias. That is part of the character of this engine.


Pulse Width Modulation
----------------------

A "shape" input in [-1, 1] moves the square edge away from π:

    edge = π · (1 + 0.9 · shape)

    shape = 0    →  edge = π        plain square
    shape = 0.5  →  edge = 1.45π    72.5% duty
    shape = -1   →  edge = 0.1π     5% duty

The LFO drives this input, giving the classic moving-pulse sound.
*/

/// Per-waveform linear multipliers, already mapped from their dB knobs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorGains {
    pub sin: f64,
    pub square: f64,
    pub saw: f64,
    pub sub_square: f64,
}

impl OscillatorGains {
    pub const SILENT: OscillatorGains = OscillatorGains {
        sin: 0.0,
        square: 0.0,
        saw: 0.0,
        sub_square: 0.0,
    };
}

const MAX_PULSE_WIDTH_SHIFT: f64 = 0.9;

pub struct Oscillator {
    gains: OscillatorGains,
}

impl Oscillator {
    pub fn new() -> Self {
        Self {
            gains: OscillatorGains {
                sin: 1.0,
                ..OscillatorGains::SILENT
            },
        }
    }

    pub fn with_gains(gains: OscillatorGains) -> Self {
        Self { gains }
    }

    /// Cache the gains for the coming block.
    pub fn parameter_changed(&mut self, params: &OscillatorParams) {
        self.gains = params.gains();
    }

    pub fn gains(&self) -> OscillatorGains {
        self.gains
    }

    /// Mixed output for phase `angle` (radians).
    #[inline]
    pub fn value(&self, angle: f64) -> f64 {
        self.value_with_shape(angle, 0.0)
    }

    /// Mixed output with the square edges shifted by `shape` ∈ [-1, 1].
    #[inline]
    pub fn value_with_shape(&self, angle: f64, shape: f64) -> f64 {
        let main = wrap_angle(angle * 2.0);
        let edge = pulse_edge(shape);

        sin_wave(main) * self.gains.sin
            + pulse_wave(main, edge) * self.gains.square
            + saw_wave(main) * self.gains.saw
            + pulse_wave(wrap_angle(angle), edge) * self.gains.sub_square
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap any angle into [0, 2π).
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    if (0.0..TAU).contains(&angle) {
        angle
    } else {
        angle.rem_euclid(TAU)
    }
}

#[inline]
fn pulse_edge(shape: f64) -> f64 {
    PI * (1.0 + MAX_PULSE_WIDTH_SHIFT * shape.clamp(-1.0, 1.0))
}

#[inline]
pub fn sin_wave(angle: f64) -> f64 {
    angle.sin()
}

#[inline]
pub fn square_wave(angle: f64) -> f64 {
    pulse_wave(angle, PI)
}

#[inline]
pub fn pulse_wave(angle: f64, edge: f64) -> f64 {
    if angle < edge {
        1.0
    } else {
        -1.0
    }
}

#[inline]
pub fn saw_wave(angle: f64) -> f64 {
    (2.0 * angle / TAU).min(2.0) - 1.0
}
