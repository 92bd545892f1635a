//! Gain mapping and the master output stage.

use crate::io::AudioOutput;
use crate::params::MasterParams;

/*
Gain and Decibels
=================

Vocabulary
----------

  gain          A multiplier applied to amplitude.
                  gain = 1.0  →  unchanged (unity gain)
                  gain < 1.0  →  quieter (attenuation)

  decibel (dB)  Logarithmic measure of a gain ratio:
                  dB = 20 × log₁₀(gain)      gain = 10^(dB / 20)

  dynamic range The span, in dB, between the quietest and loudest setting
                a control can reach.


Why map knobs through dB?
-------------------------

Hearing is logarithmic - we perceive loudness *ratios*. A knob that maps
linearly to gain spends most of its travel in the loud region and crams every
quiet setting into the last few millimetres. Mapping the knob linearly to dB
instead gives equal perceived steps:

    knob   dB      gain
    1.0     0     1.000
    0.75  -12     0.251
    0.5   -24     0.063
    0.25  -36     0.016
    0.0   -48     0.004   (bottom of a 48 dB range, effectively silent)

    dB   = DYNAMIC_RANGE_DB × (knob - 1)
    gain = 10^(dB / 20)


Master Stage
------------

After all voices have been summed and high-passed, the master stage applies
the volume control, a fixed headroom adjustment (so several voices at full
velocity do not pile up past full scale), and a hard clip as a last guard
against runaway resonance reaching the host.

    out = clamp(in × volume × GAIN_ADJUSTMENT, -CLIP_LEVEL, +CLIP_LEVEL)
*/

/// Span of the oscillator gain controls, in dB.
pub const DYNAMIC_RANGE_DB: f64 = 48.0;

/// Map a normalized knob position to dB: 1.0 → 0 dB, 0.0 → -48 dB.
#[inline]
pub fn param_to_decibel(normalized: f64) -> f64 {
    DYNAMIC_RANGE_DB * (normalized - 1.0)
}

#[inline]
pub fn decibel_to_linear(decibels: f64) -> f64 {
    10.0_f64.powf(decibels / 20.0)
}

/// Normalized knob position straight to a linear multiplier.
#[inline]
pub fn linear_gain(normalized: f64) -> f64 {
    decibel_to_linear(param_to_decibel(normalized))
}

/// Final volume and clip stage applied to the summed voice output.
#[derive(Debug, Default, Clone, Copy)]
pub struct MasterVolume;

impl MasterVolume {
    /// Headroom scaling applied on top of the volume control.
    pub const GAIN_ADJUSTMENT: f64 = 0.2;
    /// Absolute output ceiling after scaling.
    pub const CLIP_LEVEL: f32 = 2.0;

    pub fn new() -> Self {
        Self
    }

    /// Scale and clip `[start, start + num_samples)` of every channel in place.
    pub fn render(
        &self,
        out: &mut AudioOutput,
        start: usize,
        num_samples: usize,
        params: &MasterParams,
    ) {
        let gain = (params.volume() * Self::GAIN_ADJUSTMENT) as f32;
        for channel in out.buffers.iter_mut() {
            let end = (start + num_samples).min(channel.len());
            if start >= end {
                continue;
            }
            for sample in &mut channel[start..end] {
                *sample = (*sample * gain).clamp(-Self::CLIP_LEVEL, Self::CLIP_LEVEL);
            }
        }
    }
}
