use std::f64::consts::TAU;

use crate::io::AudioOutput;
use crate::params::{FilterParams, HpfParams};
use crate::DEFAULT_SAMPLE_RATE;

/*
Biquad Filters
==============

A biquad is a second-order IIR filter: each output sample is a weighted sum of
the current input, the two previous inputs and the two previous outputs.

    y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] - a1·y[n-1] - a2·y[n-2]

(all coefficients already divided by a0). Two poles and two zeros give a
12 dB/octave slope and an adjustable resonant peak at the cutoff.

| type      | used for                | passes       | rejects      |
| --------- | ----------------------- | ------------ | ------------ |
| low-pass  | per-voice tone filter   | below cutoff | above cutoff |
| high-pass | global post filter      | above cutoff | below cutoff |


Coefficients (RBJ Audio EQ Cookbook)
------------------------------------

    ω0    = 2π · f_c / sample_rate
    α     = sin(ω0) / (2·Q)

    low-pass                         high-pass
    b0 = (1 - cos ω0) / 2            b0 = (1 + cos ω0) / 2
    b1 =  1 - cos ω0                 b1 = -(1 + cos ω0)
    b2 = (1 - cos ω0) / 2            b2 = (1 + cos ω0) / 2

    a0 = 1 + α     a1 = -2·cos ω0     a2 = 1 - α

ω0 must stay strictly inside (0, π): at 0 every b of the low-pass vanishes, and
at π (Nyquist) the poles sit on the unit circle. Cutoffs are therefore held
within [1 Hz, 0.49 · sample_rate] before ω0 is computed.


Filter Envelope
---------------

The voice filter recomputes its coefficients every sample because its cutoff
moves every sample:

    n   = clamp(frequency + env_level · env_depth + lfo_mod, 0, 1)
    f_c = 20 Hz · 1000^n                 (20 Hz … 20 kHz, even octave steps)
    Q   = 0.2 · 100^resonance            (0.2 … 20)

That is the classic "filter sweep": the envelope opens the filter at the
start of the note and closes it as the note decays.
*/

const MIN_CUTOFF_HZ: f64 = 1.0;
const MAX_CUTOFF_RATIO: f64 = 0.49;

/// Angular cutoff for a biquad, kept clear of 0 and Nyquist.
#[inline]
pub fn omega0(cutoff_hz: f64, sample_rate: f64) -> f64 {
    let cutoff = cutoff_hz.clamp(MIN_CUTOFF_HZ, sample_rate * MAX_CUTOFF_RATIO);
    TAU * cutoff / sample_rate
}

/// Biquad coefficients normalized by a0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoefficients {
    pub fn lowpass(omega0: f64, q: f64) -> Self {
        let (sin_w0, cos_w0) = omega0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 - cos_w0) / 2.0 / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: (1.0 - cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    pub fn highpass(omega0: f64, q: f64) -> Self {
        let (sin_w0, cos_w0) = omega0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 + cos_w0) / 2.0 / a0,
            b1: -(1.0 + cos_w0) / a0,
            b2: (1.0 + cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }
}

/// Two-sample input/output history of one biquad.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterBuffer {
    pub in1: f64,
    pub in2: f64,
    pub out1: f64,
    pub out2: f64,
}

impl FilterBuffer {
    #[inline]
    pub fn process(&mut self, c: &BiquadCoefficients, input: f64) -> f64 {
        let output = c.b0 * input + c.b1 * self.in1 + c.b2 * self.in2
            - c.a1 * self.out1
            - c.a2 * self.out2;

        self.in2 = self.in1;
        self.in1 = input;
        self.out2 = self.out1;
        self.out1 = output;

        output
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-voice resonant low-pass with envelope/LFO-modulated cutoff.
pub struct Filter {
    params: FilterParams,
    sample_rate: f64,
    buffer: FilterBuffer,
}

impl Filter {
    pub fn new() -> Self {
        Self {
            params: FilterParams {
                frequency: 1.0,
                resonance: 0.0,
                envelope_depth: 0.0,
            },
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer: FilterBuffer::default(),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        self.sample_rate = sample_rate;
    }

    pub fn parameter_changed(&mut self, params: &FilterParams) {
        self.params = *params;
    }

    /// Coefficients for a given envelope level and extra normalized cutoff offset.
    pub fn coefficients(&self, envelope_level: f64, control: f64) -> BiquadCoefficients {
        let offset = envelope_level * self.params.envelope_depth() + control;
        let cutoff = self.params.controlled_cutoff_hz(offset);
        BiquadCoefficients::lowpass(omega0(cutoff, self.sample_rate), self.params.q())
    }

    /// Filter one sample. `control` is added to the normalized cutoff (LFO).
    #[inline]
    pub fn process(&mut self, sample: f64, envelope_level: f64, control: f64) -> f64 {
        let c = self.coefficients(envelope_level, control);
        self.buffer.process(&c, sample)
    }

    pub fn reset(&mut self) {
        self.buffer.reset();
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}

/// Global fixed-Q high-pass applied to the summed output, one history per channel.
pub struct Hpf {
    sample_rate: f64,
    buffers: Vec<FilterBuffer>,
}

impl Hpf {
    pub const Q: f64 = 1.0;

    pub fn new(num_channels: usize) -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffers: vec![FilterBuffer::default(); num_channels],
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        self.sample_rate = sample_rate;
    }

    pub fn num_channels(&self) -> usize {
        self.buffers.len()
    }

    /// Filter `[start, start + num_samples)` in place on every channel both
    /// sides have. Coefficients are computed once for the whole call.
    pub fn render(
        &mut self,
        out: &mut AudioOutput,
        start: usize,
        num_samples: usize,
        params: &HpfParams,
    ) {
        let c = BiquadCoefficients::highpass(omega0(params.cutoff_hz(), self.sample_rate), Self::Q);

        for (buffer, channel) in self.buffers.iter_mut().zip(out.buffers.iter_mut()) {
            let end = (start + num_samples).min(channel.len());
            if start >= end {
                continue;
            }
            for sample in &mut channel[start..end] {
                *sample = buffer.process(&c, *sample as f64) as f32;
            }
        }
    }

    pub fn reset(&mut self) {
        self.buffers.iter_mut().for_each(FilterBuffer::reset);
    }
}
