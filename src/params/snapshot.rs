#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::amplify::linear_gain;
use crate::dsp::lfo::LfoShape;
use crate::dsp::oscillator::OscillatorGains;
use crate::params::registry::{ParamId, ParameterRegistry};

/// Read-only copy of every parameter, taken once per audio block.
///
/// Values stay in their stored units (mostly normalized); each group knows how
/// to map its raw values to the physical units its component needs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSnapshot {
    pub oscillator: OscillatorParams,
    pub envelope: EnvelopeParams,
    pub filter: FilterParams,
    pub lfo: LfoParams,
    pub hpf: HpfParams,
    pub master: MasterParams,
}

impl ParameterSnapshot {
    /// Read every parameter from the registry exactly once.
    pub fn capture(registry: &ParameterRegistry) -> Self {
        let get = |id| registry.get(id);
        Self {
            oscillator: OscillatorParams {
                sin_gain: get(ParamId::SinGain),
                square_gain: get(ParamId::SquareGain),
                saw_gain: get(ParamId::SawGain),
                sub_square_gain: get(ParamId::SubSquareGain),
            },
            envelope: EnvelopeParams {
                attack: get(ParamId::Attack),
                decay: get(ParamId::Decay),
                sustain: get(ParamId::Sustain),
                release: get(ParamId::Release),
            },
            filter: FilterParams {
                frequency: get(ParamId::FilterFrequency),
                resonance: get(ParamId::FilterResonance),
                envelope_depth: get(ParamId::FilterEnvelope),
            },
            lfo: LfoParams {
                shape: get(ParamId::LfoShape),
                rate: get(ParamId::LfoRate),
                tempo_sync: get(ParamId::LfoTempoSync),
                key_sync: get(ParamId::LfoKeySync),
                phase: get(ParamId::LfoPhase),
                delay: get(ParamId::LfoDelay),
                pitch_depth: get(ParamId::LfoPitch),
                filter_depth: get(ParamId::LfoFilter),
                shape_depth: get(ParamId::LfoShapeDepth),
            },
            hpf: HpfParams {
                frequency: get(ParamId::HpfFrequency),
            },
            master: MasterParams {
                volume: get(ParamId::MasterVolume),
                octave_tune: get(ParamId::OctaveTune),
                semitone_tune: get(ParamId::SemitoneTune),
                fine_tune: get(ParamId::FineTune),
                pitch_bend_width: get(ParamId::PitchBendWidth),
                env_for_amp: get(ParamId::EnvForAmp),
            },
        }
    }

    /// Overwrite this snapshot in place; avoids moving the struct on the audio thread.
    pub fn refresh(&mut self, registry: &ParameterRegistry) {
        *self = Self::capture(registry);
    }
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self::capture(&ParameterRegistry::new())
    }
}

#[inline]
fn lerp(min: f64, max: f64, t: f32) -> f64 {
    min + t as f64 * (max - min)
}

/// Pick one of `count` discrete steps from a normalized value.
#[inline]
pub(crate) fn step_index(normalized: f32, count: usize) -> usize {
    let steps = (count - 1) as f32;
    ((normalized.clamp(0.0, 1.0) * steps).round() as usize).min(count - 1)
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    pub sin_gain: f32,
    pub square_gain: f32,
    pub saw_gain: f32,
    pub sub_square_gain: f32,
}

impl OscillatorParams {
    pub fn gains(&self) -> OscillatorGains {
        OscillatorGains {
            sin: linear_gain(self.sin_gain as f64),
            square: linear_gain(self.square_gain as f64),
            saw: linear_gain(self.saw_gain as f64),
            sub_square: linear_gain(self.sub_square_gain as f64),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl EnvelopeParams {
    // Per-sample multipliers at the 44.1 kHz reference rate. Values this close
    // to 1.0 give segments from a few milliseconds up to several seconds.
    pub const ATTACK_RANGE: (f64, f64) = (0.995, 0.99999);
    pub const DECAY_RANGE: (f64, f64) = (0.9995, 0.99999);
    pub const RELEASE_RANGE: (f64, f64) = (0.995, 0.99999);

    pub fn attack_coefficient(&self) -> f64 {
        lerp(Self::ATTACK_RANGE.0, Self::ATTACK_RANGE.1, self.attack)
    }

    pub fn decay_coefficient(&self) -> f64 {
        lerp(Self::DECAY_RANGE.0, Self::DECAY_RANGE.1, self.decay)
    }

    pub fn sustain_level(&self) -> f64 {
        self.sustain as f64
    }

    pub fn release_coefficient(&self) -> f64 {
        lerp(Self::RELEASE_RANGE.0, Self::RELEASE_RANGE.1, self.release)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub frequency: f32,
    pub resonance: f32,
    pub envelope_depth: f32,
}

impl FilterParams {
    pub const LOWEST_FREQ: f64 = 20.0;
    pub const FREQ_BASE: f64 = 1000.0;
    pub const LOWEST_RES: f64 = 0.2;
    pub const RES_BASE: f64 = 100.0;

    pub fn cutoff_hz(&self) -> f64 {
        self.controlled_cutoff_hz(0.0)
    }

    /// Cutoff after adding `control` to the normalized frequency.
    ///
    /// The sum is clamped to [0, 1] before the exponential mapping, so any
    /// modulation amount lands between 20 Hz and 20 kHz.
    pub fn controlled_cutoff_hz(&self, control: f64) -> f64 {
        let normalized = (self.frequency as f64 + control).clamp(0.0, 1.0);
        Self::LOWEST_FREQ * Self::FREQ_BASE.powf(normalized)
    }

    pub fn q(&self) -> f64 {
        Self::LOWEST_RES * Self::RES_BASE.powf(self.resonance as f64)
    }

    pub fn envelope_depth(&self) -> f64 {
        self.envelope_depth as f64
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfoParams {
    pub shape: f32,
    pub rate: f32,
    pub tempo_sync: f32,
    pub key_sync: f32,
    pub phase: f32,
    pub delay: f32,
    pub pitch_depth: f32,
    pub filter_depth: f32,
    pub shape_depth: f32,
}

impl LfoParams {
    pub const LOWEST_RATE: f64 = 0.1;
    pub const RATE_BASE: f64 = 200.0;
    pub const MAX_DELAY_SECONDS: f64 = 2.0;
    pub const MAX_PITCH_SEMITONES: f64 = 12.0;
    /// Cycle lengths, in beats, selectable when tempo-synced.
    pub const SYNC_BEATS: [f64; 7] = [0.0625, 0.125, 0.25, 0.5, 1.0, 2.0, 4.0];

    pub fn shape(&self) -> LfoShape {
        LfoShape::ALL[step_index(self.shape, LfoShape::ALL.len())]
    }

    /// Free-running rate, 0.1 Hz to 20 Hz.
    pub fn frequency_hz(&self) -> f64 {
        Self::LOWEST_RATE * Self::RATE_BASE.powf(self.rate as f64)
    }

    pub fn tempo_synced(&self) -> bool {
        self.tempo_sync >= 0.5
    }

    pub fn key_synced(&self) -> bool {
        self.key_sync >= 0.5
    }

    pub fn sync_beats(&self) -> f64 {
        Self::SYNC_BEATS[step_index(self.rate, Self::SYNC_BEATS.len())]
    }

    /// Phase (in cycles, [0, 1)) the LFO restarts from on a key-synced note-on.
    pub fn phase_offset(&self) -> f64 {
        (self.phase as f64).fract()
    }

    pub fn delay_seconds(&self) -> f64 {
        self.delay as f64 * Self::MAX_DELAY_SECONDS
    }

    pub fn pitch_semitones(&self) -> f64 {
        self.pitch_depth as f64 * Self::MAX_PITCH_SEMITONES
    }

    pub fn filter_amount(&self) -> f64 {
        self.filter_depth as f64
    }

    pub fn shape_amount(&self) -> f64 {
        self.shape_depth as f64
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HpfParams {
    pub frequency: f32,
}

impl HpfParams {
    pub fn cutoff_hz(&self) -> f64 {
        FilterParams::LOWEST_FREQ * FilterParams::FREQ_BASE.powf(self.frequency as f64)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterParams {
    pub volume: f32,
    pub octave_tune: f32,
    pub semitone_tune: f32,
    pub fine_tune: f32,
    /// Raw semitones, not normalized.
    pub pitch_bend_width: f32,
    pub env_for_amp: f32,
}

impl MasterParams {
    pub fn volume(&self) -> f64 {
        self.volume as f64
    }

    /// -2 ..= 2 octaves
    pub fn octave(&self) -> i32 {
        step_index(self.octave_tune, 5) as i32 - 2
    }

    /// -12 ..= 12 semitones
    pub fn semitone(&self) -> i32 {
        step_index(self.semitone_tune, 25) as i32 - 12
    }

    /// -100 ..= 100 cents
    pub fn fine_cents(&self) -> f64 {
        (self.fine_tune as f64 * 2.0 - 1.0) * 100.0
    }

    /// Frequency multiplier from the master tuning controls.
    pub fn freq_ratio(&self) -> f64 {
        let semitones =
            self.octave() as f64 * 12.0 + self.semitone() as f64 + self.fine_cents() / 100.0;
        2.0_f64.powf(semitones / 12.0)
    }

    /// Frequency ratio reached at full upward pitch-wheel deflection.
    pub fn pitch_bend_width_ratio(&self) -> f64 {
        2.0_f64.powf(self.pitch_bend_width as f64 / 12.0)
    }

    /// Whether the ADSR envelope shapes amplitude (otherwise only the filter).
    pub fn amp_follows_envelope(&self) -> bool {
        self.env_for_amp >= 0.5
    }
}
