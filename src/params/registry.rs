use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Parameter Storage
=================

Every tunable of the voice is a single `f32`. Most are "normalized": a knob
position in [0, 1] that each component later maps to its physical unit (dB,
Hz, Q, seconds). The pitch-bend width is the exception and is stored directly
in semitones.

Sharing without locks
---------------------

The control thread writes, the audio thread reads. A mutex would let the
control thread stall the audio callback, so each value lives in an
`AtomicU32` holding the `f32` bit pattern:

    store:  bits = value.to_bits();   atomic.store(bits, Relaxed)
    load:   value = f32::from_bits(atomic.load(Relaxed))

Relaxed ordering is enough: each parameter is independent and a value that is
one block late is inaudible. Tearing *across* parameters is handled one level
up by snapshotting (see `snapshot.rs`).
*/

/// Identifier for every parameter exposed by the voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    // Oscillator mix
    SinGain,
    SquareGain,
    SawGain,
    SubSquareGain,
    // Amplitude envelope
    Attack,
    Decay,
    Sustain,
    Release,
    // Voice filter
    FilterFrequency,
    FilterResonance,
    FilterEnvelope,
    // LFO
    LfoShape,
    LfoRate,
    LfoTempoSync,
    LfoKeySync,
    LfoPhase,
    LfoDelay,
    LfoPitch,
    LfoFilter,
    LfoShapeDepth,
    // Global high-pass
    HpfFrequency,
    // Master section
    MasterVolume,
    OctaveTune,
    SemitoneTune,
    FineTune,
    PitchBendWidth,
    EnvForAmp,
}

/// Valid range and default of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamRange {
    const fn normalized(default: f32) -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            default,
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

impl ParamId {
    pub const COUNT: usize = 27;

    pub const ALL: [ParamId; Self::COUNT] = [
        ParamId::SinGain,
        ParamId::SquareGain,
        ParamId::SawGain,
        ParamId::SubSquareGain,
        ParamId::Attack,
        ParamId::Decay,
        ParamId::Sustain,
        ParamId::Release,
        ParamId::FilterFrequency,
        ParamId::FilterResonance,
        ParamId::FilterEnvelope,
        ParamId::LfoShape,
        ParamId::LfoRate,
        ParamId::LfoTempoSync,
        ParamId::LfoKeySync,
        ParamId::LfoPhase,
        ParamId::LfoDelay,
        ParamId::LfoPitch,
        ParamId::LfoFilter,
        ParamId::LfoShapeDepth,
        ParamId::HpfFrequency,
        ParamId::MasterVolume,
        ParamId::OctaveTune,
        ParamId::SemitoneTune,
        ParamId::FineTune,
        ParamId::PitchBendWidth,
        ParamId::EnvForAmp,
    ];

    /// Position of this id inside the registry storage.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable, host-facing identifier.
    pub fn name(self) -> &'static str {
        match self {
            ParamId::SinGain => "sinGain",
            ParamId::SquareGain => "squareGain",
            ParamId::SawGain => "sawGain",
            ParamId::SubSquareGain => "subSquareGain",
            ParamId::Attack => "attack",
            ParamId::Decay => "decay",
            ParamId::Sustain => "sustain",
            ParamId::Release => "release",
            ParamId::FilterFrequency => "frequency",
            ParamId::FilterResonance => "resonance",
            ParamId::FilterEnvelope => "filterEnv",
            ParamId::LfoShape => "lfoShape",
            ParamId::LfoRate => "lfoRate",
            ParamId::LfoTempoSync => "lfoSyncOn",
            ParamId::LfoKeySync => "lfoKeyOn",
            ParamId::LfoPhase => "lfoPhase",
            ParamId::LfoDelay => "lfoDelay",
            ParamId::LfoPitch => "lfoPitch",
            ParamId::LfoFilter => "lfoFilterFreq",
            ParamId::LfoShapeDepth => "lfoShapeAmount",
            ParamId::HpfFrequency => "hpfFreq",
            ParamId::MasterVolume => "masterVolume",
            ParamId::OctaveTune => "masterOctaveTune",
            ParamId::SemitoneTune => "masterSemitoneTune",
            ParamId::FineTune => "masterFineTune",
            ParamId::PitchBendWidth => "pitchBendWidth",
            ParamId::EnvForAmp => "envForAmpOn",
        }
    }

    pub fn range(self) -> ParamRange {
        match self {
            ParamId::SinGain => ParamRange::normalized(1.0),
            ParamId::SquareGain | ParamId::SawGain | ParamId::SubSquareGain => {
                ParamRange::normalized(0.0)
            }
            ParamId::Attack | ParamId::Decay | ParamId::Release => ParamRange::normalized(0.5),
            ParamId::Sustain => ParamRange::normalized(0.7),
            ParamId::FilterFrequency => ParamRange::normalized(0.8),
            ParamId::FilterResonance => ParamRange::normalized(0.2),
            ParamId::FilterEnvelope => ParamRange::normalized(0.0),
            ParamId::LfoShape => ParamRange::normalized(0.0),
            ParamId::LfoRate => ParamRange::normalized(0.5),
            ParamId::LfoTempoSync => ParamRange::normalized(0.0),
            ParamId::LfoKeySync => ParamRange::normalized(1.0),
            ParamId::LfoPhase | ParamId::LfoDelay => ParamRange::normalized(0.0),
            ParamId::LfoPitch | ParamId::LfoFilter | ParamId::LfoShapeDepth => {
                ParamRange::normalized(0.0)
            }
            ParamId::HpfFrequency => ParamRange::normalized(0.0),
            ParamId::MasterVolume => ParamRange::normalized(0.8),
            ParamId::OctaveTune | ParamId::SemitoneTune | ParamId::FineTune => {
                ParamRange::normalized(0.5)
            }
            ParamId::PitchBendWidth => ParamRange {
                min: 0.0,
                max: 24.0,
                default: 2.0,
            },
            ParamId::EnvForAmp => ParamRange::normalized(1.0),
        }
    }

    pub fn from_name(name: &str) -> Option<ParamId> {
        Self::ALL.iter().copied().find(|id| id.name() == name)
    }
}

/// Shared, lock-free store of every parameter value.
///
/// Cheap to read from any thread; construct once and share behind an `Arc`.
pub struct ParameterRegistry {
    values: [AtomicU32; ParamId::COUNT],
}

impl ParameterRegistry {
    pub fn new() -> Self {
        let values =
            std::array::from_fn(|i| AtomicU32::new(ParamId::ALL[i].range().default.to_bits()));
        log::debug!("parameter registry created with {} parameters", ParamId::COUNT);
        Self { values }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Store a value, clamped into the parameter's range.
    pub fn set(&self, id: ParamId, value: f32) {
        let range = id.range();
        let clamped = if value.is_nan() {
            range.default
        } else {
            range.clamp(value)
        };
        self.values[id.index()].store(clamped.to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Relaxed))
    }

    /// Restore every parameter to its default.
    pub fn reset(&self) {
        for id in ParamId::ALL {
            self.set(id, id.range().default);
        }
    }

    /// Handle bound to one parameter, for automation bridges and UI controls.
    pub fn handle(self: &Arc<Self>, id: ParamId) -> ParamHandle {
        ParamHandle {
            registry: Arc::clone(self),
            id,
        }
    }
}

impl Default for ParameterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Read/write capability for a single parameter of a shared registry.
#[derive(Clone)]
pub struct ParamHandle {
    registry: Arc<ParameterRegistry>,
    id: ParamId,
}

impl ParamHandle {
    pub fn id(&self) -> ParamId {
        self.id
    }

    pub fn get(&self) -> f32 {
        self.registry.get(self.id)
    }

    pub fn set(&self, value: f32) {
        self.registry.set(self.id, value);
    }
}
