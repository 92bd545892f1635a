use crate::params::EnvelopeParams;
use crate::DEFAULT_SAMPLE_RATE;

/*
ADSR Envelope Implementation
============================

This module implements a multiplicative ADSR envelope generator - the
per-voice amplitude shaper, also used as the source for the filter envelope.

Vocabulary
----------

  level        The envelope's current output value (0.0 to MAX_LEVEL). This
               multiplies the audio signal to control its amplitude over time.

  state        Which phase of the envelope we're in: Off, Attack, Decay,
               Sustain, or Release. A state machine governs transitions.

  coefficient  Per-sample multiplier for the current segment. Attack divides
               by it (level grows), Decay and Release multiply by it (level
               shrinks). Always slightly below 1.0.

  sample_rate  Samples per second. Coefficients are defined at a 44.1 kHz
               reference rate and re-scaled for the actual rate.


The Shape: Exponential Segments
-------------------------------

  Level
    1.0 ┐      ╭╮
        │     ╭╯╰╮
    S   │    ╭╯   ╰─────────╮
        │   ╭╯               ╰╮
   0.01 ┼──╯                   ╰──→ (voice stops below 0.005)
        Attack Decay  Sustain  Release

Every segment is a one-sample multiply:

    attack:   level = level × MAX_LEVEL / c_attack
    decay:    level = level × c_decay
    release:  level = level × c_release

Repeated multiplication gives exponential curves, which is how analog
envelope circuits (a capacitor charging through a resistor) behave.

Attack starts from 1% of MAX_LEVEL rather than zero: zero times anything stays
zero, and starting from a small floor also avoids a silent gap before the
note speaks. Attack ends once the level crosses 99%, snapping to MAX_LEVEL.


Sample-Rate Compensation
------------------------

A coefficient c applied once per sample at 44.1 kHz gives, after t seconds:

    level ∝ c^(44100 · t)

At a different rate R the same wall-clock shape needs c' such that

    c'^(R · t) = c^(44100 · t)     ⇒     c' = c^(44100 / R)

So `adjust(c) = c^(44100 / R)` and segment durations are independent of the
playback rate. Coefficients sit within 1e-5 of 1.0, where f32 cannot resolve
the difference; everything here runs in f64.


The State Machine
-----------------

    ┌─────┐ note_on ┌────────┐ ≥ 99% ┌───────┐ ≤ S ┌─────────┐
    │ Off │───────→ │ Attack │─────→ │ Decay │───→ │ Sustain │
    └─────┘         └────────┘       └───────┘     └─────────┘
                         │ note_off      │             │
                         ↓               ↓             ↓
                    ┌──────────────────────────────────────┐
                    │               Release                │
                    └──────────────────────────────────────┘

note_on re-enters Attack from any state. Release never returns to Off on its
own; the owning voice watches the level and decides when the note is over.
*/

pub const MAX_LEVEL: f64 = 1.0;
const NOTE_START_LEVEL: f64 = MAX_LEVEL * 0.01;
const ATTACK_FINISH_LEVEL: f64 = MAX_LEVEL * 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Off,     // No note since construction or reset
    Attack,  // Rising towards MAX_LEVEL
    Decay,   // Falling towards the sustain level
    Sustain, // Holding at the sustain level while the key is down
    Release, // Key released, falling towards silence
}

/// Coefficients after sample-rate adjustment, cached per block.
#[derive(Debug, Clone, Copy)]
struct Rates {
    attack: f64,
    decay: f64,
    release: f64,
}

pub struct Envelope {
    params: EnvelopeParams,
    sample_rate: f64,
    rates: Rates,

    state: EnvelopeState,
    level: f64,
}

impl Envelope {
    pub fn new() -> Self {
        Self::with_params(EnvelopeParams {
            attack: 0.5,
            decay: 0.5,
            sustain: 0.7,
            release: 0.5,
        })
    }

    pub fn with_params(params: EnvelopeParams) -> Self {
        let mut env = Self {
            params,
            sample_rate: DEFAULT_SAMPLE_RATE,
            rates: Rates {
                attack: 1.0,
                decay: 1.0,
                release: 1.0,
            },
            state: EnvelopeState::Off,
            level: 0.0,
        };
        env.recompute_rates();
        env
    }

    /// Fixed fast envelope used as an amplitude gate (organ-style on/off).
    pub fn gate() -> Self {
        Self::with_params(EnvelopeParams {
            attack: 0.0,
            decay: 0.0,
            sustain: 1.0,
            release: 0.0,
        })
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        self.sample_rate = sample_rate;
        self.recompute_rates();
    }

    /// Take this block's parameter values.
    pub fn parameter_changed(&mut self, params: &EnvelopeParams) {
        if self.params != *params {
            self.params = *params;
            self.recompute_rates();
        }
    }

    fn recompute_rates(&mut self) {
        self.rates = Rates {
            attack: self.adjust(self.params.attack_coefficient()),
            decay: self.adjust(self.params.decay_coefficient()),
            release: self.adjust(self.params.release_coefficient()),
        };
    }

    /// Re-scale a per-sample coefficient from the reference rate to the current rate.
    fn adjust(&self, coefficient: f64) -> f64 {
        if (self.sample_rate - DEFAULT_SAMPLE_RATE).abs() <= f64::EPSILON {
            return coefficient;
        }
        coefficient.powf(DEFAULT_SAMPLE_RATE / self.sample_rate)
    }

    /// Key down: restart the attack from the note-start floor.
    pub fn note_on(&mut self) {
        self.state = EnvelopeState::Attack;
        self.level = NOTE_START_LEVEL;
    }

    /// Key up: release from the current level, whatever the state.
    pub fn note_off(&mut self) {
        self.state = EnvelopeState::Release;
    }

    /// Advance the envelope by one sample.
    pub fn update(&mut self) {
        match self.state {
            EnvelopeState::Off => {}

            EnvelopeState::Attack => {
                self.level = self.level * MAX_LEVEL / self.rates.attack;
                if self.level >= ATTACK_FINISH_LEVEL {
                    self.level = MAX_LEVEL;
                    self.state = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                self.level *= self.rates.decay;
                let sustain = self.params.sustain_level();
                if self.level <= sustain {
                    self.level = sustain;
                    self.state = EnvelopeState::Sustain;
                }
            }

            // Level was fixed when Decay reached the target.
            EnvelopeState::Sustain => {}

            EnvelopeState::Release => {
                self.level *= self.rates.release;
            }
        }

        debug_assert!((0.0..=MAX_LEVEL).contains(&self.level));
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            self.update();
            *sample = self.level as f32;
        }
    }

    /// Back to the initial silent state.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Off;
        self.level = 0.0;
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(attack: f32, decay: f32, sustain: f32, release: f32) -> EnvelopeParams {
        EnvelopeParams {
            attack,
            decay,
            sustain,
            release,
        }
    }

    fn samples_until_decay(env: &mut Envelope) -> usize {
        let mut count = 0;
        while env.state() == EnvelopeState::Attack {
            env.update();
            count += 1;
            assert!(count < 10_000_000, "attack never finished");
        }
        count
    }

    #[test]
    fn starts_off_and_ignores_updates() {
        let mut env = Envelope::new();
        assert_eq!(env.state(), EnvelopeState::Off);
        for _ in 0..100 {
            env.update();
        }
        assert_eq!(env.state(), EnvelopeState::Off);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn note_on_starts_from_floor() {
        let mut env = Envelope::new();
        env.note_on();
        assert_eq!(env.state(), EnvelopeState::Attack);
        assert!((env.level() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn attack_reaches_full_level_then_decays() {
        let mut env = Envelope::with_params(params(0.2, 0.5, 0.5, 0.5));
        env.note_on();

        let mut previous = env.level();
        while env.state() == EnvelopeState::Attack {
            env.update();
            assert!(env.level() <= MAX_LEVEL);
            if env.state() == EnvelopeState::Attack {
                assert!(env.level() > previous, "attack must rise");
                assert!(env.level() < 0.99);
            }
            previous = env.level();
        }

        assert_eq!(env.state(), EnvelopeState::Decay);
        assert_eq!(env.level(), MAX_LEVEL);
    }

    #[test]
    fn decay_snaps_to_sustain() {
        let sustain = 0.6;
        let mut env = Envelope::with_params(params(0.0, 0.0, sustain, 0.5));
        env.note_on();
        samples_until_decay(&mut env);

        let mut guard = 0;
        while env.state() == EnvelopeState::Decay {
            env.update();
            guard += 1;
            assert!(guard < 1_000_000);
        }

        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert_eq!(env.level(), sustain as f64);
    }

    #[test]
    fn sustain_holds_level_for_any_target() {
        for &sustain in &[0.0_f32, 0.1, 0.25, 0.5, 0.75, 0.99, 1.0] {
            let mut env = Envelope::with_params(params(0.0, 0.0, sustain, 0.5));
            env.note_on();
            let mut guard = 0;
            while env.state() != EnvelopeState::Sustain {
                env.update();
                guard += 1;
                // A zero sustain is only reached through the snap after the
                // level passes below it, which never happens multiplicatively.
                if sustain == 0.0 && guard > 100_000 {
                    break;
                }
            }
            if env.state() != EnvelopeState::Sustain {
                continue;
            }

            let held = env.level();
            for _ in 0..10_000 {
                env.update();
                assert_eq!(env.level(), held, "sustain {sustain} drifted");
                assert_eq!(env.state(), EnvelopeState::Sustain);
            }
        }
    }

    #[test]
    fn sustain_knob_moves_do_not_touch_a_held_note() {
        let mut env = Envelope::with_params(params(0.0, 0.0, 0.6, 0.5));
        env.note_on();
        while env.state() != EnvelopeState::Sustain {
            env.update();
        }
        let held = env.level();
        assert_eq!(held, 0.6_f32 as f64);

        env.parameter_changed(&params(0.0, 0.0, 0.0, 0.5));
        for _ in 0..1_000 {
            env.update();
            assert_eq!(env.level(), held);
        }
        assert_eq!(env.state(), EnvelopeState::Sustain);

        // The new target applies to the next note.
        env.note_on();
        samples_until_decay(&mut env);
        for _ in 0..2_000 {
            env.update();
        }
        assert_eq!(env.state(), EnvelopeState::Decay);
        assert!(env.level() < held);
    }

    #[test]
    fn full_sustain_skips_straight_through_decay() {
        let mut env = Envelope::with_params(params(0.0, 0.5, 1.0, 0.5));
        env.note_on();
        samples_until_decay(&mut env);
        env.update();
        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert_eq!(env.level(), 1.0);
    }

    #[test]
    fn note_off_releases_from_any_state() {
        let mut env = Envelope::new();
        env.note_on();
        env.update();
        let level = env.level();
        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Release);

        env.update();
        assert!(env.level() < level, "release must fall");
        assert_eq!(env.state(), EnvelopeState::Release);
    }

    #[test]
    fn release_never_turns_itself_off() {
        let mut env = Envelope::with_params(params(0.0, 0.0, 0.5, 0.0));
        env.note_on();
        env.note_off();
        for _ in 0..200_000 {
            env.update();
        }
        assert_eq!(env.state(), EnvelopeState::Release);
        assert!(env.level() < 0.005);
        assert!(env.level() >= 0.0);
    }

    #[test]
    fn retrigger_restarts_attack() {
        let mut env = Envelope::new();
        env.note_on();
        for _ in 0..50_000 {
            env.update();
        }
        env.note_off();
        env.update();
        env.note_on();
        assert_eq!(env.state(), EnvelopeState::Attack);
        assert!((env.level() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn attack_time_is_sample_rate_invariant() {
        let attack_seconds = |rate: f64| {
            let mut env = Envelope::with_params(params(0.5, 0.5, 0.5, 0.5));
            env.set_sample_rate(rate);
            env.note_on();
            samples_until_decay(&mut env) as f64 / rate
        };

        let slow = attack_seconds(44_100.0);
        let fast = attack_seconds(441_000.0);
        assert!(
            (slow - fast).abs() < 2.0 / 44_100.0,
            "attack took {slow}s at 44.1k but {fast}s at 441k"
        );

        let low = attack_seconds(4_410.0);
        assert!((slow - low).abs() < 2.0 / 4_410.0);
    }

    #[test]
    fn reference_rate_uses_coefficients_unchanged() {
        let env = Envelope::with_params(params(0.3, 0.3, 0.5, 0.3));
        let expected = env.params.attack_coefficient();
        assert_eq!(env.rates.attack, expected);
    }

    #[test]
    fn render_writes_levels() {
        let mut env = Envelope::new();
        env.note_on();
        let mut buffer = [0.0f32; 16];
        env.render(&mut buffer);
        assert!(buffer.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn gate_opens_and_closes_quickly() {
        let mut gate = Envelope::gate();
        gate.note_on();
        for _ in 0..2_000 {
            gate.update();
        }
        assert_eq!(gate.state(), EnvelopeState::Sustain);
        assert_eq!(gate.level(), 1.0);

        gate.note_off();
        for _ in 0..2_000 {
            gate.update();
        }
        assert!(gate.level() < 0.005);
    }
}
