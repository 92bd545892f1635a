//! Low-level DSP primitives that make up one voice and the master bus.
//!
//! These components are allocation-free and realtime-safe, so voices can own
//! them directly. Parameters arrive as plain snapshot groups through each
//! component's `parameter_changed`.

/// Gain mapping helpers and the master volume/clip stage.
pub mod amplify;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Biquad low-pass (per voice) and high-pass (master bus) filters.
pub mod filter;
/// Low-frequency modulator with tempo and key sync.
pub mod lfo;
/// Four-waveform mixing oscillator.
pub mod oscillator;

pub use envelope::EnvelopeState;
