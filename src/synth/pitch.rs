//! Pitch-wheel position to frequency multiplier.
//!
//! The wheel is a 14-bit value with 8192 at rest. Upward travel interpolates
//! linearly from 1.0 to the bend-width ratio. Downward travel uses the
//! reciprocal of the same interpolation, so a full downward bend lands on
//! exactly `1 / width_ratio` rather than a mirrored linear value.
//!
//! ```text
//!   wheel     multiplier (width = 2 semitones, R ≈ 1.1225)
//!   16383     R
//!   12288     1 + (R - 1) · 4096/8191
//!    8192     1.0
//!    4096     1 / (1 + (R - 1) · 4096/8192)
//!       0     1 / R
//! ```

pub const PITCH_WHEEL_CENTER: u16 = 8192;
pub const PITCH_WHEEL_MAX: u16 = 16383;

const UP_TRAVEL: f64 = (PITCH_WHEEL_MAX - PITCH_WHEEL_CENTER) as f64;
const DOWN_TRAVEL: f64 = PITCH_WHEEL_CENTER as f64;

/// Frequency multiplier for a wheel position. Positions past 16383 are
/// treated as full upward deflection.
#[inline]
pub fn pitch_bend_multiplier(wheel: u16, width_ratio: f64) -> f64 {
    let wheel = wheel.min(PITCH_WHEEL_MAX);
    match wheel.cmp(&PITCH_WHEEL_CENTER) {
        std::cmp::Ordering::Greater => {
            let travel = (wheel - PITCH_WHEEL_CENTER) as f64 / UP_TRAVEL;
            1.0 + (width_ratio - 1.0) * travel
        }
        std::cmp::Ordering::Equal => 1.0,
        std::cmp::Ordering::Less => {
            let travel = (PITCH_WHEEL_CENTER - wheel) as f64 / DOWN_TRAVEL;
            1.0 / (1.0 + (width_ratio - 1.0) * travel)
        }
    }
}
