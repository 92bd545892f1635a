/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f64 {
    440.0 * 2.0_f64.powf((note as f64 - 69.0) / 12.0)
}

/// Convert a normalized velocity (0.0 - 1.0) from a MIDI velocity byte.
#[inline]
pub fn midi_velocity_to_unit(velocity: u8) -> f32 {
    velocity.min(127) as f32 / 127.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_440() {
        assert!((midi_note_to_freq(69) - 440.0).abs() < 1e-9);
    }

    #[test]
    fn octaves_double() {
        assert!((midi_note_to_freq(81) - 880.0).abs() < 1e-9);
        assert!((midi_note_to_freq(57) - 220.0).abs() < 1e-9);
    }

    #[test]
    fn middle_c() {
        assert!((midi_note_to_freq(60) - 261.625_565).abs() < 1e-5);
    }

    #[test]
    fn velocity_scaling() {
        assert_eq!(midi_velocity_to_unit(0), 0.0);
        assert_eq!(midi_velocity_to_unit(127), 1.0);
    }
}
