//! Control code → select-line pattern decode.
//!
//! Gain and channel codes each drive a bank of four select lines. Both
//! decodes are static lookup tables with a single fallback: any code past
//! the end of a table selects the all-high pattern (maximum gain, last
//! channel). The functions are total over `u8`, pure, and do no I/O; the
//! dispatcher performs the actual line writes.

use core::fmt;

use platform::PinState;

/// Levels for a 4-line select bank, bit0 first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinePattern([bool; 4]);

impl LinePattern {
    /// Every line high; the fallback for out-of-table codes.
    pub const ALL_HIGH: Self = Self([true; 4]);

    /// Line levels, bit0 first.
    pub const fn lines(self) -> [bool; 4] {
        self.0
    }

    /// Line levels as pin states, bit0 first.
    pub fn levels(self) -> [PinState; 4] {
        self.0.map(PinState::from)
    }

    /// Pattern packed into the low nibble (bit0 = line 0).
    pub fn as_nibble(self) -> u8 {
        self.0
            .iter()
            .zip([0b0001u8, 0b0010, 0b0100, 0b1000])
            .filter(|(high, _)| **high)
            .fold(0, |acc, (_, bit)| acc | bit)
    }
}

impl fmt::Display for LinePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [b0, b1, b2, b3] = self.0.map(u8::from);
        write!(f, "({b0},{b1},{b2},{b3})")
    }
}

const fn p(b0: u8, b1: u8, b2: u8, b3: u8) -> LinePattern {
    LinePattern([b0 != 0, b1 != 0, b2 != 0, b3 != 0])
}

// ── Gain ─────────────────────────────────────────────────────────────────────

/// Gain select patterns for codes 0..=12.
pub static GAIN_TABLE: [LinePattern; 13] = [
    p(0, 0, 0, 0),
    p(1, 0, 0, 0),
    p(0, 1, 0, 0),
    p(1, 1, 0, 0),
    p(0, 0, 1, 0),
    p(1, 0, 1, 0),
    p(0, 1, 1, 0),
    p(1, 1, 1, 0),
    p(0, 0, 0, 1),
    p(1, 0, 0, 1),
    p(0, 1, 0, 1),
    p(1, 1, 0, 1),
    p(0, 0, 1, 1),
];

/// Amplifier gain factor for codes 0..=12. Code 0 switches the stage off.
static GAIN_FACTORS: [u16; 13] = [0, 1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048];

/// Factor reported for out-of-table gain codes.
pub const MAX_GAIN_FACTOR: u16 = 4096;

/// Decode a gain code. Codes ≥ 13 select the maximum-gain pattern.
pub fn gain_decode(code: u8) -> LinePattern {
    GAIN_TABLE
        .get(usize::from(code))
        .copied()
        .unwrap_or(LinePattern::ALL_HIGH)
}

/// Human-readable gain for a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainLevel {
    /// Stage disabled (code 0).
    Off,
    /// Multiplies the input by the given factor.
    Times(u16),
}

impl fmt::Display for GainLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::Times(factor) => write!(f, "x{factor}"),
        }
    }
}

/// Gain represented by `code`; each step doubles, out-of-table codes report
/// [`MAX_GAIN_FACTOR`].
pub fn gain_level(code: u8) -> GainLevel {
    match GAIN_FACTORS.get(usize::from(code)) {
        Some(0) => GainLevel::Off,
        Some(&factor) => GainLevel::Times(factor),
        None => GainLevel::Times(MAX_GAIN_FACTOR),
    }
}

// ── Channel ──────────────────────────────────────────────────────────────────

/// Multiplexer select patterns for codes 0..=14.
pub static CHANNEL_TABLE: [LinePattern; 15] = [
    p(0, 0, 0, 0),
    p(1, 0, 0, 0),
    p(0, 1, 0, 0),
    p(1, 1, 0, 0),
    p(0, 0, 1, 0),
    p(1, 0, 1, 0),
    p(0, 1, 1, 0),
    p(1, 1, 1, 0),
    p(0, 0, 0, 1),
    p(1, 0, 0, 1),
    p(0, 1, 0, 1),
    p(1, 1, 0, 1),
    p(0, 0, 1, 1),
    p(1, 0, 1, 1),
    p(0, 1, 1, 1),
];

static CHANNEL_LABELS: [char; 15] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E',
];

/// Decode a channel code. Codes ≥ 15 select the all-high pattern.
pub fn channel_decode(code: u8) -> LinePattern {
    CHANNEL_TABLE
        .get(usize::from(code))
        .copied()
        .unwrap_or(LinePattern::ALL_HIGH)
}

/// Switch label for a channel code; out-of-table codes report `F`.
pub fn channel_label(code: u8) -> char {
    CHANNEL_LABELS
        .get(usize::from(code))
        .copied()
        .unwrap_or('F')
}

#[cfg(test)]
#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn gain_table_matches_literal_patterns() {
        let expected: [[u8; 4]; 13] = [
            [0, 0, 0, 0],
            [1, 0, 0, 0],
            [0, 1, 0, 0],
            [1, 1, 0, 0],
            [0, 0, 1, 0],
            [1, 0, 1, 0],
            [0, 1, 1, 0],
            [1, 1, 1, 0],
            [0, 0, 0, 1],
            [1, 0, 0, 1],
            [0, 1, 0, 1],
            [1, 1, 0, 1],
            [0, 0, 1, 1],
        ];
        for (code, bits) in (0u8..).zip(expected) {
            let [b0, b1, b2, b3] = bits;
            assert_eq!(gain_decode(code), p(b0, b1, b2, b3), "gain code {code}");
        }
    }

    #[test]
    fn channel_table_is_binary_of_code() {
        for code in 0u8..15 {
            assert_eq!(channel_decode(code).as_nibble(), code, "channel code {code}");
        }
    }

    #[test]
    fn channel_13_and_14_are_table_entries_not_fallback() {
        assert_eq!(channel_decode(13), p(1, 0, 1, 1));
        assert_eq!(channel_decode(14), p(0, 1, 1, 1));
        assert_ne!(channel_decode(14), LinePattern::ALL_HIGH);
    }

    #[test]
    fn out_of_table_codes_fall_back_to_all_high() {
        for code in 13u8..=255 {
            assert_eq!(gain_decode(code), LinePattern::ALL_HIGH, "gain code {code}");
        }
        for code in 15u8..=255 {
            assert_eq!(channel_decode(code), LinePattern::ALL_HIGH, "channel code {code}");
        }
    }

    #[test]
    fn gain_code_nine_is_lines_1001_and_x256() {
        assert_eq!(gain_decode(9).lines(), [true, false, false, true]);
        assert_eq!(gain_level(9), GainLevel::Times(256));
    }

    #[test]
    fn gain_levels_double_per_step() {
        assert_eq!(gain_level(0), GainLevel::Off);
        assert_eq!(gain_level(1), GainLevel::Times(1));
        for code in 2u8..=12 {
            let (GainLevel::Times(prev), GainLevel::Times(this)) =
                (gain_level(code - 1), gain_level(code))
            else {
                panic!("code {code} must have a factor");
            };
            assert_eq!(this, prev * 2, "gain code {code}");
        }
        assert_eq!(gain_level(13), GainLevel::Times(MAX_GAIN_FACTOR));
        assert_eq!(gain_level(255), GainLevel::Times(MAX_GAIN_FACTOR));
    }

    #[test]
    fn channel_labels_are_hex_digits() {
        assert_eq!(channel_label(0), '0');
        assert_eq!(channel_label(10), 'A');
        assert_eq!(channel_label(14), 'E');
        assert_eq!(channel_label(15), 'F');
        assert_eq!(channel_label(200), 'F');
    }

    #[test]
    fn display_renders_levels() {
        assert_eq!(p(1, 0, 0, 1).to_string(), "(1,0,0,1)");
        assert_eq!(GainLevel::Off.to_string(), "off");
        assert_eq!(GainLevel::Times(256).to_string(), "x256");
    }

    #[test]
    fn levels_follow_lines() {
        let levels = gain_decode(9).levels();
        assert_eq!(levels[0], PinState::High);
        assert_eq!(levels[1], PinState::Low);
        assert_eq!(levels[3], PinState::High);
    }
}
