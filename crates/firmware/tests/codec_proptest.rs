//! Property-based tests for the gain/channel decode tables.

use firmware::codec::{channel_decode, channel_label, gain_decode, gain_level, GAIN_TABLE};
use firmware::{GainLevel, LinePattern};

proptest::proptest! {
    /// Decoding is pure: the same code always gives the same pattern.
    #[test]
    fn decode_is_deterministic(code in 0u8..=255) {
        proptest::prop_assert_eq!(gain_decode(code), gain_decode(code));
        proptest::prop_assert_eq!(channel_decode(code), channel_decode(code));
    }

    /// Gain codes past the table select maximum gain.
    #[test]
    fn gain_fallback_is_all_high(code in 13u8..=255) {
        proptest::prop_assert_eq!(gain_decode(code), LinePattern::ALL_HIGH);
        proptest::prop_assert_ne!(gain_level(code), GainLevel::Off);
    }

    /// Channel codes past the table select the all-high pattern and label F.
    #[test]
    fn channel_fallback_is_all_high(code in 15u8..=255) {
        proptest::prop_assert_eq!(channel_decode(code), LinePattern::ALL_HIGH);
        proptest::prop_assert_eq!(channel_label(code), 'F');
    }

    /// In-table codes are the binary encoding of the code, bit0 first.
    #[test]
    fn table_patterns_encode_the_code(code in 0u8..=12) {
        proptest::prop_assert_eq!(gain_decode(code).as_nibble(), code);
        proptest::prop_assert_eq!(channel_decode(code).as_nibble(), code);
    }
}

#[test]
fn all_high_is_not_a_gain_table_entry() {
    assert!(GAIN_TABLE.iter().all(|pattern| *pattern != LinePattern::ALL_HIGH));
}
