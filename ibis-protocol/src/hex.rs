//! VDV hex nibble codec
//!
//! Address, block-count and remainder fields are carried as "IBIS hex":
//! the digits `0`-`9` stand for themselves and the values 10-15 are
//! encoded as `:;<=>?` (the six characters following `9` in the ASCII
//! table). A leading zero high nibble is suppressed, so values below 16
//! occupy a single character on the wire.

use crate::frame::EncodeError;

/// The 16-symbol IBIS hex alphabet, indexed by nibble value
pub const HEX_ALPHABET: &[u8; 16] = b"0123456789:;<=>?";

/// Encode a value into its one- or two-character hex form
///
/// `encode(0)` yields `"0"`, not `"00"`; the suppressed high nibble is
/// part of the wire format.
pub fn encode(value: u8) -> heapless::String<2> {
    let mut out = heapless::String::new();
    // Capacity is exactly two characters, pushes cannot fail
    let _ = push(&mut out, value);
    out
}

/// Append the hex form of `value` to an existing buffer
pub fn push<const N: usize>(out: &mut heapless::String<N>, value: u8) -> Result<(), EncodeError> {
    let high = (value >> 4) as usize;
    let low = (value & 0x0F) as usize;

    if high > 0 {
        out.push(HEX_ALPHABET[high] as char)
            .map_err(|_| EncodeError::PayloadTooLarge)?;
    }
    out.push(HEX_ALPHABET[low] as char)
        .map_err(|_| EncodeError::PayloadTooLarge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_zero_is_single_character() {
        assert_eq!(encode(0).as_str(), "0");
    }

    #[test]
    fn test_encode_digits() {
        assert_eq!(encode(5).as_str(), "5");
        assert_eq!(encode(9).as_str(), "9");
    }

    #[test]
    fn test_encode_punctuation_range() {
        assert_eq!(encode(10).as_str(), ":");
        assert_eq!(encode(15).as_str(), "?");
    }

    #[test]
    fn test_encode_two_characters() {
        assert_eq!(encode(16).as_str(), "10");
        assert_eq!(encode(0x5A).as_str(), "5:");
        assert_eq!(encode(255).as_str(), "??");
    }

    proptest! {
        #[test]
        fn prop_length_matches_magnitude(value in 0u8..=255) {
            let encoded = encode(value);
            if value < 16 {
                prop_assert_eq!(encoded.len(), 1);
            } else {
                prop_assert_eq!(encoded.len(), 2);
            }
        }

        #[test]
        fn prop_symbols_come_from_alphabet(value in 0u8..=255) {
            for byte in encode(value).as_bytes() {
                prop_assert!(HEX_ALPHABET.contains(byte));
            }
        }
    }
}
