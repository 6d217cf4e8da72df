//! Frame assembly and checksum
//!
//! Frame format:
//! - PAYLOAD (variable): telegram characters, remapped to the bus alphabet
//! - TERMINATOR (1 byte): carriage return, 0x0D
//! - CHECKSUM (1 byte): XOR of payload and terminator, folded into 0x7F
//!
//! Every telegram type passes through [`frame`]; no encoder bypasses it.

use crate::charset;

/// Frame terminator byte (carriage return)
pub const TERMINATOR: u8 = 0x0D;

/// Initial XOR accumulator value mandated by VDV 300
pub const CHECKSUM_SEED: u8 = 0x7F;

/// Maximum payload size in wire characters
pub const MAX_PAYLOAD_SIZE: usize = 254;

/// Maximum complete frame size (PAYLOAD + TERMINATOR + CHECKSUM)
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + 2;

/// Payload buffer size in bytes
///
/// Payload text is held as UTF-8 until framing, where umlauts shrink to
/// single wire bytes, so the buffer carries headroom over the wire limit.
pub const PAYLOAD_BUF_SIZE: usize = MAX_PAYLOAD_SIZE * 2;

/// An unframed telegram payload
pub type Payload = heapless::String<PAYLOAD_BUF_SIZE>;

/// A complete frame, ready for transmission
pub type WireFrame = heapless::Vec<u8, MAX_FRAME_SIZE>;

/// Errors that can occur while encoding a telegram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// A fixed-width decimal field received a value with more digits
    /// than the field holds
    FieldOverflow,
    /// The payload exceeds the maximum frame size
    PayloadTooLarge,
}

/// Calculate the checksum over the given frame bytes
fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(CHECKSUM_SEED, |acc, &byte| acc ^ byte)
}

/// Assemble the final frame for a raw telegram payload
///
/// Steps, in order: remap each character through the VDV 300 charset
/// table, append the terminator, compute the checksum over everything
/// written so far, append the checksum byte. The checksum covers the
/// terminator but not itself.
pub fn frame(payload: &str) -> Result<WireFrame, EncodeError> {
    let mut out = WireFrame::new();

    for c in payload.chars() {
        let c = charset::remap_char(c);
        let mut buf = [0u8; 4];
        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes())
            .map_err(|_| EncodeError::PayloadTooLarge)?;
    }

    out.push(TERMINATOR)
        .map_err(|_| EncodeError::PayloadTooLarge)?;
    let checksum = checksum(&out);
    out.push(checksum).map_err(|_| EncodeError::PayloadTooLarge)?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn xor_reduce(bytes: &[u8]) -> u8 {
        bytes.iter().fold(CHECKSUM_SEED, |acc, &byte| acc ^ byte)
    }

    #[test]
    fn test_empty_payload_frame() {
        let frame = frame("").unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0], TERMINATOR);
        assert_eq!(frame[1], CHECKSUM_SEED ^ TERMINATOR);
    }

    #[test]
    fn test_known_frame_bytes() {
        // DS003c("Test"): "zI" + block count "1" + "Test"
        let frame = frame("zI1Test").unwrap();

        let expected_checksum = CHECKSUM_SEED
            ^ b'z'
            ^ b'I'
            ^ b'1'
            ^ b'T'
            ^ b'e'
            ^ b's'
            ^ b't'
            ^ TERMINATOR;
        assert_eq!(&frame[..8], b"zI1Test\x0D");
        assert_eq!(frame[8], expected_checksum);
        assert_eq!(frame.len(), 9);
    }

    #[test]
    fn test_checksum_covers_terminator_not_itself() {
        let frame = frame("l012").unwrap();
        let (body, trailer) = frame.split_at(frame.len() - 1);
        assert_eq!(trailer[0], xor_reduce(body));
    }

    #[test]
    fn test_umlauts_remapped_before_framing() {
        let frame = frame("Müde").unwrap();
        assert_eq!(&frame[..4], b"M}de");
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let mut payload = Payload::new();
        for _ in 0..MAX_PAYLOAD_SIZE + 1 {
            payload.push('x').unwrap();
        }
        assert_eq!(frame(&payload), Err(EncodeError::PayloadTooLarge));
    }

    proptest! {
        #[test]
        fn prop_frame_self_check_is_zero(payload in "[ -z]{0,64}") {
            let frame = frame(&payload).unwrap();
            prop_assert_eq!(xor_reduce(&frame), 0);
        }

        #[test]
        fn prop_single_bit_corruption_breaks_self_check(
            payload in "[ -z]{1,64}",
            bit in 0u8..8,
        ) {
            let frame = frame(&payload).unwrap();
            let index = payload.len() / 2; // any in-frame position works
            let mut corrupted: heapless::Vec<u8, MAX_FRAME_SIZE> = frame.clone();
            corrupted[index] ^= 1 << bit;
            prop_assert_ne!(xor_reduce(&corrupted), 0);
        }
    }
}
