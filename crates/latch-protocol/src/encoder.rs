//! Builds reader frames, the inverse of [`FrameDecoder`](crate::FrameDecoder).
//!
//! Used by the mock reader to present cards and by tests and benchmarks to
//! produce wire bytes.

use latch_core::TagIdentifier;
use latch_core::constants::{
    CARRIAGE_RETURN, END_BYTE, HEX_DIGITS_PER_FRAME, LINE_FEED, START_BYTE,
};

use crate::hex::digit_char;

/// Encode `identifier` with an explicit checksum byte, including the
/// `CR LF ETX` trailer.
///
/// ```
/// use latch_protocol::encode_frame;
/// use latch_core::TagIdentifier;
///
/// let tag = TagIdentifier::new([0x01, 0x04, 0xF5, 0xB5, 0x22]);
/// let wire = encode_frame(&tag, 0x67);
///
/// assert_eq!(wire[0], 0x02);
/// assert_eq!(&wire[1..13], b"0104F5B52267");
/// assert_eq!(&wire[13..], &[0x0D, 0x0A, 0x03]);
/// ```
pub fn encode_frame(identifier: &TagIdentifier, checksum: u8) -> Vec<u8> {
    let mut wire = Vec::with_capacity(HEX_DIGITS_PER_FRAME + 4);
    wire.push(START_BYTE);
    for byte in identifier.as_bytes().iter().chain(std::iter::once(&checksum)) {
        wire.push(digit_char(byte >> 4));
        wire.push(digit_char(byte & 0x0F));
    }
    wire.extend_from_slice(&[CARRIAGE_RETURN, LINE_FEED, END_BYTE]);
    wire
}

/// Encode `identifier` with its correct checksum.
pub fn encode_valid_frame(identifier: &TagIdentifier) -> Vec<u8> {
    encode_frame(identifier, identifier.checksum())
}
