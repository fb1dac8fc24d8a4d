//! ASCII-hex nibble conversion as performed by the reader firmware.
//!
//! Only upper-case digits `0-9` and `A-F` are converted. Every other byte is
//! returned unchanged and then folded into the assembled byte as-is, so a
//! lower-case or otherwise stray character corrupts the value instead of
//! failing the frame. The decoder counts such characters so callers can
//! report them.

/// Numeric value of an upper-case hex digit, or `None` for anything else.
///
/// ```
/// use latch_protocol::hex::digit_value;
///
/// assert_eq!(digit_value(b'7'), Some(7));
/// assert_eq!(digit_value(b'C'), Some(12));
/// assert_eq!(digit_value(b'c'), None);
/// ```
#[inline]
pub fn digit_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Converted nibble, or the raw byte when it is not an upper-case hex digit.
#[inline]
pub fn nibble_or_raw(byte: u8) -> u8 {
    digit_value(byte).unwrap_or(byte)
}

/// Combine two nibbles, high first. Bits shifted past the top are dropped.
///
/// ```
/// use latch_protocol::hex::assemble;
///
/// assert_eq!(assemble(0xF, 0x5), 0xF5);
/// assert_eq!(assemble(b'a', 0x1), 0x11);
/// ```
#[inline]
pub fn assemble(high: u8, low: u8) -> u8 {
    (high << 4) | low
}

/// Upper-case ASCII digit for the low four bits of `nibble`.
#[inline]
pub fn digit_char(nibble: u8) -> u8 {
    b"0123456789ABCDEF"[usize::from(nibble & 0x0F)]
}
