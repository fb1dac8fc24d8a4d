//! XOR checksum over the identifier bytes.

/// XOR-fold of `bytes`.
///
/// ```
/// use latch_protocol::xor_checksum;
///
/// assert_eq!(xor_checksum(&[0x01, 0x04, 0xF5, 0xB5, 0x22]), 0x67);
/// assert_eq!(xor_checksum(&[]), 0);
/// ```
#[inline]
pub fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, byte| acc ^ byte)
}

/// Checksum accumulated one byte at a time as the decoder assembles them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningChecksum(u8);

impl RunningChecksum {
    pub fn new() -> Self {
        Self(0)
    }

    #[inline]
    pub fn update(&mut self, byte: u8) {
        self.0 ^= byte;
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}
