//! Reader protocol and controller constants.
//!
//! The reader transmits one frame per card presentation:
//!
//! ```text
//! <STX> D D D D D D D D D D C C <CR> <LF> <ETX>
//! ```
//!
//! Where:
//! - `<STX>` - Start byte (0x02)
//! - `D` - Ten ASCII-hex characters, the 5-byte tag identifier
//! - `C` - Two ASCII-hex characters, the XOR checksum of the identifier bytes
//! - `<CR> <LF> <ETX>` - Trailer, discarded while hunting for the next start byte
//!
//! Any trailer byte (or a second `<STX>`) seen before the twelfth hex
//! character cuts the frame short.
//!
//! # Usage
//!
//! ```
//! use latch_core::constants::*;
//!
//! assert_eq!(HEX_DIGITS_PER_FRAME, 2 * (TAG_ID_LENGTH + 1));
//! assert!(FRAME_TERMINATORS.contains(&START_BYTE));
//! ```

// ============================================================================
// Framing
// ============================================================================

/// Start of frame marker.
pub const START_BYTE: u8 = 0x02;

/// End of frame marker.
pub const END_BYTE: u8 = 0x03;

/// Carriage return sent after the checksum.
pub const CARRIAGE_RETURN: u8 = 0x0D;

/// Line feed sent after the carriage return.
pub const LINE_FEED: u8 = 0x0A;

/// Bytes that abort a frame when they appear before the payload is complete.
pub const FRAME_TERMINATORS: [u8; 4] = [CARRIAGE_RETURN, LINE_FEED, END_BYTE, START_BYTE];

/// Number of raw bytes in a tag identifier.
pub const TAG_ID_LENGTH: usize = 5;

/// Hex characters in one frame payload (identifier plus checksum byte).
pub const HEX_DIGITS_PER_FRAME: usize = 12;

// ============================================================================
// Controller
// ============================================================================

/// Default time the lock output stays released, in milliseconds.
pub const DEFAULT_UNLOCK_DURATION_MS: u64 = 2000;

/// Default serial baud rate of ID-12 style readers.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// First line written to the diagnostic log.
pub const STARTUP_BANNER: &str = "RFID reader starting up";
