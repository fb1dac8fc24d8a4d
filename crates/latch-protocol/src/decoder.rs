//! Frame decoder for the reader's serial output.
//!
//! The decoder is a push-driven state machine: the caller feeds bytes one at
//! a time with [`FrameDecoder::push`] and receives a result whenever a frame
//! completes or aborts. It performs no I/O itself, so it can sit behind a
//! serial port, a captured byte stream or a test script alike.
//!
//! # Frame Layout
//!
//! ```text
//! STX  D D D D D D D D D D  C C  CR LF ETX
//! 0x02 <10 hex: identifier> <2 hex: checksum>
//! ```
//!
//! # Usage
//!
//! ```
//! use latch_protocol::{FrameDecoder, encode_valid_frame};
//! use latch_core::TagIdentifier;
//!
//! let tag = TagIdentifier::new([0x01, 0x04, 0xF5, 0xB5, 0x22]);
//! let mut decoder = FrameDecoder::new();
//!
//! let frame = encode_valid_frame(&tag)
//!     .into_iter()
//!     .find_map(|byte| decoder.push(byte))
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(frame.identifier, tag);
//! assert!(frame.is_valid());
//! ```

use latch_core::constants::{FRAME_TERMINATORS, HEX_DIGITS_PER_FRAME, START_BYTE, TAG_ID_LENGTH};
use latch_core::{DecodedFrame, TagIdentifier};

use crate::checksum::RunningChecksum;
use crate::hex;

/// Reasons a frame is abandoned before a [`DecodedFrame`] can be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFailure {
    /// Fewer than twelve hex characters arrived before a terminator byte
    /// (`terminator` is `Some`) or before the byte source ended (`None`).
    #[error("Incomplete frame: {hex_digits} of 12 hex characters{}", describe_terminator(.terminator))]
    Incomplete {
        hex_digits: usize,
        terminator: Option<u8>,
    },
}

fn describe_terminator(terminator: &Option<u8>) -> String {
    match terminator {
        Some(byte) => format!(" (cut by 0x{byte:02X})"),
        None => " (source ended)".to_string(),
    }
}

/// State machine states for decoding reader frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Waiting for STX (0x02). Any other byte is discarded.
    WaitingStart,

    /// Collecting the twelve hex characters that follow STX.
    ReadingHex,
}

/// Stateful decoder turning reader bytes into [`DecodedFrame`]s.
///
/// # State Machine
///
/// ```text
/// ┌─────────────┐  STX byte    ┌────────────┐  12th hex char   ┌─────────────┐
/// │WaitingStart │─────────────>│ ReadingHex │─────────────────>│Frame emitted│
/// └─────────────┘              └────────────┘                  └─────────────┘
///       ^  │                          │                               │
///       │  │ other bytes              │ CR / LF / ETX / STX           │
///       │  │ (discarded)              │ (Incomplete)                  │
///       │  └──────────────────────────┘                               │
///       └─────────────────────────────────────────────────────────────┘
/// ```
///
/// Every terminator byte ends the frame, including a second STX; it is
/// consumed and does not open a new frame.
///
/// The checksum is XOR-ed in as each identifier byte is assembled, so the
/// sixth (checksum) byte never contributes to the computed value.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecoderState,

    /// Hex characters consumed in the current frame.
    hex_digits: usize,

    /// High nibble waiting for its partner.
    high_nibble: u8,

    /// Assembled payload: five identifier bytes then the checksum byte.
    payload: [u8; TAG_ID_LENGTH + 1],

    checksum: RunningChecksum,

    /// Payload characters that were not upper-case hex.
    non_hex_digits: usize,

    /// Bytes dropped while hunting for STX since the decoder was created.
    discarded: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::WaitingStart,
            hex_digits: 0,
            high_nibble: 0,
            payload: [0; TAG_ID_LENGTH + 1],
            checksum: RunningChecksum::new(),
            non_hex_digits: 0,
            discarded: 0,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `None` while more bytes are needed, `Some(Ok(frame))` when
    /// the twelfth hex character arrives and `Some(Err(_))` when a
    /// terminator cuts the frame short.
    pub fn push(&mut self, byte: u8) -> Option<Result<DecodedFrame, DecodeFailure>> {
        match self.state {
            DecoderState::WaitingStart => {
                if byte == START_BYTE {
                    self.begin_frame();
                } else {
                    self.discarded += 1;
                }
                None
            }
            DecoderState::ReadingHex => {
                if FRAME_TERMINATORS.contains(&byte) {
                    let failure = DecodeFailure::Incomplete {
                        hex_digits: self.hex_digits,
                        terminator: Some(byte),
                    };
                    self.state = DecoderState::WaitingStart;
                    return Some(Err(failure));
                }

                self.accept_digit(byte);

                if self.hex_digits == HEX_DIGITS_PER_FRAME {
                    self.state = DecoderState::WaitingStart;
                    return Some(Ok(self.finished_frame()));
                }
                None
            }
        }
    }

    /// Signal that the byte source has ended.
    ///
    /// Returns the failure for a frame that was in progress, or `None` if
    /// the decoder was between frames.
    pub fn finish(&mut self) -> Option<DecodeFailure> {
        match self.state {
            DecoderState::WaitingStart => None,
            DecoderState::ReadingHex => {
                self.state = DecoderState::WaitingStart;
                Some(DecodeFailure::Incomplete {
                    hex_digits: self.hex_digits,
                    terminator: None,
                })
            }
        }
    }

    /// Current state of the decoder.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Hex characters collected so far in the current frame.
    pub fn hex_digits(&self) -> usize {
        match self.state {
            DecoderState::WaitingStart => 0,
            DecoderState::ReadingHex => self.hex_digits,
        }
    }

    /// Total bytes discarded while waiting for a start byte.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Drop any partial frame and wait for the next start byte.
    pub fn reset(&mut self) {
        self.state = DecoderState::WaitingStart;
    }

    fn begin_frame(&mut self) {
        self.state = DecoderState::ReadingHex;
        self.hex_digits = 0;
        self.high_nibble = 0;
        self.payload = [0; TAG_ID_LENGTH + 1];
        self.checksum.reset();
        self.non_hex_digits = 0;
    }

    fn accept_digit(&mut self, byte: u8) {
        if hex::digit_value(byte).is_none() {
            self.non_hex_digits += 1;
        }
        let nibble = hex::nibble_or_raw(byte);

        // Even positions carry the high nibble, odd positions complete a byte.
        if self.hex_digits & 1 == 1 {
            let index = self.hex_digits >> 1;
            let value = hex::assemble(self.high_nibble, nibble);
            self.payload[index] = value;
            if index < TAG_ID_LENGTH {
                self.checksum.update(value);
            }
        } else {
            self.high_nibble = nibble;
        }

        self.hex_digits += 1;
    }

    fn finished_frame(&self) -> DecodedFrame {
        let mut identifier = [0u8; TAG_ID_LENGTH];
        identifier.copy_from_slice(&self.payload[..TAG_ID_LENGTH]);

        DecodedFrame {
            identifier: TagIdentifier::new(identifier),
            received_checksum: self.payload[TAG_ID_LENGTH],
            computed_checksum: self.checksum.value(),
            non_hex_digits: self.non_hex_digits,
        }
    }
}
