//! Pulls bytes from a [`ByteSource`] through a [`FrameDecoder`].

use latch_core::DecodedFrame;
use latch_hardware::ByteSource;
use latch_protocol::{DecodeFailure, FrameDecoder};
use tracing::trace;

use crate::{ControllerError, Result};

/// Outcome of one decode attempt: a frame, or why it was abandoned.
pub type FrameResult = std::result::Result<DecodedFrame, DecodeFailure>;

/// Reads whole frames from a byte source.
///
/// # Examples
///
/// ```
/// use latch_controller::FrameReader;
/// use latch_core::TagIdentifier;
/// use latch_hardware::mock::MockReader;
/// use latch_protocol::encode_valid_frame;
///
/// #[tokio::main]
/// async fn main() -> latch_controller::Result<()> {
///     let tag = TagIdentifier::new([0x01, 0x04, 0xF5, 0xB5, 0x22]);
///     let mut reader = FrameReader::new(MockReader::scripted(encode_valid_frame(&tag)));
///
///     let frame = reader.decode_next_frame().await?.unwrap();
///     assert_eq!(frame.identifier, tag);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FrameReader<S> {
    source: S,
    decoder: FrameDecoder,
}

impl<S: ByteSource> FrameReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            decoder: FrameDecoder::new(),
        }
    }

    /// Wait for the next frame.
    ///
    /// Returns `Ok(Ok(frame))` once twelve hex characters follow a start
    /// byte, and `Ok(Err(failure))` when a frame is cut short by a
    /// terminator or by the source ending mid-frame.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::SourceClosed` if the source ends while no
    /// frame is in progress, or `ControllerError::Hardware` if the transport
    /// fails.
    pub async fn decode_next_frame(&mut self) -> Result<FrameResult> {
        loop {
            match self.source.read_byte().await? {
                Some(byte) => {
                    trace!("Reader byte 0x{:02X}", byte);
                    if let Some(result) = self.decoder.push(byte) {
                        return Ok(result);
                    }
                }
                None => {
                    return match self.decoder.finish() {
                        Some(failure) => Ok(Err(failure)),
                        None => Err(ControllerError::SourceClosed),
                    };
                }
            }
        }
    }

    /// Bytes skipped while hunting for start bytes.
    pub fn discarded(&self) -> usize {
        self.decoder.discarded()
    }

    /// Give back the source.
    pub fn into_source(self) -> S {
        self.source
    }
}
