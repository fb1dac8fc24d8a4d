//! Mock card reader for testing and development.
//!
//! The reader side implements [`ByteSource`]; the paired handle pushes wire
//! bytes into it, either whole frames for a presented tag or arbitrary
//! (possibly malformed) bytes. Dropping every handle ends the byte stream.

use bytes::Bytes;

use crate::chunks::{ChunkQueue, ChunkSender};
use crate::{HardwareError, Result, traits::ByteSource};
use latch_core::TagIdentifier;
use latch_protocol::{encode_frame, encode_valid_frame};

/// Mock card reader.
///
/// # Examples
///
/// ```
/// use latch_hardware::mock::MockReader;
/// use latch_hardware::traits::ByteSource;
/// use latch_core::TagIdentifier;
///
/// #[tokio::main]
/// async fn main() -> latch_hardware::Result<()> {
///     let (mut reader, handle) = MockReader::new();
///
///     handle.present_tag(&TagIdentifier::new([0x01, 0x04, 0xF5, 0xB5, 0x22]))?;
///     drop(handle);
///
///     assert_eq!(reader.read_byte().await?, Some(0x02));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReader {
    queue: ChunkQueue,
    name: String,
}

impl MockReader {
    /// Create a new mock reader with the default name.
    pub fn new() -> (Self, MockReaderHandle) {
        Self::with_name("Mock RFID Reader")
    }

    /// Create a new mock reader with a custom name.
    pub fn with_name(name: impl Into<String>) -> (Self, MockReaderHandle) {
        let name = name.into();
        let (tx, queue) = ChunkQueue::new();

        let reader = Self {
            queue,
            name: name.clone(),
        };
        let handle = MockReaderHandle { tx, name };

        (reader, handle)
    }

    /// Create a reader that yields `bytes` and then ends.
    pub fn scripted(bytes: impl Into<Bytes>) -> Self {
        let (reader, handle) = Self::new();
        // the receiver is alive, so the send cannot fail
        let _ = handle.send_bytes(bytes);
        reader
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ByteSource for MockReader {
    async fn read_byte(&mut self) -> Result<Option<u8>> {
        self.queue.next_byte().await
    }
}

/// Handle for feeding bytes into a [`MockReader`].
///
/// Handles can be cloned; the reader's stream ends once all of them are
/// dropped.
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    tx: ChunkSender,
    name: String,
}

impl MockReaderHandle {
    /// Send a well-formed frame for `identifier`.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub fn present_tag(&self, identifier: &TagIdentifier) -> Result<()> {
        self.send_bytes(encode_valid_frame(identifier))
    }

    /// Send a frame for `identifier` carrying `checksum` instead of the
    /// correct value.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub fn present_tag_with_checksum(&self, identifier: &TagIdentifier, checksum: u8) -> Result<()> {
        self.send_bytes(encode_frame(identifier, checksum))
    }

    /// Send raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub fn send_bytes(&self, bytes: impl Into<Bytes>) -> Result<()> {
        self.tx
            .send(Ok(bytes.into()))
            .map_err(|_| HardwareError::disconnected(self.name.clone()))
    }

    /// Simulate a transport failure; the reader reports it and then ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub fn fail(&self, error: std::io::Error) -> Result<()> {
        self.tx
            .send(Err(error))
            .map_err(|_| HardwareError::disconnected(self.name.clone()))
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain(reader: &mut MockReader) -> Vec<u8> {
        let mut bytes = Vec::new();
        while let Some(byte) = reader.read_byte().await.unwrap() {
            bytes.push(byte);
        }
        bytes
    }

    #[tokio::test]
    async fn test_scripted_reader() {
        let mut reader = MockReader::scripted(&b"abc"[..]);
        assert_eq!(drain(&mut reader).await, b"abc");
        // exhausted sources stay exhausted
        assert_eq!(reader.read_byte().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_present_tag_sends_frame() {
        let (mut reader, handle) = MockReader::new();
        let tag = TagIdentifier::new([0x01, 0x04, 0xF5, 0xB5, 0x22]);

        handle.present_tag(&tag).unwrap();
        drop(handle);

        assert_eq!(drain(&mut reader).await, encode_valid_frame(&tag));
    }

    #[tokio::test]
    async fn test_bad_checksum_frame() {
        let (mut reader, handle) = MockReader::new();
        let tag = TagIdentifier::new([0x01, 0x04, 0xF5, 0xB5, 0x22]);

        handle.present_tag_with_checksum(&tag, 0x00).unwrap();
        drop(handle);

        let bytes = drain(&mut reader).await;
        assert_eq!(&bytes[11..13], b"00");
    }

    #[tokio::test]
    async fn test_chunks_concatenate_in_order() {
        let (mut reader, handle) = MockReader::new();
        handle.send_bytes(&b"12"[..]).unwrap();
        handle.send_bytes(Vec::new()).unwrap();
        handle.send_bytes(&b"34"[..]).unwrap();
        drop(handle);

        assert_eq!(drain(&mut reader).await, b"1234");
    }

    #[tokio::test]
    async fn test_reader_waits_for_bytes() {
        let (mut reader, handle) = MockReader::new();

        tokio::spawn(async move {
            tokio::task::yield_now().await;
            handle.send_bytes(vec![0x02]).unwrap();
        });

        assert_eq!(reader.read_byte().await.unwrap(), Some(0x02));
        assert_eq!(reader.read_byte().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let (mut reader, handle) = MockReader::new();
        handle.send_bytes(vec![0x41]).unwrap();
        handle
            .fail(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "unplugged"))
            .unwrap();

        assert_eq!(reader.read_byte().await.unwrap(), Some(0x41));
        assert!(matches!(
            reader.read_byte().await,
            Err(HardwareError::Io(_))
        ));
        assert_eq!(reader.read_byte().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_handle_reports_dropped_reader() {
        let (reader, handle) = MockReader::with_name("Door 1");
        assert_eq!(reader.name(), "Door 1");
        assert_eq!(handle.name(), "Door 1");
        drop(reader);

        let result = handle.send_bytes(vec![0x02]);
        assert!(matches!(result, Err(HardwareError::Disconnected { .. })));
    }
}
