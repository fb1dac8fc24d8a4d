//! Byte source over any Tokio [`AsyncRead`].
//!
//! Lets the controller consume stdin, a captured reader dump, or a
//! pseudo-terminal without a dedicated driver.

use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

use crate::{Result, traits::ByteSource};

/// [`ByteSource`] reading from an async stream through a buffer.
///
/// # Examples
///
/// ```
/// use latch_hardware::StreamSource;
/// use latch_hardware::traits::ByteSource;
///
/// #[tokio::main]
/// async fn main() -> latch_hardware::Result<()> {
///     let mut source = StreamSource::new(&b"\x02AB"[..]);
///
///     assert_eq!(source.read_byte().await?, Some(0x02));
///     assert_eq!(source.read_byte().await?, Some(b'A'));
///     assert_eq!(source.read_byte().await?, Some(b'B'));
///     assert_eq!(source.read_byte().await?, None);
///     Ok(())
/// }
/// ```
pub struct StreamSource<R> {
    reader: BufReader<R>,
    exhausted: bool,
}

impl<R: AsyncRead> std::fmt::Debug for StreamSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSource")
            .field("buffered", &self.reader.buffer().len())
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl<R: AsyncRead + Unpin + Send> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            exhausted: false,
        }
    }
}

impl<R: AsyncRead + Unpin + Send> ByteSource for StreamSource<R> {
    async fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.exhausted {
            return Ok(None);
        }
        match self.reader.read_u8().await {
            Ok(byte) => Ok(Some(byte)),
            Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.exhausted = true;
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }
}
