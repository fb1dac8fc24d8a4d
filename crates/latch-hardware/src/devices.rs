//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits (RPITIT) is not object-safe, so we cannot use
//! `Box<dyn ByteSource>`. These enums give concrete type dispatch when the
//! device is picked at run time (for example from command-line flags),
//! keeping monomorphized calls underneath.
//!
//! # Examples
//!
//! ```
//! use latch_hardware::devices::AnyByteSource;
//! use latch_hardware::mock::MockReader;
//!
//! let source = AnyByteSource::Mock(MockReader::scripted(&b"\x02"[..]));
//! ```

use tokio::io::AsyncRead;

use crate::mock::{MockPin, MockReader};
use crate::traits::{ByteSource, OutputPin};
use crate::{Level, LogPin, Result, SerialSource, StreamSource};

/// Boxed async stream accepted by [`AnyByteSource::Stream`].
pub type BoxedStream = Box<dyn AsyncRead + Unpin + Send>;

/// Enum wrapper for byte source dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyByteSource {
    /// Mock reader for development and testing.
    Mock(MockReader),

    /// Physical reader on a serial port.
    Serial(SerialSource),

    /// Any async stream: stdin, a file, a pseudo-terminal.
    Stream(StreamSource<BoxedStream>),
}

impl AnyByteSource {
    /// Wrap an async stream.
    pub fn stream(inner: impl AsyncRead + Unpin + Send + 'static) -> Self {
        Self::Stream(StreamSource::new(Box::new(inner)))
    }
}

impl ByteSource for AnyByteSource {
    async fn read_byte(&mut self) -> Result<Option<u8>> {
        match self {
            Self::Mock(source) => source.read_byte().await,
            Self::Serial(source) => source.read_byte().await,
            Self::Stream(source) => source.read_byte().await,
        }
    }
}

/// Enum wrapper for output pin dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyOutputPin {
    /// Mock pin for development and testing.
    Mock(MockPin),

    /// Pin that only logs level changes.
    Log(LogPin),
}

impl OutputPin for AnyOutputPin {
    async fn set_level(&mut self, level: Level) -> Result<()> {
        match self {
            Self::Mock(pin) => pin.set_level(level).await,
            Self::Log(pin) => pin.set_level(level).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Mock(pin) => pin.name(),
            Self::Log(pin) => pin.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_source_dispatch() {
        let mut mock = AnyByteSource::Mock(MockReader::scripted(&b"\x02"[..]));
        assert_eq!(mock.read_byte().await.unwrap(), Some(0x02));
        assert_eq!(mock.read_byte().await.unwrap(), None);

        let mut stream = AnyByteSource::stream(&b"A"[..]);
        assert_eq!(stream.read_byte().await.unwrap(), Some(b'A'));
        assert_eq!(stream.read_byte().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_any_pin_dispatch() {
        let (pin, mut handle) = MockPin::new("lock");
        let mut any = AnyOutputPin::Mock(pin);
        any.set_level(Level::High).await.unwrap();
        assert_eq!(any.name(), "lock");
        assert_eq!(handle.level(), Level::High);

        let mut log = AnyOutputPin::Log(LogPin::new("status"));
        assert!(log.set_level(Level::High).await.is_ok());
        assert_eq!(log.name(), "status");
    }
}
