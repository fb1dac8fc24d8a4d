//! Hardware device trait definitions.
//!
//! These traits are the contract between the access controller and its
//! peripherals: a byte source carrying the reader's serial output, and
//! binary output pins for the lock relay and status indicator. Mock,
//! stream-backed and serial implementations live alongside so tests can
//! script bytes and observe pin levels without real hardware.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::Level;

/// Byte-oriented input from a card reader.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters, or
/// [`AnyByteSource`](crate::devices::AnyByteSource) when the concrete source
/// is chosen at run time.
///
/// # Examples
///
/// ```no_run
/// use latch_hardware::traits::ByteSource;
/// use latch_hardware::error::Result;
///
/// async fn skip_to_start<S: ByteSource>(source: &mut S) -> Result<bool> {
///     while let Some(byte) = source.read_byte().await? {
///         if byte == 0x02 {
///             return Ok(true);
///         }
///     }
///     Ok(false)
/// }
/// ```
pub trait ByteSource: Send {
    /// Read the next byte.
    ///
    /// Waits without a timeout until a byte is available. Returns `Ok(None)`
    /// once the source is exhausted; further calls keep returning `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    async fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// Binary output such as a lock relay or status LED.
///
/// There is no read-back: the driver assumes the level it set is the level
/// on the wire.
pub trait OutputPin: Send {
    /// Drive the output to `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output could not be driven.
    async fn set_level(&mut self, level: Level) -> Result<()>;

    /// Name used in logs (e.g. `"lock"`, `"status"`).
    fn name(&self) -> &str;
}
