//! Hardware abstraction layer for the Latch door controller.
//!
//! This crate provides trait-based abstractions for the two peripherals the
//! controller talks to: the card reader's byte stream and the binary outputs
//! for the lock relay and status indicator. The traits allow substitution
//! between mock implementations (for development and testing) and real
//! transports.
//!
//! # Design Philosophy
//!
//! - **Async-first**: I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Enum dispatch**: run-time device choice goes through the wrappers in
//!   [`devices`] rather than trait objects.
//! - **Error-aware**: all operations return `Result<T>` with [`HardwareError`].
//!
//! # Byte Sources
//!
//! ```no_run
//! use latch_hardware::traits::ByteSource;
//! use latch_hardware::error::Result;
//!
//! async fn count_bytes<S: ByteSource>(source: &mut S) -> Result<usize> {
//!     let mut count = 0;
//!     while source.read_byte().await?.is_some() {
//!         count += 1;
//!     }
//!     Ok(count)
//! }
//! ```
//!
//! # Output Pins
//!
//! ```no_run
//! use latch_hardware::traits::OutputPin;
//! use latch_hardware::types::Level;
//! use latch_hardware::error::Result;
//!
//! async fn pulse<P: OutputPin>(pin: &mut P) -> Result<()> {
//!     pin.set_level(Level::High).await?;
//!     pin.set_level(Level::Low).await
//! }
//! ```

mod chunks;
pub mod devices;
pub mod error;
pub mod log_pin;
pub mod mock;
pub mod serial;
pub mod stream;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::{AnyByteSource, AnyOutputPin};
pub use error::{HardwareError, Result};
pub use log_pin::LogPin;
pub use serial::{SerialConfig, SerialSource};
pub use stream::StreamSource;
pub use traits::{ByteSource, OutputPin};
pub use types::Level;
