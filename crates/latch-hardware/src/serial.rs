//! Serial-port byte source for ID-12 style readers.
//!
//! `serialport` exposes a blocking API, so the port is drained on a
//! dedicated OS thread that forwards chunks over a channel. Bytes that
//! arrive while the controller is busy (for example holding the lock open)
//! queue in the channel instead of overrunning the UART buffer.

use bytes::Bytes;
use std::io::{ErrorKind, Read};
use std::time::Duration;
use tracing::{debug, warn};

use crate::chunks::ChunkQueue;
use crate::{Result, traits::ByteSource};
use latch_core::constants::DEFAULT_BAUD_RATE;

/// How long a blocking port read waits before checking for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Read buffer for the port thread.
const READ_CHUNK: usize = 64;

/// Consecutive zero-length reads treated as a hung-up port.
const MAX_EMPTY_READS: u32 = 3;

/// Serial port settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub path: String,

    /// Baud rate; 8N1 framing is always used.
    pub baud_rate: u32,
}

impl SerialConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

/// [`ByteSource`] backed by a serial port.
#[derive(Debug)]
pub struct SerialSource {
    queue: ChunkQueue,
    path: String,
}

impl SerialSource {
    /// Open the port and start the reader thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be opened or the thread cannot be
    /// spawned.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let mut port = serialport::new(&config.path, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(POLL_INTERVAL)
            .open()?;

        let (tx, queue) = ChunkQueue::new();
        let path = config.path.clone();
        let thread_path = path.clone();

        std::thread::Builder::new()
            .name(format!("serial-{}", config.path))
            .spawn(move || {
                let mut buf = [0u8; READ_CHUNK];
                let mut empty_reads = 0;
                loop {
                    match port.read(&mut buf) {
                        Ok(0) => {
                            empty_reads += 1;
                            if hung_up(empty_reads) {
                                warn!("Serial port {} hung up", thread_path);
                                break;
                            }
                        }
                        Ok(n) => {
                            empty_reads = 0;
                            if tx.send(Ok(Bytes::copy_from_slice(&buf[..n]))).is_err() {
                                break;
                            }
                        }
                        Err(error) if error.kind() == ErrorKind::TimedOut => {
                            empty_reads = 0;
                            if tx.is_closed() {
                                break;
                            }
                        }
                        Err(error) if error.kind() == ErrorKind::Interrupted => {}
                        Err(error) => {
                            warn!("Serial port {} failed: {}", thread_path, error);
                            let _ = tx.send(Err(error));
                            break;
                        }
                    }
                }
                debug!("Serial reader thread for {} stopped", thread_path);
            })?;

        debug!("Opened serial port {} at {} baud", path, config.baud_rate);
        Ok(Self { queue, path })
    }

    /// Device path this source reads from.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Returns `true` once enough zero-length reads have arrived in a row to
/// treat the port as closed.
fn hung_up(empty_reads: u32) -> bool {
    empty_reads >= MAX_EMPTY_READS
}

impl ByteSource for SerialSource {
    async fn read_byte(&mut self) -> Result<Option<u8>> {
        self.queue.next_byte().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HardwareError;

    #[test]
    fn test_serial_config_defaults() {
        let config = SerialConfig::new("/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 9600);

        let config = config.with_baud_rate(19200);
        assert_eq!(config.baud_rate, 19200);
    }

    #[test]
    fn test_repeated_empty_reads_end_stream() {
        assert!(!hung_up(1));
        assert!(!hung_up(MAX_EMPTY_READS - 1));
        assert!(hung_up(MAX_EMPTY_READS));
    }

    #[test]
    fn test_open_missing_port_fails() {
        let result = SerialSource::open(&SerialConfig::new("/dev/latch-does-not-exist"));
        assert!(matches!(
            result,
            Err(HardwareError::Disconnected { .. }
                | HardwareError::Io(_)
                | HardwareError::InitializationFailed { .. })
        ));
    }
}
