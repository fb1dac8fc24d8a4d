//! Channel-fed byte buffer shared by the mock reader and the serial source.
//!
//! Producers push byte chunks into an unbounded channel; the consumer hands
//! them out one byte at a time. Bytes sent while the consumer is busy (for
//! example during an unlock window) simply queue up.

use bytes::{Buf, Bytes};
use std::io;
use tokio::sync::mpsc;

use crate::{HardwareError, Result};

pub(crate) type ChunkSender = mpsc::UnboundedSender<io::Result<Bytes>>;

#[derive(Debug)]
pub(crate) struct ChunkQueue {
    rx: mpsc::UnboundedReceiver<io::Result<Bytes>>,
    current: Bytes,
    closed: bool,
}

impl ChunkQueue {
    pub(crate) fn new() -> (ChunkSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let queue = Self {
            rx,
            current: Bytes::new(),
            closed: false,
        };
        (tx, queue)
    }

    /// Next byte, waiting for a chunk if the current one is spent.
    pub(crate) async fn next_byte(&mut self) -> Result<Option<u8>> {
        while !self.current.has_remaining() {
            if self.closed {
                return Ok(None);
            }
            match self.rx.recv().await {
                Some(Ok(chunk)) => self.current = chunk,
                Some(Err(error)) => {
                    self.closed = true;
                    return Err(HardwareError::Io(error));
                }
                None => self.closed = true,
            }
        }
        Ok(Some(self.current.get_u8()))
    }
}
