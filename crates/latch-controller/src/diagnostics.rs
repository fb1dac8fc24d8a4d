//! Plain-text diagnostic transcript.
//!
//! One block of lines per cycle, in the format operators watch on the
//! reader's serial console:
//!
//! ```text
//! RFID reader starting up
//! Tag read: 0104F5B522
//! Checksum: 67 -- passed.
//! Authorized tag ID 1: unlocking for Jonathan Oxer
//!
//! ```
//!
//! Every line is flushed as soon as it is written so the transcript keeps
//! up with the door even when the sink is a pipe.

use std::io::Write;

use latch_core::TagIdentifier;
use latch_core::constants::STARTUP_BANNER;

use crate::{ControllerError, Result};

/// Writes the diagnostic transcript to any [`Write`] sink.
#[derive(Debug)]
pub struct DiagnosticLog<W> {
    sink: W,
}

impl<W: Write> DiagnosticLog<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn startup(&mut self) -> Result<()> {
        self.line(STARTUP_BANNER)
    }

    pub fn tag_read(&mut self, identifier: &TagIdentifier) -> Result<()> {
        self.line(&format!("Tag read: {identifier}"))
    }

    /// `received` is the checksum carried by the frame.
    pub fn checksum(&mut self, received: u8, passed: bool) -> Result<()> {
        let verdict = if passed { "passed" } else { "error" };
        self.line(&format!("Checksum: {received:02X} -- {verdict}."))
    }

    pub fn authorized(&mut self, tag_number: usize, holder_name: &str) -> Result<()> {
        self.line(&format!(
            "Authorized tag ID {tag_number}: unlocking for {holder_name}"
        ))
    }

    pub fn not_authorized(&mut self) -> Result<()> {
        self.line("Tag not authorized")
    }

    /// Blank line closing a cycle.
    pub fn separator(&mut self) -> Result<()> {
        self.line("")
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.sink, "{text}")
            .and_then(|()| self.sink.flush())
            .map_err(ControllerError::Diagnostic)
    }
}
