//! The access control loop.
//!
//! Each cycle reads one frame, checks its checksum, looks the tag up and, on
//! a match, holds the lock open before returning. Cycles share no state
//! apart from the reader's position in the byte stream.
//!
//! ```text
//! decode_next_frame ──Incomplete──────────────────────────────┐
//!        │                                                    │
//!        ▼                                                    │
//!   Tag read / Checksum ──mismatch────────────────────────────┤
//!        │                                                    │
//!        ▼                                                    ▼
//!     lookup ──miss── "Tag not authorized" ─────────────► separator
//!        │                                                    ▲
//!        └──hit── "Authorized tag ID n" ── unlock() ──────────┘
//! ```

use std::io::Write;

use latch_core::{AccessDecision, DecodedFrame};
use latch_hardware::{ByteSource, OutputPin};
use latch_protocol::DecodeFailure;
use tracing::{debug, info, warn};

use crate::{
    ActuationDriver, ActuationPhase, AuthorizationTable, ControllerError, DiagnosticLog,
    FrameReader, Result,
};

/// What one cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The frame was cut short; nothing was evaluated.
    Incomplete(DecodeFailure),

    /// The frame decoded but its checksum did not match. Never authorized.
    ChecksumMismatch(DecodedFrame),

    /// A checksum-valid tag was evaluated.
    Decision(AccessDecision),
}

impl CycleOutcome {
    /// Returns `true` if the lock was released during the cycle.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Decision(decision) if decision.is_granted())
    }
}

/// Single-reader, single-door controller.
///
/// Borrows the authorization table; owns the reader, the actuation driver
/// and the diagnostic log.
///
/// # Examples
///
/// ```
/// use latch_controller::{AccessController, ActuationDriver, AuthorizationTable, DiagnosticLog};
/// use latch_core::{ControllerConfig, TagIdentifier};
/// use latch_hardware::mock::{MockPin, MockReader};
/// use latch_protocol::encode_valid_frame;
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() -> latch_controller::Result<()> {
///     let config = ControllerConfig::default();
///     let table = AuthorizationTable::from_config(&config);
///     let tag = TagIdentifier::new([0x01, 0x04, 0xF5, 0xB5, 0x22]);
///
///     let (lock, _) = MockPin::new("lock");
///     let (status, _) = MockPin::new("status");
///     let mut controller = AccessController::new(
///         &table,
///         MockReader::scripted(encode_valid_frame(&tag)),
///         ActuationDriver::new(lock, status, config.unlock_duration()),
///         DiagnosticLog::new(Vec::new()),
///     );
///
///     assert!(controller.run_cycle().await?.is_granted());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct AccessController<'a, S, P, W> {
    table: &'a AuthorizationTable,
    reader: FrameReader<S>,
    actuator: ActuationDriver<P>,
    log: DiagnosticLog<W>,
}

impl<'a, S, P, W> AccessController<'a, S, P, W>
where
    S: ByteSource,
    P: OutputPin,
    W: Write,
{
    pub fn new(
        table: &'a AuthorizationTable,
        source: S,
        actuator: ActuationDriver<P>,
        log: DiagnosticLog<W>,
    ) -> Self {
        Self {
            table,
            reader: FrameReader::new(source),
            actuator,
            log,
        }
    }

    /// Write the start-up banner.
    ///
    /// # Errors
    ///
    /// Returns an error if the diagnostic log cannot be written.
    pub fn startup(&mut self) -> Result<()> {
        info!(
            "RFID reader starting up ({} authorized tags, {}ms unlock)",
            self.table.len(),
            self.actuator.unlock_duration().as_millis()
        );
        self.log.startup()
    }

    /// Run one read-evaluate-actuate cycle.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::SourceClosed` when the reader has no more
    /// bytes, or an error if the transport, an output or the diagnostic log
    /// fails. Bad frames and unknown tags are reported through the
    /// returned [`CycleOutcome`].
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let outcome = match self.reader.decode_next_frame().await? {
            Err(failure) => {
                warn!("Discarding frame: {}", failure);
                CycleOutcome::Incomplete(failure)
            }
            Ok(frame) => self.evaluate(frame).await?,
        };

        self.log.separator()?;
        Ok(outcome)
    }

    /// Write the banner, then run cycles until the reader closes.
    ///
    /// # Errors
    ///
    /// Returns any error from [`run_cycle`](Self::run_cycle) other than
    /// `SourceClosed`, which ends the loop normally.
    pub async fn run(&mut self) -> Result<()> {
        self.startup()?;
        loop {
            match self.run_cycle().await {
                Ok(outcome) => debug!("Cycle finished: {:?}", outcome),
                Err(ControllerError::SourceClosed) => {
                    info!(
                        "Reader closed ({} stray bytes skipped)",
                        self.reader.discarded()
                    );
                    return Ok(());
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Current actuation phase.
    pub fn actuation_phase(&self) -> ActuationPhase {
        self.actuator.phase()
    }

    pub fn actuator(&self) -> &ActuationDriver<P> {
        &self.actuator
    }

    pub fn log(&self) -> &DiagnosticLog<W> {
        &self.log
    }

    /// Split the controller back into its owned parts.
    pub fn into_parts(self) -> (S, ActuationDriver<P>, DiagnosticLog<W>) {
        (self.reader.into_source(), self.actuator, self.log)
    }

    async fn evaluate(&mut self, frame: DecodedFrame) -> Result<CycleOutcome> {
        if frame.non_hex_digits > 0 {
            warn!(
                "Frame for {} carried {} non-hex characters; identifier is corrupt",
                frame.identifier, frame.non_hex_digits
            );
        }

        self.log.tag_read(&frame.identifier)?;
        self.log.checksum(frame.received_checksum, frame.is_valid())?;

        if !frame.is_valid() {
            warn!(
                tag = %frame.identifier,
                received = format_args!("{:02X}", frame.received_checksum),
                computed = format_args!("{:02X}", frame.computed_checksum),
                "Checksum error"
            );
            return Ok(CycleOutcome::ChecksumMismatch(frame));
        }

        let decision = self.table.decide(&frame.identifier);
        match &decision {
            AccessDecision::Granted {
                tag_number,
                holder_name,
            } => {
                info!(tag = %frame.identifier, tag_number, holder = %holder_name, "Access granted");
                self.log.authorized(*tag_number, holder_name)?;
                self.actuator.unlock().await?;
            }
            AccessDecision::Denied => {
                warn!(tag = %frame.identifier, "Tag not authorized");
                self.log.not_authorized()?;
            }
        }

        Ok(CycleOutcome::Decision(decision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latch_core::{ControllerConfig, TagIdentifier};
    use latch_hardware::mock::{MockPin, MockPinHandle, MockReader};
    use latch_protocol::{encode_frame, encode_valid_frame};
    use std::time::Duration;

    const JONATHAN: TagIdentifier = TagIdentifier::new([0x01, 0x04, 0xF5, 0xB5, 0x22]);

    type TestController<'a> = AccessController<'a, MockReader, MockPin, Vec<u8>>;

    fn controller(table: &AuthorizationTable, bytes: Vec<u8>) -> (TestController<'_>, MockPinHandle) {
        let (lock, lock_handle) = MockPin::new("lock");
        let (status, _status_handle) = MockPin::new("status");
        let controller = AccessController::new(
            table,
            MockReader::scripted(bytes),
            ActuationDriver::new(lock, status, Duration::from_secs(2)),
            DiagnosticLog::new(Vec::new()),
        );
        (controller, lock_handle)
    }

    fn transcript(controller: TestController<'_>) -> String {
        let (_, _, log) = controller.into_parts();
        String::from_utf8(log.into_inner()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_granted_cycle() {
        let table = AuthorizationTable::from_config(&ControllerConfig::default());
        let (mut controller, mut lock) = controller(&table, encode_valid_frame(&JONATHAN));

        let outcome = controller.run_cycle().await.unwrap();
        assert_eq!(
            outcome,
            CycleOutcome::Decision(AccessDecision::Granted {
                tag_number: 1,
                holder_name: "Jonathan Oxer".to_string(),
            })
        );
        assert!(outcome.is_granted());
        assert_eq!(lock.activations(), 1);
        assert_eq!(controller.actuation_phase(), ActuationPhase::Idle);
        assert_eq!(controller.actuator().activations(), 1);
    }

    #[tokio::test]
    async fn test_checksum_mismatch_cycle() {
        let table = AuthorizationTable::from_config(&ControllerConfig::default());
        let (mut controller, mut lock) = controller(&table, encode_frame(&JONATHAN, 0x66));

        let outcome = controller.run_cycle().await.unwrap();
        let CycleOutcome::ChecksumMismatch(frame) = outcome else {
            panic!("expected checksum mismatch, got {outcome:?}");
        };
        assert_eq!(frame.received_checksum, 0x66);
        assert_eq!(frame.computed_checksum, 0x67);
        assert!(lock.history().is_empty());
        assert_eq!(
            transcript(controller),
            "Tag read: 0104F5B522\nChecksum: 66 -- error.\n\n"
        );
    }

    #[tokio::test]
    async fn test_incomplete_cycle_writes_only_separator() {
        let table = AuthorizationTable::from_config(&ControllerConfig::default());
        let (mut controller, mut lock) = controller(&table, b"\x020104\r\n".to_vec());

        let outcome = controller.run_cycle().await.unwrap();
        assert_eq!(
            outcome,
            CycleOutcome::Incomplete(DecodeFailure::Incomplete {
                hex_digits: 4,
                terminator: Some(0x0D),
            })
        );
        assert!(!outcome.is_granted());
        assert!(lock.history().is_empty());
        assert_eq!(transcript(controller), "\n");
    }

    #[tokio::test]
    async fn test_source_closed_is_error_for_cycle() {
        let table = AuthorizationTable::from_config(&ControllerConfig::default());
        let (mut controller, _lock) = controller(&table, Vec::new());

        assert!(matches!(
            controller.run_cycle().await,
            Err(ControllerError::SourceClosed)
        ));
    }

    #[tokio::test]
    async fn test_run_stops_cleanly_when_source_closes() {
        let table = AuthorizationTable::new(Vec::new());
        let (mut controller, mut lock) = controller(&table, encode_valid_frame(&JONATHAN));

        controller.run().await.unwrap();
        assert!(lock.history().is_empty());
        assert_eq!(
            transcript(controller),
            "RFID reader starting up\n\
             Tag read: 0104F5B522\n\
             Checksum: 67 -- passed.\n\
             Tag not authorized\n\
             \n"
        );
    }
}
