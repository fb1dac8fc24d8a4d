//! Access controller for a single serial RFID reader and door.
//!
//! This crate ties the frame decoder, the authorization table and the lock
//! actuation together into the control loop:
//!
//! - [`FrameReader`] pulls bytes from a [`ByteSource`](latch_hardware::ByteSource)
//!   and yields whole frames.
//! - [`AuthorizationTable`] maps tag identifiers to holder names.
//! - [`ActuationDriver`] drives the lock relay and status indicator through
//!   an explicit [`ActuationPhase`].
//! - [`DiagnosticLog`] writes the operator-facing transcript.
//! - [`AccessController`] runs the cycles.

pub mod actuation;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod reader;
pub mod table;

pub use actuation::{ActuationDriver, ActuationPhase};
pub use controller::{AccessController, CycleOutcome};
pub use diagnostics::DiagnosticLog;
pub use error::{ControllerError, Result};
pub use reader::{FrameReader, FrameResult};
pub use table::{AuthorizationTable, TableMatch};
