//! Errors that stop the controller loop.
//!
//! Malformed frames, checksum mismatches and unknown tags are ordinary
//! cycle outcomes, not errors; see [`CycleOutcome`](crate::CycleOutcome).

use latch_hardware::HardwareError;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The byte source ended between frames.
    #[error("Byte source closed")]
    SourceClosed,

    /// The reader transport or an output pin failed.
    #[error(transparent)]
    Hardware(#[from] HardwareError),

    /// The diagnostic log could not be written.
    #[error("Diagnostic log write failed: {0}")]
    Diagnostic(#[source] std::io::Error),

    /// `engage` was called while the lock is already released.
    #[error("Actuation already active")]
    AlreadyUnlocking,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ControllerError::SourceClosed.to_string(), "Byte source closed");
        assert_eq!(
            ControllerError::from(HardwareError::disconnected("COM3")).to_string(),
            "Device disconnected: COM3"
        );
        assert_eq!(
            ControllerError::Diagnostic(std::io::Error::other("disk full")).to_string(),
            "Diagnostic log write failed: disk full"
        );
    }
}
