//! Lock actuation with an explicit phase.
//!
//! The driver owns the lock relay and the status indicator and always drives
//! them together. Its phase is observable, so a caller can either block in
//! [`ActuationDriver::unlock`] or step the phase itself with
//! [`engage`](ActuationDriver::engage) and
//! [`release_if_due`](ActuationDriver::release_if_due).
//!
//! # Known Limitation
//!
//! While `unlock` is waiting, the controller reads no frames. A card
//! presented during the window is not evaluated until the window ends, and
//! the window can be neither extended nor cut short.
//!
//! Time comes from `tokio::time`, so tests can pause the clock and assert
//! exact durations without real waits.

use std::time::Duration;

use latch_hardware::{Level, OutputPin};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{ControllerError, Result};

/// Where the driver is in its unlock cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuationPhase {
    /// Both outputs low.
    Idle,

    /// Both outputs high until the deadline.
    Unlocking { until: Instant },
}

impl ActuationPhase {
    pub fn is_unlocking(&self) -> bool {
        matches!(self, Self::Unlocking { .. })
    }
}

/// Drives the lock relay and status indicator.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use latch_controller::{ActuationDriver, ActuationPhase};
/// use latch_hardware::mock::MockPin;
///
/// #[tokio::main]
/// async fn main() -> latch_controller::Result<()> {
///     let (lock, _) = MockPin::new("lock");
///     let (status, _) = MockPin::new("status");
///     let mut driver = ActuationDriver::new(lock, status, Duration::from_millis(10));
///
///     driver.unlock().await?;
///     assert_eq!(driver.phase(), ActuationPhase::Idle);
///     assert_eq!(driver.activations(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ActuationDriver<P> {
    lock: P,
    status: P,
    unlock_duration: Duration,
    phase: ActuationPhase,
    activations: u64,
}

impl<P: OutputPin> ActuationDriver<P> {
    pub fn new(lock: P, status: P, unlock_duration: Duration) -> Self {
        Self {
            lock,
            status,
            unlock_duration,
            phase: ActuationPhase::Idle,
            activations: 0,
        }
    }

    /// Release the lock for the configured duration, then re-lock.
    ///
    /// # Errors
    ///
    /// Returns an error if an output cannot be driven or an unlock is
    /// already in progress.
    pub async fn unlock(&mut self) -> Result<()> {
        let until = self.engage().await?;
        tokio::time::sleep_until(until).await;
        self.release().await
    }

    /// Drive both outputs high and start the unlock window.
    ///
    /// Returns the instant at which the window ends. If either output
    /// cannot be driven high, both are driven back low before the error is
    /// returned and the phase stays [`ActuationPhase::Idle`].
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::AlreadyUnlocking` if the window is already
    /// open, or a hardware error if an output cannot be driven.
    pub async fn engage(&mut self) -> Result<Instant> {
        if self.phase.is_unlocking() {
            return Err(ControllerError::AlreadyUnlocking);
        }

        let raised = match self.lock.set_level(Level::High).await {
            Ok(()) => self.status.set_level(Level::High).await,
            Err(error) => Err(error),
        };
        if let Err(error) = raised {
            warn!("Unlock aborted, re-locking: {}", error);
            if let Err(rollback) = self.drive_low().await {
                warn!("Re-lock after aborted unlock failed: {}", rollback);
            }
            return Err(error.into());
        }

        let until = Instant::now() + self.unlock_duration;
        self.phase = ActuationPhase::Unlocking { until };
        self.activations += 1;
        debug!(
            "Lock released for {}ms ({} activations)",
            self.unlock_duration.as_millis(),
            self.activations
        );
        Ok(until)
    }

    /// Re-lock if the window has ended at `now`.
    ///
    /// Returns `true` if the outputs were released by this call.
    ///
    /// # Errors
    ///
    /// Returns a hardware error if an output cannot be driven.
    pub async fn release_if_due(&mut self, now: Instant) -> Result<bool> {
        match self.phase {
            ActuationPhase::Unlocking { until } if now >= until => {
                self.release().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Drive both outputs low and return to idle.
    ///
    /// Both outputs are attempted even if the first fails. The phase only
    /// returns to [`ActuationPhase::Idle`] once the lock output is low.
    ///
    /// # Errors
    ///
    /// Returns the first hardware error if an output cannot be driven.
    pub async fn release(&mut self) -> Result<()> {
        let lock = self.lock.set_level(Level::Low).await;
        let status = self.status.set_level(Level::Low).await;

        if lock.is_ok() {
            self.phase = ActuationPhase::Idle;
            debug!("Lock engaged");
        }
        lock.and(status)?;
        Ok(())
    }

    pub fn phase(&self) -> ActuationPhase {
        self.phase
    }

    pub fn unlock_duration(&self) -> Duration {
        self.unlock_duration
    }

    /// Number of unlock windows started.
    pub fn activations(&self) -> u64 {
        self.activations
    }

    async fn drive_low(&mut self) -> latch_hardware::Result<()> {
        let lock = self.lock.set_level(Level::Low).await;
        let status = self.status.set_level(Level::Low).await;
        lock.and(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latch_hardware::mock::{MockPin, MockPinHandle};

    fn driver(duration: Duration) -> (ActuationDriver<MockPin>, MockPinHandle, MockPinHandle) {
        let (lock, lock_handle) = MockPin::new("lock");
        let (status, status_handle) = MockPin::new("status");
        (
            ActuationDriver::new(lock, status, duration),
            lock_handle,
            status_handle,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlock_holds_for_configured_duration() {
        let (mut driver, mut lock, mut status) = driver(Duration::from_secs(2));

        let started = Instant::now();
        driver.unlock().await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(2));
        assert_eq!(lock.history(), &[Level::High, Level::Low]);
        assert_eq!(status.history(), &[Level::High, Level::Low]);
        assert_eq!(driver.phase(), ActuationPhase::Idle);
        assert_eq!(driver.activations(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_visible_during_window() {
        let (mut driver, mut lock, _status) = driver(Duration::from_millis(2000));

        let until = driver.engage().await.unwrap();
        assert_eq!(driver.phase(), ActuationPhase::Unlocking { until });
        assert_eq!(until - Instant::now(), Duration::from_millis(2000));
        assert_eq!(lock.level(), Level::High);

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(!driver.release_if_due(Instant::now()).await.unwrap());
        assert!(driver.phase().is_unlocking());
        assert_eq!(lock.level(), Level::High);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(driver.release_if_due(Instant::now()).await.unwrap());
        assert_eq!(driver.phase(), ActuationPhase::Idle);
        assert_eq!(lock.level(), Level::Low);
    }

    #[tokio::test(start_paused = true)]
    async fn test_engage_rejects_extension() {
        let (mut driver, mut lock, _status) = driver(Duration::from_secs(2));

        driver.engage().await.unwrap();
        assert!(matches!(
            driver.engage().await,
            Err(ControllerError::AlreadyUnlocking)
        ));
        assert_eq!(driver.activations(), 1);
        assert_eq!(lock.activations(), 1);
    }

    #[tokio::test]
    async fn test_release_if_due_when_idle() {
        let (mut driver, mut lock, _status) = driver(Duration::from_secs(2));
        assert!(!driver.release_if_due(Instant::now()).await.unwrap());
        assert!(lock.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_unlocks() {
        let (mut driver, mut lock, _status) = driver(Duration::from_millis(500));

        let started = Instant::now();
        driver.unlock().await.unwrap();
        driver.unlock().await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(1));
        assert_eq!(driver.activations(), 2);
        assert_eq!(lock.activations(), 2);
        assert_eq!(driver.unlock_duration(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_engage_relocks() {
        let (lock_pin, mut lock) = MockPin::new("lock");
        let (status_pin, mut status) = MockPin::new("status");
        let status_pin = status_pin.refusing(Level::High);
        let mut driver = ActuationDriver::new(lock_pin, status_pin, Duration::from_secs(2));

        let started = Instant::now();
        let result = driver.unlock().await;

        assert!(matches!(result, Err(ControllerError::Hardware(_))));
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(lock.history(), &[Level::High, Level::Low]);
        assert_eq!(status.history(), &[Level::Low]);
        assert_eq!(driver.phase(), ActuationPhase::Idle);
        assert_eq!(driver.activations(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_lock_release_keeps_window_open() {
        let (lock_pin, mut lock) = MockPin::new("lock");
        let (status_pin, mut status) = MockPin::new("status");
        let lock_pin = lock_pin.refusing(Level::Low);
        let mut driver = ActuationDriver::new(lock_pin, status_pin, Duration::from_secs(2));

        driver.engage().await.unwrap();
        assert!(driver.release().await.is_err());

        assert_eq!(lock.level(), Level::High);
        assert_eq!(status.history(), &[Level::High, Level::Low]);
        assert!(driver.phase().is_unlocking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_status_release_still_locks() {
        let (lock_pin, mut lock) = MockPin::new("lock");
        let (status_pin, _status) = MockPin::new("status");
        let status_pin = status_pin.refusing(Level::Low);
        let mut driver = ActuationDriver::new(lock_pin, status_pin, Duration::from_secs(2));

        driver.engage().await.unwrap();
        assert!(driver.release().await.is_err());

        assert_eq!(lock.history(), &[Level::High, Level::Low]);
        assert_eq!(driver.phase(), ActuationPhase::Idle);
    }
}
