//! Mock output pin recording every level it is driven to.

use tokio::sync::mpsc;

use crate::{HardwareError, Result, traits::OutputPin, types::Level};

/// Mock binary output.
///
/// Each [`set_level`](OutputPin::set_level) call is forwarded to the paired
/// [`MockPinHandle`], which keeps the full history for assertions.
///
/// # Examples
///
/// ```
/// use latch_hardware::mock::MockPin;
/// use latch_hardware::traits::OutputPin;
/// use latch_hardware::types::Level;
///
/// #[tokio::main]
/// async fn main() -> latch_hardware::Result<()> {
///     let (mut pin, mut handle) = MockPin::new("lock");
///
///     pin.set_level(Level::High).await?;
///     pin.set_level(Level::Low).await?;
///
///     assert_eq!(handle.history(), &[Level::High, Level::Low]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockPin {
    name: String,
    level: Level,
    refused: Option<Level>,
    events_tx: mpsc::UnboundedSender<Level>,
}

impl MockPin {
    /// Create a pin starting at [`Level::Low`].
    pub fn new(name: impl Into<String>) -> (Self, MockPinHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let pin = Self {
            name: name.into(),
            level: Level::Low,
            refused: None,
            events_tx,
        };
        let handle = MockPinHandle {
            events_rx,
            history: Vec::new(),
        };
        (pin, handle)
    }

    /// Make every attempt to drive the pin to `level` fail, as a stuck
    /// relay or a dead driver would. Refused levels are not recorded.
    #[must_use]
    pub fn refusing(mut self, level: Level) -> Self {
        self.refused = Some(level);
        self
    }

    /// Level most recently driven.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl OutputPin for MockPin {
    async fn set_level(&mut self, level: Level) -> Result<()> {
        if self.refused == Some(level) {
            return Err(HardwareError::communication(format!(
                "{} did not go {}",
                self.name, level
            )));
        }
        self.level = level;
        // a dropped handle just means nobody is watching
        let _ = self.events_tx.send(level);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Observer for a [`MockPin`].
#[derive(Debug)]
pub struct MockPinHandle {
    events_rx: mpsc::UnboundedReceiver<Level>,
    history: Vec<Level>,
}

impl MockPinHandle {
    fn collect(&mut self) {
        while let Ok(level) = self.events_rx.try_recv() {
            self.history.push(level);
        }
    }

    /// Every level the pin has been driven to, oldest first.
    pub fn history(&mut self) -> &[Level] {
        self.collect();
        &self.history
    }

    /// Current level (`Low` if the pin was never driven).
    pub fn level(&mut self) -> Level {
        self.collect();
        self.history.last().copied().unwrap_or_default()
    }

    /// Number of Low to High transitions observed.
    pub fn activations(&mut self) -> usize {
        self.collect();
        let mut previous = Level::Low;
        let mut count = 0;
        for &level in &self.history {
            if previous == Level::Low && level == Level::High {
                count += 1;
            }
            previous = level;
        }
        count
    }
}
