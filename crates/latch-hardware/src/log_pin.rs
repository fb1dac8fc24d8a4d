//! Output pin that only reports level changes through `tracing`.
//!
//! Used when the controller runs on a host without GPIO, so the actuation
//! sequence is still visible in the logs.

use tracing::info;

use crate::{Result, traits::OutputPin, types::Level};

#[derive(Debug, Clone)]
pub struct LogPin {
    name: String,
    level: Level,
}

impl LogPin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Level::Low,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl OutputPin for LogPin {
    async fn set_level(&mut self, level: Level) -> Result<()> {
        if level != self.level {
            info!(pin = %self.name, %level, "Output changed");
        }
        self.level = level;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
