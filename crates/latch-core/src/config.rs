//! Controller configuration.
//!
//! The configuration is built once at start-up and handed to the controller
//! by reference. [`ControllerConfig::default`] carries the compiled-in
//! authorization table; a JSON file with the same shape can replace it.
//!
//! ```
//! use latch_core::ControllerConfig;
//!
//! let config = ControllerConfig::from_json_str(r#"{
//!     "authorized_tags": [
//!         { "identifier": "0104F5B522", "holder_name": "Jonathan Oxer" }
//!     ],
//!     "unlock_duration_ms": 3000
//! }"#).unwrap();
//!
//! assert_eq!(config.authorized_tags.len(), 1);
//! assert_eq!(config.unlock_duration().as_secs(), 3);
//! ```

use crate::constants::DEFAULT_UNLOCK_DURATION_MS;
use crate::{AuthorizationEntry, Error, Result, TagIdentifier};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tags accepted when no configuration file is supplied.
const BUILTIN_TAGS: [([u8; 5], &str); 3] = [
    ([0x01, 0x04, 0xF5, 0xB5, 0x22], "Jonathan Oxer"),
    ([0x04, 0x14, 0x6E, 0x8B, 0xDD], "Hugh Blemings"),
    ([0x04, 0x14, 0x6E, 0x8B, 0xB7], "Dexter D Dog"),
];

/// Immutable settings for one controller instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Ordered authorization table. Position `i` is reported as tag ID `i + 1`.
    pub authorized_tags: Vec<AuthorizationEntry>,

    /// How long the lock stays released after a granted read.
    #[serde(default = "default_unlock_duration_ms")]
    pub unlock_duration_ms: u64,
}

fn default_unlock_duration_ms() -> u64 {
    DEFAULT_UNLOCK_DURATION_MS
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            authorized_tags: BUILTIN_TAGS
                .iter()
                .map(|(bytes, name)| AuthorizationEntry::new(TagIdentifier::new(*bytes), *name))
                .collect(),
            unlock_duration_ms: DEFAULT_UNLOCK_DURATION_MS,
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    /// Returns `Error::Json` for malformed documents and `Error::Config` when
    /// [`validate`](Self::validate) fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ControllerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Replace the unlock duration.
    #[must_use]
    pub fn with_unlock_duration(mut self, duration: Duration) -> Self {
        self.unlock_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Replace the authorization table.
    #[must_use]
    pub fn with_authorized_tags(mut self, tags: Vec<AuthorizationEntry>) -> Self {
        self.authorized_tags = tags;
        self
    }

    /// Unlock window as a [`Duration`].
    #[must_use]
    pub fn unlock_duration(&self) -> Duration {
        Duration::from_millis(self.unlock_duration_ms)
    }

    /// Check the settings are usable.
    ///
    /// Duplicate identifiers are allowed here; the table keeps first-match
    /// semantics and reports them when it is built.
    ///
    /// # Errors
    /// Returns `Error::Config` if the unlock duration is zero or a holder
    /// name is blank.
    pub fn validate(&self) -> Result<()> {
        if self.unlock_duration_ms == 0 {
            return Err(Error::Config(
                "unlock_duration_ms must be greater than zero".to_string(),
            ));
        }

        if let Some(entry) = self
            .authorized_tags
            .iter()
            .find(|entry| entry.holder_name.trim().is_empty())
        {
            return Err(Error::Config(format!(
                "tag {} has an empty holder name",
                entry.identifier
            )));
        }

        Ok(())
    }
}
