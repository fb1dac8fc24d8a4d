//! Authorization table: which tags open the door, and for whom.
//!
//! The table is small (tens of entries), so lookup is a linear scan in
//! table order and the first equal identifier wins. Duplicates are not
//! rejected; they are reported once when the table is built.

use latch_core::{AccessDecision, AuthorizationEntry, ControllerConfig, TagIdentifier};
use tracing::warn;

/// A successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMatch<'a> {
    /// 1-based position of the entry in the table.
    pub tag_number: usize,
    pub entry: &'a AuthorizationEntry,
}

/// Immutable, ordered set of authorized tags.
///
/// # Examples
///
/// ```
/// use latch_controller::AuthorizationTable;
/// use latch_core::{ControllerConfig, TagIdentifier};
///
/// let table = AuthorizationTable::from_config(&ControllerConfig::default());
/// let tag = TagIdentifier::new([0x01, 0x04, 0xF5, 0xB5, 0x22]);
///
/// let found = table.lookup(&tag).unwrap();
/// assert_eq!(found.tag_number, 1);
/// assert_eq!(found.entry.holder_name, "Jonathan Oxer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationTable {
    entries: Vec<AuthorizationEntry>,
}

impl AuthorizationTable {
    pub fn new(entries: Vec<AuthorizationEntry>) -> Self {
        for (index, entry) in entries.iter().enumerate() {
            if let Some(earlier) = entries[..index]
                .iter()
                .position(|other| other.identifier == entry.identifier)
            {
                warn!(
                    "Tag {} listed at positions {} and {}; position {} wins",
                    entry.identifier,
                    earlier + 1,
                    index + 1,
                    earlier + 1
                );
            }
        }
        Self { entries }
    }

    /// Build the table from the configured tag list.
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.authorized_tags.clone())
    }

    /// Find the first entry whose identifier equals `identifier`.
    pub fn lookup(&self, identifier: &TagIdentifier) -> Option<TableMatch<'_>> {
        self.entries
            .iter()
            .position(|entry| entry.identifier == *identifier)
            .map(|index| TableMatch {
                tag_number: index + 1,
                entry: &self.entries[index],
            })
    }

    /// Grant or deny `identifier`.
    pub fn decide(&self, identifier: &TagIdentifier) -> AccessDecision {
        match self.lookup(identifier) {
            Some(found) => AccessDecision::Granted {
                tag_number: found.tag_number,
                holder_name: found.entry.holder_name.clone(),
            },
            None => AccessDecision::Denied,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthorizationEntry> {
        self.entries.iter()
    }
}
