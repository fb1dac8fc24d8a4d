use crate::{Result, constants::TAG_ID_LENGTH, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Five-byte identifier transmitted by a proximity card.
///
/// Displays and parses as ten hex characters (`0104F5B522`). Serializes as
/// that text so configuration files stay readable.
///
/// # Security
/// Equality is evaluated in constant time so that lookups do not leak how
/// many leading bytes of a forged identifier were correct.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagIdentifier([u8; TAG_ID_LENGTH]);

impl TagIdentifier {
    /// Wrap raw identifier bytes.
    #[must_use]
    pub const fn new(bytes: [u8; TAG_ID_LENGTH]) -> Self {
        TagIdentifier(bytes)
    }

    /// Raw identifier bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; TAG_ID_LENGTH] {
        &self.0
    }

    /// XOR of the identifier bytes, as transmitted in the frame trailer.
    #[must_use]
    pub fn checksum(&self) -> u8 {
        self.0.iter().fold(0, |acc, byte| acc ^ byte)
    }
}

impl PartialEq for TagIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl std::hash::Hash for TagIdentifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Display for TagIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for TagIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits: Vec<u8> = s
            .trim()
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| Error::InvalidTagIdentifier(format!("non-hex character in {s:?}")))?;

        if digits.len() != TAG_ID_LENGTH * 2 {
            return Err(Error::InvalidTagIdentifier(format!(
                "expected {} hex characters, got {}",
                TAG_ID_LENGTH * 2,
                digits.len()
            )));
        }

        let mut bytes = [0u8; TAG_ID_LENGTH];
        for (slot, pair) in bytes.iter_mut().zip(digits.chunks_exact(2)) {
            *slot = (pair[0] << 4) | pair[1];
        }
        Ok(TagIdentifier(bytes))
    }
}

impl TryFrom<String> for TagIdentifier {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TagIdentifier> for String {
    fn from(value: TagIdentifier) -> Self {
        value.to_string()
    }
}

impl From<[u8; TAG_ID_LENGTH]> for TagIdentifier {
    fn from(bytes: [u8; TAG_ID_LENGTH]) -> Self {
        TagIdentifier(bytes)
    }
}

/// One frame taken off the wire, before any authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Identifier carried by the first ten hex characters.
    pub identifier: TagIdentifier,

    /// Checksum byte carried by the last two hex characters.
    pub received_checksum: u8,

    /// XOR of the identifier bytes as assembled by the decoder.
    pub computed_checksum: u8,

    /// Payload characters outside `0-9`/`A-F` that were folded into a nibble
    /// without conversion.
    pub non_hex_digits: usize,
}

impl DecodedFrame {
    /// Returns `true` when the transmitted checksum matches the computed one.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.received_checksum == self.computed_checksum
    }
}

/// A card holder allowed through the door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationEntry {
    pub identifier: TagIdentifier,
    pub holder_name: String,
}

impl AuthorizationEntry {
    pub fn new(identifier: TagIdentifier, holder_name: impl Into<String>) -> Self {
        Self {
            identifier,
            holder_name: holder_name.into(),
        }
    }
}

/// Result of matching a checksum-valid tag against the authorization table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// Tag found; `tag_number` is the 1-based position of the entry.
    Granted {
        tag_number: usize,
        holder_name: String,
    },
    Denied,
}

impl AccessDecision {
    /// Returns `true` if access was granted.
    #[inline]
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }

    /// Holder name for granted decisions.
    #[must_use]
    pub fn holder_name(&self) -> Option<&str> {
        match self {
            AccessDecision::Granted { holder_name, .. } => Some(holder_name),
            AccessDecision::Denied => None,
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccessDecision::Granted { holder_name, .. } => write!(f, "Granted({holder_name})"),
            AccessDecision::Denied => write!(f, "Denied"),
        }
    }
}
