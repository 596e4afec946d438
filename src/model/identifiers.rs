//! Anchor identifier newtype with a smart constructor.
//!
//! Identifiers validate non-empty strings at construction time.
//! The raw constructor is never exported - use the smart constructor only.

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// Identifier attribute of a heading, shared with the `href="#..."` of its link.
///
/// Unique within one extraction pass. NEVER export the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(String);

impl AnchorId {
    /// Smart constructor: validates non-empty id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidAnchorId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidAnchorId::Empty);
        }
        Ok(Self(raw))
    }

    /// Raw id, as written to the `id` attribute.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fragment form used in link targets (`#intro`).
    pub fn href(&self) -> String {
        format!("#{}", self.0)
    }

    /// Match a URL fragment (with or without the leading `#`) against this id.
    pub fn matches_fragment(&self, fragment: &str) -> bool {
        fragment.strip_prefix('#').unwrap_or(fragment) == self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for AnchorId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl Borrow<str> for AnchorId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AnchorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ===== Error Types =====

/// Error returned when an anchor id is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidAnchorId {
    /// The id string was empty.
    #[error("Anchor ID cannot be empty")]
    Empty,
}

// ===== Tests =====
