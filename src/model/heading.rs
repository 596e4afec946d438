//! Heading levels and the externally supplied set of enabled levels.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A heading tag the widget can list.
///
/// `h6` is deliberately absent: the settings payload only ever carries `h1`..`h5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    /// `<h1>`
    H1,
    /// `<h2>`
    H2,
    /// `<h3>`
    H3,
    /// `<h4>`
    H4,
    /// `<h5>`
    H5,
}

impl HeadingLevel {
    /// All supported levels, outermost first.
    pub const ALL: [HeadingLevel; 5] = [Self::H1, Self::H2, Self::H3, Self::H4, Self::H5];

    /// Lower-case tag name (`"h2"`).
    pub fn tag(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
        }
    }

    /// Numeric depth, 1 for `h1`.
    pub fn depth(self) -> usize {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
            Self::H5 => 5,
        }
    }

    /// Parse a tag name, ignoring ASCII case. Returns `None` for anything else.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.tag().eq_ignore_ascii_case(tag))
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when a string is not a supported heading tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported heading level: {0:?} (expected h1..h5)")]
pub struct InvalidHeadingLevel(pub String);

impl FromStr for HeadingLevel {
    type Err = InvalidHeadingLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.trim()).ok_or_else(|| InvalidHeadingLevel(s.to_string()))
    }
}

/// Set of heading levels included in the table of contents.
///
/// Immutable for the lifetime of a page view. Iterates in level order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingLevelSet(BTreeSet<HeadingLevel>);

impl HeadingLevelSet {
    /// Empty set; extraction against it always yields no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `level` is enabled.
    pub fn contains(&self, level: HeadingLevel) -> bool {
        self.0.contains(&level)
    }

    /// True when no level is enabled.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of enabled levels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Enabled levels, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = HeadingLevel> + '_ {
        self.0.iter().copied()
    }

    /// CSS selector list matching every enabled tag (`"h2, h3"`).
    ///
    /// Returns `None` for an empty set: there is nothing to select.
    pub fn selector(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(self.iter().map(HeadingLevel::tag).collect::<Vec<_>>().join(", "))
    }
}

impl FromIterator<HeadingLevel> for HeadingLevelSet {
    fn from_iter<I: IntoIterator<Item = HeadingLevel>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for HeadingLevelSet {
    type Err = InvalidHeadingLevel;

    /// Parse a comma-separated tag list such as `"h2,h3"`. Blank items are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(HeadingLevel::from_str)
            .collect()
    }
}
