//! Table-of-contents entries produced by heading extraction.

use super::heading::HeadingLevel;
use super::identifiers::AnchorId;
use serde::Serialize;

/// One navigable heading.
///
/// Generic over `N`, the content tree's handle to the source heading element.
/// Created once during extraction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry<N> {
    id: AnchorId,
    text: String,
    level: HeadingLevel,
    #[serde(skip)]
    node: N,
}

impl<N> TocEntry<N> {
    /// Build an entry. `text` is stored trimmed.
    pub fn new(id: AnchorId, text: &str, level: HeadingLevel, node: N) -> Self {
        Self {
            id,
            text: text.trim().to_string(),
            level,
            node,
        }
    }

    /// Anchor id of the heading.
    pub fn id(&self) -> &AnchorId {
        &self.id
    }

    /// Display label (trimmed heading text).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Heading level of the source element.
    pub fn level(&self) -> HeadingLevel {
        self.level
    }

    /// Handle to the source heading element.
    pub fn node(&self) -> &N {
        &self.node
    }
}
