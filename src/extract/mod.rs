//! Heading extraction and identifier assignment (pure core).
//!
//! Scans a content tree for enabled heading levels, gives every heading a
//! stable unique identifier and returns the ordered table-of-contents entries.
//! The tree itself is abstracted by [`ContentTree`] so the algorithm can run
//! over a parsed HTML page ([`crate::document::PageDocument`]) or over the
//! in-memory [`MemoryTree`].

pub mod memory;
pub mod registry;
pub mod slug;

pub use memory::{MemoryHeading, MemoryTree};
pub use registry::UsedIdRegistry;
pub use slug::{candidate_id, slugify};

use crate::model::{AnchorId, HeadingLevel, HeadingLevelSet, TocEntry};
use tracing::debug;

/// Read/write access to the headings of a content region.
pub trait ContentTree {
    /// Handle to a heading element. Stored in [`TocEntry::node`].
    type Node: Clone;

    /// Headings whose tag is in `levels`, in document order.
    fn headings(&self, levels: &HeadingLevelSet) -> Vec<Self::Node>;

    /// Level of a heading, or `None` if the tag is not `h1`..`h5`.
    fn level(&self, node: &Self::Node) -> Option<HeadingLevel>;

    /// Current `id` attribute, if any.
    fn id(&self, node: &Self::Node) -> Option<String>;

    /// Text content of the heading, untrimmed.
    fn text(&self, node: &Self::Node) -> String;

    /// Write the `id` attribute.
    fn set_id(&mut self, node: &Self::Node, id: &AnchorId);
}

/// Outcome of an extraction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<N> {
    /// Nothing to list: empty level set or no matching headings. The widget hides.
    NoEntries,
    /// At least one entry, in document order.
    Entries(Vec<TocEntry<N>>),
}

impl<N> Extraction<N> {
    /// Entries in document order; empty for `NoEntries`.
    pub fn entries(&self) -> &[TocEntry<N>] {
        match self {
            Self::NoEntries => &[],
            Self::Entries(entries) => entries,
        }
    }

    /// Take the entries; empty for `NoEntries`.
    pub fn into_entries(self) -> Vec<TocEntry<N>> {
        match self {
            Self::NoEntries => Vec::new(),
            Self::Entries(entries) => entries,
        }
    }

    /// True when there is nothing to list.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoEntries)
    }
}

/// Extract table-of-contents entries and assign heading identifiers.
///
/// Headings that already carry a non-empty `id` keep it. Others get
/// [`candidate_id`] made unique with a `-<n>` suffix, and the result is
/// written back through [`ContentTree::set_id`]. Running this again over the
/// same tree reuses every id and writes nothing.
pub fn extract_headings<T: ContentTree>(tree: &mut T, levels: &HeadingLevelSet) -> Extraction<T::Node> {
    if levels.is_empty() {
        debug!("No heading levels enabled; nothing to extract");
        return Extraction::NoEntries;
    }

    let nodes = tree.headings(levels);
    if nodes.is_empty() {
        debug!(levels = ?levels, "No matching headings in content");
        return Extraction::NoEntries;
    }

    let mut registry = UsedIdRegistry::new();
    let mut entries = Vec::with_capacity(nodes.len());

    for (index, node) in nodes.into_iter().enumerate() {
        let Some(level) = tree.level(&node).filter(|level| levels.contains(*level)) else {
            debug!(index, "Skipping element outside the enabled heading levels");
            continue;
        };
        let text = tree.text(&node);

        let existing = tree.id(&node).and_then(|raw| AnchorId::new(raw).ok());
        let id = match existing {
            Some(id) => {
                if !registry.register(&id) {
                    debug!(id = %id, "Duplicate author-set heading id kept as-is");
                }
                id
            }
            None => {
                let candidate = candidate_id(&text, index);
                // Candidates are never empty: the fallback is `heading-<index>`.
                let Ok(id) = registry.claim(&candidate) else {
                    continue;
                };
                tree.set_id(&node, &id);
                id
            }
        };

        entries.push(TocEntry::new(id, &text, level, node));
    }

    if entries.is_empty() {
        return Extraction::NoEntries;
    }

    debug!(count = entries.len(), "Extracted table of contents entries");
    Extraction::Entries(entries)
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
