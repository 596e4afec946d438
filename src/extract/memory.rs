//! In-memory content tree.
//!
//! A flat, document-ordered list of elements. Used where headings are already
//! known without an HTML page: scroll scenarios, benchmarks and tests.

use super::ContentTree;
use crate::model::{AnchorId, HeadingLevel, HeadingLevelSet};
use serde::Deserialize;

/// One element of a [`MemoryTree`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryHeading {
    /// Tag name (`"h2"`, `"p"`, ...).
    pub tag: String,
    /// Existing `id` attribute.
    #[serde(default)]
    pub id: Option<String>,
    /// Text content.
    pub text: String,
}

impl MemoryHeading {
    /// Element without an `id`.
    pub fn new(tag: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            text: text.to_string(),
        }
    }

    /// Set an existing `id` attribute.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

/// Document-ordered elements addressed by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTree {
    elements: Vec<MemoryHeading>,
}

impl MemoryTree {
    /// Tree over `elements` in document order.
    pub fn new(elements: Vec<MemoryHeading>) -> Self {
        Self { elements }
    }

    /// All elements, in document order.
    pub fn elements(&self) -> &[MemoryHeading] {
        &self.elements
    }

    /// Current `id` of every element, in document order.
    pub fn ids(&self) -> Vec<Option<&str>> {
        self.elements.iter().map(|el| el.id.as_deref()).collect()
    }
}

impl FromIterator<MemoryHeading> for MemoryTree {
    fn from_iter<I: IntoIterator<Item = MemoryHeading>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ContentTree for MemoryTree {
    type Node = usize;

    fn headings(&self, levels: &HeadingLevelSet) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| HeadingLevel::from_tag(&el.tag).is_some_and(|l| levels.contains(l)))
            .map(|(index, _)| index)
            .collect()
    }

    fn level(&self, node: &usize) -> Option<HeadingLevel> {
        self.elements
            .get(*node)
            .and_then(|el| HeadingLevel::from_tag(&el.tag))
    }

    fn id(&self, node: &usize) -> Option<String> {
        self.elements.get(*node).and_then(|el| el.id.clone())
    }

    fn text(&self, node: &usize) -> String {
        self.elements
            .get(*node)
            .map(|el| el.text.clone())
            .unwrap_or_default()
    }

    fn set_id(&mut self, node: &usize, id: &AnchorId) {
        if let Some(el) = self.elements.get_mut(*node) {
            el.id = Some(id.as_str().to_string());
        }
    }
}
