//! Identifiers already taken during one extraction pass.

use crate::model::AnchorId;
use std::collections::HashSet;

/// Set of identifiers claimed so far, scoped to a single extraction pass.
///
/// Both pre-existing ids and generated ids are registered; generated ids are
/// suffixed until they no longer collide with anything registered.
#[derive(Debug, Default)]
pub struct UsedIdRegistry {
    used: HashSet<String>,
}

impl UsedIdRegistry {
    /// Empty registry for a new pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id that is already present on the page.
    ///
    /// Returns `false` if it was registered before. Author-set ids are trusted,
    /// so a duplicate is reported but never rewritten.
    pub fn register(&mut self, id: &AnchorId) -> bool {
        self.used.insert(id.as_str().to_string())
    }

    /// Claim `candidate`, appending `-1`, `-2`, ... until it is unused.
    ///
    /// `candidate` must be non-empty.
    pub fn claim(&mut self, candidate: &str) -> Result<AnchorId, crate::model::InvalidAnchorId> {
        let mut id = candidate.to_string();
        let mut counter = 1usize;
        while self.used.contains(&id) {
            id = format!("{candidate}-{counter}");
            counter += 1;
        }
        let id = AnchorId::new(id)?;
        self.used.insert(id.as_str().to_string());
        Ok(id)
    }

    /// Whether `id` is taken.
    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    /// Number of ids taken.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// True before anything is registered.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
