//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod heading;
pub mod identifiers;
pub mod settings;
pub mod toc_entry;

// Re-export for convenience
pub use heading::{HeadingLevel, HeadingLevelSet, InvalidHeadingLevel};
pub use identifiers::{AnchorId, InvalidAnchorId};
pub use settings::{SettingsError, WidgetSettings};
pub use toc_entry::TocEntry;
