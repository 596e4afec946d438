//! Progress-aware table of contents (patoc)
//!
//! Builds a table of contents from the headings of a rendered page, gives
//! every heading a stable anchor id and tracks which section the reader is in
//! as the page scrolls.
//!
//! Follows a Pure Core / Impure Shell split: [`extract`], [`resolver`] and
//! [`widget`] are pure; [`document`], [`config`] and [`logging`] touch HTML,
//! files and the environment.

pub mod config;
pub mod document;
pub mod extract;
pub mod logging;
pub mod model;
pub mod resolver;
pub mod widget;

// Re-export binary integration
pub mod integration;
