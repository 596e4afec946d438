//! Viewport visibility tracking interface.
//!
//! The browser's intersection mechanism is an external capability. The
//! resolver only consumes batches of [`VisibilityEvent`]s; anything that can
//! produce them implements [`ViewportVisibilityTracker`].

use crate::model::AnchorId;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Visibility change of one observed heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityEvent {
    /// Heading the event is about.
    pub target: AnchorId,
    /// Fraction of the heading inside the (margin-adjusted) root, `0.0..=1.0`.
    pub ratio: f64,
    /// Whether the heading touches the root at all.
    pub is_intersecting: bool,
}

impl VisibilityEvent {
    /// Event for `target`.
    pub fn new(target: AnchorId, ratio: f64, is_intersecting: bool) -> Self {
        Self {
            target,
            ratio,
            is_intersecting,
        }
    }
}

/// Source of visibility batches for observed headings.
pub trait ViewportVisibilityTracker {
    /// Start reporting changes for `target`.
    fn observe(&mut self, target: &AnchorId);

    /// Stop reporting changes for `target`.
    fn unobserve(&mut self, target: &AnchorId);

    /// Stop reporting anything and drop queued events.
    fn disconnect(&mut self);

    /// Drain the events queued since the last call, in delivery order.
    fn take_batch(&mut self) -> Vec<VisibilityEvent>;
}

/// One side of a root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginLength {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of the root's size along the same axis.
    Percent(f64),
}

impl MarginLength {
    /// Resolve against the root's extent along the margin's axis.
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Error parsing a root margin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRootMargin {
    /// Fewer than 1 or more than 4 values.
    #[error("Root margin must have 1 to 4 values, got {0}")]
    WrongArity(usize),

    /// A value is not a `px` or `%` length.
    #[error("Invalid root margin length {0:?} (expected e.g. \"0px\" or \"-60%\")")]
    InvalidLength(String),
}

impl FromStr for MarginLength {
    type Err = InvalidRootMargin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidRootMargin::InvalidLength(s.to_string());
        if let Some(number) = s.strip_suffix('%') {
            return number.parse().map(Self::Percent).map_err(|_| invalid());
        }
        if let Some(number) = s.strip_suffix("px") {
            return number.parse().map(Self::Px).map_err(|_| invalid());
        }
        // Unitless zero is the only bare number CSS accepts.
        match s.parse::<f64>() {
            Ok(zero) if zero == 0.0 => Ok(Self::Px(0.0)),
            _ => Err(invalid()),
        }
    }
}

/// Margins applied to the viewport before computing intersections.
///
/// Negative values shrink the root: `0px 0px -60% 0px` keeps the top 40%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    /// Top margin.
    pub top: MarginLength,
    /// Right margin; ignored by the vertical model.
    pub right: MarginLength,
    /// Bottom margin.
    pub bottom: MarginLength,
    /// Left margin; ignored by the vertical model.
    pub left: MarginLength,
}

impl RootMargin {
    /// Resolve the root's vertical bounds for a viewport of `height` at `scroll_top`.
    ///
    /// Returns `(top, bottom)` in document coordinates.
    pub fn vertical_bounds(&self, scroll_top: f64, height: f64) -> (f64, f64) {
        let top = scroll_top - self.top.resolve(height);
        let bottom = scroll_top + height + self.bottom.resolve(height);
        (top, bottom)
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top: MarginLength::Px(0.0),
            right: MarginLength::Px(0.0),
            bottom: MarginLength::Percent(-60.0),
            left: MarginLength::Px(0.0),
        }
    }
}

impl FromStr for RootMargin {
    type Err = InvalidRootMargin;

    /// CSS margin shorthand with 1 to 4 lengths.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lengths = s
            .split_whitespace()
            .map(MarginLength::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        let (top, right, bottom, left) = match lengths.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            other => return Err(InvalidRootMargin::WrongArity(other.len())),
        };

        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Configuration of the visibility tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Margin applied to the viewport.
    pub root_margin: RootMargin,
    /// Minimum visible fraction that counts as a threshold crossing.
    pub threshold: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            threshold: 0.1,
        }
    }
}
