//! Active section resolution (pure core).
//!
//! Pure functions that transform [`ActiveState`] in response to visibility
//! batches, resizes and explicit activation. Geometry is read through a
//! [`LayoutProbe`]; nothing here touches a real page.

pub mod geometry;
pub mod simulator;
pub mod visibility;

pub use geometry::{LayoutProbe, Rect, StaticLayout};
pub use simulator::ViewportSimulator;
pub use visibility::{
    InvalidRootMargin, MarginLength, ObserverOptions, RootMargin, ViewportVisibilityTracker,
    VisibilityEvent,
};

use crate::model::AnchorId;
use serde::Serialize;

/// Default distance the progress dot sits above the computed center, in pixels.
pub const DEFAULT_DOT_ADJUST: f64 = 4.0;

/// CSS custom property carrying the progress offset on the list element.
pub const PROGRESS_PROPERTY: &str = "--progress-bar-height";

/// Which entry is current and where the progress marker points.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ActiveState {
    active: Option<AnchorId>,
    /// Vertical center of the active link relative to the list top.
    progress_offset: f64,
}

impl ActiveState {
    /// State naming `active`, with the offset not yet measured.
    pub fn new(active: Option<AnchorId>) -> Self {
        Self {
            active,
            progress_offset: 0.0,
        }
    }

    /// The primary reading target.
    pub fn active(&self) -> Option<&AnchorId> {
        self.active.as_ref()
    }

    /// Pixel offset of the progress marker.
    pub fn progress_offset(&self) -> f64 {
        self.progress_offset
    }
}

/// Visual progress marker derived from an offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressIndicator {
    /// Center of the active link below the list top.
    pub offset: f64,
    /// Pixels the dot is lifted above `offset`.
    pub dot_adjust: f64,
}

impl ProgressIndicator {
    /// Value for [`PROGRESS_PROPERTY`], e.g. `"37.5px"`.
    pub fn bar_height(&self) -> String {
        format!("{}px", self.offset)
    }

    /// Transform placing the dot, e.g. `"translateY(33.5px)"`.
    pub fn dot_transform(&self) -> String {
        format!("translateY({}px)", self.offset - self.dot_adjust)
    }
}

/// Offset of `id`'s link center from the list top, if both rects are known.
pub fn progress_offset(layout: &impl LayoutProbe, id: &AnchorId) -> Option<f64> {
    let list = layout.list_rect()?;
    let link = layout.anchor_rect(id)?;
    Some((link.top - list.top) + link.height / 2.0)
}

/// Pick the intersecting event with the highest ratio.
///
/// Only ratios strictly above zero qualify. Ties keep the earliest event.
pub fn most_visible(batch: &[VisibilityEvent]) -> Option<&VisibilityEvent> {
    let mut best: Option<&VisibilityEvent> = None;
    let mut best_ratio = 0.0;
    for event in batch.iter().filter(|event| event.is_intersecting) {
        if event.ratio > best_ratio {
            best_ratio = event.ratio;
            best = Some(event);
        }
    }
    best
}

/// Apply one batch of visibility events to `state`.
///
/// The most visible heading among `anchors` becomes active and the offset is
/// re-measured. A batch with nothing intersecting leaves the state as is.
pub fn apply_visibility_batch(
    state: ActiveState,
    batch: &[VisibilityEvent],
    anchors: &[AnchorId],
    layout: &impl LayoutProbe,
) -> ActiveState {
    let known: Vec<VisibilityEvent> = batch
        .iter()
        .filter(|event| anchors.contains(&event.target))
        .cloned()
        .collect();
    match most_visible(&known) {
        Some(event) => remeasure(
            ActiveState {
                active: Some(event.target.clone()),
                ..state
            },
            layout,
        ),
        None => state,
    }
}

/// Layout changed: re-measure the offset for the same active entry.
pub fn apply_resize(state: ActiveState, layout: &impl LayoutProbe) -> ActiveState {
    remeasure(state, layout)
}

/// Recompute the offset from current geometry; keeps the old value when the
/// rects are not measurable.
fn remeasure(mut state: ActiveState, layout: &impl LayoutProbe) -> ActiveState {
    if let Some(offset) = state.active.as_ref().and_then(|id| progress_offset(layout, id)) {
        state.progress_offset = offset;
    }
    state
}

/// Resolves state transitions for one list of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolver {
    anchors: Vec<AnchorId>,
    dot_adjust: f64,
}

impl Resolver {
    /// Resolver over `anchors` in list order.
    pub fn new(anchors: Vec<AnchorId>, dot_adjust: f64) -> Self {
        Self { anchors, dot_adjust }
    }

    /// Anchors in list order.
    pub fn anchors(&self) -> &[AnchorId] {
        &self.anchors
    }

    /// Whether `id` is one of the listed anchors.
    pub fn knows(&self, id: &AnchorId) -> bool {
        self.anchors.contains(id)
    }

    /// Anchor whose id equals `fragment` (with or without the leading `#`).
    pub fn anchor_for_fragment(&self, fragment: &str) -> Option<&AnchorId> {
        self.anchors.iter().find(|id| id.matches_fragment(fragment))
    }

    /// First entry active, offset not yet measured.
    pub fn initial_state(&self) -> ActiveState {
        ActiveState::new(self.anchors.first().cloned())
    }

    /// See [`apply_visibility_batch`].
    pub fn on_visibility_batch(
        &self,
        state: ActiveState,
        batch: &[VisibilityEvent],
        layout: &impl LayoutProbe,
    ) -> ActiveState {
        apply_visibility_batch(state, batch, &self.anchors, layout)
    }

    /// Make `id` active and re-measure. Unknown ids are ignored.
    pub fn activate(&self, mut state: ActiveState, id: &AnchorId, layout: &impl LayoutProbe) -> ActiveState {
        if !self.knows(id) {
            return state;
        }
        state.active = Some(id.clone());
        remeasure(state, layout)
    }

    /// See [`apply_resize`].
    pub fn on_resize(&self, state: ActiveState, layout: &impl LayoutProbe) -> ActiveState {
        apply_resize(state, layout)
    }

    /// Marker geometry for `state`.
    pub fn indicator(&self, state: &ActiveState) -> ProgressIndicator {
        ProgressIndicator {
            offset: state.progress_offset,
            dot_adjust: self.dot_adjust,
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
