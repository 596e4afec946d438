//! Deterministic one-dimensional viewport.
//!
//! Stands in for the browser's intersection machinery when replaying
//! scroll scenarios and in tests. Headings are placed in document
//! coordinates; scrolling or resizing recomputes every observed target and
//! queues an event for each one whose threshold state changed.

use super::geometry::Rect;
use super::visibility::{ObserverOptions, ViewportVisibilityTracker, VisibilityEvent};
use crate::model::AnchorId;
use std::collections::HashMap;
use tracing::trace;

/// Last reported state of one target.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Crossing {
    /// Number of thresholds at or below the ratio (0 or 1).
    threshold_index: usize,
    is_intersecting: bool,
}

/// Deterministic visibility tracker over a one-dimensional document.
///
/// Every change of geometry re-evaluates the observed headings and queues
/// an event for each one whose threshold crossing changed.
#[derive(Debug, Clone)]
pub struct ViewportSimulator {
    options: ObserverOptions,
    viewport_height: f64,
    scroll_top: f64,
    placements: HashMap<AnchorId, Rect>,
    /// Observation order; also the delivery order within a batch.
    observed: Vec<AnchorId>,
    reported: HashMap<AnchorId, Crossing>,
    pending: Vec<VisibilityEvent>,
}

impl ViewportSimulator {
    /// Viewport of `viewport_height` scrolled to the top.
    pub fn new(options: ObserverOptions, viewport_height: f64) -> Self {
        Self {
            options,
            viewport_height,
            scroll_top: 0.0,
            placements: HashMap::new(),
            observed: Vec::new(),
            reported: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Set the document position of a heading.
    pub fn place(&mut self, id: AnchorId, rect: Rect) {
        self.placements.insert(id, rect);
        self.evaluate();
    }

    /// Scroll so the viewport top sits at `scroll_top` (clamped at 0).
    pub fn scroll_to(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top.max(0.0);
        self.evaluate();
    }

    /// Change the viewport height.
    pub fn resize(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height.max(0.0);
        self.evaluate();
    }

    /// Current scroll position.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Current viewport height.
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Document position of a placed heading.
    pub fn placement(&self, id: &AnchorId) -> Option<Rect> {
        self.placements.get(id).copied()
    }

    /// Current intersection of `id` with the margin-adjusted root.
    pub fn measure(&self, id: &AnchorId) -> VisibilityEvent {
        let (root_top, root_bottom) = self
            .options
            .root_margin
            .vertical_bounds(self.scroll_top, self.viewport_height);

        let Some(rect) = self.placement(id) else {
            return VisibilityEvent::new(id.clone(), 0.0, false);
        };

        // Edge-adjacent boxes intersect with zero area.
        let is_intersecting = rect.top <= root_bottom && rect.bottom() >= root_top && root_bottom >= root_top;
        let ratio = if !is_intersecting {
            0.0
        } else if rect.height <= 0.0 {
            1.0
        } else {
            let overlap = rect.bottom().min(root_bottom) - rect.top.max(root_top);
            (overlap.max(0.0) / rect.height).min(1.0)
        };

        VisibilityEvent::new(id.clone(), ratio, is_intersecting)
    }

    fn crossing(&self, event: &VisibilityEvent) -> Crossing {
        let threshold_index = usize::from(event.is_intersecting && event.ratio >= self.options.threshold);
        Crossing {
            threshold_index,
            is_intersecting: event.is_intersecting,
        }
    }

    fn evaluate(&mut self) {
        let targets = self.observed.clone();
        for target in &targets {
            self.evaluate_one(target);
        }
    }

    fn evaluate_one(&mut self, target: &AnchorId) {
        let event = self.measure(target);
        let crossing = self.crossing(&event);
        if self.reported.get(target) == Some(&crossing) {
            return;
        }
        trace!(target = %target, ratio = event.ratio, "Visibility crossing");
        self.reported.insert(target.clone(), crossing);
        self.pending.push(event);
    }
}

impl ViewportVisibilityTracker for ViewportSimulator {
    /// The first evaluation of a new target always reports.
    fn observe(&mut self, target: &AnchorId) {
        if self.observed.contains(target) {
            return;
        }
        self.observed.push(target.clone());
        self.evaluate_one(target);
    }

    fn unobserve(&mut self, target: &AnchorId) {
        self.observed.retain(|observed| observed != target);
        self.reported.remove(target);
        self.pending.retain(|event| &event.target != target);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
        self.reported.clear();
        self.pending.clear();
    }

    fn take_batch(&mut self) -> Vec<VisibilityEvent> {
        std::mem::take(&mut self.pending)
    }
}
