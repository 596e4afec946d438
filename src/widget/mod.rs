//! Per-instance widget controller.
//!
//! [`TocWidget`] owns the entries and the [`ActiveState`] of one table of
//! contents. Hosts feed it [`WidgetEvent`]s and apply the returned
//! [`WidgetEffect`]s; timers and scrolling stay on the host side.

pub mod effects;

pub use effects::{DeferredTask, FragmentMode, WidgetEffect, WidgetEvent};

use crate::model::{AnchorId, TocEntry};
use crate::resolver::{
    ActiveState, LayoutProbe, ObserverOptions, ProgressIndicator, Resolver, ViewportVisibilityTracker,
    DEFAULT_DOT_ADJUST,
};
use std::time::Duration;
use tracing::{debug, info};

/// Tunables for one widget instance.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetOptions {
    /// Delay before the first offset measurement.
    pub layout_settle: Duration,
    /// Delay before honoring the initial fragment.
    pub hash_settle: Duration,
    /// Pixels the dot sits above the link center.
    pub dot_adjust: f64,
    /// Whether the host can push history entries.
    pub history_push: bool,
    /// Visibility tracker configuration.
    pub observer: ObserverOptions,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            layout_settle: Duration::from_millis(100),
            hash_settle: Duration::from_millis(200),
            dot_adjust: DEFAULT_DOT_ADJUST,
            history_push: true,
            observer: ObserverOptions::default(),
        }
    }
}

/// Lifecycle of a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetPhase {
    /// Following visibility and resize events.
    Active,
    /// Observers disconnected; events are ignored.
    Detached,
}

/// One table of contents instance.
#[derive(Debug, Clone)]
pub struct TocWidget {
    resolver: Resolver,
    state: ActiveState,
    options: WidgetOptions,
    phase: WidgetPhase,
}

impl TocWidget {
    /// Build a widget over `entries`.
    ///
    /// Returns `None` for an empty list (the widget is hidden instead).
    /// Otherwise the first entry is active and the initial effects mark it
    /// and schedule the first layout measurement.
    pub fn new<N>(entries: &[TocEntry<N>], options: WidgetOptions) -> Option<(Self, Vec<WidgetEffect>)> {
        let anchors: Vec<AnchorId> = entries.iter().map(|entry| entry.id().clone()).collect();
        let first = anchors.first()?.clone();

        let resolver = Resolver::new(anchors, options.dot_adjust);
        let widget = Self {
            state: resolver.initial_state(),
            resolver,
            phase: WidgetPhase::Active,
            options,
        };
        let effects = vec![
            WidgetEffect::MarkActive { id: first },
            WidgetEffect::Schedule {
                task: DeferredTask::InitialLayout,
                after: widget.options.layout_settle,
            },
        ];
        info!(entries = widget.resolver.anchors().len(), "Table of contents widget ready");
        Some((widget, effects))
    }

    /// Current active entry and offset.
    pub fn state(&self) -> &ActiveState {
        &self.state
    }

    /// Currently active entry.
    pub fn active(&self) -> Option<&AnchorId> {
        self.state.active()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> WidgetPhase {
        self.phase
    }

    /// Options the widget was built with.
    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    /// Listed anchors, in list order.
    pub fn anchors(&self) -> &[AnchorId] {
        self.resolver.anchors()
    }

    /// Progress marker for the current state.
    pub fn indicator(&self) -> ProgressIndicator {
        self.resolver.indicator(&self.state)
    }

    /// Start observing every entry's heading.
    pub fn attach(&self, tracker: &mut impl ViewportVisibilityTracker) {
        if self.phase == WidgetPhase::Detached {
            return;
        }
        for anchor in self.resolver.anchors() {
            tracker.observe(anchor);
        }
    }

    /// Disconnect the tracker; later events are ignored.
    pub fn detach(&mut self, tracker: &mut impl ViewportVisibilityTracker) {
        tracker.disconnect();
        self.phase = WidgetPhase::Detached;
        debug!("Table of contents widget detached");
    }

    /// Apply `event` and return the effects the host must carry out.
    ///
    /// Events reaching a detached widget yield nothing.
    pub fn handle(&mut self, event: WidgetEvent, layout: &impl LayoutProbe) -> Vec<WidgetEffect> {
        if self.phase == WidgetPhase::Detached {
            debug!(?event, "Ignoring event for detached widget");
            return Vec::new();
        }

        match event {
            WidgetEvent::PageLoaded { fragment } => self.on_page_loaded(fragment.as_deref()),
            WidgetEvent::Visibility(batch) => {
                let next = self.resolver.on_visibility_batch(self.state.clone(), &batch, layout);
                self.transition(next)
            }
            WidgetEvent::Resize => {
                let next = self.resolver.on_resize(self.state.clone(), layout);
                self.transition(next)
            }
            WidgetEvent::TimerFired(DeferredTask::InitialLayout) => {
                self.state = self.resolver.on_resize(self.state.clone(), layout);
                vec![self.publish()]
            }
            WidgetEvent::TimerFired(DeferredTask::InitialHash(id)) => {
                let next = self.resolver.activate(self.state.clone(), &id, layout);
                let mut effects = self.transition(next);
                if effects.is_empty() && self.resolver.knows(&id) {
                    effects.push(self.publish());
                }
                effects
            }
            WidgetEvent::LinkActivated(id) => self.on_link_activated(id),
        }
    }

    fn on_page_loaded(&self, fragment: Option<&str>) -> Vec<WidgetEffect> {
        let Some(fragment) = fragment.filter(|f| !f.trim_start_matches('#').is_empty()) else {
            return Vec::new();
        };
        match self.resolver.anchor_for_fragment(fragment) {
            Some(id) => vec![WidgetEffect::Schedule {
                task: DeferredTask::InitialHash(id.clone()),
                after: self.options.hash_settle,
            }],
            None => {
                debug!(fragment, "Initial fragment does not name an entry");
                Vec::new()
            }
        }
    }

    fn on_link_activated(&self, id: AnchorId) -> Vec<WidgetEffect> {
        if !self.resolver.knows(&id) {
            debug!(id = %id, "Ignoring activation of unknown entry");
            return Vec::new();
        }
        let mode = if self.options.history_push {
            FragmentMode::PushHistory
        } else {
            FragmentMode::AssignHash
        };
        vec![
            WidgetEffect::SmoothScroll { target: id.clone() },
            WidgetEffect::UpdateFragment { id, mode },
        ]
    }

    /// Commit `next` and describe what changed.
    fn transition(&mut self, next: ActiveState) -> Vec<WidgetEffect> {
        let mut effects = Vec::new();
        if next.active() != self.state.active() {
            if let Some(id) = next.active() {
                debug!(id = %id, "Active section changed");
                effects.push(WidgetEffect::MarkActive { id: id.clone() });
            }
        }
        let moved = next.progress_offset() != self.state.progress_offset();
        self.state = next;
        if moved || !effects.is_empty() {
            effects.push(self.publish());
        }
        effects
    }

    fn publish(&self) -> WidgetEffect {
        WidgetEffect::PublishOffset {
            indicator: self.indicator(),
        }
    }
}

#[cfg(test)]
#[path = "widget_tests.rs"]
mod tests;
