//! Events consumed and effects produced by [`super::TocWidget`].

use crate::model::AnchorId;
use crate::resolver::{ProgressIndicator, VisibilityEvent};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Work the host must run later and report back with [`WidgetEvent::TimerFired`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "task", content = "id", rename_all = "snake_case")]
pub enum DeferredTask {
    /// Measure the initial offset once layout has settled.
    InitialLayout,
    /// Activate the entry named by the page's initial fragment.
    InitialHash(AnchorId),
}

/// How the host records the fragment after a link is followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentMode {
    /// Push a history entry without jumping.
    PushHistory,
    /// Assign the location hash directly.
    AssignHash,
}

/// Input to the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// The page finished loading, possibly with a URL fragment.
    PageLoaded {
        /// Fragment of the page URL, with or without `#`.
        fragment: Option<String>,
    },
    /// A batch from the visibility tracker.
    Visibility(Vec<VisibilityEvent>),
    /// The viewport was resized.
    Resize,
    /// A previously scheduled task is due.
    TimerFired(DeferredTask),
    /// The reader followed a link in the list.
    LinkActivated(AnchorId),
}

/// Output the host applies to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum WidgetEffect {
    /// Move the active marker to the link for `id`, clearing all others.
    MarkActive {
        /// Entry to mark.
        id: AnchorId,
    },
    /// Set the progress variable and place the dot.
    PublishOffset {
        /// Marker geometry to publish.
        indicator: ProgressIndicator,
    },
    /// Run `task` after `after`.
    Schedule {
        /// Task to run.
        task: DeferredTask,
        /// Delay before running it.
        #[serde(serialize_with = "millis")]
        after: Duration,
    },
    /// Smoothly scroll the heading into view.
    SmoothScroll {
        /// Heading to scroll to.
        target: AnchorId,
    },
    /// Record the fragment without an instant jump.
    UpdateFragment {
        /// Entry whose id becomes the fragment.
        id: AnchorId,
        /// How the host records it.
        mode: FragmentMode,
    },
}

fn millis<S: serde::Serializer>(after: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(after.as_millis()).unwrap_or(u64::MAX))
}

impl fmt::Display for WidgetEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarkActive { id } => write!(f, "mark-active {id}"),
            Self::PublishOffset { indicator } => {
                write!(f, "publish-offset {}", indicator.bar_height())
            }
            Self::Schedule { task, after } => {
                let task = match task {
                    DeferredTask::InitialLayout => "initial-layout".to_string(),
                    DeferredTask::InitialHash(id) => format!("initial-hash {id}"),
                };
                write!(f, "schedule {task} in {}ms", after.as_millis())
            }
            Self::SmoothScroll { target } => write!(f, "smooth-scroll {target}"),
            Self::UpdateFragment { id, mode } => match mode {
                FragmentMode::PushHistory => write!(f, "push-history #{id}"),
                FragmentMode::AssignHash => write!(f, "assign-hash #{id}"),
            },
        }
    }
}
