//! Pure core integration functions.
//!
//! Glue used by the binary that is testable without I/O: outline formatting
//! and replay of scroll scenarios through [`ViewportSimulator`] and
//! [`TocWidget`].

use crate::extract::{extract_headings, Extraction, MemoryHeading, MemoryTree};
use crate::model::{AnchorId, HeadingLevelSet, InvalidHeadingLevel, TocEntry, WidgetSettings};
use crate::resolver::{Rect, StaticLayout, ViewportSimulator, ViewportVisibilityTracker};
use crate::widget::{DeferredTask, TocWidget, WidgetEffect, WidgetEvent, WidgetOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

// ===== Outline =====

/// Indented text outline, one entry per line: `- Text (#id)`.
///
/// Indentation is relative to the shallowest level present.
pub fn format_outline_text<N>(entries: &[TocEntry<N>]) -> String {
    let base = entries
        .iter()
        .map(|entry| entry.level().depth())
        .min()
        .unwrap_or(1);

    entries
        .iter()
        .map(|entry| {
            let indent = "  ".repeat(entry.level().depth() - base);
            format!("{indent}- {} ({})", entry.text(), entry.id().href())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON array of `{id, text, level}` objects.
pub fn format_outline_json<N>(entries: &[TocEntry<N>]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}

// ===== Scroll scenarios =====

/// Error loading or replaying a scroll scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Scenario JSON does not match the expected shape.
    #[error("Invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),

    /// `levels` names an unsupported tag.
    #[error("Invalid heading levels: {0}")]
    Levels(#[from] InvalidHeadingLevel),

    /// Nothing to list at the selected levels.
    #[error("Scenario has no headings at the selected levels")]
    NoEntries,

    /// A step cannot be carried out.
    #[error("Step {step}: {reason}")]
    InvalidStep {
        /// 1-based position of the step.
        step: usize,
        /// What is wrong with it.
        reason: String,
    },
}

/// A heading placed in the document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioHeading {
    /// Tag, text and optional existing id.
    #[serde(flatten)]
    pub heading: MemoryHeading,
    /// Document offset of the heading's top edge.
    pub top: f64,
    /// Box height; 32px when omitted.
    #[serde(default = "default_heading_height")]
    pub height: f64,
}

fn default_heading_height() -> f64 {
    32.0
}

fn default_row_height() -> f64 {
    24.0
}

/// One action of a scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Scroll so the viewport top is at this document offset.
    Scroll(f64),
    /// Change the viewport height.
    Resize(f64),
    /// Let this many milliseconds pass, firing due timers.
    Wait(u64),
    /// Follow the list link for this id.
    Click(String),
    /// Tear the widget down.
    Detach,
}

/// Scripted page session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Height of the browser viewport.
    pub viewport_height: f64,
    /// Page elements in document order.
    pub headings: Vec<ScenarioHeading>,
    /// Comma-separated tags; defaults to h2 and h3.
    #[serde(default)]
    pub levels: Option<String>,
    /// Fragment present when the page loads, e.g. `"#setup"`.
    #[serde(default)]
    pub fragment: Option<String>,
    /// Top of the rendered list, in the same space as the link rows.
    #[serde(default)]
    pub list_top: f64,
    /// Height of one list row.
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Actions replayed after the page loads.
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Parse a scenario from JSON.
    pub fn parse(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    fn levels(&self) -> Result<HeadingLevelSet, ScenarioError> {
        match &self.levels {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(WidgetSettings::default().levels),
        }
    }
}

/// Widget state after one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// `"load"` for the initial step, else the step's position (1-based) and kind.
    pub step: String,
    /// Elapsed virtual time in milliseconds.
    pub at_ms: u64,
    /// Active entry after the step.
    pub active: Option<AnchorId>,
    /// Progress offset after the step.
    pub offset: f64,
    /// Effects the widget produced during the step, in order.
    pub effects: Vec<WidgetEffect>,
}

/// Replay `scenario` and report the widget after the load and after each step.
pub fn run_scenario(scenario: &Scenario, options: WidgetOptions) -> Result<Vec<StepReport>, ScenarioError> {
    let levels = scenario.levels()?;
    let mut tree: MemoryTree = scenario.headings.iter().map(|h| h.heading.clone()).collect();
    let entries = match extract_headings(&mut tree, &levels) {
        Extraction::NoEntries => return Err(ScenarioError::NoEntries),
        Extraction::Entries(entries) => entries,
    };

    let mut simulator = ViewportSimulator::new(options.observer, scenario.viewport_height);
    for entry in &entries {
        let placed = &scenario.headings[*entry.node()];
        simulator.place(entry.id().clone(), Rect::new(placed.top, placed.height));
    }

    let (widget, initial) = TocWidget::new(&entries, options).ok_or(ScenarioError::NoEntries)?;
    let layout = StaticLayout::stacked(scenario.list_top, scenario.row_height, widget.anchors());
    let mut replay = Replay {
        widget,
        simulator,
        layout,
        clock_ms: 0,
        timers: Vec::new(),
    };

    let mut reports = Vec::with_capacity(scenario.steps.len() + 1);
    reports.push(replay.load(initial, scenario.fragment.clone()));

    for (index, step) in scenario.steps.iter().enumerate() {
        let number = index + 1;
        let (label, effects) = match step {
            ScenarioStep::Scroll(top) => {
                replay.simulator.scroll_to(*top);
                ("scroll", replay.deliver_batch())
            }
            ScenarioStep::Resize(height) => {
                replay.simulator.resize(*height);
                let mut effects = replay.dispatch(WidgetEvent::Resize);
                effects.extend(replay.deliver_batch());
                ("resize", effects)
            }
            ScenarioStep::Wait(ms) => ("wait", replay.advance(*ms)),
            ScenarioStep::Click(raw) => {
                let id = AnchorId::new(raw.as_str()).map_err(|err| ScenarioError::InvalidStep {
                    step: number,
                    reason: err.to_string(),
                })?;
                ("click", replay.dispatch(WidgetEvent::LinkActivated(id)))
            }
            ScenarioStep::Detach => {
                replay.widget.detach(&mut replay.simulator);
                ("detach", Vec::new())
            }
        };
        reports.push(replay.report(format!("{number}:{label}"), effects));
    }

    Ok(reports)
}

/// Host-side state of a replay: a virtual clock and pending timers.
struct Replay {
    widget: TocWidget,
    simulator: ViewportSimulator,
    layout: StaticLayout,
    clock_ms: u64,
    /// `(due_ms, task)` in scheduling order.
    timers: Vec<(u64, DeferredTask)>,
}

impl Replay {
    fn load(&mut self, initial: Vec<WidgetEffect>, fragment: Option<String>) -> StepReport {
        let mut effects = self.apply(initial);
        self.widget.attach(&mut self.simulator);
        effects.extend(self.deliver_batch());
        effects.extend(self.dispatch(WidgetEvent::PageLoaded { fragment }));
        self.report("load".to_string(), effects)
    }

    /// Hand the widget one event and carry out the host side of its effects.
    fn dispatch(&mut self, event: WidgetEvent) -> Vec<WidgetEffect> {
        let effects = self.widget.handle(event, &self.layout);
        self.apply(effects)
    }

    fn deliver_batch(&mut self) -> Vec<WidgetEffect> {
        let batch = self.simulator.take_batch();
        if batch.is_empty() {
            return Vec::new();
        }
        self.dispatch(WidgetEvent::Visibility(batch))
    }

    fn apply(&mut self, effects: Vec<WidgetEffect>) -> Vec<WidgetEffect> {
        let mut scrolled = false;
        for effect in &effects {
            match effect {
                WidgetEffect::Schedule { task, after } => {
                    self.timers.push((self.clock_ms + millis(*after), task.clone()));
                }
                WidgetEffect::SmoothScroll { target } => {
                    if let Some(rect) = self.simulator.placement(target) {
                        self.simulator.scroll_to(rect.top);
                        scrolled = true;
                    }
                }
                _ => {}
            }
        }

        let mut effects = effects;
        if scrolled {
            effects.extend(self.deliver_batch());
        }
        effects
    }

    fn advance(&mut self, ms: u64) -> Vec<WidgetEffect> {
        self.clock_ms += ms;
        let mut effects = Vec::new();
        loop {
            let due = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, (at, _))| *at <= self.clock_ms)
                .min_by_key(|(_, (at, _))| *at)
                .map(|(index, _)| index);
            let Some(index) = due else {
                break;
            };
            let (at, task) = self.timers.remove(index);
            debug!(at, ?task, "Firing deferred task");
            effects.extend(self.dispatch(WidgetEvent::TimerFired(task)));
        }
        effects
    }

    fn report(&self, step: String, effects: Vec<WidgetEffect>) -> StepReport {
        StepReport {
            step,
            at_ms: self.clock_ms,
            active: self.widget.active().cloned(),
            offset: self.widget.state().progress_offset(),
            effects,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    // ===== Test Helpers =====

    fn entry(id: &str, text: &str, level: HeadingLevel) -> TocEntry<()> {
        TocEntry::new(AnchorId::new(id).expect("valid id"), text, level, ())
    }

    fn heading(tag: &str, text: &str, top: f64) -> ScenarioHeading {
        ScenarioHeading {
            heading: MemoryHeading::new(tag, text),
            top,
            height: 40.0,
        }
    }

    /// Three sections 1200px apart in a 1000px viewport.
    fn scenario(steps: Vec<ScenarioStep>) -> Scenario {
        Scenario {
            viewport_height: 1000.0,
            headings: vec![
                heading("h2", "Intro", 100.0),
                heading("h2", "Setup", 1300.0),
                heading("h3", "Details", 2500.0),
            ],
            levels: None,
            fragment: None,
            list_top: 0.0,
            row_height: 20.0,
            steps,
        }
    }

    fn active(report: &StepReport) -> Option<&str> {
        report.active.as_ref().map(AnchorId::as_str)
    }

    // ===== Outline Tests =====

    #[test]
    fn text_outline_indents_relative_to_shallowest_level() {
        let entries = vec![
            entry("intro", "Intro", HeadingLevel::H2),
            entry("setup", "Setup", HeadingLevel::H3),
            entry("deep", "Deep", HeadingLevel::H4),
            entry("next", "Next", HeadingLevel::H2),
        ];

        insta::assert_snapshot!(format_outline_text(&entries), @r"
        - Intro (#intro)
          - Setup (#setup)
            - Deep (#deep)
        - Next (#next)
        ");
    }

    #[test]
    fn text_outline_of_nothing_is_empty() {
        let entries: Vec<TocEntry<()>> = Vec::new();
        assert_eq!(format_outline_text(&entries), "");
    }

    #[test]
    fn json_outline_lists_entries() {
        let entries = vec![entry("intro", "Intro", HeadingLevel::H2)];
        let json = format_outline_json(&entries).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{"id": "intro", "text": "Intro", "level": "h2"}])
        );
    }

    // ===== Scenario Tests =====

    #[test]
    fn parse_accepts_minimal_scenario() {
        let json = r##"{
            "viewport_height": 800,
            "headings": [{"tag": "h2", "text": "Intro", "top": 0}],
            "fragment": "#intro",
            "steps": [{"scroll": 400}, {"wait": 250}, {"click": "intro"}, "detach"]
        }"##;

        let scenario = Scenario::parse(json).unwrap();

        assert_eq!(scenario.headings[0].height, 32.0);
        assert_eq!(scenario.row_height, 24.0);
        assert_eq!(
            scenario.steps,
            vec![
                ScenarioStep::Scroll(400.0),
                ScenarioStep::Wait(250),
                ScenarioStep::Click("intro".to_string()),
                ScenarioStep::Detach,
            ]
        );
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        let json = r#"{"viewport_height": 1, "headings": [], "zoom": 2}"#;
        assert!(matches!(Scenario::parse(json), Err(ScenarioError::Parse(_))));
    }

    #[test]
    fn load_activates_heading_in_upper_viewport() {
        let reports = run_scenario(&scenario(Vec::new()), WidgetOptions::default()).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].step, "load");
        assert_eq!(active(&reports[0]), Some("intro"));
        assert!(reports[0]
            .effects
            .iter()
            .any(|e| matches!(e, WidgetEffect::Schedule { task: DeferredTask::InitialLayout, .. })));
    }

    #[test]
    fn scrolling_moves_active_section_and_offset() {
        let steps = vec![ScenarioStep::Scroll(1200.0), ScenarioStep::Scroll(2400.0)];
        let reports = run_scenario(&scenario(steps), WidgetOptions::default()).unwrap();

        assert_eq!(active(&reports[1]), Some("setup"));
        assert_eq!(reports[1].offset, 30.0);
        assert_eq!(active(&reports[2]), Some("details"));
        assert_eq!(reports[2].offset, 50.0);
    }

    #[test]
    fn scrolling_into_a_gap_keeps_previous_section() {
        // Root 600..1000 holds no heading.
        let steps = vec![ScenarioStep::Scroll(1200.0), ScenarioStep::Scroll(600.0)];
        let reports = run_scenario(&scenario(steps), WidgetOptions::default()).unwrap();

        assert_eq!(active(&reports[2]), Some("setup"));
    }

    #[test]
    fn initial_fragment_applies_after_hash_delay() {
        let mut scenario = scenario(vec![ScenarioStep::Wait(100), ScenarioStep::Wait(100)]);
        scenario.fragment = Some("#details".to_string());

        let reports = run_scenario(&scenario, WidgetOptions::default()).unwrap();

        assert_eq!(active(&reports[0]), Some("intro"));
        // 100ms: layout measured, fragment not yet honored.
        assert_eq!(active(&reports[1]), Some("intro"));
        assert_eq!(reports[1].offset, 10.0);
        // 200ms: fragment entry active.
        assert_eq!(reports[2].at_ms, 200);
        assert_eq!(active(&reports[2]), Some("details"));
        assert_eq!(reports[2].offset, 50.0);
    }

    #[test]
    fn click_scrolls_to_heading_and_updates_fragment() {
        let steps = vec![ScenarioStep::Click("setup".to_string())];
        let reports = run_scenario(&scenario(steps), WidgetOptions::default()).unwrap();

        let effects = &reports[1].effects;
        assert!(matches!(&effects[0], WidgetEffect::SmoothScroll { target } if target.as_str() == "setup"));
        assert!(matches!(&effects[1], WidgetEffect::UpdateFragment { .. }));
        assert_eq!(active(&reports[1]), Some("setup"));
    }

    #[test]
    fn detached_widget_stops_following_scroll() {
        let steps = vec![ScenarioStep::Detach, ScenarioStep::Scroll(1200.0)];
        let reports = run_scenario(&scenario(steps), WidgetOptions::default()).unwrap();

        assert!(reports[2].effects.is_empty());
        assert_eq!(active(&reports[2]), Some("intro"));
    }

    #[test]
    fn levels_filter_scenario_headings() {
        let mut scenario = scenario(vec![ScenarioStep::Scroll(2400.0)]);
        scenario.levels = Some("h2".to_string());

        let reports = run_scenario(&scenario, WidgetOptions::default()).unwrap();

        // Details (h3) is not listed; Setup never intersects, so Intro stays active.
        assert_eq!(active(&reports[1]), Some("intro"));
    }

    #[test]
    fn scenario_without_matching_headings_fails() {
        let mut scenario = scenario(Vec::new());
        scenario.levels = Some("h5".to_string());
        assert!(matches!(
            run_scenario(&scenario, WidgetOptions::default()),
            Err(ScenarioError::NoEntries)
        ));
    }

    #[test]
    fn bad_levels_and_click_targets_are_reported() {
        let mut bad_levels = scenario(Vec::new());
        bad_levels.levels = Some("h9".to_string());
        assert!(matches!(
            run_scenario(&bad_levels, WidgetOptions::default()),
            Err(ScenarioError::Levels(_))
        ));

        let bad_click = scenario(vec![ScenarioStep::Click(String::new())]);
        assert!(matches!(
            run_scenario(&bad_click, WidgetOptions::default()),
            Err(ScenarioError::InvalidStep { step: 1, .. })
        ));
    }
}
