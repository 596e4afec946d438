//! Tests for active section resolution.

use super::*;

fn id(raw: &str) -> AnchorId {
    AnchorId::new(raw).unwrap()
}

fn ids(raw: &[&str]) -> Vec<AnchorId> {
    raw.iter().map(|r| id(r)).collect()
}

fn seen(target: &str, ratio: f64) -> VisibilityEvent {
    VisibilityEvent::new(id(target), ratio, true)
}

fn gone(target: &str) -> VisibilityEvent {
    VisibilityEvent::new(id(target), 0.0, false)
}

fn setup() -> (Resolver, StaticLayout) {
    let anchors = ids(&["a", "b", "c"]);
    let layout = StaticLayout::stacked(200.0, 20.0, &anchors);
    (Resolver::new(anchors, DEFAULT_DOT_ADJUST), layout)
}

#[test]
fn initial_state_selects_first_entry() {
    let (resolver, _) = setup();
    let state = resolver.initial_state();

    assert_eq!(state.active(), Some(&id("a")));
    assert_eq!(state.progress_offset(), 0.0);
}

#[test]
fn highest_ratio_wins() {
    let (resolver, layout) = setup();
    let state = resolver.on_visibility_batch(
        resolver.initial_state(),
        &[seen("b", 0.6), seen("c", 0.3)],
        &layout,
    );

    assert_eq!(state.active(), Some(&id("b")));
    assert_eq!(state.progress_offset(), 30.0);
}

#[test]
fn batch_without_intersections_keeps_previous_state() {
    let (resolver, layout) = setup();
    let before = resolver.on_visibility_batch(resolver.initial_state(), &[seen("c", 0.5)], &layout);

    let after = resolver.on_visibility_batch(before.clone(), &[gone("b"), gone("c")], &layout);

    assert_eq!(after, before);
}

#[test]
fn zero_ratio_intersections_do_not_qualify() {
    let (resolver, layout) = setup();
    let state = resolver.on_visibility_batch(resolver.initial_state(), &[seen("c", 0.0)], &layout);

    assert_eq!(state.active(), Some(&id("a")));
}

#[test]
fn ties_keep_the_earliest_event() {
    let batch = [seen("c", 0.5), seen("b", 0.5)];
    assert_eq!(most_visible(&batch).map(|e| e.target.as_str()), Some("c"));
}

#[test]
fn non_intersecting_events_are_ignored_even_with_ratio() {
    let batch = [VisibilityEvent::new(id("a"), 0.9, false), seen("b", 0.2)];
    assert_eq!(most_visible(&batch).map(|e| e.target.as_str()), Some("b"));
}

#[test]
fn unknown_targets_are_ignored() {
    let (resolver, layout) = setup();
    let state = resolver.on_visibility_batch(
        resolver.initial_state(),
        &[seen("elsewhere", 1.0), seen("c", 0.2)],
        &layout,
    );

    assert_eq!(state.active(), Some(&id("c")));
}

#[test]
fn offset_is_link_center_relative_to_list_top() {
    let layout = StaticLayout::new(Rect::new(100.0, 300.0)).with_anchor(id("x"), Rect::new(160.0, 15.0));
    assert_eq!(progress_offset(&layout, &id("x")), Some(67.5));
    assert_eq!(progress_offset(&layout, &id("y")), None);
}

#[test]
fn resize_remeasures_without_changing_active() {
    let (resolver, layout) = setup();
    let state = resolver.activate(resolver.initial_state(), &id("b"), &layout);
    assert_eq!(state.progress_offset(), 30.0);

    let wider = StaticLayout::stacked(0.0, 40.0, resolver.anchors());
    let state = resolver.on_resize(state, &wider);

    assert_eq!(state.active(), Some(&id("b")));
    assert_eq!(state.progress_offset(), 60.0);
}

#[test]
fn unmeasurable_layout_keeps_old_offset() {
    let (resolver, layout) = setup();
    let state = resolver.activate(resolver.initial_state(), &id("c"), &layout);

    let state = resolver.on_resize(state, &StaticLayout::default());

    assert_eq!(state.progress_offset(), 50.0);
}

#[test]
fn activating_unknown_id_is_a_no_op() {
    let (resolver, layout) = setup();
    let state = resolver.activate(resolver.initial_state(), &id("nope"), &layout);
    assert_eq!(state, resolver.initial_state());
}

#[test]
fn fragment_lookup_accepts_hash_prefix() {
    let (resolver, _) = setup();
    assert_eq!(resolver.anchor_for_fragment("#b"), Some(&id("b")));
    assert_eq!(resolver.anchor_for_fragment("c"), Some(&id("c")));
    assert_eq!(resolver.anchor_for_fragment("#missing"), None);
}

#[test]
fn indicator_formats_css_values() {
    let indicator = ProgressIndicator {
        offset: 37.5,
        dot_adjust: DEFAULT_DOT_ADJUST,
    };
    assert_eq!(indicator.bar_height(), "37.5px");
    assert_eq!(indicator.dot_transform(), "translateY(33.5px)");

    let whole = ProgressIndicator {
        offset: 40.0,
        dot_adjust: 4.0,
    };
    assert_eq!(whole.bar_height(), "40px");
}

#[test]
fn empty_resolver_has_no_active_entry() {
    let resolver = Resolver::new(Vec::new(), DEFAULT_DOT_ADJUST);
    assert_eq!(resolver.initial_state().active(), None);
}

#[test]
fn free_functions_match_resolver_methods() {
    let (resolver, layout) = setup();
    let batch = [seen("b", 0.6), seen("c", 0.3)];

    let via_fn = apply_visibility_batch(resolver.initial_state(), &batch, resolver.anchors(), &layout);
    let via_method = resolver.on_visibility_batch(resolver.initial_state(), &batch, &layout);
    assert_eq!(via_fn, via_method);

    assert_eq!(apply_resize(via_fn.clone(), &layout), via_fn);
}
