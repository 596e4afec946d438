//! Property-based tests for extraction and resolution invariants.
//!
//! Tests validate:
//! 1. Generated ids are unique within a pass
//! 2. Derived ids use only lower-case word characters and single hyphens
//! 3. Extraction is idempotent on annotated content
//! 4. The active entry is always a listed entry

use patoc::extract::{candidate_id, extract_headings, slugify, MemoryHeading, MemoryTree};
use patoc::model::{AnchorId, HeadingLevel, HeadingLevelSet};
use patoc::resolver::{apply_visibility_batch, ActiveState, StaticLayout, VisibilityEvent};
use proptest::prelude::*;
use std::collections::HashSet;

fn all_levels() -> HeadingLevelSet {
    HeadingLevel::ALL.into_iter().collect()
}

fn heading_strategy() -> impl Strategy<Value = MemoryHeading> {
    (
        prop_oneof![Just("h1"), Just("h2"), Just("h3"), Just("h4"), Just("h5"), Just("p")],
        "[a-zA-Z0-9 _!?é-]{0,16}",
    )
        .prop_map(|(tag, text)| MemoryHeading::new(tag, &text))
}

fn is_well_formed_slug(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('-')
        && !id.ends_with('-')
        && !id.contains("--")
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

// ===== Property 1: Unique Ids =====

proptest! {
    #[test]
    fn generated_ids_are_unique(headings in prop::collection::vec(heading_strategy(), 0..40)) {
        let mut tree = MemoryTree::new(headings);
        let extraction = extract_headings(&mut tree, &all_levels());

        let ids: Vec<&str> = extraction.entries().iter().map(|e| e.id().as_str()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len(), "Duplicate id in {:?}", ids);
    }

    #[test]
    fn every_heading_in_set_gets_an_entry(headings in prop::collection::vec(heading_strategy(), 0..40)) {
        let expected = headings.iter().filter(|h| HeadingLevel::from_tag(&h.tag).is_some()).count();
        let mut tree = MemoryTree::new(headings);

        let extraction = extract_headings(&mut tree, &all_levels());

        prop_assert_eq!(extraction.entries().len(), expected);
    }
}

// ===== Property 2: Slug Shape =====

proptest! {
    #[test]
    fn candidate_ids_are_well_formed(text in any::<String>(), index in 0usize..1000) {
        let id = candidate_id(&text, index);
        prop_assert!(is_well_formed_slug(&id), "Malformed id {:?} from {:?}", id, text);
    }

    #[test]
    fn slugify_is_stable_on_its_output(text in any::<String>()) {
        let once = slugify(&text);
        prop_assert_eq!(slugify(&once), once.clone());
    }

    #[test]
    fn generated_ids_are_well_formed(headings in prop::collection::vec(heading_strategy(), 0..20)) {
        let mut tree = MemoryTree::new(headings);
        let extraction = extract_headings(&mut tree, &all_levels());

        for entry in extraction.entries() {
            prop_assert!(is_well_formed_slug(entry.id().as_str()), "Malformed id {}", entry.id());
        }
    }
}

// ===== Property 3: Idempotence =====

proptest! {
    #[test]
    fn second_pass_reuses_every_id(headings in prop::collection::vec(heading_strategy(), 0..30)) {
        let mut tree = MemoryTree::new(headings);
        let first = extract_headings(&mut tree, &all_levels());
        let annotated = tree.clone();

        let second = extract_headings(&mut tree, &all_levels());

        prop_assert_eq!(first, second);
        prop_assert_eq!(tree, annotated, "Second pass must not rewrite ids");
    }
}

// ===== Property 4: Active Entry Membership =====

proptest! {
    #[test]
    fn active_entry_is_always_listed(
        ratios in prop::collection::vec((0usize..6, 0.0f64..=1.0, any::<bool>()), 0..12)
    ) {
        let anchors: Vec<AnchorId> = ["a", "b", "c"].iter().map(|r| AnchorId::new(*r).unwrap()).collect();
        let layout = StaticLayout::stacked(0.0, 20.0, &anchors);
        let names = ["a", "b", "c", "x", "y", "z"];

        let batch: Vec<VisibilityEvent> = ratios
            .iter()
            .map(|(target, ratio, hit)| VisibilityEvent::new(AnchorId::new(names[*target]).unwrap(), *ratio, *hit))
            .collect();

        let state = apply_visibility_batch(ActiveState::new(anchors.first().cloned()), &batch, &anchors, &layout);

        let active = state.active().expect("starts with an active entry");
        prop_assert!(anchors.contains(active));
    }
}
