//! Server-side container markup for one widget instance.
//!
//! Produces the empty shell the page script populates: a `<nav>` carrying the
//! settings payload, a title and an empty list. Theming CSS is not produced.

use super::nodes;
use crate::model::WidgetSettings;
use scraper::{ElementRef, Html};

/// Title shown above the list.
pub const CONTAINER_TITLE: &str = "Table of Contents";

/// Render container markup with a fresh `patoc-<uuid>` instance id.
pub fn render_container(settings: &WidgetSettings) -> String {
    let instance_id = format!("patoc-{}", uuid::Uuid::new_v4());
    render_container_with_id(settings, &instance_id)
}

/// Render container markup with a caller-chosen instance id.
pub fn render_container_with_id(settings: &WidgetSettings, instance_id: &str) -> String {
    let payload = settings.levels_payload();
    let indent = if settings.indentation { "true" } else { "false" };

    let mut fragment = Html::new_fragment();
    let nav_id = {
        let mut root = fragment.tree.root_mut();
        let mut nav = root.append(nodes::element(
            "nav",
            &[
                ("class", "patoc-toc"),
                ("id", instance_id),
                ("data-headings", payload.as_str()),
                ("data-indent", indent),
            ],
        ));
        nav.append(nodes::element("h3", &[]))
            .append(nodes::text(CONTAINER_TITLE));
        nav.append(nodes::element("ul", &[("class", "patoc-list")]));
        nav.id()
    };

    fragment
        .tree
        .get(nav_id)
        .and_then(ElementRef::wrap)
        .map(|nav| nav.html())
        .unwrap_or_default()
}
