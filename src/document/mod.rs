//! HTML page adapter (impure shell over `scraper`).
//!
//! Parses a rendered page, locates the widget container, its list and the
//! content root, runs extraction over the content and writes the generated
//! anchors back into the page.

pub mod container;
pub mod nodes;

pub use container::render_container;

use crate::extract::{extract_headings, ContentTree, Extraction};
use crate::model::{AnchorId, HeadingLevel, HeadingLevelSet, TocEntry, WidgetSettings};
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node, Selector};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Class of the trailing progress marker appended to the list.
pub const PROGRESS_DOT_CLASS: &str = "patoc-progress-dot";

/// Class carried by the currently active link.
pub const ACTIVE_CLASS: &str = "active";

/// A configured CSS selector could not be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {role} selector {selector:?}: {reason}")]
pub struct SelectorError {
    /// Which element the selector locates.
    pub role: &'static str,
    /// The selector text.
    pub selector: String,
    /// Parser message.
    pub reason: String,
}

/// Selectors locating the widget parts within a page.
#[derive(Clone)]
pub struct PageSelectors {
    content: Selector,
    widget: Selector,
    list: Selector,
}

impl PageSelectors {
    /// Parse the three selectors.
    pub fn new(content: &str, widget: &str, list: &str) -> Result<Self, SelectorError> {
        Ok(Self {
            content: parse_selector("content", content)?,
            widget: parse_selector("widget", widget)?,
            list: parse_selector("list", list)?,
        })
    }
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            content: Selector::parse(".entry-content").expect("static selector"),
            widget: Selector::parse(".patoc-toc").expect("static selector"),
            list: Selector::parse(".patoc-list").expect("static selector"),
        }
    }
}

impl fmt::Debug for PageSelectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSelectors").finish_non_exhaustive()
    }
}

fn parse_selector(role: &'static str, selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|err| SelectorError {
        role,
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}

/// Required element that was not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingElement {
    /// Widget container has no list element.
    List,
    /// Page has no content root.
    Content,
}

/// Why a widget was hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
    /// No heading level enabled (also the result of a malformed payload).
    NoLevels,
    /// Levels enabled, but the content has no such headings.
    NoHeadings,
}

/// Outcome of initializing one widget container.
#[derive(Debug, Clone, PartialEq)]
pub enum Initialization {
    /// A required element is missing; the page is left untouched.
    Absent(MissingElement),
    /// The container was hidden with `display: none`.
    Hidden(HideReason),
    /// The list was populated.
    Ready {
        /// Settings read from the container.
        settings: WidgetSettings,
        /// Listed entries, in document order.
        entries: Vec<TocEntry<NodeId>>,
    },
}

impl Initialization {
    /// Listed entries; empty unless `Ready`.
    pub fn entries(&self) -> &[TocEntry<NodeId>] {
        match self {
            Self::Ready { entries, .. } => entries,
            _ => &[],
        }
    }
}

/// A parsed page.
pub struct PageDocument {
    html: Html,
    selectors: PageSelectors,
}

impl PageDocument {
    /// Parse a whole HTML document.
    pub fn parse(source: &str, selectors: PageSelectors) -> Self {
        Self {
            html: Html::parse_document(source),
            selectors,
        }
    }

    /// Serialize the page back to HTML.
    pub fn to_html(&self) -> String {
        self.html.html()
    }

    /// Settings of the first widget container, if any.
    pub fn widget_settings(&self) -> Option<WidgetSettings> {
        self.html
            .select(&self.selectors.widget)
            .next()
            .map(|widget| settings_of(&widget))
    }

    /// Extract headings from the content root without rendering any list.
    ///
    /// Returns `None` when the page has no content root.
    pub fn extract(&mut self, levels: &HeadingLevelSet) -> Option<Extraction<NodeId>> {
        let root = self.content_root()?;
        let mut region = ContentRegion {
            html: &mut self.html,
            root,
        };
        Some(extract_headings(&mut region, levels))
    }

    /// Initialize every widget container on the page.
    ///
    /// Each container is handled independently: its own settings, its own
    /// extraction pass and its own list. Returns an empty vector when the page
    /// has no container at all.
    pub fn initialize(&mut self) -> Vec<Initialization> {
        let widgets: Vec<NodeId> = self
            .html
            .select(&self.selectors.widget)
            .map(|widget| widget.id())
            .collect();

        if widgets.is_empty() {
            debug!("No table of contents container on page");
        }

        widgets
            .into_iter()
            .map(|widget| self.initialize_widget(widget))
            .collect()
    }

    fn initialize_widget(&mut self, widget: NodeId) -> Initialization {
        let Some(widget_ref) = self.html.tree.get(widget).and_then(ElementRef::wrap) else {
            return Initialization::Absent(MissingElement::List);
        };
        let settings = settings_of(&widget_ref);
        let Some(list) = widget_ref.select(&self.selectors.list).next().map(|l| l.id()) else {
            debug!("Widget container has no list element; skipping");
            return Initialization::Absent(MissingElement::List);
        };
        let Some(root) = self.content_root() else {
            debug!("Page has no content root; skipping");
            return Initialization::Absent(MissingElement::Content);
        };

        if settings.levels.is_empty() {
            self.hide(widget);
            info!("No heading levels selected; hiding table of contents");
            return Initialization::Hidden(HideReason::NoLevels);
        }

        let mut region = ContentRegion {
            html: &mut self.html,
            root,
        };
        let entries = match extract_headings(&mut region, &settings.levels) {
            Extraction::NoEntries => {
                self.hide(widget);
                info!(levels = ?settings.levels, "No headings found; hiding table of contents");
                return Initialization::Hidden(HideReason::NoHeadings);
            }
            Extraction::Entries(entries) => entries,
        };

        self.render_list(list, &entries, settings.indentation);
        info!(count = entries.len(), "Rendered table of contents");
        Initialization::Ready { settings, entries }
    }

    fn content_root(&self) -> Option<NodeId> {
        self.html
            .select(&self.selectors.content)
            .next()
            .map(|root| root.id())
    }

    /// Replace the list's children with one item per entry plus the progress
    /// marker.
    ///
    /// The first link starts out active. Items left by an earlier render are
    /// dropped, so rendering a rendered page yields the same list.
    fn render_list<N>(&mut self, list: NodeId, entries: &[TocEntry<N>], indentation: bool) {
        let stale: Vec<NodeId> = self
            .html
            .tree
            .get(list)
            .map(|list| list.children().map(|child| child.id()).collect())
            .unwrap_or_default();
        if !stale.is_empty() {
            debug!(count = stale.len(), "Replacing existing list content");
        }
        for child in stale {
            if let Some(mut child) = self.html.tree.get_mut(child) {
                child.detach();
            }
        }

        let Some(mut list) = self.html.tree.get_mut(list) else {
            return;
        };

        for (index, entry) in entries.iter().enumerate() {
            let item = if indentation {
                nodes::element("li", &[("data-level", entry.level().tag())])
            } else {
                nodes::element("li", &[])
            };
            let href = entry.id().href();
            let link = if index == 0 {
                nodes::element("a", &[("href", href.as_str()), ("class", ACTIVE_CLASS)])
            } else {
                nodes::element("a", &[("href", href.as_str())])
            };

            let mut item = list.append(item);
            let mut link = item.append(link);
            link.append(nodes::text(entry.text()));
        }

        list.append(nodes::element("div", &[("class", PROGRESS_DOT_CLASS)]));
    }

    fn hide(&mut self, widget: NodeId) {
        let Some(mut node) = self.html.tree.get_mut(widget) else {
            return;
        };
        if let Node::Element(element) = node.value() {
            let style = match element.attr("style").map(str::trim) {
                Some(existing) if !existing.is_empty() => {
                    format!("{}; display: none", existing.trim_end_matches(';'))
                }
                _ => "display: none".to_string(),
            };
            let updated = nodes::with_attribute(element, "style", &style);
            *element = updated;
        }
    }
}

impl fmt::Debug for PageDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDocument")
            .field("selectors", &self.selectors)
            .finish_non_exhaustive()
    }
}

fn settings_of(widget: &ElementRef<'_>) -> WidgetSettings {
    let element = widget.value();
    WidgetSettings::from_attributes(element.attr("data-headings"), element.attr("data-indent"))
}

/// The content root of a page, viewed as a [`ContentTree`].
struct ContentRegion<'a> {
    html: &'a mut Html,
    root: NodeId,
}

impl ContentRegion<'_> {
    fn element(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(node).and_then(ElementRef::wrap)
    }
}

impl ContentTree for ContentRegion<'_> {
    type Node = NodeId;

    fn headings(&self, levels: &HeadingLevelSet) -> Vec<NodeId> {
        let Some(root) = self.element(self.root) else {
            return Vec::new();
        };
        let Some(selector) = levels.selector() else {
            return Vec::new();
        };
        let Ok(selector) = Selector::parse(&selector) else {
            return Vec::new();
        };
        root.select(&selector).map(|heading| heading.id()).collect()
    }

    fn level(&self, node: &NodeId) -> Option<HeadingLevel> {
        self.element(*node)
            .and_then(|heading| HeadingLevel::from_tag(heading.value().name()))
    }

    fn id(&self, node: &NodeId) -> Option<String> {
        self.element(*node)
            .and_then(|heading| heading.value().attr("id").map(str::to_string))
    }

    fn text(&self, node: &NodeId) -> String {
        self.element(*node)
            .map(|heading| heading.text().collect())
            .unwrap_or_default()
    }

    fn set_id(&mut self, node: &NodeId, id: &AnchorId) {
        let Some(mut heading) = self.html.tree.get_mut(*node) else {
            return;
        };
        if let Node::Element(element) = heading.value() {
            let updated = nodes::with_attribute(element, "id", id.as_str());
            *element = updated;
        }
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
