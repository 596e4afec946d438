//! Vertical geometry of the rendered list.

use crate::model::AnchorId;
use serde::Deserialize;
use std::collections::HashMap;

/// Vertical extent of a box, in pixels. Only the block axis matters here.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    /// Top edge.
    pub top: f64,
    /// Height; never negative in practice.
    pub height: f64,
}

impl Rect {
    /// Box starting at `top`.
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical center.
    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Read access to rendered geometry (a `getBoundingClientRect` stand-in).
///
/// All rects must share one coordinate space; only differences are used.
pub trait LayoutProbe {
    /// Rect of the list container.
    fn list_rect(&self) -> Option<Rect>;

    /// Rect of the link pointing at `id`.
    fn anchor_rect(&self, id: &AnchorId) -> Option<Rect>;
}

/// Fixed geometry, e.g. measured once or synthesized for a scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticLayout {
    list: Option<Rect>,
    anchors: HashMap<AnchorId, Rect>,
}

impl StaticLayout {
    /// Layout with the list at `list` and no links yet.
    pub fn new(list: Rect) -> Self {
        Self {
            list: Some(list),
            anchors: HashMap::new(),
        }
    }

    /// Links stacked top to bottom inside the list, each `row_height` tall.
    pub fn stacked<'a>(
        list_top: f64,
        row_height: f64,
        ids: impl IntoIterator<Item = &'a AnchorId>,
    ) -> Self {
        let anchors: HashMap<AnchorId, Rect> = ids
            .into_iter()
            .enumerate()
            .map(|(row, id)| (id.clone(), Rect::new(list_top + row as f64 * row_height, row_height)))
            .collect();
        let list = Rect::new(list_top, anchors.len() as f64 * row_height);
        Self {
            list: Some(list),
            anchors,
        }
    }

    /// Place the link for `id`.
    pub fn with_anchor(mut self, id: AnchorId, rect: Rect) -> Self {
        self.anchors.insert(id, rect);
        self
    }
}

impl LayoutProbe for StaticLayout {
    fn list_rect(&self) -> Option<Rect> {
        self.list
    }

    fn anchor_rect(&self, id: &AnchorId) -> Option<Rect> {
        self.anchors.get(id).copied()
    }
}
