// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory host document.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use peniko::kurbo::Rect;

use super::layout::{Layout, LayoutMetrics};
use super::{
    index_in_parent, is_attached, Dom, DomMut, NodeId, NodeKind, ScrollService, SelectionHost,
};
use crate::range::{BoundaryPoint, DomRange};

/// Tags that establish a block.
const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "blockquote",
    "figure",
    "pre",
    "hr",
    "li",
];

/// Tags for replaced objects.
const OBJECT_TAGS: &[&str] = &["img", "hr", "video", "iframe"];

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: Vec<char>,
    tag: String,
    attrs: Vec<(String, Option<String>)>,
}

impl NodeData {
    fn new(kind: NodeKind, tag: &str) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            text: Vec::new(),
            tag: tag.to_string(),
            attrs: Vec::new(),
        }
    }

    fn attribute(&self, name: &str) -> Option<&(String, Option<String>)> {
        self.attrs.iter().find(|(key, _)| key == name)
    }
}

/// A tree of text and elements with a live selection and layout.
///
/// The root is an editable `body`. Layout is recomputed after every
/// mutation so geometry never outlives the tree it was measured on.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    selection: Option<DomRange>,
    metrics: LayoutMetrics,
    layout: Layout,
    scroll_top: f64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(LayoutMetrics::default())
    }
}

impl Document {
    /// Creates an empty document laid out with `metrics`.
    pub fn new(metrics: LayoutMetrics) -> Self {
        let mut doc = Self {
            nodes: alloc::vec![NodeData::new(NodeKind::Element, "body")],
            root: NodeId(0),
            selection: None,
            metrics,
            layout: Layout::default(),
            scroll_top: 0.0,
        };
        doc.relayout();
        doc
    }

    // --- MARK: Building ---

    /// Appends an element to `parent`.
    ///
    /// The tag decides whether the element is a block or an object. The
    /// `cef` attribute marks it non-editable, `edit` marks it editable. The
    /// tags `caret` and `caret-block` create caret containers.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, Option<&str>)],
    ) -> NodeId {
        let kind = match tag {
            "caret" => NodeKind::CaretContainer { block: false },
            "caret-block" => NodeKind::CaretContainer { block: true },
            _ => NodeKind::Element,
        };
        let mut data = NodeData::new(kind, tag);
        data.attrs = attrs
            .iter()
            .map(|(key, value)| (key.to_string(), value.map(ToString::to_string)))
            .collect();
        let id = self.push_node(parent, data);
        self.relayout();
        id
    }

    /// Appends a text node to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let mut data = NodeData::new(NodeKind::Text, "#text");
        data.text = text.chars().collect();
        let id = self.push_node(parent, data);
        self.relayout();
        id
    }

    fn push_node(&mut self, parent: NodeId, mut data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        data.parent = Some(parent);
        self.nodes.push(data);
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Replaces the layout metrics and lays the document out again.
    pub fn set_metrics(&mut self, metrics: LayoutMetrics) {
        self.metrics = metrics;
        self.relayout();
    }

    /// Returns the layout metrics.
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub(crate) fn relayout(&mut self) {
        self.layout = Layout::compute(self);
    }

    pub(crate) fn node_capacity(&self) -> usize {
        self.nodes.len()
    }

    // --- MARK: Queries ---

    /// Returns the tag name of an element.
    pub fn tag(&self, node: NodeId) -> &str {
        self.nodes.get(node.index()).map_or("", |n| n.tag.as_str())
    }

    /// Returns the value of an attribute. Bare attributes have the empty
    /// string as value.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node.index())?
            .attribute(name)
            .map(|(_, value)| value.as_deref().unwrap_or(""))
    }

    pub(crate) fn attributes(&self, node: NodeId) -> &[(String, Option<String>)] {
        self.nodes.get(node.index()).map_or(&[], |n| n.attrs.as_slice())
    }

    /// Returns the attached element whose `id` attribute is `id`.
    pub fn node_by_id(&self, id: &str) -> Option<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .find(|&node| self.attribute(node, "id") == Some(id) && is_attached(self, node))
    }

    /// Returns the characters of a text node as a string.
    pub fn text(&self, node: NodeId) -> String {
        self.nodes
            .get(node.index())
            .map(|n| n.text.iter().collect())
            .unwrap_or_default()
    }

    /// Returns the number of caret containers attached to the tree.
    pub fn caret_container_count(&self) -> usize {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|&node| {
                matches!(self.kind(node), NodeKind::CaretContainer { .. })
                    && is_attached(self, node)
            })
            .count()
    }

    /// Returns the current vertical scroll offset.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Returns the box of the caret at `point`.
    fn point_rect(&self, point: BoundaryPoint) -> Option<Rect> {
        let BoundaryPoint { container, offset } = point;
        if self.kind(container) == NodeKind::Text {
            let len = self.text_len(container);
            return if offset < len {
                self.char_rect(container, offset)
            } else if len > 0 {
                self.char_rect(container, len - 1)
            } else {
                self.node_rect(container)
            };
        }
        self.child(container, offset)
            .or_else(|| offset.checked_sub(1).and_then(|ix| self.child(container, ix)))
            .and_then(|child| self.node_rect(child))
            .or_else(|| self.node_rect(container))
    }

    fn clamp_point(&self, point: BoundaryPoint) -> BoundaryPoint {
        let max = match self.kind(point.container) {
            NodeKind::Text => self.text_len(point.container),
            _ => self.child_count(point.container),
        };
        BoundaryPoint::new(point.container, point.offset.min(max))
    }
}

impl Dom for Document {
    fn root(&self) -> NodeId {
        self.root
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index())?.parent
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.nodes.get(node.index()).map_or(0, |n| n.children.len())
    }

    fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.nodes.get(node.index())?.children.get(index).copied()
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes
            .get(node.index())
            .map_or(NodeKind::Element, |n| n.kind)
    }

    fn text_len(&self, node: NodeId) -> usize {
        self.nodes.get(node.index()).map_or(0, |n| n.text.len())
    }

    fn char_at(&self, node: NodeId, index: usize) -> Option<char> {
        self.nodes.get(node.index())?.text.get(index).copied()
    }

    fn is_block(&self, node: NodeId) -> bool {
        let Some(data) = self.nodes.get(node.index()) else {
            return false;
        };
        match data.kind {
            NodeKind::Element => {
                node == self.root
                    || BLOCK_TAGS.contains(&data.tag.as_str())
                    || data.attribute("block").is_some()
            }
            NodeKind::CaretContainer { block } => block,
            NodeKind::Text => false,
        }
    }

    fn is_object(&self, node: NodeId) -> bool {
        self.nodes.get(node.index()).is_some_and(|data| {
            data.kind == NodeKind::Element && OBJECT_TAGS.contains(&data.tag.as_str())
        })
    }

    fn content_editable(&self, node: NodeId) -> Option<bool> {
        let data = self.nodes.get(node.index())?;
        if data.attribute("cef").is_some() {
            Some(false)
        } else if data.attribute("edit").is_some() {
            Some(true)
        } else {
            None
        }
    }

    fn char_rect(&self, node: NodeId, index: usize) -> Option<Rect> {
        self.layout.char_rect(node, index)
    }

    fn node_rect(&self, node: NodeId) -> Option<Rect> {
        if !is_attached(self, node) {
            return None;
        }
        self.layout.node_rect(node)
    }
}

impl DomMut for Document {
    fn insert_caret_container(
        &mut self,
        beside: NodeId,
        before: bool,
        block: bool,
    ) -> Option<NodeId> {
        let parent = self.parent(beside)?;
        let ix = index_in_parent(self, beside)?;
        let tag = if block { "caret-block" } else { "caret" };
        let mut data = NodeData::new(NodeKind::CaretContainer { block }, tag);
        data.parent = Some(parent);
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        let at = if before { ix } else { ix + 1 };
        self.nodes[parent.index()].children.insert(at, id);
        self.relayout();
        Some(id)
    }

    fn remove_node(&mut self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(node)?;
        let ix = index_in_parent(self, node)?;
        self.nodes[parent.index()].children.remove(ix);
        self.nodes[node.index()].parent = None;
        if let Some(selection) = self.selection.as_mut() {
            selection.adjust_for_removal(parent, ix, node);
        }
        self.relayout();
        Some((parent, ix))
    }
}

impl SelectionHost for Document {
    fn selection_range(&self) -> Option<DomRange> {
        self.selection
    }

    fn set_selection_range(&mut self, range: DomRange) {
        let start = self.clamp_point(range.start);
        let end = self.clamp_point(range.end);
        self.selection = Some(DomRange::new(start, end));
    }
}

impl ScrollService for Document {
    fn scroll_into_view(&mut self, range: &DomRange) {
        let Some(rect) = self.point_rect(range.start) else {
            return;
        };
        let viewport = self.metrics.viewport_height;
        if rect.y0 < self.scroll_top {
            self.scroll_top = rect.y0;
        } else if rect.y1 > self.scroll_top + viewport {
            self.scroll_top = rect.y1 - viewport;
        }
        log::trace!("scrolled to {} for {:?}", self.scroll_top, range);
    }
}
