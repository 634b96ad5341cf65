// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cmp::Ordering;

use peniko::kurbo::Rect;
use smallvec::SmallVec;

use super::geom::collapse;
use crate::dom::{
    index_in_parent, is_atomic, is_caret_container, is_element, is_text, is_zero_width, Dom,
    NodeId, NodeKind,
};
use crate::range::{BoundaryPoint, DomRange};

/// A collapsed caret box together with the node that produced it.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ClientRect {
    /// Zero-width box at the caret's x coordinate, spanning its line.
    pub rect: Rect,
    /// The node whose edge the caret is drawn against.
    pub node: NodeId,
}

/// The client rectangles of a position.
///
/// A position at a soft line break has two: the end of the first line and the
/// start of the next.
pub type ClientRects = SmallVec<[ClientRect; 2]>;

/// A logical caret location.
///
/// Unlike a [`BoundaryPoint`], a caret position knows how to find its
/// neighbours and where it is drawn.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CaretPosition {
    container: NodeId,
    offset: usize,
}

impl CaretPosition {
    /// Creates a position at `offset` inside `container`.
    pub const fn new(container: NodeId, offset: usize) -> Self {
        Self { container, offset }
    }

    /// Returns the position immediately before `node` in its parent.
    pub fn before<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Option<Self> {
        Some(Self::new(dom.parent(node)?, index_in_parent(dom, node)?))
    }

    /// Returns the position immediately after `node` in its parent.
    pub fn after<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Option<Self> {
        Some(Self::new(dom.parent(node)?, index_in_parent(dom, node)? + 1))
    }

    /// Returns the position at the start of `range`.
    pub fn from_range_start(range: &DomRange) -> Self {
        Self::new(range.start.container, range.start.offset)
    }

    /// Returns the position at the end of `range`.
    pub fn from_range_end(range: &DomRange) -> Self {
        Self::new(range.end.container, range.end.offset)
    }

    /// The container node.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Character or child offset inside the container.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the position as a boundary point.
    pub fn point(&self) -> BoundaryPoint {
        BoundaryPoint::new(self.container, self.offset)
    }

    /// Returns a collapsed range at this position.
    pub fn to_range(&self) -> DomRange {
        DomRange::caret(self.container, self.offset)
    }

    /// Compares two positions in document order.
    pub fn compare<D: Dom + ?Sized>(&self, dom: &D, other: &Self) -> Ordering {
        self.point().compare(dom, &other.point())
    }

    /// Returns true if the container is a text node.
    pub fn is_text<D: Dom + ?Sized>(&self, dom: &D) -> bool {
        is_text(dom, self.container)
    }

    /// Returns true if the position is at offset zero.
    pub fn is_at_start(&self) -> bool {
        self.offset == 0
    }

    /// Returns true if no character or child follows the position.
    pub fn is_at_end<D: Dom + ?Sized>(&self, dom: &D) -> bool {
        self.offset >= self.len(dom)
    }

    fn len<D: Dom + ?Sized>(&self, dom: &D) -> usize {
        match dom.kind(self.container) {
            NodeKind::Text => dom.text_len(self.container),
            _ => dom.child_count(self.container),
        }
    }

    /// Returns the node beside the position.
    ///
    /// For a text container this is the text node itself. Otherwise it is the
    /// child before the offset (`before`) or at it.
    pub fn node<D: Dom + ?Sized>(&self, dom: &D, before: bool) -> Option<NodeId> {
        if self.is_text(dom) {
            return Some(self.container);
        }
        let ix = if before {
            self.offset.checked_sub(1)?
        } else {
            self.offset
        };
        dom.child(self.container, ix)
    }

    /// Returns the sibling beside an element position, hopping over caret
    /// containers. Text positions have no such sibling.
    pub fn adjacent_node<D: Dom + ?Sized>(&self, dom: &D, before: bool) -> Option<NodeId> {
        if self.is_text(dom) {
            return None;
        }
        if before {
            (0..self.offset.min(dom.child_count(self.container)))
                .rev()
                .filter_map(|ix| dom.child(self.container, ix))
                .find(|&child| !is_caret_container(dom, child))
        } else {
            (self.offset..dom.child_count(self.container))
                .filter_map(|ix| dom.child(self.container, ix))
                .find(|&child| !is_caret_container(dom, child))
        }
    }

    /// Returns the rectangles at which a caret at this position is drawn.
    pub fn client_rects<D: Dom + ?Sized>(&self, dom: &D) -> ClientRects {
        let mut rects = ClientRects::new();
        let (container, offset) = (self.container, self.offset);
        match dom.kind(container) {
            NodeKind::Text => {
                let len = dom.text_len(container);
                if offset > 0 && offset <= len {
                    if let Some(rect) = dom.char_rect(container, offset - 1) {
                        push_distinct(&mut rects, collapse(rect, false), container);
                    }
                }
                if offset < len {
                    if let Some(rect) = dom.char_rect(container, offset) {
                        push_distinct(&mut rects, collapse(rect, true), container);
                    }
                }
                if len == 0 {
                    if let Some(rect) = dom.node_rect(container) {
                        rects.push(ClientRect {
                            rect: collapse(rect, true),
                            node: container,
                        });
                    }
                }
            }
            NodeKind::CaretContainer { .. } => {
                if let Some(rect) = dom.node_rect(container) {
                    rects.push(ClientRect {
                        rect: collapse(rect, true),
                        node: container,
                    });
                }
            }
            NodeKind::Element => {
                let before = self.adjacent_node(dom, true);
                let after = self.adjacent_node(dom, false);
                let atomic = |node: Option<NodeId>| node.filter(|&n| is_atomic(dom, n));
                let (atomic_before, atomic_after) = (atomic(before), atomic(after));
                if atomic_before.is_some() || atomic_after.is_some() {
                    for (node, leading) in [(atomic_before, false), (atomic_after, true)] {
                        let Some(node) = node else { continue };
                        if let Some(rect) = dom.node_rect(node) {
                            push_distinct(&mut rects, collapse(rect, leading), node);
                        }
                    }
                    return rects;
                }
                if let Some(node) = before.filter(|&n| is_inline_content(dom, n)) {
                    if let Some(rect) = inline_edge(dom, node, false) {
                        push_distinct(&mut rects, rect, node);
                    }
                }
                if let Some(node) = after.filter(|&n| is_inline_content(dom, n)) {
                    if let Some(rect) = inline_edge(dom, node, true) {
                        push_distinct(&mut rects, rect, node);
                    }
                }
                if rects.is_empty() && dom.child_count(container) == 0 {
                    if let Some(rect) = dom.node_rect(container) {
                        let line = Rect::new(rect.x0, rect.y0, rect.x0, rect.y1);
                        rects.push(ClientRect {
                            rect: line,
                            node: container,
                        });
                    }
                }
            }
        }
        rects
    }

    /// Returns true if a caret at this position can be seen.
    ///
    /// Positions without geometry, and positions directly after a zero-width
    /// character, are invisible.
    pub fn is_visible<D: Dom + ?Sized>(&self, dom: &D) -> bool {
        if self.is_text(dom) && self.offset > 0 {
            if let Some(c) = dom.char_at(self.container, self.offset - 1) {
                if is_zero_width(c) {
                    return false;
                }
            }
        }
        !self.client_rects(dom).is_empty()
    }
}

fn push_distinct(rects: &mut ClientRects, rect: Rect, node: NodeId) {
    if rects.iter().any(|r| r.rect == rect) {
        return;
    }
    rects.push(ClientRect { rect, node });
}

fn is_inline_content<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    match dom.kind(node) {
        NodeKind::Text => dom.text_len(node) > 0,
        NodeKind::Element => !dom.is_block(node),
        NodeKind::CaretContainer { .. } => false,
    }
}

/// Returns the collapsed edge of inline content, looking at the outermost
/// character when `node` is text.
fn inline_edge<D: Dom + ?Sized>(dom: &D, node: NodeId, leading: bool) -> Option<Rect> {
    if is_text(dom, node) {
        let len = dom.text_len(node);
        let ix = if leading { 0 } else { len.checked_sub(1)? };
        return dom.char_rect(node, ix).map(|r| collapse(r, leading));
    }
    if is_element(dom, node) {
        let count = dom.child_count(node);
        let mut children = (0..count).filter_map(|ix| dom.child(node, ix));
        let edge_child = if leading {
            children.find(|&c| is_inline_content(dom, c))
        } else {
            children.rev().find(|&c| is_inline_content(dom, c))
        };
        if let Some(child) = edge_child {
            if let Some(rect) = inline_edge(dom, child, leading) {
                return Some(rect);
            }
        }
    }
    dom.node_rect(node).map(|r| collapse(r, leading))
}
