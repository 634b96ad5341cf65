// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection ranges over a host document.

use core::cmp::Ordering;

use crate::dom::{compare_points, index_in_parent, is_attached, Dom, NodeId, NodeKind};

/// A `(container, offset)` pair.
///
/// The offset counts characters in text containers and children otherwise.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BoundaryPoint {
    /// The node the offset is relative to.
    pub container: NodeId,
    /// Character or child offset inside `container`.
    pub offset: usize,
}

impl BoundaryPoint {
    /// Creates a boundary point.
    pub const fn new(container: NodeId, offset: usize) -> Self {
        Self { container, offset }
    }

    /// Compares two points in document order.
    pub fn compare<D: Dom + ?Sized>(&self, dom: &D, other: &Self) -> Ordering {
        compare_points(
            dom,
            (self.container, self.offset),
            (other.container, other.offset),
        )
    }

    /// Returns the node at this point: the child at the offset, clamped to
    /// the last child, or the container itself when it has no children.
    pub fn node<D: Dom + ?Sized>(&self, dom: &D) -> NodeId {
        let count = dom.child_count(self.container);
        if dom.kind(self.container) == NodeKind::Element && count > 0 {
            dom.child(self.container, self.offset.min(count - 1))
                .unwrap_or(self.container)
        } else {
            self.container
        }
    }

    fn is_in_bounds<D: Dom + ?Sized>(&self, dom: &D) -> bool {
        let max = match dom.kind(self.container) {
            NodeKind::Text => dom.text_len(self.container),
            _ => dom.child_count(self.container),
        };
        self.offset <= max
    }
}

/// A selection between two boundary points.
///
/// Ranges are values: they are read from the host once per request and at
/// most one replacement is written back.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DomRange {
    /// The start of the range.
    pub start: BoundaryPoint,
    /// The end of the range.
    pub end: BoundaryPoint,
}

impl DomRange {
    /// Creates a range from two points. No ordering is enforced.
    pub const fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    /// Creates a collapsed range at `container`/`offset`.
    pub const fn caret(container: NodeId, offset: usize) -> Self {
        let point = BoundaryPoint::new(container, offset);
        Self::new(point, point)
    }

    /// Creates a range that selects exactly `node`.
    pub fn select_node<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Option<Self> {
        let parent = dom.parent(node)?;
        let ix = index_in_parent(dom, node)?;
        Some(Self::new(
            BoundaryPoint::new(parent, ix),
            BoundaryPoint::new(parent, ix + 1),
        ))
    }

    /// Returns true if the start and end coincide.
    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Returns a copy collapsed onto its start (`to_start`) or end.
    #[must_use]
    pub fn collapse(&self, to_start: bool) -> Self {
        let point = if to_start { self.start } else { self.end };
        Self::new(point, point)
    }

    /// Returns the element selected by this range, if it spans exactly one
    /// child of an element.
    pub fn selected_node<D: Dom + ?Sized>(&self, dom: &D) -> Option<NodeId> {
        let (start, end) = (self.start, self.end);
        if start.container != end.container
            || dom.kind(start.container) != NodeKind::Element
            || end.offset != start.offset + 1
        {
            return None;
        }
        dom.child(start.container, start.offset)
    }

    /// Returns true if the range is attached to the root, in bounds and not
    /// reversed.
    pub fn is_valid<D: Dom + ?Sized>(&self, dom: &D) -> bool {
        is_attached(dom, self.start.container)
            && is_attached(dom, self.end.container)
            && self.start.is_in_bounds(dom)
            && self.end.is_in_bounds(dom)
            && self.start.compare(dom, &self.end) != Ordering::Greater
    }

    /// Rewrites the endpoints after `removed` was taken out of `parent` at
    /// `index`.
    pub fn adjust_for_removal(&mut self, parent: NodeId, index: usize, removed: NodeId) {
        for point in [&mut self.start, &mut self.end] {
            if point.container == removed {
                *point = BoundaryPoint::new(parent, index);
            } else if point.container == parent && point.offset > index {
                point.offset -= 1;
            }
        }
    }
}
