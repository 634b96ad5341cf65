// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stepping between caret positions in document order.

use alloc::vec::Vec;
use core::cmp::Ordering;

use super::position::CaretPosition;
use crate::dom::{
    block_ancestor, is_atomic, is_caret_container, is_content_editable_false, Dom,
    NodeId, NodeKind,
};
use crate::range::DomRange;

/// Horizontal movement direction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HDirection {
    /// Towards the end of the document.
    Forwards,
    /// Towards the start of the document.
    Backwards,
}

impl HDirection {
    /// Returns true for [`HDirection::Forwards`].
    pub fn is_forwards(self) -> bool {
        self == Self::Forwards
    }
}

/// Enumerates the caret positions below a root.
///
/// Positions are listed in document order. Adjacent text nodes in the same
/// block share their boundary, so stepping never stalls on a node edge.
/// Positions inside non-editable elements, objects and caret containers are
/// never produced.
///
/// Positions are kept in document order, so locating one is a binary search.
/// A walker is a snapshot: create a new one after mutating the document.
#[derive(Clone, Debug)]
pub struct CaretWalker<'a, D: ?Sized> {
    dom: &'a D,
    root: NodeId,
    positions: Vec<CaretPosition>,
}

impl<'a, D: Dom + ?Sized> CaretWalker<'a, D> {
    /// Creates a walker over the positions inside `root`.
    pub fn new(dom: &'a D, root: NodeId) -> Self {
        let mut walker = Self {
            dom,
            root,
            positions: Vec::new(),
        };
        let mut positions = Vec::new();
        walker.collect(root, &mut positions);
        if positions.is_empty() {
            positions.push(CaretPosition::new(root, 0));
        }
        walker.positions = positions;
        walker
    }

    /// Returns the root this walker is bounded by.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns every caret position, in document order.
    pub fn positions(&self) -> &[CaretPosition] {
        &self.positions
    }

    fn collect(&self, node: NodeId, out: &mut Vec<CaretPosition>) {
        let dom = self.dom;
        for ix in 0..dom.child_count(node) {
            let Some(child) = dom.child(node, ix) else {
                continue;
            };
            match dom.kind(child) {
                NodeKind::CaretContainer { .. } => {}
                NodeKind::Text => {
                    let len = dom.text_len(child);
                    if len == 0 {
                        continue;
                    }
                    let block = block_ancestor(dom, child);
                    let joins = out.last().is_some_and(|last| {
                        last.is_text(dom)
                            && last.is_at_end(dom)
                            && block_ancestor(dom, last.container()) == block
                    });
                    let first = usize::from(joins);
                    out.extend((first..=len).map(|offset| CaretPosition::new(child, offset)));
                }
                NodeKind::Element if is_atomic(dom, child) => {
                    let before = CaretPosition::new(node, ix);
                    if out.last() != Some(&before) {
                        out.push(before);
                    }
                    out.push(CaretPosition::new(node, ix + 1));
                }
                NodeKind::Element => {
                    let len = out.len();
                    self.collect(child, out);
                    if out.len() == len && dom.is_block(child) {
                        out.push(CaretPosition::new(child, 0));
                    }
                }
            }
        }
    }

    /// Maps an unlisted position onto the listed position drawn at the same
    /// place, if there is one.
    fn canonical(&self, pos: CaretPosition) -> CaretPosition {
        let dom = self.dom;
        if dom.kind(pos.container()) != NodeKind::Element {
            return pos;
        }
        let text = |node: Option<NodeId>| {
            node.filter(|&n| dom.kind(n) == NodeKind::Text && dom.text_len(n) > 0)
        };
        if let Some(next) = text(pos.adjacent_node(dom, false)) {
            return CaretPosition::new(next, 0);
        }
        if let Some(prev) = text(pos.adjacent_node(dom, true)) {
            return CaretPosition::new(prev, dom.text_len(prev));
        }
        pos
    }

    /// Finds `pos` in the sorted position list, or the index of the first
    /// position after it.
    fn search(&self, pos: &CaretPosition) -> Result<usize, usize> {
        let ix = self
            .positions
            .partition_point(|p| p.compare(self.dom, pos) == Ordering::Less);
        if self.positions.get(ix) == Some(pos) {
            Ok(ix)
        } else {
            Err(ix)
        }
    }

    fn locate(&self, pos: CaretPosition) -> Result<usize, usize> {
        self.search(&pos).or_else(|_| self.search(&self.canonical(pos)))
    }

    /// Returns the position after `pos`.
    pub fn next(&self, pos: CaretPosition) -> Option<CaretPosition> {
        let ix = match self.locate(pos) {
            Ok(ix) => ix + 1,
            Err(ix) => ix,
        };
        self.positions.get(ix).copied()
    }

    /// Returns the position before `pos`.
    pub fn prev(&self, pos: CaretPosition) -> Option<CaretPosition> {
        let ix = match self.locate(pos) {
            Ok(ix) | Err(ix) => ix.checked_sub(1)?,
        };
        self.positions.get(ix).copied()
    }

    /// Steps once in `direction`.
    pub fn step(&self, direction: HDirection, pos: CaretPosition) -> Option<CaretPosition> {
        match direction {
            HDirection::Forwards => self.next(pos),
            HDirection::Backwards => self.prev(pos),
        }
    }
}

/// Steps in `direction` until a visible position is reached.
pub fn visual_step<D: Dom + ?Sized>(
    walker: &CaretWalker<'_, D>,
    direction: HDirection,
    pos: CaretPosition,
) -> Option<CaretPosition> {
    let mut cur = pos;
    loop {
        cur = walker.step(direction, cur)?;
        if cur.is_visible(walker.dom) {
            return Some(cur);
        }
    }
}

/// Moves a position out of a caret container, to the side given by
/// `forwards`.
pub fn normalize_position<D: Dom + ?Sized>(
    dom: &D,
    forwards: bool,
    pos: CaretPosition,
) -> CaretPosition {
    let container = pos.container();
    if !is_caret_container(dom, container) {
        return pos;
    }
    let outside = if forwards {
        CaretPosition::after(dom, container)
    } else {
        CaretPosition::before(dom, container)
    };
    outside.unwrap_or(pos)
}

/// Returns the edge of `range` a move in `direction` starts from.
///
/// The edge is lifted out of caret containers. A text edge touching the end
/// of its node is moved beside a non-editable sibling in the direction of
/// travel, so the sibling is seen as adjacent.
pub fn normalized_range_end_point<D: Dom + ?Sized>(
    dom: &D,
    direction: HDirection,
    range: &DomRange,
) -> CaretPosition {
    let forwards = direction.is_forwards();
    let pos = if forwards {
        CaretPosition::from_range_end(range)
    } else {
        CaretPosition::from_range_start(range)
    };
    let container = pos.container();
    if is_caret_container(dom, container) {
        return normalize_position(dom, forwards, pos);
    }
    if !pos.is_text(dom) {
        return pos;
    }
    let at_edge = if forwards {
        pos.is_at_end(dom)
    } else {
        pos.is_at_start()
    };
    if !at_edge {
        return pos;
    }
    let outside = if forwards {
        CaretPosition::after(dom, container)
    } else {
        CaretPosition::before(dom, container)
    };
    match outside {
        Some(outside)
            if outside
                .adjacent_node(dom, !forwards)
                .is_some_and(|sibling| is_content_editable_false(dom, sibling)) =>
        {
            outside
        }
        _ => pos,
    }
}

/// Returns true if both positions share their closest block.
pub fn is_move_inside_same_block<D: Dom + ?Sized>(
    dom: &D,
    from: &CaretPosition,
    to: &CaretPosition,
) -> bool {
    block_ancestor(dom, from.container()) == block_ancestor(dom, to.container())
}

/// Returns true if `range` starts inside a block caret container.
pub(crate) fn is_range_in_caret_container_block<D: Dom + ?Sized>(
    dom: &D,
    range: &DomRange,
) -> bool {
    let mut cur = Some(range.start.container);
    while let Some(node) = cur {
        if dom.kind(node) == (NodeKind::CaretContainer { block: true }) {
            return true;
        }
        if node == dom.root() {
            break;
        }
        cur = dom.parent(node);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn walk_all(doc: &Document) -> Vec<(NodeId, usize)> {
        CaretWalker::new(doc, doc.root())
            .positions()
            .iter()
            .map(|p| (p.container(), p.offset()))
            .collect()
    }

    #[test]
    fn adjacent_text_shares_boundary() {
        let doc = Document::parse("<p>ab<b>cd</b></p>").unwrap();
        let p = doc.child(doc.root(), 0).unwrap();
        let ab = doc.child(p, 0).unwrap();
        let cd = doc.child(doc.child(p, 1).unwrap(), 0).unwrap();
        assert_eq!(
            walk_all(&doc),
            [(ab, 0), (ab, 1), (ab, 2), (cd, 1), (cd, 2)]
        );
    }

    #[test]
    fn atomic_elements_are_stepped_over() {
        let doc = Document::parse("<p>a<img cef/></p><div cef>x</div><p/>").unwrap();
        let root = doc.root();
        let p = doc.child(root, 0).unwrap();
        let a = doc.child(p, 0).unwrap();
        let empty = doc.child(root, 2).unwrap();
        assert_eq!(
            walk_all(&doc),
            [
                (a, 0),
                (a, 1),
                (p, 1),
                (p, 2),
                (root, 1),
                (root, 2),
                (empty, 0)
            ]
        );
    }

    #[test]
    fn every_position_steps_to_its_neighbour() {
        let doc = Document::parse(concat!(
            "<h1>ab<b>c</b></h1><p>a<img cef/><img/>b<span>cd</span></p>",
            "<div cef>x</div><p/><div><p>ef</p></div>"
        ))
        .unwrap();
        let walker = CaretWalker::new(&doc, doc.root());
        let positions = walker.positions();
        for pair in positions.windows(2) {
            assert_eq!(pair[0].compare(&doc, &pair[1]), Ordering::Less);
            assert_eq!(walker.next(pair[0]), Some(pair[1]));
            assert_eq!(walker.prev(pair[1]), Some(pair[0]));
        }
        assert_eq!(walker.prev(positions[0]), None);
        assert_eq!(walker.next(positions[positions.len() - 1]), None);
    }

    #[test]
    fn unlisted_positions_step_from_their_place() {
        let doc = Document::parse("<p>ab</p><p>cd</p>").unwrap();
        let root = doc.root();
        let first = doc.child(root, 0).unwrap();
        let ab = doc.child(first, 0).unwrap();
        let cd = doc.child(doc.child(root, 1).unwrap(), 0).unwrap();
        let walker = CaretWalker::new(&doc, root);
        // Equivalent to the start of "ab".
        let start = CaretPosition::new(first, 0);
        assert_eq!(walker.next(start), Some(CaretPosition::new(ab, 1)));
        assert_eq!(walker.prev(start), None);
        // Between the paragraphs.
        let between = CaretPosition::new(root, 1);
        assert_eq!(walker.next(between), Some(CaretPosition::new(cd, 0)));
        assert_eq!(walker.prev(between), Some(CaretPosition::new(ab, 2)));
    }

    #[test]
    fn text_edge_lifts_beside_cef() {
        let doc = Document::parse("<p>abc<img cef/></p>").unwrap();
        let p = doc.child(doc.root(), 0).unwrap();
        let abc = doc.child(p, 0).unwrap();
        let range = DomRange::caret(abc, 3);
        assert_eq!(
            normalized_range_end_point(&doc, HDirection::Forwards, &range),
            CaretPosition::new(p, 1)
        );
        let range = DomRange::caret(abc, 2);
        assert_eq!(
            normalized_range_end_point(&doc, HDirection::Forwards, &range),
            CaretPosition::new(abc, 2)
        );
    }

    #[test]
    fn caret_container_is_left_in_travel_direction() {
        let doc = Document::parse("<img cef/><caret-block/><p>a</p>").unwrap();
        let root = doc.root();
        let container = doc.child(root, 1).unwrap();
        let inside = CaretPosition::new(container, 0);
        assert_eq!(
            normalize_position(&doc, true, inside),
            CaretPosition::new(root, 2)
        );
        assert_eq!(
            normalize_position(&doc, false, inside),
            CaretPosition::new(root, 1)
        );
        assert!(is_range_in_caret_container_block(&doc, &inside.to_range()));
    }
}
