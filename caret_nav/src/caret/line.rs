// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual line classification.
//!
//! Walking away from a start position, every client rectangle is tagged with
//! the number of visual lines crossed so far. Vertical movement uses these
//! tags to find the line it lands on, and Home/End use the line reader at the
//! bottom of this module to find where the current line begins and ends.

use alloc::vec::Vec;

use peniko::kurbo::Rect;

use super::geom::{edge_distance, is_above, is_below, is_inside_x};
use super::position::{CaretPosition, ClientRect};
use super::walker::{is_move_inside_same_block, CaretWalker, HDirection};
use crate::dom::{is_content_editable_false, Dom, NodeId};

/// Vertical movement direction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VDirection {
    /// Towards the top of the document.
    Up,
    /// Towards the bottom of the document.
    Down,
}

impl VDirection {
    /// Returns the matching horizontal walk direction.
    pub fn walk_direction(self) -> HDirection {
        match self {
            Self::Up => HDirection::Backwards,
            Self::Down => HDirection::Forwards,
        }
    }
}

/// A client rectangle tagged with the number of visual lines crossed to
/// reach it.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LineRect {
    /// The caret box, or the whole box of a non-editable element.
    pub rect: Rect,
    /// The node that produced the rectangle.
    pub node: NodeId,
    /// The position the rectangle belongs to.
    pub position: CaretPosition,
    /// Lines crossed, zero for the starting line.
    pub line: usize,
}

/// Returns a predicate matching rectangles beyond line `line`.
pub fn is_above_line(line: usize) -> impl Fn(&LineRect) -> bool {
    move |rect| rect.line > line
}

/// Returns a predicate matching rectangles on line `line`.
pub fn is_line(line: usize) -> impl Fn(&LineRect) -> bool {
    move |rect| rect.line == line
}

fn crosses(direction: VDirection, rect: Rect, target: Rect) -> bool {
    match direction {
        VDirection::Up => is_above(rect, target),
        VDirection::Down => is_below(rect, target),
    }
}

fn in_walk_order(direction: VDirection, rects: &[ClientRect]) -> Vec<ClientRect> {
    let mut rects = rects.to_vec();
    if direction == VDirection::Up {
        rects.reverse();
    }
    rects
}

struct LineWalk<'w, 'a, D: ?Sized> {
    walker: &'w CaretWalker<'a, D>,
    dom: &'a D,
    direction: VDirection,
}

impl<D: Dom + ?Sized> LineWalk<'_, '_, D> {
    /// Classifies rectangles from `first` onwards against `target`, stopping
    /// at the first rectangle matching `stop`.
    fn run(
        &self,
        first: Option<CaretPosition>,
        mut target: Rect,
        stop: &dyn Fn(&LineRect) -> bool,
    ) -> Vec<LineRect> {
        let dom = self.dom;
        let mut out = Vec::new();
        let mut line = 0;
        let mut cur = first;
        while let Some(pos) = cur {
            cur = self.walker.step(self.direction.walk_direction(), pos);
            if !pos.is_visible(dom) {
                continue;
            }
            for client in in_walk_order(self.direction, &pos.client_rects(dom)) {
                if crosses(self.direction, client.rect, target) {
                    line += 1;
                    target = client.rect;
                }
                let rect = if is_content_editable_false(dom, client.node) {
                    dom.node_rect(client.node).unwrap_or(client.rect)
                } else {
                    client.rect
                };
                let line_rect = LineRect {
                    rect,
                    node: client.node,
                    position: pos,
                    line,
                };
                if stop(&line_rect) {
                    return out;
                }
                out.push(line_rect);
            }
        }
        out
    }
}

/// Walks away from `start` in `direction`, classifying every rectangle until
/// one matches `stop`.
///
/// The start position itself is not included.
pub fn walk_until<D: Dom + ?Sized>(
    dom: &D,
    root: NodeId,
    direction: VDirection,
    stop: impl Fn(&LineRect) -> bool,
    start: CaretPosition,
) -> Vec<LineRect> {
    let rects = start.client_rects(dom);
    let target = match direction {
        VDirection::Up => rects.first(),
        VDirection::Down => rects.last(),
    };
    let Some(target) = target else {
        return Vec::new();
    };
    let walker = CaretWalker::new(dom, root);
    let walk = LineWalk {
        walker: &walker,
        dom,
        direction,
    };
    let first = walker.step(direction.walk_direction(), start);
    walk.run(first, target.rect, &stop)
}

/// Classifies positions on the far side of `node`, measuring lines from the
/// node's own box.
///
/// The walk starts with the position just past the node.
pub fn positions_until<D: Dom + ?Sized>(
    dom: &D,
    root: NodeId,
    direction: VDirection,
    stop: impl Fn(&LineRect) -> bool,
    node: NodeId,
) -> Vec<LineRect> {
    let (start, target) = match direction {
        VDirection::Up => (CaretPosition::before(dom, node), dom.node_rect(node)),
        VDirection::Down => (CaretPosition::after(dom, node), dom.node_rect(node)),
    };
    let (Some(start), Some(target)) = (start, target) else {
        return Vec::new();
    };
    let walker = CaretWalker::new(dom, root);
    let walk = LineWalk {
        walker: &walker,
        dom,
        direction,
    };
    walk.run(Some(start), target, &stop)
}

/// Picks the rectangle best matching the horizontal coordinate `x`.
///
/// Rectangles spanning `x` win outright. Otherwise the nearest edge wins,
/// and a non-editable element wins a tie.
pub fn find_closest_client_rect<D: Dom + ?Sized>(
    dom: &D,
    rects: &[LineRect],
    x: f64,
) -> Option<LineRect> {
    rects.iter().copied().reduce(|old, new| {
        if is_inside_x(new.rect, x) {
            return new;
        }
        if is_inside_x(old.rect, x) {
            return old;
        }
        let old_distance = edge_distance(old.rect, x);
        let new_distance = edge_distance(new.rect, x);
        if new_distance == old_distance && is_content_editable_false(dom, new.node) {
            return new;
        }
        if new_distance < old_distance {
            new
        } else {
            old
        }
    })
}

/// How a line read by [`positions_until_next_line`] or
/// [`positions_until_previous_line`] ended.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BreakType {
    /// A new block starts.
    Block,
    /// The line wraps visually.
    Wrap,
    /// The document ends.
    Eol,
}

/// The visible positions between a start and the edge of its line.
#[derive(Clone, PartialEq, Debug)]
pub struct LineInfo {
    /// Positions on the line in document order, excluding the start.
    pub positions: Vec<CaretPosition>,
    /// Why the line ended.
    pub break_type: BreakType,
    /// The first position past the edge, if any.
    pub break_at: Option<CaretPosition>,
}

fn read_line<D: Dom + ?Sized>(
    dom: &D,
    root: NodeId,
    direction: HDirection,
    from: CaretPosition,
) -> LineInfo {
    let walker = CaretWalker::new(dom, root);
    let forwards = direction.is_forwards();
    let anchor = from.client_rects(dom);
    let anchor = if forwards {
        anchor.last()
    } else {
        anchor.first()
    }
    .map(|client| client.rect);
    let mut positions = Vec::new();
    let mut cur = from;
    let (break_type, break_at) = loop {
        let Some(next) = walker.step(direction, cur) else {
            break (BreakType::Eol, None);
        };
        if !is_move_inside_same_block(dom, &cur, &next) {
            break (BreakType::Block, Some(next));
        }
        cur = next;
        if !next.is_visible(dom) {
            continue;
        }
        let rects = next.client_rects(dom);
        let wrapped = anchor.is_some_and(|anchor| {
            let edge = if forwards { rects.first() } else { rects.last() };
            edge.is_some_and(|client| {
                if forwards {
                    is_below(client.rect, anchor)
                } else {
                    is_above(client.rect, anchor)
                }
            })
        });
        if wrapped {
            break (BreakType::Wrap, Some(next));
        }
        positions.push(next);
    };
    if !forwards {
        positions.reverse();
    }
    LineInfo {
        positions,
        break_type,
        break_at,
    }
}

/// Reads forwards from `from` to the end of its visual line.
pub fn positions_until_next_line<D: Dom + ?Sized>(
    dom: &D,
    root: NodeId,
    from: CaretPosition,
) -> LineInfo {
    read_line(dom, root, HDirection::Forwards, from)
}

/// Reads backwards from `from` to the start of its visual line.
pub fn positions_until_previous_line<D: Dom + ?Sized>(
    dom: &D,
    root: NodeId,
    from: CaretPosition,
) -> LineInfo {
    read_line(dom, root, HDirection::Backwards, from)
}
