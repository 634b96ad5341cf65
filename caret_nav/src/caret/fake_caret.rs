// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fake caret: a caret drawn beside non-editable content.
//!
//! A real selection cannot be placed next to a non-editable element in a
//! way every host renders, so a caret container is inserted beside the
//! element and the selection is put inside it. At most one container is live
//! at a time; showing a new fake caret removes the previous one first.

use peniko::kurbo::Rect;

use super::cef::{AnyCef, CefStrategy};
use super::position::CaretPosition;
use crate::dom::{contains, Dom, DomMut, NodeId, ScrollService};
use crate::range::DomRange;

/// A fake caret currently shown in the document.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LiveCaret {
    /// The caret container hosting the selection.
    pub container: NodeId,
    /// The non-editable element the caret is drawn against.
    pub target: NodeId,
    /// Whether the caret is drawn before `target`.
    pub before: bool,
    /// Where the caret is drawn.
    pub rect: Rect,
}

/// Owner of the single fake caret of an editing session.
#[derive(Clone, Debug, PartialEq)]
pub struct FakeCaret {
    live: Option<LiveCaret>,
    width: f64,
}

impl Default for FakeCaret {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl FakeCaret {
    /// Creates a hidden fake caret drawn `width` wide when shown.
    pub fn new(width: f64) -> Self {
        Self { live: None, width }
    }

    /// Returns the live caret, if one is shown.
    pub fn live(&self) -> Option<&LiveCaret> {
        self.live.as_ref()
    }

    /// Returns true if a fake caret is shown.
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Returns true if `range` sits inside the live caret container.
    pub fn hosts<D: Dom + ?Sized>(&self, dom: &D, range: &DomRange) -> bool {
        self.live
            .is_some_and(|live| contains(dom, live.container, range.start.container))
    }

    /// Shows the caret before or after `target`, replacing any live caret,
    /// and returns a collapsed range inside the new container.
    ///
    /// A target without a parent or geometry leaves the live caret as it is.
    pub fn show<H: DomMut + ?Sized>(
        &mut self,
        host: &mut H,
        target: NodeId,
        before: bool,
    ) -> Option<DomRange> {
        let edge = host.node_rect(target)?;
        host.parent(target)?;
        let block = host.is_block(target);
        self.hide(host);
        let container = host.insert_caret_container(target, before, block)?;
        let x = if before { edge.x0 } else { edge.x1 };
        let live = LiveCaret {
            container,
            target,
            before,
            rect: Rect::new(x, edge.y0, x + self.width, edge.y1),
        };
        log::debug!(
            "fake caret {} {:?} at {:?}",
            if before { "before" } else { "after" },
            target,
            live.rect
        );
        self.live = Some(live);
        Some(DomRange::caret(container, 0))
    }

    /// Removes the live caret container, if any.
    ///
    /// Returns the parent and index the container was removed from, and the
    /// container itself.
    pub fn hide<H: DomMut + ?Sized>(&mut self, host: &mut H) -> Option<(NodeId, usize, NodeId)> {
        let live = self.live.take()?;
        log::trace!("hiding fake caret beside {:?}", live.target);
        host.remove_node(live.container)
            .map(|(parent, index)| (parent, index, live.container))
    }

    /// Removes the live caret container and rewrites `range` so it stays
    /// valid once the container is gone.
    pub fn hide_adjusting<H: DomMut + ?Sized>(&mut self, host: &mut H, range: &mut DomRange) {
        if let Some((parent, index, removed)) = self.hide(host) {
            range.adjust_for_removal(parent, index, removed);
        }
    }
}

/// Shows the fake caret beside `node` and optionally scrolls it into view.
pub fn show_caret<H: DomMut + ScrollService + ?Sized>(
    host: &mut H,
    caret: &mut FakeCaret,
    node: NodeId,
    before: bool,
    scroll_into_view: bool,
) -> Option<DomRange> {
    let range = caret.show(host, node, before)?;
    if scroll_into_view {
        host.scroll_into_view(&range);
    }
    Some(range)
}

/// Hides the fake caret and returns a range selecting exactly `node`.
pub fn select_node<H: DomMut + ?Sized>(
    host: &mut H,
    caret: &mut FakeCaret,
    node: NodeId,
) -> Option<DomRange> {
    caret.hide(host);
    DomRange::select_node(&*host, node)
}

/// Prepares `range` for display.
///
/// A collapsed range directly beside a non-editable element is replaced by
/// a fake caret; any other range hides the fake caret and is returned with
/// its offsets fixed up for the removal.
pub fn render_range_caret<H: DomMut + ScrollService + ?Sized>(
    host: &mut H,
    caret: &mut FakeCaret,
    range: DomRange,
    scroll_into_view: bool,
) -> DomRange {
    if range.collapsed() && !caret.hosts(&*host, &range) {
        let pos = CaretPosition::from_range_start(&range);
        let beside = if AnyCef.is_before(&*host, &pos) {
            pos.adjacent_node(&*host, false).map(|node| (node, true))
        } else if AnyCef.is_after(&*host, &pos) {
            pos.adjacent_node(&*host, true).map(|node| (node, false))
        } else {
            None
        };
        if let Some((node, before)) = beside {
            if let Some(shown) = show_caret(host, caret, node, before, scroll_into_view) {
                return shown;
            }
        }
    }
    let mut range = range;
    if !caret.hosts(&*host, &range) {
        caret.hide_adjusting(host, &mut range);
    }
    if scroll_into_view {
        host.scroll_into_view(&range);
    }
    range
}
