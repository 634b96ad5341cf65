// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard navigation around non-editable content.
//!
//! The free functions in this module compute the range a key press should
//! produce, or `None` when the host's own caret movement should run instead.
//! They may show or hide the fake caret while doing so, but never touch the
//! selection. [`NavigationSession`] wraps them with the read/commit cycle:
//! read the selection once, compute, validate, then write at most one range
//! back.

use alloc::vec::Vec;

#[cfg(feature = "libm")]
#[allow(unused_imports, reason = "float methods are inherent with std")]
use core_maths::CoreFloat;

use crate::caret::{
    find_closest_client_rect, is_above_line, is_line, is_move_inside_same_block,
    is_range_in_caret_container_block, normalize_position, normalized_range_end_point,
    positions_until, positions_until_next_line, positions_until_previous_line,
    render_range_caret, select_node, show_caret, visual_step, walk_until, AnyCef,
    CaretPosition, CaretWalker, CefStrategy, FakeCaret, HDirection, LineRect, VDirection,
};
use crate::dom::{
    content_editable_root, is_content_editable_false, Dom, EditorHost, NodeId, SelectionHost,
};
use crate::range::DomRange;

/// Options for a [`NavigationSession`].
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationSettings {
    /// Scroll committed ranges into view.
    pub scroll_into_view: bool,
    /// Width of the fake caret.
    pub caret_width: f64,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            scroll_into_view: true,
            caret_width: 1.0,
        }
    }
}

/// Returns the non-editable element at the start or end of `range`.
fn cef_end_point<D: Dom + ?Sized>(dom: &D, range: &DomRange, use_end: bool) -> Option<NodeId> {
    let point = if use_end { range.end } else { range.start };
    content_editable_root(dom, dom.root(), point.node(dom))
        .filter(|&node| is_content_editable_false(dom, node))
}

fn caret_candidate_node<D: Dom + ?Sized, C: CefStrategy>(
    dom: &D,
    range: &DomRange,
    forwards: bool,
    cef: &C,
) -> Option<NodeId> {
    range
        .selected_node(dom)
        .filter(|&node| cef.is_element(dom, node))
        .or_else(|| cef_end_point(dom, range, forwards))
}

/// Computes the result of a horizontal key press from `range`.
///
/// Returns `None` when the move involves no non-editable content and should
/// be left to the host.
pub fn move_horizontally<H: EditorHost + ?Sized, C: CefStrategy>(
    host: &mut H,
    caret: &mut FakeCaret,
    direction: HDirection,
    range: &DomRange,
    cef: &C,
) -> Option<DomRange> {
    let forwards = direction.is_forwards();

    if !range.collapsed() {
        let before = !forwards;
        if let Some(node) = caret_candidate_node(&*host, range, forwards, cef) {
            return show_caret(host, caret, node, before, false);
        }
        // Hosts cannot collapse a selection whose far end is a non-editable
        // block, so collapse it here.
        return cef_end_point(&*host, range, before).map(|_| range.collapse(before));
    }

    let is_wall = |dom: &H, pos: &CaretPosition| {
        if forwards {
            cef.is_before(dom, pos)
        } else {
            cef.is_after(dom, pos)
        }
    };

    let pos = normalized_range_end_point(&*host, direction, range);
    if is_wall(&*host, &pos) {
        let node = pos.adjacent_node(&*host, !forwards)?;
        return select_node(host, caret, node);
    }

    let in_container_block = is_range_in_caret_container_block(&*host, range);
    let (next, peek) = {
        let walker = CaretWalker::new(&*host, host.root());
        let next = visual_step(&walker, direction, pos)
            .map(|next| normalize_position(&*host, forwards, next));
        let peek = next.and_then(|next| visual_step(&walker, direction, next));
        (next, peek)
    };

    let Some(next) = next else {
        return in_container_block.then_some(*range);
    };
    if is_wall(&*host, &next) {
        let node = next.adjacent_node(&*host, !forwards)?;
        return show_caret(host, caret, node, forwards, false);
    }

    // ab|c<cef> moves to abc|<cef>, which is drawn as a fake caret.
    if let Some(peek) = peek {
        if is_wall(&*host, &peek) && is_move_inside_same_block(&*host, &next, &peek) {
            let node = peek.adjacent_node(&*host, !forwards)?;
            return show_caret(host, caret, node, forwards, false);
        }
    }

    if in_container_block {
        return Some(render_range_caret(host, caret, next.to_range(), false));
    }
    None
}

/// Computes the result of a vertical key press from `range`.
///
/// Returns `None` when the move lands on ordinary text and should be left to
/// the host.
pub fn move_vertically<H: EditorHost + ?Sized, C: CefStrategy>(
    host: &mut H,
    caret: &mut FakeCaret,
    direction: VDirection,
    range: &DomRange,
    cef: &C,
) -> Option<DomRange> {
    let forwards = direction == VDirection::Down;
    let root = host.root();
    let pos = normalized_range_end_point(&*host, direction.walk_direction(), range);
    let caret_rect = pos.client_rects(&*host).last().copied();

    if !range.collapsed() {
        let before = !forwards;
        if cef_end_point(&*host, range, before).is_some() {
            return Some(range.collapse(before));
        }
    }

    let caret_rect = caret_rect?;
    let x = caret_rect.rect.x0;

    let next_line: Vec<LineRect> = walk_until(&*host, root, direction, is_above_line(1), pos)
        .into_iter()
        .filter(is_line(1))
        .collect();
    if let Some(closest) = find_closest_client_rect(&*host, &next_line, x) {
        if cef.is_element(&*host, closest.node) {
            let before = (x - closest.rect.x0).abs() < (x - closest.rect.x1).abs();
            return show_caret(host, caret, closest.node, before, false);
        }
    }

    let current = if cef.is_before(&*host, &pos) {
        pos.adjacent_node(&*host, false)
    } else if cef.is_after(&*host, &pos) {
        pos.adjacent_node(&*host, true)
    } else {
        range.selected_node(&*host)
    };
    if let Some(node) = current {
        let rects = positions_until(&*host, root, direction, is_above_line(1), node);
        let beyond: Vec<LineRect> = rects.iter().copied().filter(is_line(1)).collect();
        let landing = find_closest_client_rect(&*host, &beyond, x)
            .or_else(|| rects.iter().rev().copied().find(is_line(0)));
        if let Some(landing) = landing {
            return Some(render_range_caret(
                host,
                caret,
                landing.position.to_range(),
                false,
            ));
        }
    }

    if next_line.is_empty() {
        let end = line_end_point(&*host, range, forwards).filter(|end| {
            if forwards {
                cef.is_after(&*host, end)
            } else {
                cef.is_before(&*host, end)
            }
        })?;
        return Some(render_range_caret(host, caret, end.to_range(), false));
    }
    None
}

fn line_end_point<D: Dom + ?Sized>(
    dom: &D,
    range: &DomRange,
    forward: bool,
) -> Option<CaretPosition> {
    if forward {
        let from = CaretPosition::from_range_end(range);
        positions_until_next_line(dom, dom.root(), from)
            .positions
            .last()
            .copied()
    } else {
        let from = CaretPosition::from_range_start(range);
        positions_until_previous_line(dom, dom.root(), from)
            .positions
            .first()
            .copied()
    }
}

/// Returns the last (`forward`) or first caret position on the visual line
/// of the current selection.
pub fn get_line_end_point<H: SelectionHost + ?Sized>(
    host: &H,
    forward: bool,
) -> Option<CaretPosition> {
    let range = host.selection_range()?;
    line_end_point(host, &range, forward)
}

/// Moves the selection to the line end point if it satisfies
/// `is_element_position`.
///
/// Returns true if the selection was moved. No scrolling is performed.
pub fn move_to_line_end_point<H: EditorHost + ?Sized>(
    host: &mut H,
    caret: &mut FakeCaret,
    forward: bool,
    is_element_position: impl Fn(&H, &CaretPosition) -> bool,
) -> bool {
    let Some(pos) = get_line_end_point(&*host, forward) else {
        return false;
    };
    if !is_element_position(&*host, &pos) {
        return false;
    }
    let mut range = pos.to_range();
    caret.hide_adjusting(host, &mut range);
    log::debug!("line {} at {:?}", if forward { "end" } else { "start" }, range);
    host.set_selection_range(range);
    true
}

/// Replaces the selection with `range`, removing the fake caret unless the
/// range lives inside it.
///
/// The host may normalize the range; the range read back from the host is
/// the one scrolled into view.
pub fn move_to_range<H: EditorHost + ?Sized>(
    host: &mut H,
    caret: &mut FakeCaret,
    range: DomRange,
    scroll_into_view: bool,
) {
    let mut range = range;
    if !caret.hosts(&*host, &range) {
        caret.hide_adjusting(host, &mut range);
    }
    host.set_selection_range(range);
    if scroll_into_view {
        if let Some(committed) = host.selection_range() {
            host.scroll_into_view(&committed);
        }
    }
}

/// Keyboard navigation state for one editor.
///
/// The session owns the fake caret, so two sessions never share one. Each
/// entry point reads the selection once and commits at most one range.
#[derive(Clone, Debug, Default)]
pub struct NavigationSession {
    caret: FakeCaret,
    settings: NavigationSettings,
}

impl NavigationSession {
    /// Creates a session with `settings`.
    pub fn new(settings: NavigationSettings) -> Self {
        Self {
            caret: FakeCaret::new(settings.caret_width),
            settings,
        }
    }

    /// Returns the session settings.
    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// Returns the fake caret.
    pub fn fake_caret(&self) -> &FakeCaret {
        &self.caret
    }

    fn current_range<H: SelectionHost + ?Sized>(&self, host: &H) -> Option<DomRange> {
        let range = host.selection_range()?;
        let valid = range.is_valid(host);
        debug_assert!(valid, "selection {range:?} is outside the editable root");
        if !valid {
            log::error!("selection {range:?} is outside the editable root");
            return None;
        }
        Some(range)
    }

    fn commit<H: EditorHost + ?Sized>(&mut self, host: &mut H, result: Option<DomRange>) -> bool {
        let Some(range) = result else {
            log::trace!("no move, deferring to host");
            return false;
        };
        if !range.is_valid(&*host) {
            log::error!("discarding invalid range {range:?}");
            return false;
        }
        move_to_range(host, &mut self.caret, range, self.settings.scroll_into_view);
        true
    }

    /// Handles a horizontal key press. Returns true if the selection changed.
    pub fn move_horizontally<H: EditorHost + ?Sized, C: CefStrategy>(
        &mut self,
        host: &mut H,
        direction: HDirection,
        cef: &C,
    ) -> bool {
        let Some(range) = self.current_range(&*host) else {
            return false;
        };
        let result = move_horizontally(host, &mut self.caret, direction, &range, cef);
        self.commit(host, result)
    }

    /// Handles a vertical key press. Returns true if the selection changed.
    pub fn move_vertically<H: EditorHost + ?Sized, C: CefStrategy>(
        &mut self,
        host: &mut H,
        direction: VDirection,
        cef: &C,
    ) -> bool {
        let Some(range) = self.current_range(&*host) else {
            return false;
        };
        let result = move_vertically(host, &mut self.caret, direction, &range, cef);
        self.commit(host, result)
    }

    /// Moves to the start or end of the visual line when that position
    /// satisfies `is_element_position`.
    pub fn move_to_line_end_point<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        forward: bool,
        is_element_position: impl Fn(&H, &CaretPosition) -> bool,
    ) -> bool {
        if self.current_range(&*host).is_none() {
            return false;
        }
        move_to_line_end_point(host, &mut self.caret, forward, is_element_position)
    }

    /// Replaces the selection with `range`.
    pub fn move_to_range<H: EditorHost + ?Sized>(&mut self, host: &mut H, range: DomRange) {
        move_to_range(host, &mut self.caret, range, self.settings.scroll_into_view);
    }

    /// Removes the fake caret, keeping the selection where it was.
    pub fn hide_fake_caret<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        let selection = host.selection_range();
        if let Some((parent, index, removed)) = self.caret.hide(host) {
            if let Some(mut selection) = selection {
                selection.adjust_for_removal(parent, index, removed);
                host.set_selection_range(selection);
            }
        }
    }

    // --- MARK: Key bindings ---

    /// Left arrow, treating every non-editable element as a wall.
    pub fn move_left<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.move_horizontally(host, HDirection::Backwards, &AnyCef)
    }

    /// Right arrow.
    pub fn move_right<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.move_horizontally(host, HDirection::Forwards, &AnyCef)
    }

    /// Up arrow.
    pub fn move_up<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.move_vertically(host, VDirection::Up, &AnyCef)
    }

    /// Down arrow.
    pub fn move_down<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.move_vertically(host, VDirection::Down, &AnyCef)
    }

    /// Home: the first caret position of the visual line.
    pub fn move_to_line_start<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.move_to_line_end_point(host, false, |_, _| true)
    }

    /// End: the last caret position of the visual line.
    pub fn move_to_line_end<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.move_to_line_end_point(host, true, |_, _| true)
    }
}
