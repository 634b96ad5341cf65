// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Predicates that decide which non-editable elements a movement treats as
//! walls.

use super::position::CaretPosition;
use crate::dom::{is_content_editable_false, Dom, NodeId};

/// Chooses which non-editable elements horizontal and vertical movement
/// stops at.
pub trait CefStrategy {
    /// Returns true if `node` is an element this strategy cares about.
    fn is_element<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool;

    /// Returns true if `pos` is directly before a matching element.
    fn is_before<D: Dom + ?Sized>(&self, dom: &D, pos: &CaretPosition) -> bool {
        pos.adjacent_node(dom, false)
            .is_some_and(|node| self.is_element(dom, node))
    }

    /// Returns true if `pos` is directly after a matching element.
    fn is_after<D: Dom + ?Sized>(&self, dom: &D, pos: &CaretPosition) -> bool {
        pos.adjacent_node(dom, true)
            .is_some_and(|node| self.is_element(dom, node))
    }
}

/// Matches every non-editable element.
#[derive(Copy, Clone, Debug, Default)]
pub struct AnyCef;

impl CefStrategy for AnyCef {
    fn is_element<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        is_content_editable_false(dom, node)
    }
}

/// Matches non-editable blocks only.
#[derive(Copy, Clone, Debug, Default)]
pub struct BlockCef;

impl CefStrategy for BlockCef {
    fn is_element<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        is_content_editable_false(dom, node) && dom.is_block(node)
    }
}

/// Matches non-editable inline elements only.
#[derive(Copy, Clone, Debug, Default)]
pub struct InlineCef;

impl CefStrategy for InlineCef {
    fn is_element<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        is_content_editable_false(dom, node) && !dom.is_block(node)
    }
}
