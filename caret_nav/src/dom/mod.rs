// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host document seam.
//!
//! Navigation never owns the document it walks. Everything it needs from the
//! host is expressed through the traits in this module:
//!
//! - [`Dom`] exposes the read-only tree and its geometry.
//! - [`DomMut`] is the narrow mutation surface used to host a fake caret.
//! - [`SelectionHost`] reads and replaces the active selection.
//! - [`ScrollService`] brings a committed range into view.
//!
//! [`Document`] is an in-memory implementation of all four, with a small
//! deterministic layout engine.

mod document;
mod layout;
mod markup;

use core::cmp::Ordering;

use peniko::kurbo::Rect;
use smallvec::SmallVec;

use crate::range::DomRange;

pub use self::document::Document;
pub use self::layout::LayoutMetrics;
pub use self::markup::{ParseMarkupError, ParseMarkupErrorKind};

/// Identifies a node in a host document.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a node identifier from a raw index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index of this identifier.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Coarse classification of a node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NodeKind {
    /// A run of characters.
    Text,
    /// Any element, including the root.
    Element,
    /// A synthetic node inserted beside non-editable content so that a caret
    /// has somewhere to live.
    CaretContainer {
        /// Whether the container is a block (hosts a caret beside a block).
        block: bool,
    },
}

/// Read-only access to a host document tree and its geometry.
///
/// Text offsets are measured in `char`s. Geometry is a snapshot of the
/// current layout; implementations must not serve rectangles computed before
/// the last mutation.
pub trait Dom {
    /// The editable root that bounds every navigation.
    fn root(&self) -> NodeId;

    /// Returns the parent of `node`, or `None` for the root and detached nodes.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Returns the number of children of `node`.
    fn child_count(&self, node: NodeId) -> usize;

    /// Returns the child of `node` at `index`.
    fn child(&self, node: NodeId, index: usize) -> Option<NodeId>;

    /// Returns the kind of `node`.
    fn kind(&self, node: NodeId) -> NodeKind;

    /// Returns the number of characters in a text node, zero for other nodes.
    fn text_len(&self, node: NodeId) -> usize;

    /// Returns the character at `index` in a text node.
    fn char_at(&self, node: NodeId, index: usize) -> Option<char>;

    /// Returns true if `node` establishes a block.
    fn is_block(&self, node: NodeId) -> bool;

    /// Returns true if `node` is a replaced object such as an image.
    fn is_object(&self, node: NodeId) -> bool;

    /// Returns the explicit `contenteditable` state of `node`, if any.
    fn content_editable(&self, node: NodeId) -> Option<bool>;

    /// Returns the box of the character at `index` in a text node.
    fn char_rect(&self, node: NodeId, index: usize) -> Option<Rect>;

    /// Returns the border box of `node`.
    fn node_rect(&self, node: NodeId) -> Option<Rect>;
}

/// The mutations needed to render a fake caret.
pub trait DomMut: Dom {
    /// Inserts an empty caret container next to `beside` and returns it.
    ///
    /// The container goes before `beside` when `before` is true.
    fn insert_caret_container(&mut self, beside: NodeId, before: bool, block: bool)
        -> Option<NodeId>;

    /// Detaches `node`, returning its former parent and index.
    fn remove_node(&mut self, node: NodeId) -> Option<(NodeId, usize)>;
}

/// Owner of the active selection.
pub trait SelectionHost: Dom {
    /// Returns the active selection.
    fn selection_range(&self) -> Option<DomRange>;

    /// Replaces the active selection.
    ///
    /// Hosts may normalize the range; read it back with
    /// [`selection_range`](Self::selection_range).
    fn set_selection_range(&mut self, range: DomRange);
}

/// Scrolls committed ranges into view.
pub trait ScrollService {
    /// Scrolls so that `range` is visible. Best effort.
    fn scroll_into_view(&mut self, range: &DomRange);
}

/// Everything a navigation session needs from its host.
pub trait EditorHost: DomMut + SelectionHost + ScrollService {}

impl<T: DomMut + SelectionHost + ScrollService + ?Sized> EditorHost for T {}

// --- MARK: Node helpers ---

/// Returns true if `node` is a text node.
pub fn is_text<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    dom.kind(node) == NodeKind::Text
}

/// Returns true if `node` is an element (caret containers excluded).
pub fn is_element<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    dom.kind(node) == NodeKind::Element
}

/// Returns true if `node` is a caret container.
pub fn is_caret_container<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    matches!(dom.kind(node), NodeKind::CaretContainer { .. })
}

/// Returns true if `node` is an element explicitly marked non-editable.
pub fn is_content_editable_false<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    is_element(dom, node) && dom.content_editable(node) == Some(false)
}

/// Returns true if carets can sit beside `node` but never inside it.
pub fn is_atomic<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    is_element(dom, node) && (dom.content_editable(node) == Some(false) || dom.is_object(node))
}

/// Returns true for characters that occupy no horizontal space.
pub fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}')
}

/// Returns the index of `node` within its parent.
pub fn index_in_parent<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Option<usize> {
    let parent = dom.parent(node)?;
    (0..dom.child_count(parent)).find(|&ix| dom.child(parent, ix) == Some(node))
}

/// Returns true if `ancestor` is `node` or one of its ancestors.
pub fn contains<D: Dom + ?Sized>(dom: &D, ancestor: NodeId, node: NodeId) -> bool {
    let mut cur = Some(node);
    while let Some(n) = cur {
        if n == ancestor {
            return true;
        }
        cur = dom.parent(n);
    }
    false
}

/// Returns true if `node` is connected to the document root.
pub fn is_attached<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    contains(dom, dom.root(), node)
}

/// Returns the nearest block ancestor of `node`, including `node` itself.
///
/// The root is always treated as a block.
pub fn block_ancestor<D: Dom + ?Sized>(dom: &D, node: NodeId) -> NodeId {
    let root = dom.root();
    let mut cur = node;
    loop {
        if cur == root || (is_element(dom, cur) && dom.is_block(cur)) {
            return cur;
        }
        match dom.parent(cur) {
            Some(parent) => cur = parent,
            None => return root,
        }
    }
}

/// Returns the closest node between `node` and `root` that carries an
/// explicit `contenteditable` flag.
pub fn content_editable_root<D: Dom + ?Sized>(
    dom: &D,
    root: NodeId,
    node: NodeId,
) -> Option<NodeId> {
    let mut cur = Some(node);
    while let Some(n) = cur {
        if n == root {
            return None;
        }
        if is_element(dom, n) && dom.content_editable(n).is_some() {
            return Some(n);
        }
        cur = dom.parent(n);
    }
    None
}

/// Returns the chain of child indices leading from the root to `node`.
fn index_path<D: Dom + ?Sized>(dom: &D, node: NodeId) -> SmallVec<[usize; 8]> {
    let mut path = SmallVec::new();
    let mut cur = node;
    while let Some(ix) = index_in_parent(dom, cur) {
        path.push(ix);
        match dom.parent(cur) {
            Some(parent) => cur = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Compares two boundary points in document order.
///
/// This follows the DOM definition: a point inside a child compares after
/// the point immediately before that child in its parent.
pub fn compare_points<D: Dom + ?Sized>(
    dom: &D,
    (a, a_offset): (NodeId, usize),
    (b, b_offset): (NodeId, usize),
) -> Ordering {
    if a == b {
        return a_offset.cmp(&b_offset);
    }
    let a_path = index_path(dom, a);
    let b_path = index_path(dom, b);
    let common = a_path
        .iter()
        .zip(b_path.iter())
        .take_while(|(x, y)| x == y)
        .count();
    match (a_path.get(common), b_path.get(common)) {
        (Some(x), Some(y)) => x.cmp(y),
        // `a` is an ancestor of `b`.
        (None, Some(&child)) => {
            if a_offset <= child {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (Some(&child), None) => {
            if b_offset <= child {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (None, None) => a_offset.cmp(&b_offset),
    }
}
