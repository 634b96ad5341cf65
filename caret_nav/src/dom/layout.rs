// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic monospace layout for [`Document`].
//!
//! Blocks stack vertically and share the full content width. Inline content
//! flows into lines of `line_height`, wrapping at character granularity.
//! Non-editable blocks and `hr` take one or more whole lines; inline objects
//! take `object_width` unless they carry a `w` attribute.

use alloc::vec;
use alloc::vec::Vec;

use peniko::kurbo::Rect;

use super::document::Document;
use super::{is_zero_width, Dom, NodeId, NodeKind};

/// Metrics driving [`Document`] layout.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutMetrics {
    /// Advance of every visible character.
    pub char_width: f64,
    /// Height of a line box.
    pub line_height: f64,
    /// Width available to content. Lines wrap when they would exceed it.
    pub width: f64,
    /// Default width of inline objects.
    pub object_width: f64,
    /// Height of the scrolling viewport.
    pub viewport_height: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            char_width: 10.0,
            line_height: 20.0,
            width: 200.0,
            object_width: 20.0,
            viewport_height: 400.0,
        }
    }
}

/// Geometry for every node of a document snapshot.
#[derive(Clone, Debug, Default)]
pub(crate) struct Layout {
    node_rects: Vec<Option<Rect>>,
    char_rects: Vec<Vec<Rect>>,
}

impl Layout {
    pub(crate) fn node_rect(&self, node: NodeId) -> Option<Rect> {
        self.node_rects.get(node.index()).copied().flatten()
    }

    pub(crate) fn char_rect(&self, node: NodeId, index: usize) -> Option<Rect> {
        self.char_rects.get(node.index())?.get(index).copied()
    }

    /// Lays out `doc` from scratch.
    pub(crate) fn compute(doc: &Document) -> Self {
        let len = doc.node_capacity();
        let mut flow = Flow {
            doc,
            metrics: *doc.metrics(),
            layout: Self {
                node_rects: vec![None; len],
                char_rects: vec![Vec::new(); len],
            },
        };
        let width = flow.metrics.width;
        flow.block(doc.root(), 0.0, 0.0, width);
        flow.layout
    }
}

/// Pen position while filling line boxes.
#[derive(Copy, Clone, Debug)]
struct LineCursor {
    x: f64,
    top: f64,
}

struct Flow<'a> {
    doc: &'a Document,
    metrics: LayoutMetrics,
    layout: Layout,
}

impl Flow<'_> {
    fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.layout.node_rects[node.index()] = Some(rect);
    }

    fn is_block_level(&self, node: NodeId) -> bool {
        match self.doc.kind(node) {
            NodeKind::Element => self.doc.is_block(node),
            NodeKind::CaretContainer { block } => block,
            NodeKind::Text => false,
        }
    }

    /// Lays out a block and returns its bottom edge.
    fn block(&mut self, node: NodeId, x0: f64, y: f64, width: f64) -> f64 {
        let lh = self.metrics.line_height;
        if matches!(self.doc.kind(node), NodeKind::CaretContainer { .. }) {
            self.set_rect(node, Rect::new(x0, y, x0, y));
            return y;
        }
        if node != self.doc.root()
            && (self.doc.content_editable(node) == Some(false) || self.doc.is_object(node))
        {
            let lines = self
                .doc
                .attribute(node, "h")
                .and_then(|h| h.parse::<u32>().ok())
                .unwrap_or(1)
                .max(1);
            let bottom = y + lh * f64::from(lines);
            self.set_rect(node, Rect::new(x0, y, x0 + width, bottom));
            return bottom;
        }
        let mut cur_y = y;
        let mut line: Option<LineCursor> = None;
        for ix in 0..self.doc.child_count(node) {
            let Some(child) = self.doc.child(node, ix) else {
                continue;
            };
            if self.is_block_level(child) {
                if let Some(open) = line.take() {
                    cur_y = open.top + lh;
                }
                cur_y = self.block(child, x0, cur_y, width);
            } else {
                let cursor = line.get_or_insert(LineCursor { x: x0, top: cur_y });
                let mut pen = *cursor;
                self.inline(child, &mut pen, x0, width);
                *cursor = pen;
            }
        }
        if let Some(open) = line {
            cur_y = open.top + lh;
        }
        if cur_y == y {
            // Empty blocks still occupy a line.
            cur_y = y + lh;
        }
        self.set_rect(node, Rect::new(x0, y, x0 + width, cur_y));
        cur_y
    }

    /// Advances `pen` by `advance`, wrapping first if needed, and returns the
    /// box for the item.
    fn place(&self, pen: &mut LineCursor, advance: f64, x0: f64, width: f64) -> Rect {
        if advance > 0.0 && pen.x + advance > x0 + width && pen.x > x0 {
            pen.top += self.metrics.line_height;
            pen.x = x0;
        }
        let rect = Rect::new(
            pen.x,
            pen.top,
            pen.x + advance,
            pen.top + self.metrics.line_height,
        );
        pen.x += advance;
        rect
    }

    fn inline(&mut self, node: NodeId, pen: &mut LineCursor, x0: f64, width: f64) {
        match self.doc.kind(node) {
            NodeKind::Text => {
                let len = self.doc.text_len(node);
                let mut rects = Vec::with_capacity(len);
                for ix in 0..len {
                    let advance = match self.doc.char_at(node, ix) {
                        Some(c) if is_zero_width(c) => 0.0,
                        _ => self.metrics.char_width,
                    };
                    rects.push(self.place(pen, advance, x0, width));
                }
                let bounds = rects
                    .iter()
                    .copied()
                    .reduce(|a, b| a.union(b))
                    .unwrap_or_else(|| self.place(pen, 0.0, x0, width));
                self.set_rect(node, bounds);
                self.layout.char_rects[node.index()] = rects;
            }
            NodeKind::CaretContainer { .. } => {
                let rect = self.place(pen, 0.0, x0, width);
                self.set_rect(node, rect);
            }
            NodeKind::Element => {
                if self.doc.content_editable(node) == Some(false) || self.doc.is_object(node) {
                    let advance = self
                        .doc
                        .attribute(node, "w")
                        .and_then(|w| w.parse::<f64>().ok())
                        .unwrap_or(self.metrics.object_width);
                    let rect = self.place(pen, advance, x0, width);
                    self.set_rect(node, rect);
                    return;
                }
                let start = self.place(pen, 0.0, x0, width);
                let mut bounds: Option<Rect> = None;
                for ix in 0..self.doc.child_count(node) {
                    let Some(child) = self.doc.child(node, ix) else {
                        continue;
                    };
                    self.inline(child, pen, x0, width);
                    if let Some(rect) = self.layout.node_rect(child) {
                        bounds = Some(bounds.map_or(rect, |b| b.union(rect)));
                    }
                }
                self.set_rect(node, bounds.unwrap_or(start));
            }
        }
    }
}
