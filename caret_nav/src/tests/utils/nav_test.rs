// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::caret::LiveCaret;
use crate::dom::{Document, Dom, LayoutMetrics, NodeId, NodeKind, SelectionHost};
use crate::{DomRange, NavigationSession, NavigationSettings};

// Note: This module is only compiled when running tests, which requires std,
// so we don't have to worry about being no_std-compatible.

/// Helper struct for driving a navigation session over a parsed document.
///
/// Documents and expectations are both written in markup, so the intent of a
/// test reads straight from its source:
///
/// ```text
/// let mut test = NavTest::new("<p>ab|c<img cef/></p>");
/// test.right();
/// test.assert_markup("<p>abc<caret>|</caret><img cef/></p>");
/// ```
///
/// A live fake caret shows up in the markup as a `caret` (or `caret-block`)
/// element holding the selection.
pub(crate) struct NavTest {
    doc: Document,
    session: NavigationSession,
}

impl NavTest {
    #[track_caller]
    pub(crate) fn new(markup: &str) -> Self {
        Self::with_metrics(markup, LayoutMetrics::default())
    }

    #[track_caller]
    pub(crate) fn with_metrics(markup: &str, metrics: LayoutMetrics) -> Self {
        let doc = match Document::parse_with_metrics(markup, metrics) {
            Ok(doc) => doc,
            Err(err) => panic!("invalid test markup '{markup}': {err}"),
        };
        Self {
            doc,
            session: NavigationSession::new(NavigationSettings::default()),
        }
    }

    /// Replaces the session settings, dropping any live fake caret state.
    pub(crate) fn with_settings(mut self, settings: NavigationSettings) -> Self {
        self.session = NavigationSession::new(settings);
        self
    }

    pub(crate) fn doc(&self) -> &Document {
        &self.doc
    }

    pub(crate) fn parts(&mut self) -> (&mut Document, &mut NavigationSession) {
        (&mut self.doc, &mut self.session)
    }

    pub(crate) fn left(&mut self) -> bool {
        self.session.move_left(&mut self.doc)
    }

    pub(crate) fn right(&mut self) -> bool {
        self.session.move_right(&mut self.doc)
    }

    pub(crate) fn up(&mut self) -> bool {
        self.session.move_up(&mut self.doc)
    }

    pub(crate) fn down(&mut self) -> bool {
        self.session.move_down(&mut self.doc)
    }

    pub(crate) fn home(&mut self) -> bool {
        self.session.move_to_line_start(&mut self.doc)
    }

    pub(crate) fn end(&mut self) -> bool {
        self.session.move_to_line_end(&mut self.doc)
    }

    pub(crate) fn hide_fake_caret(&mut self) {
        self.session.hide_fake_caret(&mut self.doc);
    }

    /// Moves the selection through the session, as a click would.
    pub(crate) fn select(&mut self, range: DomRange) {
        self.session.move_to_range(&mut self.doc, range);
    }

    /// Selects the element with the given id.
    #[track_caller]
    pub(crate) fn select_node(&mut self, id: &str) {
        let node = self.node(id);
        let Some(range) = DomRange::select_node(&self.doc, node) else {
            panic!("element '{id}' has no parent");
        };
        self.select(range);
    }

    pub(crate) fn live_caret(&self) -> Option<LiveCaret> {
        self.session.fake_caret().live().copied()
    }

    #[track_caller]
    pub(crate) fn node(&self, id: &str) -> NodeId {
        let Some(node) = self.doc.node_by_id(id) else {
            panic!("no element with id '{id}' in '{}'", self.doc.to_markup());
        };
        node
    }

    fn text_nodes(&self, node: NodeId, out: &mut Vec<NodeId>) {
        if self.doc.kind(node) == NodeKind::Text {
            out.push(node);
        }
        for ix in 0..self.doc.child_count(node) {
            if let Some(child) = self.doc.child(node, ix) {
                self.text_nodes(child, out);
            }
        }
    }

    /// Returns a caret right after `needle`.
    ///
    /// The needle must appear exactly once, inside a single text node.
    #[track_caller]
    pub(crate) fn caret_after(&self, needle: &str) -> DomRange {
        let mut nodes = Vec::new();
        self.text_nodes(self.doc.root(), &mut nodes);
        let hits: Vec<(NodeId, usize)> = nodes
            .into_iter()
            .flat_map(|node| {
                let text = self.doc.text(node);
                text.match_indices(needle)
                    .map(|(at, _)| (node, text[..at].chars().count() + needle.chars().count()))
                    .collect::<Vec<_>>()
            })
            .collect();
        match hits.as_slice() {
            [(node, offset)] => DomRange::caret(*node, *offset),
            [] => panic!("needle '{needle}' not found in '{}'", self.doc.to_markup()),
            _ => panic!(
                "needle '{needle}' found multiple times in '{}'",
                self.doc.to_markup()
            ),
        }
    }

    #[track_caller]
    pub(crate) fn assert_markup(&self, expected: &str) {
        let actual = self.doc.to_markup();
        if actual == expected {
            return;
        }
        panic!(
            concat!(
                "markup assertion failed\n",
                "  expected: {expected}\n",
                "       got: {actual}\n",
                "  selection: {selection:?}\n",
            ),
            expected = expected,
            actual = actual,
            selection = self.doc.selection_range(),
        );
    }

    #[track_caller]
    pub(crate) fn assert_fake_caret(&self, target: &str, before: bool) {
        let target = self.node(target);
        let Some(live) = self.live_caret() else {
            panic!("expected a fake caret, got '{}'", self.doc.to_markup());
        };
        assert_eq!(live.target, target, "fake caret beside the wrong element");
        assert_eq!(live.before, before, "fake caret on the wrong side");
        assert_eq!(self.doc.caret_container_count(), 1);
    }

    #[track_caller]
    pub(crate) fn assert_no_fake_caret(&self) {
        assert!(self.live_caret().is_none(), "unexpected fake caret");
        assert_eq!(self.doc.caret_container_count(), 0);
    }
}
