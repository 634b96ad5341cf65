// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny HTML-like notation for building and printing documents.
//!
//! ```text
//! <p>ab|c<img id=pic cef w=30/></p><div cef>island</div><p/>
//! ```
//!
//! Elements are written `<tag attrs>...</tag>` or `<tag attrs/>`. Attributes
//! are bare words or `key=value` pairs without quotes. Text is everything
//! else. Whitespace-only text containing a newline is ignored so fixtures
//! can be spread over several lines.
//!
//! The selection is written inline: `|` for a caret, or `[` and `]` for the
//! start and end of a selection.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use super::document::Document;
use super::layout::LayoutMetrics;
use super::{Dom, NodeId, NodeKind, SelectionHost};
use crate::range::{BoundaryPoint, DomRange};

/// Kinds of errors that can occur when parsing markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseMarkupErrorKind {
    /// A `<` without a matching `>`.
    #[error("unterminated tag")]
    UnterminatedTag,
    /// A tag with no name.
    #[error("empty tag")]
    EmptyTag,
    /// A closing tag that does not match the open element.
    #[error("unexpected closing tag")]
    UnexpectedClosingTag,
    /// The input ended with open elements.
    #[error("unclosed element")]
    UnclosedElement,
    /// More than one caret, or a caret mixed with a selection.
    #[error("duplicate selection marker")]
    DuplicateSelectionMarker,
    /// Only one of `[` and `]` was present.
    #[error("incomplete selection")]
    IncompleteSelection,
}

/// Error returned when parsing markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {at}")]
pub struct ParseMarkupError {
    kind: ParseMarkupErrorKind,
    at: usize,
}

impl ParseMarkupError {
    const fn new(kind: ParseMarkupErrorKind, at: usize) -> Self {
        Self { kind, at }
    }

    /// Returns the error kind.
    pub const fn kind(self) -> ParseMarkupErrorKind {
        self.kind
    }

    /// Returns the byte offset into the source where the error was detected.
    pub const fn byte_offset(self) -> usize {
        self.at
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Marker {
    Caret,
    Start,
    End,
}

#[derive(Default)]
struct Parser {
    stack: Vec<(NodeId, String)>,
    text: String,
    pending: Vec<(Marker, usize)>,
    caret: Option<BoundaryPoint>,
    start: Option<BoundaryPoint>,
    end: Option<BoundaryPoint>,
}

impl Parser {
    fn parent(&self, doc: &Document) -> NodeId {
        self.stack.last().map_or(doc.root(), |(node, _)| *node)
    }

    fn flush(&mut self, doc: &mut Document) {
        let parent = self.parent(doc);
        let keep = !self.text.is_empty()
            && !(self.text.contains('\n') && self.text.trim().is_empty());
        let text_node = keep.then(|| doc.append_text(parent, &self.text));
        let child_ix = doc.child_count(parent);
        for (marker, offset) in self.pending.drain(..) {
            let point = match text_node {
                Some(node) => BoundaryPoint::new(node, offset),
                None => BoundaryPoint::new(parent, child_ix),
            };
            match marker {
                Marker::Caret => self.caret = Some(point),
                Marker::Start => self.start = Some(point),
                Marker::End => self.end = Some(point),
            }
        }
        self.text.clear();
    }

    fn mark(&mut self, marker: Marker, at: usize) -> Result<(), ParseMarkupError> {
        let has = |m: Marker| {
            self.pending.iter().any(|(p, _)| *p == m)
                || match m {
                    Marker::Caret => self.caret.is_some(),
                    Marker::Start => self.start.is_some(),
                    Marker::End => self.end.is_some(),
                }
        };
        let seen = match marker {
            Marker::Caret => has(Marker::Caret) || has(Marker::Start) || has(Marker::End),
            Marker::Start => has(Marker::Start) || has(Marker::Caret),
            Marker::End => has(Marker::End) || has(Marker::Caret),
        };
        if seen {
            return Err(ParseMarkupError::new(
                ParseMarkupErrorKind::DuplicateSelectionMarker,
                at,
            ));
        }
        self.pending.push((marker, self.text.chars().count()));
        Ok(())
    }

    fn tag(&mut self, doc: &mut Document, body: &str, at: usize) -> Result<(), ParseMarkupError> {
        if let Some(name) = body.strip_prefix('/') {
            let name = name.trim();
            return match self.stack.pop() {
                Some((_, open)) if open == name => Ok(()),
                _ => Err(ParseMarkupError::new(
                    ParseMarkupErrorKind::UnexpectedClosingTag,
                    at,
                )),
            };
        }
        let (body, self_closing) = match body.strip_suffix('/') {
            Some(body) => (body, true),
            None => (body, false),
        };
        let mut words = body.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ParseMarkupError::new(ParseMarkupErrorKind::EmptyTag, at));
        };
        let attrs: Vec<(&str, Option<&str>)> = words
            .map(|word| match word.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (word, None),
            })
            .collect();
        let parent = self.parent(doc);
        let node = doc.append_element(parent, name, &attrs);
        if !self_closing {
            self.stack.push((node, String::from(name)));
        }
        Ok(())
    }
}

impl Document {
    /// Parses `markup` with default metrics.
    pub fn parse(markup: &str) -> Result<Self, ParseMarkupError> {
        Self::parse_with_metrics(markup, LayoutMetrics::default())
    }

    /// Parses `markup`, laying it out with `metrics`.
    pub fn parse_with_metrics(
        markup: &str,
        metrics: LayoutMetrics,
    ) -> Result<Self, ParseMarkupError> {
        let mut doc = Self::new(metrics);
        let mut parser = Parser::default();
        let mut at = 0;
        while let Some(c) = markup[at..].chars().next() {
            match c {
                '<' => {
                    parser.flush(&mut doc);
                    let Some(len) = markup[at..].find('>') else {
                        return Err(ParseMarkupError::new(
                            ParseMarkupErrorKind::UnterminatedTag,
                            at,
                        ));
                    };
                    parser.tag(&mut doc, &markup[at + 1..at + len], at)?;
                    at += len + 1;
                    continue;
                }
                '|' => parser.mark(Marker::Caret, at)?,
                '[' => parser.mark(Marker::Start, at)?,
                ']' => parser.mark(Marker::End, at)?,
                _ => parser.text.push(c),
            }
            at += c.len_utf8();
        }
        parser.flush(&mut doc);
        if !parser.stack.is_empty() {
            return Err(ParseMarkupError::new(
                ParseMarkupErrorKind::UnclosedElement,
                markup.len(),
            ));
        }
        match (parser.caret, parser.start, parser.end) {
            (Some(caret), None, None) => doc.set_selection_range(DomRange::new(caret, caret)),
            (None, Some(start), Some(end)) => doc.set_selection_range(DomRange::new(start, end)),
            (None, None, None) => {}
            _ => {
                return Err(ParseMarkupError::new(
                    ParseMarkupErrorKind::IncompleteSelection,
                    markup.len(),
                ))
            }
        }
        Ok(doc)
    }

    /// Prints the document, with the selection, in the notation accepted by
    /// [`parse`](Self::parse).
    pub fn to_markup(&self) -> String {
        let markers: Vec<(BoundaryPoint, char)> = match self.selection_range() {
            Some(range) if range.collapsed() => alloc::vec![(range.start, '|')],
            Some(range) => alloc::vec![(range.start, '['), (range.end, ']')],
            None => Vec::new(),
        };
        let mut out = String::new();
        self.write_children(&mut out, self.root(), &markers);
        out
    }

    fn write_markers(out: &mut String, markers: &[(BoundaryPoint, char)], point: BoundaryPoint) {
        for (_, c) in markers.iter().filter(|(p, _)| *p == point) {
            out.push(*c);
        }
    }

    fn write_children(&self, out: &mut String, node: NodeId, markers: &[(BoundaryPoint, char)]) {
        let count = self.child_count(node);
        for ix in 0..=count {
            Self::write_markers(out, markers, BoundaryPoint::new(node, ix));
            if let Some(child) = self.child(node, ix) {
                self.write_node(out, child, markers);
            }
        }
    }

    fn write_node(&self, out: &mut String, node: NodeId, markers: &[(BoundaryPoint, char)]) {
        if self.kind(node) == NodeKind::Text {
            let len = self.text_len(node);
            for ix in 0..=len {
                Self::write_markers(out, markers, BoundaryPoint::new(node, ix));
                if let Some(c) = self.char_at(node, ix) {
                    out.push(c);
                }
            }
            return;
        }
        let _ = write!(out, "<{}", self.tag(node));
        for (key, value) in self.attributes(node) {
            match value {
                Some(value) => {
                    let _ = write!(out, " {key}={value}");
                }
                None => {
                    let _ = write!(out, " {key}");
                }
            }
        }
        let has_marker = markers.iter().any(|(p, _)| p.container == node);
        if self.child_count(node) == 0 && !has_marker {
            out.push_str("/>");
            return;
        }
        out.push('>');
        self.write_children(out, node, markers);
        let _ = write!(out, "</{}>", self.tag(node));
    }
}
