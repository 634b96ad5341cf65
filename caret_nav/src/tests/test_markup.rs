// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::dom::{Document, Dom, NodeKind, ParseMarkupErrorKind, SelectionHost};
use crate::DomRange;

#[track_caller]
fn parse_error(markup: &str) -> (ParseMarkupErrorKind, usize) {
    match Document::parse(markup) {
        Ok(doc) => panic!("expected an error, parsed '{}'", doc.to_markup()),
        Err(err) => (err.kind(), err.byte_offset()),
    }
}

#[test]
fn parse_builds_tree() {
    let doc = Document::parse("<p>ab<span edit>c</span></p><div cef h=2>x</div>").unwrap();
    let root = doc.root();
    assert_eq!(doc.child_count(root), 2);
    let p = doc.child(root, 0).unwrap();
    assert_eq!(doc.tag(p), "p");
    assert!(doc.is_block(p));
    let span = doc.child(p, 1).unwrap();
    assert_eq!(doc.content_editable(span), Some(true));
    assert!(!doc.is_block(span));
    let div = doc.child(root, 1).unwrap();
    assert_eq!(doc.content_editable(div), Some(false));
    assert_eq!(doc.attribute(div, "h"), Some("2"));
    assert_eq!(doc.attribute(div, "cef"), Some(""));
    assert_eq!(doc.text(doc.child(p, 0).unwrap()), "ab");
}

#[test]
fn selection_markers() {
    let doc = Document::parse("<p>a|b</p>").unwrap();
    let text = doc.child(doc.child(doc.root(), 0).unwrap(), 0).unwrap();
    assert_eq!(doc.selection_range(), Some(DomRange::caret(text, 1)));

    let doc = Document::parse("<p>[ab]</p>").unwrap();
    let range = doc.selection_range().unwrap();
    assert_eq!((range.start.offset, range.end.offset), (0, 2));

    // A marker with no text around it lands between children.
    let doc = Document::parse("<p/>|<p/>").unwrap();
    assert_eq!(doc.selection_range(), Some(DomRange::caret(doc.root(), 1)));
}

#[test]
fn markup_round_trip() {
    for markup in [
        "<p>ab|c<img id=x cef w=30/></p>",
        "<div cef>x</div><p>[a<b>bc</b>]</p>",
        "<p/><caret-block>|</caret-block><hr/>",
    ] {
        let doc = Document::parse(markup).unwrap();
        assert_eq!(doc.to_markup(), markup);
    }
}

#[test]
fn newlines_between_blocks_are_ignored() {
    let doc = Document::parse("<p>a</p>\n  <p>b</p>\n").unwrap();
    assert_eq!(doc.child_count(doc.root()), 2);
    assert_eq!(doc.to_markup(), "<p>a</p><p>b</p>");
}

#[test]
fn caret_tags_create_containers() {
    let doc = Document::parse("<caret/><caret-block/>").unwrap();
    let root = doc.root();
    assert_eq!(
        doc.kind(doc.child(root, 0).unwrap()),
        NodeKind::CaretContainer { block: false }
    );
    assert_eq!(
        doc.kind(doc.child(root, 1).unwrap()),
        NodeKind::CaretContainer { block: true }
    );
    assert_eq!(doc.caret_container_count(), 2);
}

#[test]
fn parse_errors() {
    assert_eq!(parse_error("<p>ab"), (ParseMarkupErrorKind::UnclosedElement, 5));
    assert_eq!(parse_error("<p>ab</div>"), (ParseMarkupErrorKind::UnexpectedClosingTag, 5));
    assert_eq!(parse_error("ab<p"), (ParseMarkupErrorKind::UnterminatedTag, 2));
    assert_eq!(parse_error("a< >b"), (ParseMarkupErrorKind::EmptyTag, 1));
    assert_eq!(parse_error("a|b|"), (ParseMarkupErrorKind::DuplicateSelectionMarker, 3));
    assert_eq!(parse_error("[ab|]"), (ParseMarkupErrorKind::DuplicateSelectionMarker, 3));
    assert_eq!(parse_error("[ab"), (ParseMarkupErrorKind::IncompleteSelection, 3));
}

#[test]
fn error_display() {
    let err = Document::parse("<p>").unwrap_err();
    assert_eq!(err.to_string(), "unclosed element at byte 3");
}
