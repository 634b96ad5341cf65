// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::Rect;

use crate::caret::{normalize_position, render_range_caret};
use crate::dom::{Document, Dom, SelectionHost};
use crate::tests::utils::NavTest;
use crate::{CaretPosition, DomRange, FakeCaret};

#[test]
fn clicking_elsewhere_removes_fake_caret() {
    let mut test = NavTest::new("<p>ab|c<img id=x cef/>def</p>");
    assert!(test.right());
    test.assert_fake_caret("x", true);

    test.select(test.caret_after("d"));
    test.assert_no_fake_caret();
    test.assert_markup("<p>abc<img id=x cef/>d|ef</p>");
}

#[test]
fn new_fake_caret_replaces_old_one() {
    let mut test = NavTest::new("<p>ab|c<img id=x cef/>de<img id=y cef/></p>");
    assert!(test.right());
    test.assert_fake_caret("x", true);

    // Move the selection behind the session's back so the old container
    // stays live.
    let range = test.caret_after("d");
    let (doc, _) = test.parts();
    doc.set_selection_range(range);
    assert_eq!(doc.caret_container_count(), 1);

    assert!(test.right());
    test.assert_fake_caret("y", true);
    test.assert_markup("<p>abc<img id=x cef/>de<caret>|</caret><img id=y cef/></p>");
}

#[test]
fn hide_keeps_the_caret_in_place() {
    let mut test = NavTest::new("<p>ab|c<img id=x cef/>def</p>");
    assert!(test.right());
    test.hide_fake_caret();
    test.assert_no_fake_caret();
    test.assert_markup("<p>abc|<img id=x cef/>def</p>");

    // Hiding twice is harmless.
    test.hide_fake_caret();
    test.assert_markup("<p>abc|<img id=x cef/>def</p>");
}

#[test]
fn render_round_trip_leaves_no_container() {
    let mut test = NavTest::new("<p>abc<img id=x cef/>def</p>");
    let x = test.node("x");
    let (doc, _) = test.parts();
    let p = doc.child(doc.root(), 0).unwrap();
    let mut caret = FakeCaret::default();

    let shown = render_range_caret(doc, &mut caret, DomRange::caret(p, 1), false);
    assert_eq!(caret.live().map(|live| live.target), Some(x));
    assert_ne!(shown, DomRange::caret(p, 1));

    let text = doc.child(p, 3).unwrap();
    let plain = render_range_caret(doc, &mut caret, DomRange::caret(text, 1), false);
    assert_eq!(plain, DomRange::caret(text, 1));
    assert!(!caret.is_live());
    assert_eq!(doc.caret_container_count(), 0);
}

fn rects(doc: &Document, pos: CaretPosition) -> Vec<Rect> {
    pos.client_rects(doc).iter().map(|client| client.rect).collect()
}

#[test]
fn rendered_position_reads_back_in_place() {
    let mut test = NavTest::new("<p>abc<img id=x cef/>def</p>");
    let (doc, _) = test.parts();
    let p = doc.child(doc.root(), 0).unwrap();
    let def = doc.child(p, 2).unwrap();
    let mut caret = FakeCaret::default();

    // Beside the image the position is drawn by a fake caret.
    let after_image = CaretPosition::new(p, 2);
    let expected = rects(doc, after_image);
    assert_eq!(expected.len(), 1);
    let shown = render_range_caret(doc, &mut caret, after_image.to_range(), false);
    assert!(caret.is_live());
    let read_back = CaretPosition::from_range_start(&shown);
    assert_eq!(rects(doc, read_back), expected);
    assert_eq!(normalize_position(&*doc, false, read_back), after_image);

    // Inside text the range is kept as is.
    let in_text = CaretPosition::new(def, 1);
    let expected = rects(doc, in_text);
    let shown = render_range_caret(doc, &mut caret, in_text.to_range(), false);
    assert!(!caret.is_live());
    let read_back = CaretPosition::from_range_start(&shown);
    assert_eq!(read_back, in_text);
    assert_eq!(rects(doc, read_back), expected);
}
