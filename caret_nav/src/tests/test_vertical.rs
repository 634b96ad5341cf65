// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::dom::LayoutMetrics;
use crate::tests::utils::NavTest;
use crate::NavigationSettings;

#[test]
fn down_onto_block_shows_fake_caret_before() {
    let mut test = NavTest::new("<p>ab|c</p><div id=w cef>x</div>");
    assert!(test.down());
    test.assert_markup("<p>abc</p><caret-block>|</caret-block><div id=w cef>x</div>");
    test.assert_fake_caret("w", true);
}

#[test]
fn down_far_right_shows_fake_caret_after() {
    let mut test = NavTest::new("<p>abcdefghijklmno|p</p><div id=w cef>x</div>");
    assert!(test.down());
    test.assert_fake_caret("w", false);
}

#[test]
fn up_onto_block_shows_fake_caret() {
    let mut test = NavTest::new("<div id=w cef>x</div><p>a|b</p>");
    assert!(test.up());
    test.assert_markup("<caret-block>|</caret-block><div id=w cef>x</div><p>ab</p>");
    test.assert_fake_caret("w", true);
}

#[test]
fn down_into_text_is_left_to_host() {
    let mut test = NavTest::new("<p>ab|c</p><p>def</p>");
    assert!(!test.down());
    test.assert_markup("<p>ab|c</p><p>def</p>");
    test.assert_no_fake_caret();
}

#[test]
fn up_on_first_line_is_a_no_op() {
    let mut test = NavTest::new("<p>a|bc</p>");
    assert!(!test.up());
    test.assert_markup("<p>a|bc</p>");
}

#[test]
fn only_one_fake_caret_between_islands() {
    let mut test = NavTest::new(
        "<p>a|</p><div id=first cef>One</div><div id=second cef>Two</div>",
    );

    assert!(test.down());
    test.assert_fake_caret("first", true);

    assert!(test.down());
    test.assert_fake_caret("second", true);
    test.assert_markup(concat!(
        "<p>a</p><div id=first cef>One</div>",
        "<caret-block>|</caret-block><div id=second cef>Two</div>"
    ));
}

#[test]
fn down_from_fake_caret_lands_past_the_block() {
    let mut test = NavTest::new("<p>a|</p><div id=w cef>x</div><p>bc</p>");
    assert!(test.down());
    test.assert_fake_caret("w", true);

    assert!(test.down());
    test.assert_markup("<p>a</p><div id=w cef>x</div><p>|bc</p>");
    test.assert_no_fake_caret();
}

#[test]
fn down_beside_inline_element_stays_on_the_line() {
    let mut test = NavTest::new("<p>ab|<img id=x cef/></p>");
    assert!(test.down());
    test.assert_markup("<p>ab<img id=x cef/><caret>|</caret></p>");
    test.assert_fake_caret("x", false);
}

#[test]
fn down_from_fake_caret_on_last_line_moves_after_the_block() {
    let mut test = NavTest::new("<p>a|</p><div id=w cef>x</div>");
    assert!(test.down());
    assert!(test.down());
    test.assert_markup("<p>a</p><div id=w cef>x</div><caret-block>|</caret-block>");
    test.assert_fake_caret("w", false);
}

#[test]
fn last_line_falls_back_to_line_end() {
    let mut test = NavTest::new("<p>a|b<img id=x cef/></p>");
    assert!(test.down());
    test.assert_markup("<p>ab<img id=x cef/><caret>|</caret></p>");
    test.assert_fake_caret("x", false);

    let mut test = NavTest::new("<p><img id=x cef/>a|b</p>");
    assert!(test.up());
    test.assert_markup("<p><caret>|</caret><img id=x cef/>ab</p>");
    test.assert_fake_caret("x", true);
}

#[test]
fn selection_collapses_away_from_cef() {
    let mut test = NavTest::new("<div cef>[x</div><p>ab]</p>");
    assert!(test.down());
    test.assert_markup("<div cef>x</div><p>ab|</p>");

    let mut test = NavTest::new("<p>[ab</p><div cef>x]</div>");
    assert!(test.up());
    test.assert_markup("<p>|ab</p><div cef>x</div>");
}

#[test]
fn committed_fake_caret_is_scrolled_into_view() {
    let metrics = LayoutMetrics {
        viewport_height: 40.0,
        ..Default::default()
    };
    let markup = "<p>x</p><p>y</p><p>z|</p><div id=w cef>w</div>";

    let mut test = NavTest::with_metrics(markup, metrics);
    assert!(test.down());
    test.assert_fake_caret("w", true);
    assert_eq!(test.doc().scroll_top(), 20.0);

    let mut test = NavTest::with_metrics(markup, metrics).with_settings(NavigationSettings {
        scroll_into_view: false,
        ..Default::default()
    });
    assert!(test.down());
    assert_eq!(test.doc().scroll_top(), 0.0);
}
