// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::Rect;

#[cfg(feature = "libm")]
#[allow(unused_imports, reason = "float methods are inherent with std")]
use core_maths::CoreFloat;

/// Collapses `rect` onto its left (`to_left`) or right edge.
pub(crate) fn collapse(rect: Rect, to_left: bool) -> Rect {
    let x = if to_left { rect.x0 } else { rect.x1 };
    Rect::new(x, rect.y0, x, rect.y1)
}

fn half_height(a: Rect, b: Rect) -> f64 {
    (a.height() / 2.0).min(b.height() / 2.0)
}

/// Returns true if `a` sits on a visual line above `b`.
///
/// Rectangles overlapping by more than half of the shorter height share a
/// line.
pub(crate) fn is_above(a: Rect, b: Rect) -> bool {
    a.y1 - half_height(a, b) < b.y0
}

/// Returns true if `a` sits on a visual line below `b`.
pub(crate) fn is_below(a: Rect, b: Rect) -> bool {
    is_above(b, a)
}

/// Horizontal distance from `x` to the nearest edge of `rect`.
pub(crate) fn edge_distance(rect: Rect, x: f64) -> f64 {
    (x - rect.x0).abs().min((x - rect.x1).abs())
}

pub(crate) fn is_inside_x(rect: Rect, x: f64) -> bool {
    x >= rect.x0 && x <= rect.x1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_relations() {
        let line_one = Rect::new(0.0, 0.0, 10.0, 20.0);
        let line_two = Rect::new(0.0, 20.0, 10.0, 40.0);
        let tall = Rect::new(30.0, 0.0, 50.0, 40.0);
        assert!(is_above(line_one, line_two));
        assert!(is_below(line_two, line_one));
        assert!(!is_above(line_one, line_one));
        assert!(!is_below(line_one, tall));
    }

    #[test]
    fn distances() {
        let rect = Rect::new(10.0, 0.0, 30.0, 20.0);
        assert_eq!(edge_distance(rect, 14.0), 4.0);
        assert_eq!(edge_distance(rect, 40.0), 10.0);
        assert!(is_inside_x(rect, 10.0));
        assert!(!is_inside_x(rect, 31.0));
        assert_eq!(collapse(rect, false), Rect::new(30.0, 0.0, 30.0, 20.0));
    }
}
