// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical caret positions and the walkers built on them.

mod cef;
mod fake_caret;
mod geom;
mod line;
mod position;
mod walker;

pub use self::cef::{AnyCef, BlockCef, CefStrategy, InlineCef};
pub use self::fake_caret::{render_range_caret, select_node, show_caret, FakeCaret, LiveCaret};
pub use self::line::{
    find_closest_client_rect, is_above_line, is_line, positions_until,
    positions_until_next_line, positions_until_previous_line, walk_until, BreakType, LineInfo,
    LineRect, VDirection,
};
pub use self::position::{ClientRect, ClientRects, CaretPosition};
pub use self::walker::{
    is_move_inside_same_block, normalize_position, normalized_range_end_point, visual_step,
    CaretWalker, HDirection,
};

pub(crate) use self::walker::is_range_in_caret_container_block;
