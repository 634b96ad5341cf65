// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caret navigation around non-editable content in rich text editors.
//!
//! Browsers handle arrow keys well inside ordinary text, but stumble next to
//! elements that are not editable: embedded widgets, images, locked blocks.
//! This crate decides what Left, Right, Up, Down, Home and End should do in
//! those cases:
//!
//! - step onto a non-editable element and select it as a unit,
//! - show a *fake caret* beside it when a real caret cannot sit there,
//! - or return `None` so the host moves the caret natively.
//!
//! The host document is reached through the traits in [`dom`]. A small
//! in-memory [`Document`](dom::Document) with a deterministic layout is
//! included for tests and tools.
//!
//! ```
//! use caret_nav::dom::Document;
//! use caret_nav::NavigationSession;
//!
//! let mut doc = Document::parse("<p>abc|<img cef/></p>").unwrap();
//! let mut session = NavigationSession::default();
//! assert!(session.move_right(&mut doc));
//! assert_eq!(doc.to_markup(), "<p>abc[<img cef/>]</p>");
//! ```

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("caret_nav requires either the `std` or `libm` feature to be enabled");

extern crate alloc;

pub mod caret;
pub mod dom;
pub mod navigation;
pub mod range;

#[cfg(test)]
mod tests;

pub use caret::{
    AnyCef, BlockCef, CaretPosition, CefStrategy, FakeCaret, HDirection, InlineCef, VDirection,
};
pub use navigation::{NavigationSession, NavigationSettings};
pub use range::{BoundaryPoint, DomRange};
