// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Caret Nav Dev
//!
//! This crate provides document fixtures for developing caret_nav.
//!
//! Fixtures are written in the markup accepted by `caret_nav`'s
//! `Document::parse`, one block per line.

/// A document fixture.
#[derive(Debug)]
pub struct Sample {
    /// The name of the sample.
    pub name: &'static str,
    /// The markup of the sample.
    pub markup: &'static str,
}

/// A collection of document fixtures.
#[derive(Debug)]
pub struct DocumentSamples {
    /// Text mixed with inline and block non-editable elements.
    pub mixed: Sample,
    /// Consecutive non-editable blocks.
    pub islands: Sample,
    /// A paragraph that soft wraps at the default width.
    pub wrapped: Sample,
}

impl DocumentSamples {
    /// Creates a new collection of samples.
    pub const fn new() -> Self {
        Self {
            mixed: Sample {
                name: "mixed",
                markup: include_str!("../assets/documents/mixed.txt"),
            },
            islands: Sample {
                name: "islands",
                markup: include_str!("../assets/documents/islands.txt"),
            },
            wrapped: Sample {
                name: "wrapped",
                markup: include_str!("../assets/documents/wrapped.txt"),
            },
        }
    }

    /// Returns every sample.
    pub fn all(&self) -> [&Sample; 3] {
        [&self.mixed, &self.islands, &self.wrapped]
    }
}

impl Default for DocumentSamples {
    fn default() -> Self {
        Self::new()
    }
}
