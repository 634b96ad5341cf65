// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod nav_test;

pub(crate) use nav_test::NavTest;
