// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_fake_caret;
mod test_markup;
mod test_vertical;
mod utils;
