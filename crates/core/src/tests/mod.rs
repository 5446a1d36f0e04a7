// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the command engine.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod command_tests;
mod helpers;
mod send_tests;
