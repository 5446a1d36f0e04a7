// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The command engine.
//!
//! A [`Command`] owns the typed parameters of one remote operation and the
//! [`RuleSet`]s parsed from its schema. Setting a value validates it against
//! the parameter, then propagates rule effects breadth first, expanding each
//! `(parameter, value)` pair at most once per call.
//!
//! A [`CommandSet`] groups the category variants sharing a command name and
//! tracks which one is active; [`Commands`] keeps the sets of an appliance.
//! Sending goes through the [`CommandTransport`] seam.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod command;
mod command_set;
mod error;
mod registry;
mod rules;
mod transport;
mod trigger;

#[cfg(test)]
mod tests;

pub use command::{ANCILLARY_GROUP, CUSTOM_GROUP, Command, PARAMETERS_GROUP, SchemaContext};
pub use command_set::{CommandSet, DEFAULT_CATEGORY};
pub use error::{CommandError, SendError, TransportError};
pub use registry::Commands;
pub use rules::{RuleSet, apply_rule, extra_rules_matches};
pub use transport::{CommandRequest, CommandTransport};
