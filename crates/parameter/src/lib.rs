// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed command parameters.
//!
//! A command schema describes every parameter as a loose attribute map.
//! This crate turns those maps into a closed set of variants, each owning
//! its own validation rule:
//!
//! - [`FixedParameter`] holds a single value that callers cannot change
//! - [`EnumParameter`] holds one of an ordered list of allowed strings
//! - [`RangeParameter`] holds a number on a `min..=max` grid of `step`
//! - [`ProgramParameter`] selects the active category of a command
//!
//! Parameters also carry the trigger table built from the schema rules.
//! The table is data only: firing triggers and propagating their effects
//! is done by the command that owns the parameters.

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

mod base;
mod enumeration;
mod error;
mod fixed;
mod parameter;
mod program;
mod range;
mod rule;
mod value;

#[cfg(test)]
mod tests;

pub use base::ParameterBase;
pub use enumeration::EnumParameter;
pub use error::ValidationError;
pub use fixed::FixedParameter;
pub use parameter::Parameter;
pub use program::{PROGRAM_FILTER, ProgramParameter, clean_category_name};
pub use range::RangeParameter;
pub use rule::{Rule, RuleEffect};
pub use value::{
    ParamValue, clean_value, json_to_string, parse_number, str_to_float, string_attribute,
};
