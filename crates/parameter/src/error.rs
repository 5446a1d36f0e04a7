// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors returned when a value is rejected by a parameter.
///
/// Invalid input is expected and recoverable; every variant names the
/// allowed domain and the rejected value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The value is not one of the allowed enum values.
    #[error("Parameter '{key}': allowed values: {allowed:?} but was: {value}")]
    NotAllowed {
        /// The parameter key.
        key: String,
        /// The literal allowed values.
        allowed: Vec<String>,
        /// The rejected value.
        value: String,
    },
    /// The value is outside the range or off the step grid.
    #[error("Parameter '{key}': allowed: min {min} max {max} step {step} but was: {value}")]
    OutOfRange {
        /// The parameter key.
        key: String,
        /// The minimum value.
        min: f64,
        /// The maximum value.
        max: f64,
        /// The effective step.
        step: f64,
        /// The rejected value.
        value: String,
    },
    /// The value could not be read as a number.
    #[error("Parameter '{key}': expected a number but was: {value}")]
    NotANumber {
        /// The parameter key.
        key: String,
        /// The rejected value.
        value: String,
    },
    /// The parameter holds a fixed value.
    #[error("Parameter '{key}': fixed to {current} but was: {value}")]
    Immutable {
        /// The parameter key.
        key: String,
        /// The fixed value.
        current: String,
        /// The rejected value.
        value: String,
    },
    /// The value does not name a selectable category.
    #[error("Parameter '{key}': allowed categories: {allowed:?} but was: {value}")]
    UnknownCategory {
        /// The parameter key.
        key: String,
        /// The selectable category names.
        allowed: Vec<String>,
        /// The rejected value.
        value: String,
    },
}
