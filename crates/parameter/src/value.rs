// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::{Map, Value};

/// A parameter value.
///
/// Schemas, favourites and history records mix strings and numbers freely,
/// so a value is either one or the other. Numbers display without a
/// trailing `.0`, which keeps `40` and `"40"` comparable as text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A numeric value.
    Number(f64),
    /// A textual value.
    Text(String),
}

impl ParamValue {
    /// Converts a scalar JSON value.
    ///
    /// Booleans become `"1"`/`"0"`. Returns `None` for null, arrays and objects.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Number(number) => number.as_f64().map(Self::Number),
            Value::Bool(flag) => Some(Self::Text(String::from(if *flag { "1" } else { "0" }))),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Returns the value as a number, parsing text if needed.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(text) => parse_number(text),
        }
    }

    /// Returns `true` for an empty text value.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(text) => text.is_empty(),
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Parses a number, accepting a comma as decimal separator.
///
/// Returns `None` for anything that is not a finite number.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let normalized: String = text.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Parses a schema number, falling back to `0.0`.
#[must_use]
pub fn str_to_float(text: &str) -> f64 {
    parse_number(text).unwrap_or(0.0)
}

/// Cleans an enum value for display.
///
/// Strips surrounding brackets and whitespace, turns `|` into `_` and
/// lowercases. Never used for validation.
#[must_use]
pub fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c: char| c == '[' || c == ']')
        .replace('|', "_")
        .to_lowercase()
}

/// Renders a scalar JSON value as text.
#[must_use]
pub fn json_to_string(value: &Value) -> Option<String> {
    ParamValue::from_json(value).map(|value| value.to_string())
}

/// Reads a scalar attribute as text.
#[must_use]
pub fn string_attribute(attributes: &Map<String, Value>, name: &str) -> Option<String> {
    attributes.get(name).and_then(json_to_string)
}

/// Reads a scalar attribute as a number.
pub(crate) fn number_attribute(attributes: &Map<String, Value>, name: &str) -> Option<f64> {
    attributes
        .get(name)
        .and_then(ParamValue::from_json)
        .map(|value| value.as_f64().unwrap_or(0.0))
}
