// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::{Map, Value};

use crate::base::ParameterBase;
use crate::error::ValidationError;
use crate::value::{ParamValue, clean_value, json_to_string, string_attribute};

/// A parameter restricted to an ordered list of allowed strings.
///
/// Validation always runs against the literal list. [`clean_value`] is
/// applied to what [`Self::value`] and [`Self::values`] return and nowhere
/// else.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumParameter {
    base: ParameterBase,
    default: Option<String>,
    value: Option<String>,
    values: Vec<String>,
}

impl EnumParameter {
    /// Creates an enum parameter from its schema fragment.
    ///
    /// `enumValues` may be a JSON array or a comma-separated string. The
    /// default is appended to the allowed values when it is not already
    /// among them.
    #[must_use]
    pub fn new(key: &str, attributes: &Map<String, Value>, group: &str) -> Self {
        let mut parameter: Self = Self {
            base: ParameterBase::new(key, attributes, group),
            default: None,
            value: None,
            values: Vec::new(),
        };
        parameter.load_attributes();
        parameter
    }

    fn load_attributes(&mut self) {
        self.base.load_attributes();
        let attributes: &Map<String, Value> = self.base.attributes();
        self.default = string_attribute(attributes, "defaultValue").filter(|d| !d.is_empty());
        self.values = match attributes.get("enumValues") {
            Some(Value::Array(items)) => items.iter().filter_map(json_to_string).collect(),
            Some(Value::String(text)) => text
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        };
        if let Some(default) = &self.default {
            let cleaned: String = clean_value(default);
            if !self.values.iter().any(|value| clean_value(value) == cleaned) {
                self.values.push(default.clone());
            }
        }
        self.value.clone_from(&self.default);
    }

    /// Returns the common attributes.
    #[must_use]
    pub const fn base(&self) -> &ParameterBase {
        &self.base
    }

    /// Returns the common attributes mutably.
    pub const fn base_mut(&mut self) -> &mut ParameterBase {
        &mut self.base
    }

    /// Returns the schema default.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Returns the cleaned current value, or the first allowed value.
    #[must_use]
    pub fn value(&self) -> ParamValue {
        let raw: &str = self
            .value
            .as_deref()
            .or_else(|| self.values.first().map(String::as_str))
            .unwrap_or_default();
        ParamValue::Text(clean_value(raw))
    }

    /// Returns the uncleaned current value, or the first allowed value.
    #[must_use]
    pub fn intern_value(&self) -> ParamValue {
        let raw: &str = self
            .value
            .as_deref()
            .or_else(|| self.values.first().map(String::as_str))
            .unwrap_or_default();
        ParamValue::Text(String::from(raw))
    }

    /// Returns the allowed values cleaned for display.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        self.values.iter().map(|value| clean_value(value)).collect()
    }

    /// Returns the literal allowed values.
    #[must_use]
    pub fn allowed(&self) -> &[String] {
        &self.values
    }

    /// Replaces the allowed values.
    ///
    /// A current value that is no longer allowed falls back to the first
    /// new value.
    pub fn set_values(&mut self, values: Vec<String>) {
        self.values = values;
        if self
            .value
            .as_ref()
            .is_some_and(|value| !self.values.contains(value))
        {
            self.value = self.values.first().cloned();
        }
    }

    /// Sets the value if it is literally one of the allowed values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotAllowed`] otherwise.
    pub fn set_value(&mut self, value: &ParamValue) -> Result<(), ValidationError> {
        let text: String = value.to_string();
        if self.values.contains(&text) {
            self.value = Some(text);
            return Ok(());
        }
        Err(ValidationError::NotAllowed {
            key: String::from(self.base.key()),
            allowed: self.values.clone(),
            value: text,
        })
    }

    /// Restores the allowed values and default from the schema fragment.
    pub fn reset(&mut self) {
        self.load_attributes();
    }
}
