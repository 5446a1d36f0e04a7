// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::{Map, Value};

use crate::base::ParameterBase;
use crate::error::ValidationError;
use crate::value::ParamValue;

/// A parameter holding a single value.
///
/// Callers cannot change a fixed value through [`Self::set_value`]; only
/// rule effects may replace it, through [`Self::override_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct FixedParameter {
    base: ParameterBase,
    value: Option<ParamValue>,
}

impl FixedParameter {
    /// Creates a fixed parameter from its schema fragment.
    ///
    /// The value is read from `fixedValue`, falling back to `defaultValue`
    /// for untyped leaves. Non-scalar fixed values (rule trees) leave the
    /// parameter empty.
    #[must_use]
    pub fn new(key: &str, attributes: &Map<String, Value>, group: &str) -> Self {
        let mut parameter: Self = Self {
            base: ParameterBase::new(key, attributes, group),
            value: None,
        };
        parameter.load_attributes();
        parameter
    }

    fn load_attributes(&mut self) {
        self.base.load_attributes();
        let attributes: &Map<String, Value> = self.base.attributes();
        self.value = attributes.get("fixedValue").map_or_else(
            || {
                attributes
                    .get("defaultValue")
                    .and_then(ParamValue::from_json)
            },
            ParamValue::from_json,
        );
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

    /// Returns the value, or numeric zero when empty.
    #[must_use]
    pub fn value(&self) -> ParamValue {
        match &self.value {
            Some(value) if !value.is_empty() => value.clone(),
            _ => ParamValue::Number(0.0),
        }
    }

    /// Returns the raw stored value.
    #[must_use]
    pub fn intern_value(&self) -> ParamValue {
        self.value
            .clone()
            .unwrap_or_else(|| ParamValue::Text(String::new()))
    }

    /// Accepts only the value already held.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Immutable`] for any other value.
    pub fn set_value(&mut self, value: &ParamValue) -> Result<(), ValidationError> {
        let current: String = self.intern_value().to_string();
        if value.to_string() == current {
            return Ok(());
        }
        Err(ValidationError::Immutable {
            key: String::from(self.base.key()),
            current,
            value: value.to_string(),
        })
    }

    /// Replaces the value unconditionally. Used by rule effects.
    pub fn override_value(&mut self, value: ParamValue) {
        self.value = Some(value);
    }

    /// Restores the value from the schema fragment.
    pub fn reset(&mut self) {
        self.load_attributes();
    }
}
