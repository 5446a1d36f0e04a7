// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::value::{ParamValue, json_to_string};

/// The effect a rule has on its target parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEffect {
    /// Force the target to a single value.
    Fixed(ParamValue),
    /// Replace the target's allowed values, its current value, or both.
    Enum {
        /// New allowed values.
        values: Option<Vec<String>>,
        /// New current value.
        default: Option<String>,
    },
}

impl RuleEffect {
    /// Reads a leaf effect description.
    ///
    /// A non-empty `fixedValue` wins over the `typology` tag. A `fixed`
    /// typology with an empty or missing `fixedValue` forces an empty value.
    /// Returns `None` unless the typology is `fixed` or `enum`.
    #[must_use]
    pub fn from_schema(data: &Map<String, Value>) -> Option<Self> {
        let fixed: Option<ParamValue> = data.get("fixedValue").and_then(ParamValue::from_json);
        if let Some(fixed) = fixed.clone().filter(|value| !value.is_empty()) {
            return Some(Self::Fixed(fixed));
        }
        let typology: Option<&str> = data.get("typology").and_then(Value::as_str);
        if typology == Some("fixed") {
            return Some(Self::Fixed(
                fixed.unwrap_or_else(|| ParamValue::Text(String::new())),
            ));
        }
        if typology != Some("enum") {
            return None;
        }
        let values: Option<Vec<String>> = match data.get("enumValues") {
            Some(Value::String(text)) if !text.is_empty() => {
                Some(text.split('|').map(String::from).collect())
            }
            Some(Value::Array(items)) => Some(items.iter().filter_map(json_to_string).collect()),
            _ => None,
        };
        let default: Option<String> = data
            .get("defaultValue")
            .and_then(json_to_string)
            .filter(|value| !value.is_empty());
        Some(Self::Enum { values, default })
    }

    /// The value shown for this effect in a trigger summary.
    #[must_use]
    pub fn summary_value(&self) -> Value {
        match self {
            Self::Fixed(value) => Value::String(value.to_string()),
            Self::Enum { default, .. } => Value::String(default.clone().unwrap_or_default()),
        }
    }
}

/// A single parsed rule.
///
/// When `trigger_key` reaches `trigger_value` and every entry of `extras`
/// holds on the live parameters, `effect` is applied to `param_key`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// The parameter whose value triggers the rule.
    pub trigger_key: String,
    /// The value that triggers the rule.
    pub trigger_value: String,
    /// The parameter the effect is applied to.
    pub param_key: String,
    /// The effect.
    pub effect: RuleEffect,
    /// Additional conditions, all of which must hold.
    pub extras: BTreeMap<String, String>,
}

impl Rule {
    /// Creates a new rule.
    #[must_use]
    pub const fn new(
        trigger_key: String,
        trigger_value: String,
        param_key: String,
        effect: RuleEffect,
        extras: BTreeMap<String, String>,
    ) -> Self {
        Self {
            trigger_key,
            trigger_value,
            param_key,
            effect,
            extras,
        }
    }

    /// Returns `true` if the rule has additional conditions.
    #[must_use]
    pub fn has_extras(&self) -> bool {
        !self.extras.is_empty()
    }
}
