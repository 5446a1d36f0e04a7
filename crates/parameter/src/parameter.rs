// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::{Map, Value};
use tracing::debug;

use crate::base::ParameterBase;
use crate::enumeration::EnumParameter;
use crate::error::ValidationError;
use crate::fixed::FixedParameter;
use crate::program::ProgramParameter;
use crate::range::RangeParameter;
use crate::rule::Rule;
use crate::value::{ParamValue, string_attribute};

/// A command parameter.
///
/// The variant set is closed; every call site that needs variant-specific
/// behavior matches on it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// A single value.
    Fixed(FixedParameter),
    /// One of an ordered list of allowed values.
    Enum(EnumParameter),
    /// A number on a step grid.
    Range(RangeParameter),
    /// The category selector.
    Program(ProgramParameter),
}

impl Parameter {
    /// Builds a parameter from its schema fragment.
    ///
    /// Dispatches on the `typology` tag. Untagged fragments with both bounds
    /// become ranges and untagged fragments with a scalar `fixedValue` or
    /// `defaultValue` become fixed leaves.
    ///
    /// # Arguments
    ///
    /// * `key` - The parameter key
    /// * `attributes` - The schema fragment
    /// * `group` - The payload group
    ///
    /// # Returns
    ///
    /// * `None` if the fragment does not describe a parameter
    #[must_use]
    pub fn from_schema(key: &str, attributes: &Map<String, Value>, group: &str) -> Option<Self> {
        let typology: String = string_attribute(attributes, "typology").unwrap_or_default();
        match typology.as_str() {
            "range" => Some(Self::Range(RangeParameter::new(key, attributes, group))),
            "enum" => Some(Self::Enum(EnumParameter::new(key, attributes, group))),
            "fixed" => Some(Self::Fixed(FixedParameter::new(key, attributes, group))),
            _ if attributes.contains_key("minimumValue")
                && attributes.contains_key("maximumValue") =>
            {
                Some(Self::Range(RangeParameter::new(key, attributes, group)))
            }
            _ if has_scalar(attributes, "fixedValue") || has_scalar(attributes, "defaultValue") => {
                Some(Self::Fixed(FixedParameter::new(key, attributes, group)))
            }
            _ => {
                debug!(key, typology = %typology, "Schema fragment is not a parameter");
                None
            }
        }
    }

    /// Returns the common attributes.
    #[must_use]
    pub const fn base(&self) -> &ParameterBase {
        match self {
            Self::Fixed(parameter) => parameter.base(),
            Self::Enum(parameter) => parameter.base(),
            Self::Range(parameter) => parameter.base(),
            Self::Program(parameter) => parameter.base(),
        }
    }

    /// Returns the common attributes mutably.
    pub const fn base_mut(&mut self) -> &mut ParameterBase {
        match self {
            Self::Fixed(parameter) => parameter.base_mut(),
            Self::Enum(parameter) => parameter.base_mut(),
            Self::Range(parameter) => parameter.base_mut(),
            Self::Program(parameter) => parameter.base_mut(),
        }
    }

    /// Returns the parameter key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.base().key()
    }

    /// Returns the payload group.
    #[must_use]
    pub fn group(&self) -> &str {
        self.base().group()
    }

    /// Returns the schema category.
    #[must_use]
    pub fn category(&self) -> &str {
        self.base().category()
    }

    /// Returns the typology tag.
    #[must_use]
    pub fn typology(&self) -> &str {
        self.base().typology()
    }

    /// Returns `true` if the parameter must be part of every payload.
    #[must_use]
    pub const fn mandatory(&self) -> bool {
        self.base().mandatory()
    }

    /// Returns the normalized value.
    #[must_use]
    pub fn value(&self) -> ParamValue {
        match self {
            Self::Fixed(parameter) => parameter.value(),
            Self::Enum(parameter) => parameter.value(),
            Self::Range(parameter) => parameter.value(),
            Self::Program(parameter) => parameter.value(),
        }
    }

    /// Returns the raw stored value, as sent to the appliance.
    #[must_use]
    pub fn intern_value(&self) -> ParamValue {
        match self {
            Self::Fixed(parameter) => parameter.intern_value(),
            Self::Enum(parameter) => parameter.intern_value(),
            Self::Range(parameter) => parameter.intern_value(),
            Self::Program(parameter) => parameter.value(),
        }
    }

    /// Returns the displayable allowed values.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::Fixed(parameter) => vec![parameter.value().to_string()],
            Self::Enum(parameter) => parameter.values(),
            Self::Range(parameter) => parameter.values(),
            Self::Program(parameter) => parameter.values(),
        }
    }

    /// Returns the number of allowed values without listing them.
    #[must_use]
    pub fn values_len(&self) -> usize {
        match self {
            Self::Fixed(_) => 1,
            Self::Enum(parameter) => parameter.allowed().len(),
            Self::Range(parameter) => parameter.values_len(),
            Self::Program(parameter) => parameter.values().len(),
        }
    }

    /// Validates and stores a value.
    ///
    /// Triggers are not fired here; the owning command does that.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the allowed domain if the
    /// value is rejected.
    pub fn set_value(&mut self, value: &ParamValue) -> Result<(), ValidationError> {
        match self {
            Self::Fixed(parameter) => parameter.set_value(value),
            Self::Enum(parameter) => parameter.set_value(value),
            Self::Range(parameter) => parameter.set_value(value),
            Self::Program(parameter) => parameter.set_value(value),
        }
    }

    /// Restores the state derived from the schema fragment.
    pub fn reset(&mut self) {
        match self {
            Self::Fixed(parameter) => parameter.reset(),
            Self::Enum(parameter) => parameter.reset(),
            Self::Range(parameter) => parameter.reset(),
            Self::Program(parameter) => parameter.reset(),
        }
    }

    /// Registers a rule on this parameter.
    ///
    /// # Returns
    ///
    /// * `true` if the parameter already holds the trigger value, in which
    ///   case the caller must apply the rule right away
    pub fn add_trigger(&mut self, rule: Rule) -> bool {
        let matches: bool = self.matches_trigger(&rule.trigger_value);
        self.base_mut().add_trigger(rule);
        matches
    }

    /// Returns `true` if the stored value equals `value`, ignoring case.
    #[must_use]
    pub fn matches_trigger(&self, value: &str) -> bool {
        self.intern_value().to_string().to_lowercase() == value.to_lowercase()
    }

    /// Returns the rules registered for the current value.
    #[must_use]
    pub fn triggered_rules(&self) -> Vec<Rule> {
        self.base()
            .rules_for(&self.intern_value().to_string())
            .to_vec()
    }

    /// Renders the trigger table as nested JSON.
    ///
    /// Each trigger value maps to its extra conditions, nested key then
    /// value, ending in `target key -> effect value`.
    #[must_use]
    pub fn trigger_summary(&self) -> Value {
        let mut summary: Value = Value::Object(Map::new());
        for (value, rules) in self.base().triggers() {
            for rule in rules {
                let mut path: Vec<&str> = vec![value.as_str()];
                for (extra_key, extra_value) in &rule.extras {
                    path.push(extra_key);
                    path.push(extra_value);
                }
                insert_path(
                    &mut summary,
                    &path,
                    &rule.param_key,
                    rule.effect.summary_value(),
                );
            }
        }
        summary
    }

    /// Returns `true` for the fixed variant.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    /// Returns the fixed variant, if this is one.
    #[must_use]
    pub const fn as_fixed(&self) -> Option<&FixedParameter> {
        match self {
            Self::Fixed(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// Returns the enum variant, if this is one.
    #[must_use]
    pub const fn as_enum(&self) -> Option<&EnumParameter> {
        match self {
            Self::Enum(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// Returns the range variant, if this is one.
    #[must_use]
    pub const fn as_range(&self) -> Option<&RangeParameter> {
        match self {
            Self::Range(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// Returns the program variant, if this is one.
    #[must_use]
    pub const fn as_program(&self) -> Option<&ProgramParameter> {
        match self {
            Self::Program(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// Returns the program variant mutably, if this is one.
    pub const fn as_program_mut(&mut self) -> Option<&mut ProgramParameter> {
        match self {
            Self::Program(parameter) => Some(parameter),
            _ => None,
        }
    }
}

impl From<FixedParameter> for Parameter {
    fn from(parameter: FixedParameter) -> Self {
        Self::Fixed(parameter)
    }
}

impl From<EnumParameter> for Parameter {
    fn from(parameter: EnumParameter) -> Self {
        Self::Enum(parameter)
    }
}

impl From<RangeParameter> for Parameter {
    fn from(parameter: RangeParameter) -> Self {
        Self::Range(parameter)
    }
}

impl From<ProgramParameter> for Parameter {
    fn from(parameter: ProgramParameter) -> Self {
        Self::Program(parameter)
    }
}

fn has_scalar(attributes: &Map<String, Value>, name: &str) -> bool {
    attributes
        .get(name)
        .and_then(ParamValue::from_json)
        .is_some()
}

fn insert_path(root: &mut Value, path: &[&str], key: &str, leaf: Value) {
    let mut node: &mut Value = root;
    for segment in path {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = &mut node[*segment];
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    node[key] = leaf;
}
