// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::rule::Rule;
use crate::value::{ParamValue, string_attribute};

/// Attributes shared by every parameter variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBase {
    /// Unique key within the owning command.
    key: String,
    /// The payload group, e.g. `parameters` or `ancillaryParameters`.
    group: String,
    category: String,
    typology: String,
    mandatory: bool,
    /// The original schema fragment, kept for `reset`.
    attributes: Map<String, Value>,
    /// Lowercased trigger value -> rules fired when the value is reached.
    triggers: IndexMap<String, Vec<Rule>>,
}

impl ParameterBase {
    /// Creates the common part of a parameter from its schema fragment.
    ///
    /// # Arguments
    ///
    /// * `key` - The parameter key
    /// * `attributes` - The schema fragment
    /// * `group` - The payload group
    #[must_use]
    pub fn new(key: &str, attributes: &Map<String, Value>, group: &str) -> Self {
        let mut base: Self = Self {
            key: String::from(key),
            group: String::from(group),
            category: String::new(),
            typology: String::new(),
            mandatory: false,
            attributes: attributes.clone(),
            triggers: IndexMap::new(),
        };
        base.load_attributes();
        base
    }

    /// Re-reads the common attributes from the schema fragment.
    ///
    /// Triggers are left in place.
    pub fn load_attributes(&mut self) {
        self.category = string_attribute(&self.attributes, "category").unwrap_or_default();
        self.typology = string_attribute(&self.attributes, "typology").unwrap_or_default();
        self.mandatory = self.attributes.get("mandatory").is_some_and(is_truthy);
    }

    /// Returns the parameter key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the payload group.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the schema category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the typology tag.
    #[must_use]
    pub fn typology(&self) -> &str {
        &self.typology
    }

    pub(crate) fn set_typology(&mut self, typology: &str) {
        self.typology = String::from(typology);
    }

    /// Returns `true` if the parameter must be part of every payload.
    #[must_use]
    pub const fn mandatory(&self) -> bool {
        self.mandatory
    }

    /// Returns the original schema fragment.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Registers a rule under its trigger value.
    pub fn add_trigger(&mut self, rule: Rule) {
        self.triggers
            .entry(rule.trigger_value.to_lowercase())
            .or_default()
            .push(rule);
    }

    /// Returns the rules registered for `value` (case-insensitive).
    #[must_use]
    pub fn rules_for(&self, value: &str) -> &[Rule] {
        self.triggers
            .get(&value.to_lowercase())
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the full trigger table.
    #[must_use]
    pub const fn triggers(&self) -> &IndexMap<String, Vec<Rule>> {
        &self.triggers
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) if text.eq_ignore_ascii_case("true") => true,
        _ => ParamValue::from_json(value)
            .and_then(|value| value.as_f64())
            .is_some_and(|number| number.abs() > f64::EPSILON),
    }
}
