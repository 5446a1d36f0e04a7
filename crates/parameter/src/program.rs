// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use serde_json::Map;

use crate::base::ParameterBase;
use crate::error::ValidationError;
use crate::value::ParamValue;

/// Category names containing any of these are never offered for selection.
pub const PROGRAM_FILTER: [&str; 2] = ["iot_recipe", "iot_guided"];

/// Reduces a `PROGRAM.…` category name to its last segment, lowercased.
///
/// Other names are returned unchanged.
#[must_use]
pub fn clean_category_name(category: &str) -> String {
    if category.contains("PROGRAM") {
        category
            .rsplit('.')
            .next()
            .unwrap_or(category)
            .to_lowercase()
    } else {
        String::from(category)
    }
}

/// The category selector of a command.
///
/// Its value is the name of the active category. The selectable names and
/// the program code index are pushed in by the owning command set whenever
/// its categories change.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramParameter {
    base: ParameterBase,
    value: String,
    programs: Vec<String>,
    ids: BTreeMap<i64, String>,
}

impl ProgramParameter {
    /// Creates a selector for a command whose category is `category_name`.
    #[must_use]
    pub fn new(key: &str, category_name: &str, group: &str) -> Self {
        let mut base: ParameterBase = ParameterBase::new(key, &Map::new(), group);
        base.set_typology("enum");
        Self {
            base,
            value: clean_category_name(category_name),
            programs: Vec::new(),
            ids: BTreeMap::new(),
        }
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

    /// Returns the active category name.
    #[must_use]
    pub fn value(&self) -> ParamValue {
        ParamValue::Text(self.value.clone())
    }

    /// Returns the selectable category names, sorted, without filtered names.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        let mut values: Vec<String> = self
            .programs
            .iter()
            .filter(|name| PROGRAM_FILTER.iter().all(|filter| !name.contains(filter)))
            .cloned()
            .collect();
        values.sort();
        values
    }

    /// Returns every known category name.
    #[must_use]
    pub fn programs(&self) -> &[String] {
        &self.programs
    }

    /// Returns the program code index (`prCode` -> category name).
    #[must_use]
    pub const fn ids(&self) -> &BTreeMap<i64, String> {
        &self.ids
    }

    /// Selects a category by name.
    ///
    /// This only records the name; switching the active parameter set is
    /// done by the owning command set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownCategory`] if the name is not
    /// selectable.
    pub fn set_value(&mut self, value: &ParamValue) -> Result<(), ValidationError> {
        let name: String = value.to_string();
        let allowed: Vec<String> = self.values();
        if allowed.contains(&name) {
            self.value = name;
            return Ok(());
        }
        Err(ValidationError::UnknownCategory {
            key: String::from(self.base.key()),
            allowed,
            value: name,
        })
    }

    /// Labels this selector without validation.
    ///
    /// Used when a favourite is registered under a new category name.
    pub fn assign(&mut self, name: &str) {
        self.value = String::from(name);
    }

    /// Replaces the known categories and the program code index.
    pub fn set_programs(&mut self, programs: Vec<String>, ids: BTreeMap<i64, String>) {
        self.programs = programs;
        self.ids = ids;
    }

    /// Re-reads the common attributes.
    pub fn reset(&mut self) {
        self.base.load_attributes();
        self.base.set_typology("enum");
    }
}
