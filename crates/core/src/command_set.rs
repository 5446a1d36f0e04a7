// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use hon_parameter::{ParamValue, Parameter, ProgramParameter};
use indexmap::{IndexMap, IndexSet};
use num_traits::ToPrimitive;
use tracing::{debug, info};

use crate::command::Command;
use crate::error::{CommandError, SendError};
use crate::transport::CommandTransport;

/// The category key of a command without categories.
pub const DEFAULT_CATEGORY: &str = "_";

/// Every category variant of one command name, and which one is active.
///
/// Reads and writes go through the active category. Switching category
/// repoints to another variant; it never copies values between them.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSet {
    name: String,
    categories: IndexMap<String, Command>,
    /// Index into `categories`. Categories are never removed, so it stays valid.
    active: usize,
}

impl CommandSet {
    /// Wraps a command without categories.
    #[must_use]
    pub fn single(command: Command) -> Self {
        let mut categories: IndexMap<String, Command> = IndexMap::new();
        let name: String = String::from(command.name());
        categories.insert(String::from(DEFAULT_CATEGORY), command);
        Self {
            name,
            categories,
            active: 0,
        }
    }

    /// Groups category variants of one command.
    ///
    /// # Arguments
    ///
    /// * `name` - The command name
    /// * `categories` - Cleaned category name -> command
    /// * `active` - The initially active category; the first one if unknown
    ///
    /// # Returns
    ///
    /// * `None` if `categories` is empty
    #[must_use]
    pub fn with_categories(
        name: &str,
        categories: IndexMap<String, Command>,
        active: &str,
    ) -> Option<Self> {
        if categories.is_empty() {
            return None;
        }
        let mut command_set: Self = Self {
            name: String::from(name),
            active: categories.get_index_of(active).unwrap_or(0),
            categories,
        };
        command_set.sync_programs();
        Some(command_set)
    }

    /// Returns the command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the active category.
    #[must_use]
    pub fn active(&self) -> &Command {
        &self.categories[self.active]
    }

    /// Returns the active category mutably.
    pub fn active_mut(&mut self) -> &mut Command {
        &mut self.categories[self.active]
    }

    /// Returns the name of the active category.
    #[must_use]
    pub fn category(&self) -> &str {
        self.categories
            .get_index(self.active)
            .map_or(DEFAULT_CATEGORY, |(name, _)| name.as_str())
    }

    /// Returns every category.
    #[must_use]
    pub const fn categories(&self) -> &IndexMap<String, Command> {
        &self.categories
    }

    /// Returns one category.
    #[must_use]
    pub fn category_command(&self, name: &str) -> Option<&Command> {
        self.categories.get(name)
    }

    /// Returns `true` unless this wraps a single command.
    #[must_use]
    pub fn has_categories(&self) -> bool {
        !self.categories.contains_key(DEFAULT_CATEGORY)
    }

    /// Makes another category active.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownCategory`] if no category has this name.
    pub fn set_category(&mut self, name: &str) -> Result<(), CommandError> {
        let Some(index) = self.categories.get_index_of(name) else {
            return Err(CommandError::UnknownCategory {
                command: self.name.clone(),
                allowed: self.categories.keys().cloned().collect(),
                category: String::from(name),
            });
        };
        self.active = index;
        debug!(command = %self.name, category = %name, "Switched category");
        Ok(())
    }

    /// Switches category from a raw program hint such as `PROGRAMS.WM.ECO`.
    ///
    /// # Errors
    ///
    /// See [`Self::set_category`].
    pub fn set_category_hint(&mut self, hint: &str) -> Result<(), CommandError> {
        let name: String = hint.rsplit('.').next().unwrap_or(hint).to_lowercase();
        self.set_category(&name)
    }

    /// Adds or replaces a category and refreshes every selector.
    pub fn insert_category(&mut self, name: &str, command: Command) {
        if self.categories.contains_key(DEFAULT_CATEGORY) && self.categories.len() == 1 {
            info!(command = %self.name, category = %name, "Adding a category to a plain command");
        }
        self.categories.insert(String::from(name), command);
        self.sync_programs();
    }

    /// Sets a value on the active category.
    ///
    /// Setting the category selector switches the active category instead.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] if the key is unknown or the value is
    /// rejected.
    pub fn set_value(
        &mut self,
        key: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), CommandError> {
        let value: ParamValue = value.into();
        let selector: Option<ProgramParameter> = self
            .active()
            .parameter(key)
            .and_then(Parameter::as_program)
            .cloned();
        if let Some(mut selector) = selector {
            selector.set_value(&value)?;
            return self.set_category(&value.to_string());
        }
        self.active_mut().set_value(key, value)
    }

    /// Returns the union of parameter keys across categories, in first-seen
    /// order.
    #[must_use]
    pub fn setting_keys(&self) -> Vec<String> {
        let keys: IndexSet<&String> = self
            .categories
            .values()
            .flat_map(|command| command.parameters().keys())
            .collect();
        keys.into_iter().cloned().collect()
    }

    /// Merges the parameters of every category, keeping for each key the
    /// variant offering the broader domain.
    ///
    /// A non-fixed variant replaces a fixed one; otherwise the variant with
    /// strictly more allowed values wins.
    #[must_use]
    pub fn available_settings(&self) -> IndexMap<String, Parameter> {
        let mut result: IndexMap<String, Parameter> = IndexMap::new();
        for command in self.categories.values() {
            for (key, parameter) in command.parameters() {
                let replace: bool = result
                    .get(key)
                    .is_none_or(|current| more_options(current, parameter));
                if replace {
                    result.insert(key.clone(), parameter.clone());
                }
            }
        }
        result
    }

    /// Pushes the category names and program code index into every
    /// category selector.
    pub fn sync_programs(&mut self) {
        let programs: Vec<String> = self
            .categories
            .keys()
            .filter(|name| name.as_str() != DEFAULT_CATEGORY)
            .cloned()
            .collect();
        let ids: BTreeMap<i64, String> = self
            .categories
            .iter()
            .filter(|(name, command)| !name.contains("iot_") && !command.is_favourite())
            .filter_map(|(name, command)| {
                let code: i64 = command
                    .parameter("prCode")?
                    .value()
                    .as_f64()?
                    .round()
                    .to_i64()?;
                Some((code, name.clone()))
            })
            .collect();
        for command in self.categories.values_mut() {
            if let Some(program) = command.program_mut() {
                program.set_programs(programs.clone(), ids.clone());
            }
        }
    }

    /// Sends the active category.
    ///
    /// # Errors
    ///
    /// See [`Command::send`].
    pub async fn send(
        &mut self,
        transport: &dyn CommandTransport,
        only_mandatory: bool,
    ) -> Result<bool, SendError> {
        self.active_mut().send(transport, only_mandatory).await
    }
}

fn more_options(current: &Parameter, candidate: &Parameter) -> bool {
    if current.is_fixed() && !candidate.is_fixed() {
        return true;
    }
    candidate.values_len() > current.values_len()
}
