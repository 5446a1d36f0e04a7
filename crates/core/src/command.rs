// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use hon_parameter::{
    ParamValue, Parameter, ProgramParameter, Rule, json_to_string, string_attribute,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::error::{CommandError, SendError};
use crate::rules::RuleSet;
use crate::transport::{CommandRequest, CommandTransport};
use crate::trigger::{current_triggers, propagate};

/// The group holding the main payload.
pub const PARAMETERS_GROUP: &str = "parameters";

/// The group holding the ancillary payload.
pub const ANCILLARY_GROUP: &str = "ancillaryParameters";

/// The group synthetic parameters are placed in.
pub const CUSTOM_GROUP: &str = "custom";

/// Appliance-level inputs to schema parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaContext {
    zone: u32,
    aliases: BTreeMap<String, String>,
}

impl SchemaContext {
    /// Creates a context.
    ///
    /// # Arguments
    ///
    /// * `zone` - The appliance zone, `0` if the appliance is not zoned
    /// * `aliases` - Schema key -> live parameter key, used by rule trees
    #[must_use]
    pub const fn new(zone: u32, aliases: BTreeMap<String, String>) -> Self {
        Self { zone, aliases }
    }

    /// Creates a context from the `applianceModel` section of a schema.
    ///
    /// Aliases are read from its `options` map; non-text options are skipped.
    #[must_use]
    pub fn from_model(zone: u32, model: &Map<String, Value>) -> Self {
        let aliases: BTreeMap<String, String> = model
            .get("options")
            .and_then(Value::as_object)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|(key, value)| json_to_string(value).map(|v| (key.clone(), v)))
                    .collect()
            })
            .unwrap_or_default();
        Self::new(zone, aliases)
    }

    /// Returns the appliance zone.
    #[must_use]
    pub const fn zone(&self) -> u32 {
        self.zone
    }

    /// Returns the key aliases.
    #[must_use]
    pub const fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }
}

/// A named remote operation and its live parameters.
///
/// A command built for a category also carries a [`ProgramParameter`]
/// (`program` or `category`) naming that category.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    category_name: String,
    parameters: IndexMap<String, Parameter>,
    rules: Vec<RuleSet>,
    data: Map<String, Value>,
}

impl Command {
    /// Builds a command from its schema.
    ///
    /// # Arguments
    ///
    /// * `name` - The command name
    /// * `schema` - `group -> {key -> attributes}`
    /// * `category_name` - The raw category name, empty for plain commands
    /// * `context` - Appliance-level parsing inputs
    #[must_use]
    pub fn new(
        name: &str,
        schema: &Map<String, Value>,
        category_name: &str,
        context: &SchemaContext,
    ) -> Self {
        let mut command: Self = Self {
            name: String::from(name),
            category_name: String::from(category_name),
            parameters: IndexMap::new(),
            rules: Vec::new(),
            data: Map::new(),
        };
        command.load_parameters(schema, context);
        command
    }

    fn load_parameters(&mut self, schema: &Map<String, Value>, context: &SchemaContext) {
        for (group, items) in schema {
            let Value::Object(items) = items else {
                debug!(command = %self.name, entry = %group, "Skipping non-group schema entry");
                continue;
            };
            for (key, attributes) in items {
                let Value::Object(attributes) = attributes else {
                    debug!(command = %self.name, key = %key, "Skipping non-object parameter");
                    continue;
                };
                self.create_parameter(key, attributes, group, context);
            }
        }
        if !self.category_name.is_empty() {
            let key: &str = if self.category_name.contains("PROGRAM") {
                "program"
            } else {
                "category"
            };
            self.parameters.insert(
                String::from(key),
                Parameter::from(ProgramParameter::new(key, &self.category_name, CUSTOM_GROUP)),
            );
        }

        let mut seeds: Vec<Rule> = Vec::new();
        for rule_set in &mut self.rules {
            seeds.extend(rule_set.patch(&mut self.parameters));
        }
        let applied: usize = propagate(&mut self.parameters, seeds);
        debug!(
            command = %self.name,
            category = %self.category_name,
            parameters = self.parameters.len(),
            rule_sets = self.rules.len(),
            applied,
            "Loaded command parameters"
        );
    }

    fn create_parameter(
        &mut self,
        key: &str,
        attributes: &Map<String, Value>,
        group: &str,
        context: &SchemaContext,
    ) {
        let mut attributes: Map<String, Value> = attributes.clone();
        if key == "zoneMap" && context.zone() > 0 {
            attributes.insert(String::from("defaultValue"), Value::from(context.zone()));
        }
        if string_attribute(&attributes, "category").as_deref() == Some("rule") {
            match attributes
                .get("fixedValue")
                .or_else(|| attributes.get("enumValues"))
            {
                Some(Value::Object(tree)) => {
                    self.rules.push(RuleSet::parse(tree, context.aliases()));
                }
                _ => warn!(command = %self.name, key = %key, "Rule parameter without a rule tree"),
            }
            return;
        }
        if let Some(parameter) = Parameter::from_schema(key, &attributes, group) {
            self.parameters.insert(String::from(key), parameter);
            return;
        }
        self.data.insert(String::from(key), Value::Object(attributes));
    }

    /// Returns the command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw category name, empty for plain commands.
    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// Returns every parameter, in schema order.
    #[must_use]
    pub const fn parameters(&self) -> &IndexMap<String, Parameter> {
        &self.parameters
    }

    /// Returns every parameter; alias of [`Self::parameters`].
    #[must_use]
    pub const fn settings(&self) -> &IndexMap<String, Parameter> {
        &self.parameters
    }

    /// Returns one parameter.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&Parameter> {
        self.parameters.get(key)
    }

    /// Returns the parsed rule sets.
    #[must_use]
    pub fn rules(&self) -> &[RuleSet] {
        &self.rules
    }

    /// Returns the schema fragments that did not describe a parameter.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Returns the display value of every parameter.
    #[must_use]
    pub fn parameter_value(&self) -> IndexMap<String, ParamValue> {
        self.parameters
            .iter()
            .map(|(key, parameter)| (key.clone(), parameter.value()))
            .collect()
    }

    /// Returns `true` if this command was registered from a favourite.
    #[must_use]
    pub fn is_favourite(&self) -> bool {
        self.parameters.contains_key("favourite")
    }

    /// Returns the category selector, if this command has one.
    #[must_use]
    pub fn program(&self) -> Option<&ProgramParameter> {
        self.parameters.values().find_map(Parameter::as_program)
    }

    /// Returns the category selector mutably, if this command has one.
    pub fn program_mut(&mut self) -> Option<&mut ProgramParameter> {
        self.parameters.values_mut().find_map(Parameter::as_program_mut)
    }

    /// Validates and stores a value, then fires the triggers it reaches.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownParameter`] if the key is unknown,
    /// [`CommandError::CategorySelector`] if the key is the category selector
    /// and [`CommandError::Validation`] if the parameter rejects the value.
    /// The command is unchanged in every case.
    pub fn set_value(
        &mut self,
        key: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), CommandError> {
        let value: ParamValue = value.into();
        let Some(parameter) = self.parameters.get_mut(key) else {
            return Err(CommandError::UnknownParameter {
                command: self.name.clone(),
                key: String::from(key),
            });
        };
        if parameter.as_program().is_some() {
            return Err(CommandError::CategorySelector {
                command: self.name.clone(),
                key: String::from(key),
            });
        }
        parameter.set_value(&value)?;
        let seeds: Vec<Rule> = parameter.triggered_rules();
        propagate(&mut self.parameters, seeds);
        Ok(())
    }

    /// Adds or replaces a parameter without firing triggers.
    pub fn insert_parameter(&mut self, parameter: Parameter) {
        self.parameters
            .insert(String::from(parameter.key()), parameter);
    }

    /// Restores every parameter to its schema state and re-applies the rules
    /// that hold on it.
    pub fn reset(&mut self) {
        for parameter in self.parameters.values_mut() {
            parameter.reset();
        }
        let seeds: Vec<Rule> = current_triggers(&self.parameters);
        propagate(&mut self.parameters, seeds);
    }

    /// Buckets the raw values by payload group.
    ///
    /// # Arguments
    ///
    /// * `mandatory_only` - Keep only mandatory parameters
    #[must_use]
    pub fn parameter_groups(
        &self,
        mandatory_only: bool,
    ) -> IndexMap<String, IndexMap<String, ParamValue>> {
        let mut groups: IndexMap<String, IndexMap<String, ParamValue>> = IndexMap::new();
        for (key, parameter) in &self.parameters {
            if mandatory_only && !parameter.mandatory() {
                continue;
            }
            groups
                .entry(String::from(parameter.group()))
                .or_default()
                .insert(key.clone(), parameter.intern_value());
        }
        groups
    }

    /// Sends the main parameter group.
    ///
    /// # Errors
    ///
    /// Returns a [`SendError`] if the command was not accepted. The command
    /// is reset in that case.
    pub async fn send(
        &mut self,
        transport: &dyn CommandTransport,
        only_mandatory: bool,
    ) -> Result<bool, SendError> {
        let parameters: IndexMap<String, ParamValue> = self
            .parameter_groups(only_mandatory)
            .shift_remove(PARAMETERS_GROUP)
            .unwrap_or_default();
        self.send_parameters(transport, parameters).await
    }

    /// Sends the named parameters plus every mandatory one.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn send_specific(
        &mut self,
        transport: &dyn CommandTransport,
        keys: &[&str],
    ) -> Result<bool, SendError> {
        let parameters: IndexMap<String, ParamValue> = self
            .parameters
            .iter()
            .filter(|(key, parameter)| keys.contains(&key.as_str()) || parameter.mandatory())
            .map(|(key, parameter)| (key.clone(), parameter.intern_value()))
            .collect();
        self.send_parameters(transport, parameters).await
    }

    /// Sends `parameters` together with the ancillary group.
    ///
    /// `programRules` is dropped from the ancillary group and a `prStr`
    /// parameter is replaced by the upper-cased category name.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn send_parameters(
        &mut self,
        transport: &dyn CommandTransport,
        mut parameters: IndexMap<String, ParamValue>,
    ) -> Result<bool, SendError> {
        let mut ancillary: IndexMap<String, ParamValue> = self
            .parameter_groups(false)
            .shift_remove(ANCILLARY_GROUP)
            .unwrap_or_default();
        ancillary.shift_remove("programRules");
        if let Some(program) = parameters.get_mut("prStr") {
            *program = ParamValue::Text(self.category_name.to_uppercase());
        }

        let request: CommandRequest =
            CommandRequest::new(&self.name, &parameters, &ancillary, &self.category_name);
        match transport.send_command(&request).await {
            Ok(true) => {
                info!(command = %self.name, category = %self.category_name, "Command sent");
                Ok(true)
            }
            Ok(false) => {
                error!(command = %self.name, "Command was not accepted");
                self.reset();
                Err(SendError::Rejected {
                    command: self.name.clone(),
                })
            }
            Err(e) => {
                error!(command = %self.name, error = %e, "Failed to send command");
                self.reset();
                Err(SendError::Transport {
                    command: self.name.clone(),
                    message: e.to_string(),
                })
            }
        }
    }
}
