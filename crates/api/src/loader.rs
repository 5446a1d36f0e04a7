// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Builds the command registry of an appliance.
//!
//! Loading runs through a fixed sequence of states:
//!
//! ```text
//! Fetching -> Parsed -> RulesApplied -> HistoryRecovered -> FavouritesApplied -> Ready
//! ```
//!
//! Only `Fetching` can fail. Every later step logs and skips what it cannot
//! use.

use hon::{CUSTOM_GROUP, Command, CommandError, CommandSet, Commands, SchemaContext};
use hon_parameter::{
    FixedParameter, ParamValue, Parameter, clean_category_name, json_to_string, parse_number,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::api::HonApi;
use crate::appliance::ApplianceInfo;
use crate::error::LoaderError;

/// The category made active when a command has one with this name.
const DEFAULT_ACTIVE_CATEGORY: &str = "setParameters";

/// Where a [`CommandLoader`] is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoaderState {
    /// Waiting for the schema, favourites and history.
    Fetching,
    /// The schema has been split into commands and additional data.
    Parsed,
    /// Every command has applied its schema rules.
    RulesApplied,
    /// The last executed values have been restored.
    HistoryRecovered,
    /// Favourites have been registered as categories.
    FavouritesApplied,
    /// Loading finished.
    Ready,
}

/// The output of a finished [`CommandLoader`].
#[derive(Debug, Clone, Default)]
pub struct LoadedCommands {
    /// Every command, by name.
    pub commands: Commands,
    /// Top-level schema entries that were not commands.
    pub additional_data: Map<String, Value>,
    /// The `applianceModel` section of the schema.
    pub appliance_model: Map<String, Value>,
}

/// Fetches and reconciles the commands of one appliance.
pub struct CommandLoader<'a> {
    api: &'a dyn HonApi,
    info: &'a ApplianceInfo,
    zone: u32,
    state: LoaderState,
    favourites: Vec<Value>,
    history: Vec<Value>,
    loaded: LoadedCommands,
}

impl std::fmt::Debug for CommandLoader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLoader")
            .field("appliance", &self.info.mac_address)
            .field("zone", &self.zone)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> CommandLoader<'a> {
    /// Creates a loader in the `Fetching` state.
    ///
    /// # Arguments
    ///
    /// * `api` - The service to fetch from
    /// * `info` - The appliance to load
    /// * `zone` - The appliance zone, `0` if not zoned
    #[must_use]
    pub fn new(api: &'a dyn HonApi, info: &'a ApplianceInfo, zone: u32) -> Self {
        Self {
            api,
            info,
            zone,
            state: LoaderState::Fetching,
            favourites: Vec::new(),
            history: Vec::new(),
            loaded: LoadedCommands::default(),
        }
    }

    /// Returns the current step.
    #[must_use]
    pub const fn state(&self) -> LoaderState {
        self.state
    }

    /// Runs every step up to `Ready`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Fetch`] if any of the three datasets could not
    /// be fetched. No command is produced in that case.
    pub async fn load(&mut self) -> Result<(), LoaderError> {
        self.state = LoaderState::Fetching;
        let (schema, favourites, history) = futures::try_join!(
            self.api.load_commands(self.info),
            self.api.load_favourites(self.info),
            self.api.load_command_history(self.info),
        )?;
        self.favourites = favourites;
        self.history = history;

        self.parse(schema);
        self.transition(LoaderState::Parsed);
        // Each command applied its rules while being built.
        self.transition(LoaderState::RulesApplied);
        self.recover_history();
        self.transition(LoaderState::HistoryRecovered);
        self.apply_favourites();
        self.transition(LoaderState::FavouritesApplied);
        self.transition(LoaderState::Ready);

        info!(
            appliance = %self.info.mac_address,
            commands = self.loaded.commands.len(),
            favourites = self.favourites.len(),
            history = self.history.len(),
            additional = self.loaded.additional_data.len(),
            "Loaded commands"
        );
        Ok(())
    }

    /// Hands over the loaded commands.
    #[must_use]
    pub fn into_loaded(self) -> LoadedCommands {
        self.loaded
    }

    fn transition(&mut self, state: LoaderState) {
        debug!(appliance = %self.info.mac_address, from = ?self.state, to = ?state, "Loader state");
        self.state = state;
    }

    fn parse(&mut self, mut schema: Map<String, Value>) {
        match schema.shift_remove("applianceModel") {
            Some(Value::Object(model)) => self.loaded.appliance_model = model,
            Some(other) => {
                warn!(appliance = %self.info.mac_address, "applianceModel is not an object");
                self.loaded
                    .additional_data
                    .insert(String::from("applianceModel"), other);
            }
            None => {}
        }
        let context: SchemaContext = SchemaContext::from_model(self.zone, &self.loaded.appliance_model);

        for (name, data) in schema {
            if let Some(command_set) = parse_command_set(&name, &data, &context) {
                self.loaded.commands.insert(command_set);
                continue;
            }
            debug!(entry = %name, "Keeping non-command schema entry");
            self.loaded.additional_data.insert(name, data);
        }
    }

    /// Restores the newest history entry of every command.
    fn recover_history(&mut self) {
        for (name, command_set) in &mut self.loaded.commands {
            let Some(entry) = self.history.iter().find(|entry| {
                entry.pointer("/command/commandName").and_then(Value::as_str) == Some(name.as_str())
            }) else {
                continue;
            };
            let parameters: Map<String, Value> = entry
                .pointer("/command/parameters")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();

            if let Some(hint) = category_hint(entry, &parameters) {
                let switched: Result<(), CommandError> = match hint {
                    CategoryHint::Program(program) => command_set.set_category_hint(&program),
                    CategoryHint::Category(category) => command_set.set_category(&category),
                };
                if let Err(e) = switched {
                    debug!(command = %name, error = %e, "Ignoring history category");
                }
            }

            let command: &mut Command = command_set.active_mut();
            let mut restored: usize = 0;
            for (key, raw) in &parameters {
                let Some(value) = restorable_value(command.parameter(key), raw) else {
                    continue;
                };
                match command.set_value(key, value) {
                    Ok(()) => restored += 1,
                    Err(e) => debug!(command = %name, key = %key, error = %e, "Ignoring history value"),
                }
            }
            debug!(command = %name, category = %command_set.category(), restored, "Recovered last command state");
        }
    }

    /// Registers every favourite as a category of its base command.
    fn apply_favourites(&mut self) {
        for favourite in &self.favourites {
            let Some(name) = favourite.get("favouriteName").and_then(Value::as_str) else {
                warn!(appliance = %self.info.mac_address, "Skipping favourite without a name");
                continue;
            };
            let Some(request) = favourite.get("command").and_then(Value::as_object) else {
                warn!(favourite = %name, "Skipping favourite without a command");
                continue;
            };
            let command_name: &str = request
                .get("commandName")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let Some(command_set) = self.loaded.commands.get_mut(command_name) else {
                warn!(favourite = %name, command = %command_name, "Skipping favourite for unknown command");
                continue;
            };

            let program: Option<String> = request
                .get("programName")
                .and_then(Value::as_str)
                .map(clean_category_name);
            let mut base: Command = program
                .as_deref()
                .and_then(|program| command_set.category_command(program))
                .unwrap_or_else(|| command_set.active())
                .clone();

            for overrides in request.values().filter_map(Value::as_object) {
                for (key, raw) in overrides {
                    let Some(value) = restorable_value(base.parameter(key), raw) else {
                        continue;
                    };
                    if let Err(e) = base.set_value(key, value) {
                        debug!(favourite = %name, key = %key, error = %e, "Ignoring favourite value");
                    }
                }
            }

            base.insert_parameter(favourite_marker());
            if let Some(selector) = base.program_mut() {
                selector.assign(name);
            }
            command_set.insert_category(name, base);
            debug!(favourite = %name, command = %command_name, "Registered favourite");
        }
    }
}

enum CategoryHint {
    Program(String),
    Category(String),
}

fn category_hint(entry: &Value, parameters: &Map<String, Value>) -> Option<CategoryHint> {
    if let Some(program) = parameters.get("program").and_then(json_to_string) {
        return Some(CategoryHint::Program(program));
    }
    if let Some(category) = parameters.get("category").and_then(json_to_string) {
        return Some(CategoryHint::Category(category));
    }
    entry
        .pointer("/command/programName")
        .and_then(Value::as_str)
        .filter(|program| !program.is_empty())
        .map(|program| CategoryHint::Program(String::from(program)))
}

/// Converts a recorded value for a parameter that accepts restores.
///
/// Fixed values and category selectors are never restored. Range values are
/// coerced to numbers.
fn restorable_value(parameter: Option<&Parameter>, raw: &Value) -> Option<ParamValue> {
    match parameter? {
        Parameter::Fixed(_) | Parameter::Program(_) => None,
        Parameter::Range(_) => {
            let text: String = json_to_string(raw)?;
            Some(parse_number(&text).map_or(ParamValue::Text(text), ParamValue::Number))
        }
        Parameter::Enum(_) => ParamValue::from_json(raw),
    }
}

fn favourite_marker() -> Parameter {
    let mut attributes: Map<String, Value> = Map::new();
    attributes.insert(String::from("fixedValue"), Value::from("1"));
    Parameter::from(FixedParameter::new("favourite", &attributes, CUSTOM_GROUP))
}

/// Marks a schema entry as a command rather than a group of categories.
fn is_command(data: &Map<String, Value>) -> bool {
    data.contains_key("description") && data.contains_key("protocolType")
}

fn parse_command_set(name: &str, data: &Value, context: &SchemaContext) -> Option<CommandSet> {
    let Value::Object(data) = data else {
        return None;
    };
    if is_command(data) {
        return Some(CommandSet::single(Command::new(name, data, "", context)));
    }

    let mut categories: IndexMap<String, Command> = IndexMap::new();
    for (category, entry) in data {
        match entry {
            Value::Object(entry) if is_command(entry) => {
                categories.insert(
                    clean_category_name(category),
                    Command::new(name, entry, category, context),
                );
            }
            _ => debug!(command = %name, category = %category, "Skipping non-command category"),
        }
    }
    CommandSet::with_categories(name, categories, DEFAULT_ACTIVE_CATEGORY)
}
