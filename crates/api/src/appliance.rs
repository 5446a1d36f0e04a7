// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hon::{Commands, SendError};
use hon_parameter::{FixedParameter, ParamValue, Parameter, json_to_string};
use indexmap::IndexMap;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::api::{ApplianceTransport, HonApi};
use crate::attribute::ApplianceAttributes;
use crate::customizer::{ApplianceCustomizer, customizer_for};
use crate::error::{ApiError, LoaderError};
use crate::loader::{CommandLoader, LoadedCommands};

/// Identity of an appliance as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceInfo {
    /// The MAC address, used as the appliance identifier.
    pub mac_address: String,
    /// The type tag, such as `WM` or `OV`.
    pub appliance_type_name: String,
    /// The model identifier.
    #[serde(deserialize_with = "text_or_number")]
    pub appliance_model_id: String,
    /// The product code.
    #[serde(default)]
    pub code: String,
    /// The user-given name.
    #[serde(default)]
    pub nick_name: String,
    /// The number of independently controlled zones, `0` if not zoned.
    #[serde(default, deserialize_with = "zone_count")]
    pub zone: u32,
    /// Every other field reported for the appliance.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value: Value = Value::deserialize(deserializer)?;
    json_to_string(&value).ok_or_else(|| serde::de::Error::custom("expected text or a number"))
}

fn zone_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let text: String = text_or_number(deserializer)?;
    if text.is_empty() {
        return Ok(0);
    }
    text.parse::<u32>()
        .map_err(|e| serde::de::Error::custom(format!("invalid zone count {text}: {e}")))
}

/// One controllable appliance, or one zone of a zoned appliance.
#[derive(Debug)]
pub struct Appliance {
    info: ApplianceInfo,
    zone: u32,
    commands: Commands,
    additional_data: Map<String, Value>,
    appliance_model: Map<String, Value>,
    attributes: ApplianceAttributes,
    customizer: &'static dyn ApplianceCustomizer,
}

impl Appliance {
    /// Creates an appliance without commands or attributes.
    ///
    /// # Arguments
    ///
    /// * `info` - The appliance identity
    /// * `zone` - The zone this instance controls, `0` if not zoned
    #[must_use]
    pub fn new(info: ApplianceInfo, zone: u32) -> Self {
        let customizer: &'static dyn ApplianceCustomizer =
            customizer_for(&info.appliance_type_name);
        Self {
            info,
            zone,
            commands: Commands::new(),
            additional_data: Map::new(),
            appliance_model: Map::new(),
            attributes: ApplianceAttributes::default(),
            customizer,
        }
    }

    /// Creates one appliance per zone, or a single one if not zoned.
    #[must_use]
    pub fn for_zones(info: &ApplianceInfo) -> Vec<Self> {
        if info.zone > 1 {
            (1..=info.zone)
                .map(|zone| Self::new(info.clone(), zone))
                .collect()
        } else {
            vec![Self::new(info.clone(), 0)]
        }
    }

    /// Returns the appliance identity.
    #[must_use]
    pub const fn info(&self) -> &ApplianceInfo {
        &self.info
    }

    /// Returns the zone, `0` if not zoned.
    #[must_use]
    pub const fn zone(&self) -> u32 {
        self.zone
    }

    /// Returns the lower-cased type tag.
    #[must_use]
    pub fn appliance_type(&self) -> String {
        self.info.appliance_type_name.to_lowercase()
    }

    /// Returns the display name, with a ` Z<n>` suffix for zones.
    #[must_use]
    pub fn nick_name(&self) -> String {
        self.with_zone(&self.info.nick_name, " Z")
    }

    /// Returns the identifier, with a `_z<n>` suffix for zones.
    #[must_use]
    pub fn unique_id(&self) -> String {
        self.with_zone(&self.info.mac_address, "_z")
    }

    fn with_zone(&self, name: &str, prefix: &str) -> String {
        if self.zone == 0 || name.is_empty() {
            return String::from(name);
        }
        format!("{name}{prefix}{}", self.zone)
    }

    /// Returns the loaded commands.
    #[must_use]
    pub const fn commands(&self) -> &Commands {
        &self.commands
    }

    /// Returns the loaded commands mutably.
    pub const fn commands_mut(&mut self) -> &mut Commands {
        &mut self.commands
    }

    /// Returns the schema entries that were not commands.
    #[must_use]
    pub const fn additional_data(&self) -> &Map<String, Value> {
        &self.additional_data
    }

    /// Returns the `applianceModel` section of the schema.
    #[must_use]
    pub const fn appliance_model(&self) -> &Map<String, Value> {
        &self.appliance_model
    }

    /// Returns the live attributes.
    #[must_use]
    pub const fn attributes(&self) -> &ApplianceAttributes {
        &self.attributes
    }

    /// Returns the live attributes mutably.
    pub const fn attributes_mut(&mut self) -> &mut ApplianceAttributes {
        &mut self.attributes
    }

    /// Loads and reconciles every command, then pulls the live attribute
    /// values into the `settings` command.
    ///
    /// # Errors
    ///
    /// Returns a [`LoaderError`] if the command data could not be fetched.
    /// The appliance is unchanged in that case.
    pub async fn load_commands(&mut self, api: &dyn HonApi) -> Result<(), LoaderError> {
        let mut loader: CommandLoader<'_> = CommandLoader::new(api, &self.info, self.zone);
        loader.load().await?;
        let loaded: LoadedCommands = loader.into_loaded();
        self.commands = loaded.commands;
        self.additional_data = loaded.additional_data;
        self.appliance_model = loaded.appliance_model;
        self.sync_params_to_command("settings");
        Ok(())
    }

    /// Fetches the live attributes and applies the type specific adjustments.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the attributes could not be fetched.
    pub async fn load_attributes(&mut self, api: &dyn HonApi) -> Result<(), ApiError> {
        let data: Map<String, Value> = api.load_attributes(&self.info).await?;
        for (key, value) in data {
            if key == "shadow" {
                if let Some(parameters) = value.get("parameters").and_then(Value::as_object) {
                    for (name, payload) in parameters {
                        self.attributes.update_parameter(name, payload);
                    }
                }
                continue;
            }
            self.attributes.insert(&key, value);
        }
        let program_name: String = self.program_name();
        self.attributes.insert("programName", Value::from(program_name));
        self.customizer.attributes(&mut self.attributes);
        debug!(
            appliance = %self.unique_id(),
            parameters = self.attributes.parameters().len(),
            "Loaded attributes"
        );
        Ok(())
    }

    /// Resolves the running program from `prCode` through the program codes
    /// of `startProgram`.
    fn program_name(&self) -> String {
        let code: Option<i64> = self
            .attributes
            .parameter("prCode")
            .and_then(|attribute| attribute.value().as_f64())
            .and_then(|code| code.round().to_i64());
        code.and_then(|code| {
            self.commands
                .get("startProgram")?
                .active()
                .program()?
                .ids()
                .get(&code)
                .cloned()
        })
        .unwrap_or_else(|| String::from("No Program"))
    }

    /// Flattens every command's settings into `command.key` entries.
    ///
    /// Keys missing from the active category are filled with an empty fixed
    /// placeholder so every category's keys are present.
    #[must_use]
    pub fn settings(&self) -> IndexMap<String, Parameter> {
        let mut result: IndexMap<String, Parameter> = IndexMap::new();
        for (name, command_set) in &self.commands {
            for key in command_set.setting_keys() {
                let parameter: Parameter = command_set
                    .active()
                    .parameter(&key)
                    .cloned()
                    .unwrap_or_else(|| placeholder(&key));
                result.insert(format!("{name}.{key}"), parameter);
            }
        }
        self.customizer.settings(&mut result);
        result
    }

    /// Writes a command's current values into shielded attributes.
    pub fn sync_command_to_params(&mut self, command_name: &str) {
        let Some(command_set) = self.commands.get(command_name) else {
            return;
        };
        for (key, parameter) in command_set.active().parameters() {
            if let Some(attribute) = self.attributes.parameters_mut().get_mut(key) {
                let value: Value = Value::from(parameter.intern_value().to_string());
                attribute.update(&value, true);
            }
        }
    }

    /// Pulls attribute values into a command's settings.
    ///
    /// Values the command rejects are logged and skipped.
    pub fn sync_params_to_command(&mut self, command_name: &str) {
        let Some(command_set) = self.commands.get_mut(command_name) else {
            return;
        };
        for key in command_set.setting_keys() {
            let Some(attribute) = self.attributes.parameter(&key) else {
                continue;
            };
            if attribute.raw().is_empty() {
                continue;
            }
            let is_range: bool = command_set
                .active()
                .parameter(&key)
                .and_then(Parameter::as_range)
                .is_some();
            let value: ParamValue = if is_range {
                attribute.value()
            } else {
                ParamValue::Text(attribute.value().to_string())
            };
            if let Err(e) = command_set.set_value(&key, value) {
                info!(command = %command_name, key = %key, error = %e, "Skipping attribute value");
            }
        }
    }

    /// Sends the active category of a command.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::UnknownCommand`] if no command has this name and
    /// otherwise see [`hon::Command::send`].
    pub async fn send_command(
        &mut self,
        api: &dyn HonApi,
        command_name: &str,
        only_mandatory: bool,
    ) -> Result<bool, SendError> {
        if !self.commands.contains(command_name) {
            return Err(SendError::UnknownCommand(String::from(command_name)));
        }
        self.sync_command_to_params(command_name);
        let transport: ApplianceTransport<'_> = ApplianceTransport::new(api, &self.info);
        let Some(command_set) = self.commands.get_mut(command_name) else {
            return Err(SendError::UnknownCommand(String::from(command_name)));
        };
        command_set.send(&transport, only_mandatory).await
    }
}

fn placeholder(key: &str) -> Parameter {
    let mut attributes: Map<String, Value> = Map::new();
    attributes.insert(String::from("category"), Value::from("general"));
    Parameter::from(FixedParameter::new(key, &attributes, "none"))
}
