// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use async_trait::async_trait;
use hon_parameter::ParamValue;
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::TransportError;

/// Only this command carries a program name on the wire.
const START_PROGRAM: &str = "startProgram";

/// The payload handed to the transport when a command is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    /// The command name.
    pub command_name: String,
    /// The main parameter group.
    pub parameters: IndexMap<String, String>,
    /// The ancillary parameter group.
    pub ancillary_parameters: IndexMap<String, String>,
    /// The upper-cased category name, for `startProgram` only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
}

impl CommandRequest {
    /// Builds a request from parameter values.
    ///
    /// # Arguments
    ///
    /// * `command_name` - The command name
    /// * `parameters` - The main parameter group
    /// * `ancillary_parameters` - The ancillary parameter group
    /// * `category_name` - The active category name, empty if none
    #[must_use]
    pub fn new(
        command_name: &str,
        parameters: &IndexMap<String, ParamValue>,
        ancillary_parameters: &IndexMap<String, ParamValue>,
        category_name: &str,
    ) -> Self {
        let program_name: Option<String> = (command_name == START_PROGRAM
            && !category_name.is_empty())
        .then(|| category_name.to_uppercase());
        Self {
            command_name: String::from(command_name),
            parameters: to_text(parameters),
            ancillary_parameters: to_text(ancillary_parameters),
            program_name,
        }
    }
}

fn to_text(values: &IndexMap<String, ParamValue>) -> IndexMap<String, String> {
    values
        .iter()
        .map(|(key, value)| (key.clone(), value.to_string()))
        .collect()
}

/// Delivers commands to an appliance.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Sends a command.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the appliance accepted the command
    /// * `Ok(false)` if it answered but did not accept it
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the command could not be delivered.
    async fn send_command(&self, request: &CommandRequest) -> Result<bool, TransportError>;
}
