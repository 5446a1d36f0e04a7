// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use async_trait::async_trait;
use hon::{CommandRequest, CommandTransport, TransportError};
use serde_json::{Map, Value};

use crate::appliance::ApplianceInfo;
use crate::error::ApiError;

/// The remote service an appliance talks to.
///
/// Implementations own connection handling. Nothing in this crate retries a
/// failed call.
#[async_trait]
pub trait HonApi: Send + Sync {
    /// Fetches the raw command schema of an appliance.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the schema could not be fetched.
    async fn load_commands(&self, info: &ApplianceInfo) -> Result<Map<String, Value>, ApiError>;

    /// Fetches the user's favourites for an appliance.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the favourites could not be fetched.
    async fn load_favourites(&self, info: &ApplianceInfo) -> Result<Vec<Value>, ApiError>;

    /// Fetches the command history of an appliance, newest first.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the history could not be fetched.
    async fn load_command_history(&self, info: &ApplianceInfo) -> Result<Vec<Value>, ApiError>;

    /// Fetches the live attributes of an appliance.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the attributes could not be fetched.
    async fn load_attributes(&self, info: &ApplianceInfo) -> Result<Map<String, Value>, ApiError>;

    /// Sends a command to an appliance.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the service accepted the command
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the command could not be delivered.
    async fn send_command(
        &self,
        info: &ApplianceInfo,
        request: &CommandRequest,
    ) -> Result<bool, ApiError>;
}

/// Binds a [`HonApi`] to one appliance so commands can send through it.
#[derive(Clone, Copy)]
pub struct ApplianceTransport<'a> {
    api: &'a dyn HonApi,
    info: &'a ApplianceInfo,
}

impl<'a> ApplianceTransport<'a> {
    /// Creates a transport sending to one appliance through `api`.
    #[must_use]
    pub const fn new(api: &'a dyn HonApi, info: &'a ApplianceInfo) -> Self {
        Self { api, info }
    }
}

impl std::fmt::Debug for ApplianceTransport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplianceTransport")
            .field("appliance", &self.info.mac_address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CommandTransport for ApplianceTransport<'_> {
    async fn send_command(&self, request: &CommandRequest) -> Result<bool, TransportError> {
        Ok(self.api.send_command(self.info, request).await?)
    }
}
