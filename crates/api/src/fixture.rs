// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! A [`HonApi`] backed by recorded service payloads.
//!
//! Each appliance has a directory `<type>_<modelId>` below the root holding
//! one JSON file per call:
//!
//! ```text
//! fixtures/
//!   wm_1234/
//!     appliance_data.json
//!     attributes.json
//!     command_history.json
//!     commands.json
//!     favourites.json
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hon::CommandRequest;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api::HonApi;
use crate::appliance::ApplianceInfo;
use crate::error::ApiError;

/// Serves recorded payloads and records every command sent.
#[derive(Debug)]
pub struct FixtureApi {
    root: PathBuf,
    accept: bool,
    sent: Mutex<Vec<CommandRequest>>,
}

impl FixtureApi {
    /// Creates a fixture API reading from `root`. Sent commands are accepted.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            accept: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Makes every sent command report as not accepted.
    #[must_use]
    pub fn rejecting(mut self) -> Self {
        self.accept = false;
        self
    }

    /// Returns the fixture root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns every command sent so far, oldest first.
    pub async fn sent(&self) -> Vec<CommandRequest> {
        self.sent.lock().await.clone()
    }

    /// Reads the identity of every appliance below the root.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the root cannot be listed or an
    /// `appliance_data.json` is not a valid appliance identity.
    pub async fn load_appliances(&self) -> Result<Vec<ApplianceInfo>, ApiError> {
        let mut entries: tokio::fs::ReadDir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| io_error(&self.root, &e))?;
        let mut directories: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.root, &e))?
        {
            directories.push(entry.path());
        }
        directories.sort();

        let mut appliances: Vec<ApplianceInfo> = Vec::new();
        for directory in directories {
            let path: PathBuf = directory.join("appliance_data.json");
            let Some(data) = read_json(&path).await? else {
                continue;
            };
            let info: ApplianceInfo =
                serde_json::from_value(data).map_err(|e| ApiError::Json {
                    source_name: path.display().to_string(),
                    message: e.to_string(),
                })?;
            appliances.push(info);
        }
        info!(root = %self.root.display(), appliances = appliances.len(), "Loaded fixture appliances");
        Ok(appliances)
    }

    fn fixture_path(&self, info: &ApplianceInfo, name: &str) -> PathBuf {
        let directory: String = format!(
            "{}_{}",
            info.appliance_type_name.to_lowercase(),
            info.appliance_model_id
        );
        self.root.join(directory).join(format!("{name}.json"))
    }

    async fn load_object(
        &self,
        info: &ApplianceInfo,
        name: &str,
    ) -> Result<Map<String, Value>, ApiError> {
        let path: PathBuf = self.fixture_path(info, name);
        match read_json(&path).await? {
            Some(Value::Object(data)) => Ok(data),
            Some(_) => Err(ApiError::Json {
                source_name: path.display().to_string(),
                message: String::from("expected an object"),
            }),
            None => Err(ApiError::MissingFixture {
                path: path.display().to_string(),
            }),
        }
    }

    /// Reads an optional list, either top level or under `payload.<field>`.
    async fn load_list(
        &self,
        info: &ApplianceInfo,
        name: &str,
        field: &str,
    ) -> Result<Vec<Value>, ApiError> {
        let path: PathBuf = self.fixture_path(info, name);
        let Some(data) = read_json(&path).await? else {
            debug!(fixture = %path.display(), "No fixture, using an empty list");
            return Ok(Vec::new());
        };
        let list: Option<&Vec<Value>> = data.as_array().or_else(|| {
            data.get("payload")
                .and_then(|payload| payload.get(field))
                .and_then(Value::as_array)
        });
        Ok(list.cloned().unwrap_or_default())
    }
}

#[async_trait]
impl HonApi for FixtureApi {
    async fn load_commands(&self, info: &ApplianceInfo) -> Result<Map<String, Value>, ApiError> {
        self.load_object(info, "commands").await
    }

    async fn load_favourites(&self, info: &ApplianceInfo) -> Result<Vec<Value>, ApiError> {
        self.load_list(info, "favourites", "favourites").await
    }

    async fn load_command_history(&self, info: &ApplianceInfo) -> Result<Vec<Value>, ApiError> {
        self.load_list(info, "command_history", "history").await
    }

    async fn load_attributes(&self, info: &ApplianceInfo) -> Result<Map<String, Value>, ApiError> {
        self.load_object(info, "attributes").await
    }

    async fn send_command(
        &self,
        info: &ApplianceInfo,
        request: &CommandRequest,
    ) -> Result<bool, ApiError> {
        debug!(
            appliance = %info.mac_address,
            command = %request.command_name,
            accepted = self.accept,
            "Recording command"
        );
        self.sent.lock().await.push(request.clone());
        Ok(self.accept)
    }
}

/// Reads a JSON file, `None` if it does not exist.
async fn read_json(path: &Path) -> Result<Option<Value>, ApiError> {
    let text: String = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, &e)),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| ApiError::Json {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })
}

fn io_error(path: &Path, err: &std::io::Error) -> ApiError {
    ApiError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
