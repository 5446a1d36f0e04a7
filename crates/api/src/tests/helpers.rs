// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::path::PathBuf;

use serde_json::{Value, json};

use crate::{ApplianceAttributes, ApplianceInfo, FixtureApi};

pub fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

pub fn create_test_api() -> FixtureApi {
    FixtureApi::new(fixture_root())
}

pub fn create_test_info() -> ApplianceInfo {
    serde_json::from_value(json!({
        "macAddress": "ab-cd-ef-01-02-03",
        "applianceTypeName": "WM",
        "applianceModelId": 1234,
        "code": "31010XYZ",
        "nickName": "Washer"
    }))
    .unwrap()
}

/// An appliance whose fixtures do not exist.
pub fn create_missing_info() -> ApplianceInfo {
    ApplianceInfo {
        mac_address: String::from("00-00-00-00-00-00"),
        appliance_type_name: String::from("OV"),
        appliance_model_id: String::from("1"),
        ..ApplianceInfo::default()
    }
}

pub fn create_attributes(parameters: Value, extra: Value) -> ApplianceAttributes {
    let mut attributes: ApplianceAttributes = ApplianceAttributes::default();
    if let Value::Object(parameters) = parameters {
        for (name, value) in &parameters {
            attributes.update_parameter(name, value);
        }
    }
    if let Value::Object(extra) = extra {
        for (key, value) in extra {
            attributes.insert(&key, value);
        }
    }
    attributes
}
