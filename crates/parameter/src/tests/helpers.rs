// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::{Map, Value, json};

use crate::{EnumParameter, RangeParameter};

pub fn attributes(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn create_test_range() -> RangeParameter {
    RangeParameter::new(
        "temp",
        &attributes(json!({
            "typology": "range",
            "category": "general",
            "mandatory": 1,
            "minimumValue": "0",
            "maximumValue": "90",
            "incrementValue": "10",
            "defaultValue": "30"
        })),
        "parameters",
    )
}

pub fn create_test_enum() -> EnumParameter {
    EnumParameter::new(
        "dryLevel",
        &attributes(json!({
            "typology": "enum",
            "enumValues": ["0", "1", "[Iron|Dry]"],
            "defaultValue": "1"
        })),
        "parameters",
    )
}
