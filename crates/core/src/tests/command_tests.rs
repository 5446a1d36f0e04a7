// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for command construction and editing.

use std::collections::BTreeMap;

use hon_parameter::{ParamValue, Parameter, ValidationError};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::{Command, CommandError, SchemaContext};

use super::helpers::{create_test_command, object};

#[test]
fn test_command_builds_one_parameter_per_typed_leaf() {
    let command: Command = create_test_command();

    assert!(matches!(command.parameter("temp"), Some(Parameter::Range(_))));
    assert!(matches!(command.parameter("spinSpeed"), Some(Parameter::Enum(_))));
    assert!(matches!(command.parameter("onOffStatus"), Some(Parameter::Fixed(_))));
    assert!(matches!(command.parameter("program"), Some(Parameter::Program(_))));
    assert!(command.parameter("programRules").is_none());
    assert!(command.parameter("description").is_none());
    assert_eq!(command.rules().len(), 1);
}

#[test]
fn test_command_keeps_unknown_fragments_as_data() {
    let command: Command = create_test_command();

    assert!(command.data().contains_key("programDescription"));
}

#[test]
fn test_command_program_parameter_names_category() {
    let command: Command = create_test_command();

    assert_eq!(
        command.parameter("program").map(Parameter::value),
        Some(ParamValue::from("cottons"))
    );
    assert_eq!(command.parameter("program").map(Parameter::group), Some("custom"));
}

#[test]
fn test_command_without_program_prefix_uses_category_key() {
    let command: Command = Command::new(
        "settings",
        &object(json!({ "parameters": { "tempSel": { "typology": "range", "minimumValue": 1, "maximumValue": 5 } } })),
        "setParameters",
        &SchemaContext::default(),
    );

    assert!(matches!(command.parameter("category"), Some(Parameter::Program(_))));
    assert!(command.parameter("program").is_none());
}

#[test]
fn test_command_plain_has_no_selector() {
    let command: Command = Command::new(
        "stopProgram",
        &object(json!({ "parameters": { "onOffStatus": { "typology": "fixed", "fixedValue": "0" } } })),
        "",
        &SchemaContext::default(),
    );

    assert!(command.program().is_none());
    assert_eq!(command.parameters().len(), 1);
}

#[test]
fn test_zone_map_defaults_to_appliance_zone() {
    let schema: Map<String, Value> = object(json!({
        "parameters": {
            "zoneMap": { "typology": "enum", "enumValues": ["1", "2"], "defaultValue": "1" }
        }
    }));

    let command: Command = Command::new(
        "startProgram",
        &schema,
        "",
        &SchemaContext::new(2, BTreeMap::new()),
    );

    assert_eq!(
        command.parameter("zoneMap").map(Parameter::value),
        Some(ParamValue::from("2"))
    );
}

#[test]
fn test_rule_keys_are_aliased_through_model_options() {
    let schema: Map<String, Value> = object(json!({
        "parameters": {
            "windSpeed": { "typology": "enum", "enumValues": ["1", "2", "5"], "defaultValue": "1" },
            "machMode": { "typology": "enum", "enumValues": ["1", "4"], "defaultValue": "1" },
            "rules": {
                "category": "rule",
                "typology": "fixed",
                "fixedValue": { "fanSpeed": { "mode": { "4": { "typology": "fixed", "fixedValue": "5" } } } }
            }
        }
    }));
    let model: Map<String, Value> =
        object(json!({ "options": { "fanSpeed": "windSpeed", "mode": "machMode" } }));

    let mut command: Command =
        Command::new("settings", &schema, "", &SchemaContext::from_model(0, &model));
    command.set_value("machMode", "4").unwrap();

    assert_eq!(
        command.parameter("windSpeed").map(Parameter::value),
        Some(ParamValue::from("5"))
    );
}

#[test]
fn test_set_value_unknown_key_fails() {
    let mut command: Command = create_test_command();

    let result: Result<(), CommandError> = command.set_value("nope", 1);

    assert!(matches!(
        result.unwrap_err(),
        CommandError::UnknownParameter { .. }
    ));
}

#[test]
fn test_set_value_rejected_leaves_command_unchanged() {
    let mut command: Command = create_test_command();
    let before: IndexMap<String, ParamValue> = command.parameter_value();

    let result: Result<(), CommandError> = command.set_value("temp", 95);

    assert!(matches!(
        result.unwrap_err(),
        CommandError::Validation(ValidationError::OutOfRange { .. })
    ));
    assert_eq!(command.parameter_value(), before);
}

#[test]
fn test_set_value_on_fixed_parameter_fails() {
    let mut command: Command = create_test_command();

    let result: Result<(), CommandError> = command.set_value("onOffStatus", "0");

    assert!(matches!(
        result.unwrap_err(),
        CommandError::Validation(ValidationError::Immutable { .. })
    ));
}

#[test]
fn test_parameter_groups_buckets_raw_values() {
    let command: Command = create_test_command();

    let groups: IndexMap<String, IndexMap<String, ParamValue>> = command.parameter_groups(false);

    assert_eq!(
        groups["parameters"].get("temp"),
        Some(&ParamValue::Number(40.0))
    );
    assert!(groups["ancillaryParameters"].contains_key("remainingTime"));
    assert!(groups["custom"].contains_key("program"));
}

#[test]
fn test_parameter_groups_mandatory_only() {
    let command: Command = create_test_command();

    let groups: IndexMap<String, IndexMap<String, ParamValue>> = command.parameter_groups(true);
    let keys: Vec<&String> = groups["parameters"].keys().collect();

    assert_eq!(keys, vec!["temp", "spinSpeed", "onOffStatus"]);
    assert!(!groups.contains_key("ancillaryParameters"));
}

#[test]
fn test_reset_matches_fresh_construction() {
    let fresh: Command = create_test_command();
    let mut command: Command = create_test_command();

    command.set_value("temp", 90).unwrap();
    command.set_value("dryLevel", "1").unwrap();
    command.reset();

    assert_eq!(command.parameter_value(), fresh.parameter_value());
    assert_eq!(
        command
            .parameter("spinSpeed")
            .and_then(Parameter::as_enum)
            .map(|parameter| parameter.allowed().len()),
        Some(3)
    );
}
