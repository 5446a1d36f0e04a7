// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for variant dispatch and the trigger table.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::{ParamValue, Parameter, Rule, RuleEffect};

use super::helpers::{attributes, create_test_enum, create_test_range};

fn create_fixed_rule(trigger_value: &str, target: &str, value: &str) -> Rule {
    Rule::new(
        String::from("dryLevel"),
        String::from(trigger_value),
        String::from(target),
        RuleEffect::Fixed(ParamValue::from(value)),
        BTreeMap::new(),
    )
}

#[test]
fn test_from_schema_dispatches_on_typology() {
    let range: Option<Parameter> = Parameter::from_schema(
        "temp",
        &attributes(json!({ "typology": "range", "minimumValue": 0, "maximumValue": 9 })),
        "parameters",
    );
    let fixed: Option<Parameter> = Parameter::from_schema(
        "onOffStatus",
        &attributes(json!({ "typology": "fixed", "fixedValue": 1 })),
        "parameters",
    );
    let enumeration: Option<Parameter> = Parameter::from_schema(
        "mode",
        &attributes(json!({ "typology": "enum", "enumValues": ["1"] })),
        "parameters",
    );

    assert!(matches!(range, Some(Parameter::Range(_))));
    assert!(matches!(fixed, Some(Parameter::Fixed(_))));
    assert!(matches!(enumeration, Some(Parameter::Enum(_))));
}

#[test]
fn test_from_schema_untyped_fragments() {
    let bounded: Option<Parameter> = Parameter::from_schema(
        "delay",
        &attributes(json!({ "minimumValue": 0, "maximumValue": 9 })),
        "parameters",
    );
    let leaf: Option<Parameter> = Parameter::from_schema(
        "prCode",
        &attributes(json!({ "defaultValue": "42" })),
        "parameters",
    );
    let opaque: Option<Parameter> = Parameter::from_schema(
        "description",
        &attributes(json!({ "typology": "tree", "nodes": [] })),
        "parameters",
    );

    assert!(matches!(bounded, Some(Parameter::Range(_))));
    assert_eq!(leaf.map(|parameter| parameter.value()), Some(ParamValue::from("42")));
    assert!(opaque.is_none());
}

#[test]
fn test_add_trigger_reports_already_matching_value() {
    let mut parameter: Parameter = Parameter::from(create_test_enum());

    let matching: bool = parameter.add_trigger(create_fixed_rule("1", "temp", "30"));
    let other: bool = parameter.add_trigger(create_fixed_rule("0", "temp", "60"));

    assert!(matching);
    assert!(!other);
}

#[test]
fn test_triggered_rules_follow_current_value_case_insensitively() {
    let mut parameter: Parameter = Parameter::from(create_test_enum());
    parameter.add_trigger(create_fixed_rule("[IRON|DRY]", "temp", "30"));

    assert!(parameter.triggered_rules().is_empty());

    parameter.set_value(&ParamValue::from("[Iron|Dry]")).unwrap();
    let rules: Vec<Rule> = parameter.triggered_rules();

    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].param_key, "temp");
}

#[test]
fn test_range_trigger_matches_whole_number_text() {
    let mut parameter: Parameter = Parameter::from(create_test_range());

    assert!(parameter.add_trigger(Rule::new(
        String::from("temp"),
        String::from("30"),
        String::from("spin"),
        RuleEffect::Fixed(ParamValue::from("800")),
        BTreeMap::new(),
    )));
}

#[test]
fn test_trigger_summary_nests_extras() {
    let mut parameter: Parameter = Parameter::from(create_test_enum());
    parameter.add_trigger(create_fixed_rule("0", "temp", "30"));
    parameter.add_trigger(Rule::new(
        String::from("dryLevel"),
        String::from("1"),
        String::from("spin"),
        RuleEffect::Enum {
            values: None,
            default: Some(String::from("800")),
        },
        BTreeMap::from([(String::from("program"), String::from("cottons"))]),
    ));

    let summary: Value = parameter.trigger_summary();

    assert_eq!(
        summary,
        json!({
            "0": { "temp": "30" },
            "1": { "program": { "cottons": { "spin": "800" } } }
        })
    );
}

#[test]
fn test_values_len_matches_values() {
    let range: Parameter = Parameter::from(create_test_range());
    let enumeration: Parameter = Parameter::from(create_test_enum());

    assert_eq!(range.values_len(), range.values().len());
    assert_eq!(enumeration.values_len(), enumeration.values().len());
}
