// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the range variant.

use serde_json::json;

use crate::{ParamValue, RangeParameter, ValidationError};

use super::helpers::{attributes, create_test_range};

#[test]
fn test_range_reads_schema_attributes() {
    let range: RangeParameter = create_test_range();

    assert!((range.min() - 0.0).abs() < f64::EPSILON);
    assert!((range.max() - 90.0).abs() < f64::EPSILON);
    assert!((range.step() - 10.0).abs() < f64::EPSILON);
    assert_eq!(range.value(), ParamValue::Number(30.0));
    assert!(range.base().mandatory());
}

#[test]
fn test_range_set_value_on_grid_succeeds() {
    let mut range: RangeParameter = create_test_range();

    let result: Result<(), ValidationError> = range.set_value(&ParamValue::from(40));

    assert!(result.is_ok());
    assert_eq!(range.value(), ParamValue::Number(40.0));
}

#[test]
fn test_range_set_value_accepts_bounds() {
    let mut range: RangeParameter = create_test_range();

    assert!(range.set_value(&ParamValue::from(0)).is_ok());
    assert!(range.set_value(&ParamValue::from(90)).is_ok());
}

#[test]
fn test_range_set_value_parses_text() {
    let mut range: RangeParameter = create_test_range();

    let result: Result<(), ValidationError> = range.set_value(&ParamValue::from("60"));

    assert!(result.is_ok());
    assert_eq!(range.value(), ParamValue::Number(60.0));
}

#[test]
fn test_range_set_value_off_grid_fails() {
    let mut range: RangeParameter = create_test_range();

    let result: Result<(), ValidationError> = range.set_value(&ParamValue::from(45));

    assert!(matches!(
        result.unwrap_err(),
        ValidationError::OutOfRange { .. }
    ));
    assert_eq!(range.value(), ParamValue::Number(30.0));
}

#[test]
fn test_range_set_value_above_max_fails_with_domain_in_message() {
    let mut range: RangeParameter = create_test_range();

    let err: ValidationError = range.set_value(&ParamValue::from(100)).unwrap_err();
    let message: String = err.to_string();

    assert!(message.contains("min 0"));
    assert!(message.contains("max 90"));
    assert!(message.contains("step 10"));
    assert!(message.contains("but was: 100"));
}

#[test]
fn test_range_set_value_non_numeric_fails() {
    let mut range: RangeParameter = create_test_range();

    let result: Result<(), ValidationError> = range.set_value(&ParamValue::from("hot"));

    assert!(matches!(
        result.unwrap_err(),
        ValidationError::NotANumber { .. }
    ));
}

#[test]
fn test_range_zero_step_counts_as_one() {
    let mut range: RangeParameter = RangeParameter::new(
        "delay",
        &attributes(json!({
            "typology": "range",
            "minimumValue": 0,
            "maximumValue": 5,
            "incrementValue": 0
        })),
        "parameters",
    );

    assert!((range.step() - 1.0).abs() < f64::EPSILON);
    assert!(range.set_value(&ParamValue::from(3)).is_ok());
    assert!(range.set_value(&ParamValue::from(2.5)).is_err());
    assert_eq!(range.values_len(), 6);
}

#[test]
fn test_range_fractional_step_grid() {
    let mut range: RangeParameter = RangeParameter::new(
        "weight",
        &attributes(json!({
            "typology": "range",
            "minimumValue": "0,5",
            "maximumValue": "2",
            "incrementValue": "0.1"
        })),
        "parameters",
    );

    assert!(range.set_value(&ParamValue::from(0.7)).is_ok());
    assert!(range.set_value(&ParamValue::from(1.9)).is_ok());
    assert!(range.set_value(&ParamValue::from(0.75)).is_err());
    assert_eq!(range.values_len(), 16);
    assert_eq!(range.values().first().map(String::as_str), Some("0.5"));
    assert_eq!(range.values().last().map(String::as_str), Some("2"));
}

#[test]
fn test_range_sub_milli_step_accepts_min_and_grid_values() {
    let mut range: RangeParameter = RangeParameter::new(
        "dose",
        &attributes(json!({
            "typology": "range",
            "minimumValue": 0,
            "maximumValue": 0.002,
            "incrementValue": 0.0004
        })),
        "parameters",
    );

    assert!(range.set_value(&ParamValue::from(0.0)).is_ok());
    assert!(range.set_value(&ParamValue::from(0.0012)).is_ok());
    assert!(range.set_value(&ParamValue::from(0.002)).is_ok());
    assert!(range.set_value(&ParamValue::from(0.0013)).is_err());
    assert_eq!(range.values_len(), 6);
}

#[test]
fn test_range_step_with_four_decimals_keeps_its_grid() {
    let mut range: RangeParameter = RangeParameter::new(
        "dose",
        &attributes(json!({
            "typology": "range",
            "minimumValue": 0,
            "maximumValue": 0.006,
            "incrementValue": 0.0015
        })),
        "parameters",
    );

    assert!(range.set_value(&ParamValue::from(0.0015)).is_ok());
    assert_eq!(range.value(), ParamValue::Number(0.0015));
    assert!(range.set_value(&ParamValue::from(0.0045)).is_ok());
    assert!(range.set_value(&ParamValue::from(0.002)).is_err());
    assert_eq!(
        range.values(),
        vec!["0", "0.0015", "0.003", "0.0045", "0.006"]
    );
}

#[test]
fn test_range_missing_default_falls_back_to_min() {
    let range: RangeParameter = RangeParameter::new(
        "spin",
        &attributes(json!({
            "typology": "range",
            "minimumValue": 400,
            "maximumValue": 1400,
            "incrementValue": 200
        })),
        "parameters",
    );

    assert_eq!(range.value(), ParamValue::Number(400.0));
    assert_eq!(
        range.values(),
        vec!["400", "600", "800", "1000", "1200", "1400"]
    );
}

#[test]
fn test_range_widen_to_extends_bounds() {
    let mut range: RangeParameter = create_test_range();

    range.widen_to(120.0);

    assert!((range.max() - 120.0).abs() < f64::EPSILON);
    assert_eq!(range.value(), ParamValue::Number(120.0));
}

#[test]
fn test_range_reset_restores_construction_state() {
    let mut range: RangeParameter = create_test_range();
    let initial: RangeParameter = range.clone();

    range.widen_to(120.0);
    range.set_value(&ParamValue::from(50)).unwrap();
    range.reset();

    assert_eq!(range, initial);
}
