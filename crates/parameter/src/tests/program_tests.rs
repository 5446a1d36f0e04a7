// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the category selector.

use std::collections::BTreeMap;

use crate::{ParamValue, ProgramParameter, ValidationError, clean_category_name};

fn create_test_program() -> ProgramParameter {
    let mut program: ProgramParameter =
        ProgramParameter::new("program", "PROGRAMS.WM.COTTONS", "custom");
    program.set_programs(
        vec![
            String::from("synthetics"),
            String::from("cottons"),
            String::from("iot_recipe_bread"),
            String::from("iot_guided_wash"),
        ],
        BTreeMap::from([(1, String::from("cottons")), (2, String::from("synthetics"))]),
    );
    program
}

#[test]
fn test_clean_category_name_keeps_last_segment() {
    assert_eq!(clean_category_name("PROGRAMS.WM.COTTONS"), "cottons");
    assert_eq!(clean_category_name("setParameters"), "setParameters");
}

#[test]
fn test_program_value_is_cleaned_category_name() {
    let program: ProgramParameter = create_test_program();

    assert_eq!(program.value(), ParamValue::from("cottons"));
    assert_eq!(program.base().typology(), "enum");
}

#[test]
fn test_program_values_are_filtered_and_sorted() {
    let program: ProgramParameter = create_test_program();

    assert_eq!(program.values(), vec!["cottons", "synthetics"]);
    assert_eq!(program.programs().len(), 4);
}

#[test]
fn test_program_set_value_known_category_succeeds() {
    let mut program: ProgramParameter = create_test_program();

    assert!(program.set_value(&ParamValue::from("synthetics")).is_ok());
    assert_eq!(program.value(), ParamValue::from("synthetics"));
}

#[test]
fn test_program_set_value_filtered_category_fails() {
    let mut program: ProgramParameter = create_test_program();

    let result: Result<(), ValidationError> =
        program.set_value(&ParamValue::from("iot_recipe_bread"));

    assert!(matches!(
        result.unwrap_err(),
        ValidationError::UnknownCategory { .. }
    ));
    assert_eq!(program.value(), ParamValue::from("cottons"));
}

#[test]
fn test_program_assign_skips_validation() {
    let mut program: ProgramParameter = create_test_program();

    program.assign("Eco");

    assert_eq!(program.value(), ParamValue::from("Eco"));
}

#[test]
fn test_program_ids_are_kept() {
    let program: ProgramParameter = create_test_program();

    assert_eq!(program.ids().get(&2).map(String::as_str), Some("synthetics"));
}
