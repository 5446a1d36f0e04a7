// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per appliance type adjustments to attributes and settings.

use hon_parameter::Parameter;
use indexmap::IndexMap;
use serde_json::Value;

use crate::attribute::ApplianceAttributes;

/// Appliance type specific behavior.
///
/// Both hooks default to leaving their input unchanged.
pub trait ApplianceCustomizer: std::fmt::Debug + Send + Sync {
    /// Adjusts freshly loaded attributes.
    fn attributes(&self, _attributes: &mut ApplianceAttributes) {}

    /// Adjusts the flattened `command.key` settings.
    fn settings(&self, _settings: &mut IndexMap<String, Parameter>) {}
}

/// Leaves everything unchanged. Used for unknown appliance types.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl ApplianceCustomizer for Identity {}

/// Washing machines.
#[derive(Debug, Clone, Copy, Default)]
pub struct WashingMachine;

impl ApplianceCustomizer for WashingMachine {
    fn attributes(&self, attributes: &mut ApplianceAttributes) {
        laundry_attributes(attributes);
    }
}

/// Washer dryers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WasherDryer;

impl ApplianceCustomizer for WasherDryer {
    fn attributes(&self, attributes: &mut ApplianceAttributes) {
        laundry_attributes(attributes);
    }
}

/// Tumble dryers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TumbleDryer;

impl ApplianceCustomizer for TumbleDryer {
    fn attributes(&self, attributes: &mut ApplianceAttributes) {
        laundry_attributes(attributes);
    }

    /// A fixed dry level of `11` means the program has no dry level.
    fn settings(&self, settings: &mut IndexMap<String, Parameter>) {
        let hidden: bool = matches!(
            settings.get("startProgram.dryLevel"),
            Some(Parameter::Fixed(dry_level)) if dry_level.value().to_string() == "11"
        );
        if hidden {
            settings.shift_remove("startProgram.dryLevel");
        }
    }
}

/// Dish washers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DishWasher;

impl ApplianceCustomizer for DishWasher {
    fn attributes(&self, attributes: &mut ApplianceAttributes) {
        if attributes.is_disconnected() {
            attributes.set_parameter_value("machMode", "0");
        }
        let active: bool = attributes.is_set("activity");
        attributes.insert("active", Value::Bool(active));
    }
}

/// Ovens.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oven;

impl ApplianceCustomizer for Oven {
    fn attributes(&self, attributes: &mut ApplianceAttributes) {
        if attributes.is_disconnected() {
            for key in ["temp", "onOffStatus", "remoteCtrValid", "remainingTimeMM"] {
                attributes.set_parameter_value(key, "0");
            }
        }
        let active: bool = attributes.parameter_is("onOffStatus", "1");
        attributes.insert("active", Value::Bool(active));
    }
}

/// Fridges.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fridge;

impl ApplianceCustomizer for Fridge {
    fn attributes(&self, attributes: &mut ApplianceAttributes) {
        let mode_z1: &str = if attributes.parameter_is("holidayMode", "1") {
            "holiday"
        } else if attributes.parameter_is("intelligenceMode", "1") {
            "auto_set"
        } else if attributes.parameter_is("quickModeZ1", "1") {
            "super_cool"
        } else {
            "no_mode"
        };
        let mode_z2: &str = if attributes.parameter_is("quickModeZ2", "1") {
            "super_freeze"
        } else if attributes.parameter_is("intelligenceMode", "1") {
            "auto_set"
        } else {
            "no_mode"
        };
        attributes.insert("modeZ1", Value::from(mode_z1));
        attributes.insert("modeZ2", Value::from(mode_z2));
    }
}

/// Water heaters.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterHeater;

impl ApplianceCustomizer for WaterHeater {
    fn attributes(&self, attributes: &mut ApplianceAttributes) {
        let active: bool = attributes.parameter_is("onOffStatus", "1");
        attributes.insert("active", Value::Bool(active));
    }
}

fn laundry_attributes(attributes: &mut ApplianceAttributes) {
    if attributes.is_disconnected() {
        attributes.set_parameter_value("machMode", "0");
    }
    let active: bool = attributes.is_set("activity");
    let pause: bool = attributes.parameter_is("machMode", "3");
    attributes.insert("active", Value::Bool(active));
    attributes.insert("pause", Value::Bool(pause));
}

static IDENTITY: &dyn ApplianceCustomizer = &Identity;

static CUSTOMIZERS: &[(&str, &dyn ApplianceCustomizer)] = &[
    ("wm", &WashingMachine),
    ("wd", &WasherDryer),
    ("td", &TumbleDryer),
    ("dw", &DishWasher),
    ("ov", &Oven),
    ("ref", &Fridge),
    ("wh", &WaterHeater),
];

/// Returns the customizer for an appliance type tag, case-insensitively.
///
/// Unknown tags get [`Identity`].
#[must_use]
pub fn customizer_for(appliance_type: &str) -> &'static dyn ApplianceCustomizer {
    let tag: String = appliance_type.to_lowercase();
    CUSTOMIZERS
        .iter()
        .find(|(name, _)| *name == tag)
        .map_or(IDENTITY, |(_, customizer)| *customizer)
}
