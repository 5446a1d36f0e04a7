// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use num_traits::ToPrimitive;
use serde_json::{Map, Value};
use tracing::warn;

use crate::base::ParameterBase;
use crate::error::ValidationError;
use crate::value::{ParamValue, number_attribute};

/// Largest relative distance from a whole number of steps still treated as
/// on the grid.
const GRID_TOLERANCE: f64 = 1e-9;

/// Most decimal places a grid value is rounded to.
const MAX_DECIMALS: usize = 12;

/// A numeric parameter on a `min..=max` grid of `step`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeParameter {
    base: ParameterBase,
    min: f64,
    max: f64,
    step: f64,
    default: f64,
    value: f64,
}

impl RangeParameter {
    /// Creates a range parameter from its schema fragment.
    ///
    /// Reads `minimumValue`, `maximumValue`, `incrementValue` and
    /// `defaultValue`; a missing default falls back to the minimum.
    #[must_use]
    pub fn new(key: &str, attributes: &Map<String, Value>, group: &str) -> Self {
        let mut parameter: Self = Self {
            base: ParameterBase::new(key, attributes, group),
            min: 0.0,
            max: 0.0,
            step: 0.0,
            default: 0.0,
            value: 0.0,
        };
        parameter.load_attributes();
        parameter
    }

    fn load_attributes(&mut self) {
        self.base.load_attributes();
        let attributes: &Map<String, Value> = self.base.attributes();
        self.min = number_attribute(attributes, "minimumValue").unwrap_or(0.0);
        self.max = number_attribute(attributes, "maximumValue").unwrap_or(0.0);
        self.step = number_attribute(attributes, "incrementValue").unwrap_or(0.0);
        self.default = number_attribute(attributes, "defaultValue").unwrap_or(self.min);
        self.value = self.default;
        if self.min > self.max {
            warn!(
                key = %self.base.key(),
                min = self.min,
                max = self.max,
                "Range parameter has min above max"
            );
        }
    }

    /// Returns the common attributes.
    #[must_use]
    pub const fn base(&self) -> &ParameterBase {
        &self.base
    }

    /// Returns the common attributes mutably.
    pub const fn base_mut(&mut self) -> &mut ParameterBase {
        &mut self.base
    }

    /// Returns the minimum.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Returns the maximum.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Returns the step; a step of zero counts as one.
    #[must_use]
    pub fn step(&self) -> f64 {
        if self.step.abs() < f64::EPSILON {
            1.0
        } else {
            self.step
        }
    }

    /// Returns the schema default.
    #[must_use]
    pub const fn default_value(&self) -> f64 {
        self.default
    }

    /// Returns the value, or the minimum if the stored value is NaN.
    #[must_use]
    pub fn value(&self) -> ParamValue {
        if self.value.is_nan() {
            ParamValue::Number(self.min)
        } else {
            ParamValue::Number(self.value)
        }
    }

    /// Returns the raw stored value.
    #[must_use]
    pub const fn intern_value(&self) -> ParamValue {
        ParamValue::Number(self.value)
    }

    /// Returns `true` if `value` is inside the range and on the step grid.
    #[must_use]
    pub fn accepts(&self, value: f64) -> bool {
        if !(self.min..=self.max).contains(&value) {
            return false;
        }
        let steps: f64 = (value - self.min) / self.step();
        is_whole(steps)
    }

    /// Sets the value if it is inside the range and on the step grid.
    ///
    /// Text is parsed as a number first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotANumber`] for non-numeric input and
    /// [`ValidationError::OutOfRange`] for numbers outside the domain.
    pub fn set_value(&mut self, value: &ParamValue) -> Result<(), ValidationError> {
        let Some(number) = value.as_f64() else {
            return Err(ValidationError::NotANumber {
                key: String::from(self.base.key()),
                value: value.to_string(),
            });
        };
        if !self.accepts(number) {
            return Err(ValidationError::OutOfRange {
                key: String::from(self.base.key()),
                min: self.min,
                max: self.max,
                step: self.step(),
                value: value.to_string(),
            });
        }
        self.value = number;
        Ok(())
    }

    /// Widens the range to include `value` and sets it. Used by rule effects.
    pub fn widen_to(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.value = value;
    }

    /// Returns the number of values on the grid.
    #[must_use]
    pub fn values_len(&self) -> usize {
        if self.max < self.min {
            return 0;
        }
        let steps: f64 = (self.max - self.min) / self.step();
        (steps + GRID_TOLERANCE * steps.abs().max(1.0))
            .floor()
            .to_usize()
            .map_or(0, |count| count + 1)
    }

    /// Returns every value on the grid, as text.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        let step: f64 = self.step();
        let scale: f64 = decimal_scale(step).max(decimal_scale(self.min));
        (0..self.values_len())
            .filter_map(|index| index.to_f64())
            .map(|index| {
                let value: f64 = ((self.min + index * step) * scale).round() / scale;
                ParamValue::Number(value).to_string()
            })
            .collect()
    }

    /// Restores min, max, step and value from the schema fragment.
    pub fn reset(&mut self) {
        self.load_attributes();
    }
}

fn is_whole(number: f64) -> bool {
    (number - number.round()).abs() <= GRID_TOLERANCE * number.abs().max(1.0)
}

/// Returns the power of ten that turns `number` into a whole number.
fn decimal_scale(number: f64) -> f64 {
    let mut scale: f64 = 1.0;
    for _ in 0..MAX_DECIMALS {
        if is_whole(number * scale) {
            break;
        }
        scale *= 10.0;
    }
    scale
}
