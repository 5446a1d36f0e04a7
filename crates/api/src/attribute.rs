// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hon_parameter::{ParamValue, json_to_string, parse_number};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

/// How long a value pushed from a command shields the attribute from
/// service updates.
pub const LOCK_TIMEOUT: Duration = Duration::seconds(10);

/// A live appliance value reported by the service.
///
/// After a command is sent its values are written here with a shield, so a
/// stale service update arriving right after does not overwrite them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    value: String,
    last_update: Option<OffsetDateTime>,
    lock_timestamp: Option<OffsetDateTime>,
}

impl Attribute {
    /// Creates an attribute from a service payload.
    ///
    /// The payload is either a scalar or an object carrying `parNewVal` and
    /// `lastUpdate`.
    #[must_use]
    pub fn new(data: &Value) -> Self {
        let mut attribute: Self = Self {
            value: String::new(),
            last_update: None,
            lock_timestamp: None,
        };
        attribute.update(data, false);
        attribute
    }

    /// Returns the value, as a number when it parses as one.
    #[must_use]
    pub fn value(&self) -> ParamValue {
        parse_number(&self.value).map_or_else(
            || ParamValue::Text(self.value.clone()),
            ParamValue::Number,
        )
    }

    /// Returns the value exactly as reported.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.value
    }

    /// Replaces the value without touching the lock.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Returns when the service last changed the value.
    #[must_use]
    pub const fn last_update(&self) -> Option<OffsetDateTime> {
        self.last_update
    }

    /// Returns `true` while the attribute is shielded.
    #[must_use]
    pub fn lock(&self) -> bool {
        self.locked_at(OffsetDateTime::now_utc())
    }

    pub(crate) fn locked_at(&self, now: OffsetDateTime) -> bool {
        self.lock_timestamp
            .is_some_and(|locked| locked + LOCK_TIMEOUT >= now)
    }

    /// Applies a service payload.
    ///
    /// # Arguments
    ///
    /// * `data` - A scalar or a `{parNewVal, lastUpdate}` object
    /// * `shield` - Lock the attribute against unshielded updates
    ///
    /// # Returns
    ///
    /// * `false` if the attribute is locked and `shield` is not set
    pub fn update(&mut self, data: &Value, shield: bool) -> bool {
        self.update_at(data, shield, OffsetDateTime::now_utc())
    }

    pub(crate) fn update_at(&mut self, data: &Value, shield: bool, now: OffsetDateTime) -> bool {
        if self.locked_at(now) && !shield {
            return false;
        }
        if shield {
            self.lock_timestamp = Some(now);
        }
        let Value::Object(data) = data else {
            self.value = json_to_string(data).unwrap_or_default();
            return true;
        };
        self.value = data
            .get("parNewVal")
            .and_then(json_to_string)
            .unwrap_or_default();
        if let Some(last_update) = data.get("lastUpdate").and_then(Value::as_str) {
            self.last_update = parse_timestamp(last_update);
        }
        true
    }
}

fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(text, &Iso8601::DEFAULT)
        .ok()
        .or_else(|| {
            PrimitiveDateTime::parse(text, &Iso8601::DEFAULT)
                .ok()
                .map(PrimitiveDateTime::assume_utc)
        })
}

/// Everything the service reports about an appliance's live state.
///
/// `parameters` holds the shielded per-key values; every other top-level
/// entry (`lastConnEvent`, `activity`, derived flags) is kept as JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplianceAttributes {
    parameters: IndexMap<String, Attribute>,
    data: Map<String, Value>,
}

impl ApplianceAttributes {
    /// Returns the per-key attributes.
    #[must_use]
    pub const fn parameters(&self) -> &IndexMap<String, Attribute> {
        &self.parameters
    }

    /// Returns the per-key attributes mutably.
    pub const fn parameters_mut(&mut self) -> &mut IndexMap<String, Attribute> {
        &mut self.parameters
    }

    /// Returns one attribute.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Attribute> {
        self.parameters.get(name)
    }

    /// Applies an unshielded service payload, creating the attribute if new.
    pub fn update_parameter(&mut self, name: &str, data: &Value) {
        self.parameters
            .entry(String::from(name))
            .and_modify(|attribute| {
                attribute.update(data, false);
            })
            .or_insert_with(|| Attribute::new(data));
    }

    /// Overwrites the value of an existing attribute.
    pub fn set_parameter_value(&mut self, name: &str, value: &str) {
        if let Some(attribute) = self.parameters.get_mut(name) {
            attribute.set_value(value);
        }
    }

    /// Returns `true` if the attribute exists and reads as `expected`.
    #[must_use]
    pub fn parameter_is(&self, name: &str, expected: &str) -> bool {
        self.parameters
            .get(name)
            .is_some_and(|attribute| attribute.value().to_string() == expected)
    }

    /// Returns a top-level entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Sets a top-level entry.
    pub fn insert(&mut self, key: &str, value: Value) {
        self.data.insert(String::from(key), value);
    }

    /// Returns `true` if a top-level entry exists and is not empty or false.
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        match self.data.get(key) {
            None | Some(Value::Null | Value::Bool(false)) => false,
            Some(Value::String(text)) => !text.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(items)) => !items.is_empty(),
            Some(Value::Bool(true) | Value::Number(_)) => true,
        }
    }

    /// Returns `true` if the last connection event was a disconnect.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.data
            .get("lastConnEvent")
            .and_then(|event| event.get("category"))
            .and_then(Value::as_str)
            == Some("DISCONNECTED")
    }
}
