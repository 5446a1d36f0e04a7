// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;

use crate::{Command, CommandRequest, CommandSet, CommandTransport, SchemaContext, TransportError};

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn create_test_rules() -> Value {
    json!({
        "spinSpeed": {
            "temp": { "90": { "typology": "fixed", "fixedValue": "400" } }
        },
        "steamLevel": {
            "dryLevel": {
                "2": { "@temp": { "60": { "typology": "fixed", "fixedValue": "2" } } }
            }
        },
        "dryLevel": {
            "spinSpeed": {
                "400": { "typology": "enum", "enumValues": "0|1", "defaultValue": "1" }
            }
        },
        "remainingTime": {
            "temp": { "20|30": 90, "40": 100 }
        }
    })
}

pub fn create_test_schema() -> Map<String, Value> {
    object(json!({
        "description": "Start a washing program",
        "protocolType": "mqtt",
        "parameters": {
            "temp": {
                "typology": "range",
                "category": "general",
                "mandatory": 1,
                "minimumValue": "0",
                "maximumValue": "90",
                "incrementValue": "10",
                "defaultValue": "40"
            },
            "spinSpeed": {
                "typology": "enum",
                "mandatory": 1,
                "enumValues": ["400", "800", "1200"],
                "defaultValue": "800"
            },
            "dryLevel": {
                "typology": "enum",
                "enumValues": ["0", "1", "2"],
                "defaultValue": "0"
            },
            "steamLevel": {
                "typology": "enum",
                "enumValues": ["0", "1", "2"],
                "defaultValue": "0"
            },
            "onOffStatus": { "typology": "fixed", "fixedValue": "1", "mandatory": 1 },
            "prCode": { "typology": "fixed", "fixedValue": "62" },
            "prStr": { "typology": "fixed", "fixedValue": "COTTONS" }
        },
        "ancillaryParameters": {
            "programRules": {
                "category": "rule",
                "typology": "fixed",
                "fixedValue": create_test_rules()
            },
            "remainingTime": {
                "typology": "range",
                "minimumValue": 0,
                "maximumValue": 300,
                "incrementValue": 1,
                "defaultValue": 120
            },
            "programDescription": { "typology": "tree", "nodes": [] }
        }
    }))
}

pub fn create_test_command() -> Command {
    Command::new(
        "startProgram",
        &create_test_schema(),
        "PROGRAMS.WM.COTTONS",
        &SchemaContext::default(),
    )
}

pub fn create_category(category_name: &str, pr_code: u32, extra: Value) -> Command {
    let mut schema: Map<String, Value> = create_test_schema();
    let parameters: &mut Map<String, Value> = schema
        .get_mut("parameters")
        .and_then(Value::as_object_mut)
        .unwrap();
    parameters.insert(
        String::from("prCode"),
        json!({ "typology": "fixed", "fixedValue": pr_code }),
    );
    for (key, attributes) in object(extra) {
        parameters.insert(key, attributes);
    }
    Command::new("startProgram", &schema, category_name, &SchemaContext::default())
}

pub fn create_test_command_set() -> CommandSet {
    let mut categories: IndexMap<String, Command> = IndexMap::new();
    categories.insert(
        String::from("cottons"),
        create_category(
            "PROGRAMS.WM.COTTONS",
            62,
            json!({ "mode": { "typology": "fixed", "fixedValue": "5" } }),
        ),
    );
    categories.insert(
        String::from("eco"),
        create_category(
            "PROGRAMS.WM.ECO",
            7,
            json!({ "mode": { "typology": "enum", "enumValues": ["1", "2", "3"], "defaultValue": "2" } }),
        ),
    );
    categories.insert(
        String::from("iot_recipe_bread"),
        create_category("PROGRAMS.WM.IOT_RECIPE_BREAD", 99, json!({})),
    );
    CommandSet::with_categories("startProgram", categories, "cottons").unwrap()
}

/// Records every request and answers with a preset result.
pub struct MockTransport {
    result: Result<bool, TransportError>,
    pub sent: Mutex<Vec<CommandRequest>>,
}

impl MockTransport {
    pub fn accepting() -> Self {
        Self {
            result: Ok(true),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            result: Ok(false),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(TransportError::new(message)),
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CommandTransport for MockTransport {
    async fn send_command(&self, request: &CommandRequest) -> Result<bool, TransportError> {
        self.sent.lock().await.push(request.clone());
        self.result.clone()
    }
}
