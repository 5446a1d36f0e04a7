// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for command transmission.

use hon_parameter::{ParamValue, Parameter};

use crate::{Command, CommandRequest, SendError};

use super::helpers::{MockTransport, create_test_command};

#[tokio::test]
async fn test_send_builds_request_from_groups() {
    let transport: MockTransport = MockTransport::accepting();
    let mut command: Command = create_test_command();

    let result: Result<bool, SendError> = command.send(&transport, false).await;

    assert!(result.unwrap());
    let sent: Vec<CommandRequest> = transport.sent.lock().await.clone();
    assert_eq!(sent.len(), 1);
    let request: &CommandRequest = &sent[0];
    assert_eq!(request.command_name, "startProgram");
    assert_eq!(request.program_name.as_deref(), Some("PROGRAMS.WM.COTTONS"));
    assert_eq!(request.parameters.get("temp").map(String::as_str), Some("40"));
    assert_eq!(
        request.parameters.get("prStr").map(String::as_str),
        Some("PROGRAMS.WM.COTTONS")
    );
    assert_eq!(
        request
            .ancillary_parameters
            .get("remainingTime")
            .map(String::as_str),
        Some("100")
    );
    assert!(!request.parameters.contains_key("program"));
}

#[tokio::test]
async fn test_send_only_mandatory() {
    let transport: MockTransport = MockTransport::accepting();
    let mut command: Command = create_test_command();

    command.send(&transport, true).await.unwrap();

    let sent: Vec<CommandRequest> = transport.sent.lock().await.clone();
    let keys: Vec<&String> = sent[0].parameters.keys().collect();
    assert_eq!(keys, vec!["temp", "spinSpeed", "onOffStatus"]);
}

#[tokio::test]
async fn test_send_specific_adds_mandatory_parameters() {
    let transport: MockTransport = MockTransport::accepting();
    let mut command: Command = create_test_command();

    command.send_specific(&transport, &["dryLevel"]).await.unwrap();

    let sent: Vec<CommandRequest> = transport.sent.lock().await.clone();
    let keys: Vec<&String> = sent[0].parameters.keys().collect();
    assert_eq!(keys, vec!["temp", "spinSpeed", "dryLevel", "onOffStatus"]);
}

#[tokio::test]
async fn test_program_name_only_sent_for_start_program() {
    let transport: MockTransport = MockTransport::accepting();
    let mut command: Command = create_test_command();
    let mut renamed: Command = Command::new(
        "settings",
        &super::helpers::create_test_schema(),
        "PROGRAMS.WM.COTTONS",
        &crate::SchemaContext::default(),
    );

    command.send(&transport, false).await.unwrap();
    renamed.send(&transport, false).await.unwrap();

    let sent: Vec<CommandRequest> = transport.sent.lock().await.clone();
    assert!(sent[0].program_name.is_some());
    assert!(sent[1].program_name.is_none());
}

#[tokio::test]
async fn test_rejected_send_fails_and_resets_command() {
    let transport: MockTransport = MockTransport::rejecting();
    let mut command: Command = create_test_command();
    command.set_value("temp", 60).unwrap();

    let result: Result<bool, SendError> = command.send(&transport, false).await;

    assert!(matches!(result.unwrap_err(), SendError::Rejected { .. }));
    assert_eq!(
        command.parameter("temp").map(Parameter::value),
        Some(ParamValue::Number(40.0))
    );
}

#[tokio::test]
async fn test_transport_failure_is_distinct_from_rejection() {
    let transport: MockTransport = MockTransport::failing("connection closed");
    let mut command: Command = create_test_command();

    let err: SendError = command.send(&transport, false).await.unwrap_err();

    assert!(matches!(err, SendError::Transport { .. }));
    assert!(err.to_string().contains("connection closed"));
}

#[test]
fn test_request_serializes_camel_case() {
    let command: Command = create_test_command();
    let groups = command.parameter_groups(false);
    let request: CommandRequest = CommandRequest::new(
        command.name(),
        &groups["parameters"],
        &groups["ancillaryParameters"],
        command.category_name(),
    );

    let json: serde_json::Value = serde_json::to_value(&request).unwrap();

    assert_eq!(json["commandName"], "startProgram");
    assert_eq!(json["programName"], "PROGRAMS.WM.COTTONS");
    assert_eq!(json["ancillaryParameters"]["remainingTime"], "100");
}
