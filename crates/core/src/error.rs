// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hon_parameter::ValidationError;

/// Errors returned when editing a command.
///
/// All of these are recoverable; the command is left unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    /// The command has no parameter with this key.
    #[error("Command '{command}' has no parameter '{key}'")]
    UnknownParameter {
        /// The command name.
        command: String,
        /// The requested key.
        key: String,
    },
    /// The parameter rejected the value.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The command has no category with this name.
    #[error("Command '{command}': allowed categories: {allowed:?} but was: {category}")]
    UnknownCategory {
        /// The command name.
        command: String,
        /// The known category names.
        allowed: Vec<String>,
        /// The requested category.
        category: String,
    },
    /// The key is a category selector, which only its command set can change.
    #[error(
        "Command '{command}': '{key}' selects the category, set it on the command set instead"
    )]
    CategorySelector {
        /// The command name.
        command: String,
        /// The selector key.
        key: String,
    },
}

/// A failure reported by a [`crate::CommandTransport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Creates a transport error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned when sending a command.
///
/// These are distinct from validation failures: the payload was valid but
/// the appliance did not accept it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The collaborator reported that the command was not accepted.
    #[error("Command '{command}' failed")]
    Rejected {
        /// The command name.
        command: String,
    },
    /// The collaborator could not deliver the command.
    #[error("Command '{command}' failed: {message}")]
    Transport {
        /// The command name.
        command: String,
        /// The transport failure.
        message: String,
    },
    /// No command with this name is loaded.
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
}
