// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the collaborator boundary.

use hon::TransportError;

/// Failures reported by a [`crate::HonApi`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Reading a fixture failed.
    #[error("Failed to read {path}: {message}")]
    Io {
        /// The file that could not be read.
        path: String,
        /// The underlying I/O error.
        message: String,
    },
    /// A payload was not valid JSON, or not of the expected shape.
    #[error("Invalid JSON in {source_name}: {message}")]
    Json {
        /// Where the payload came from.
        source_name: String,
        /// The parse error.
        message: String,
    },
    /// A required fixture does not exist.
    #[error("Missing fixture {path}")]
    MissingFixture {
        /// The expected fixture path.
        path: String,
    },
    /// The service refused the request.
    #[error("Request rejected: {reason}")]
    Rejected {
        /// Why the request was refused.
        reason: String,
    },
}

impl From<ApiError> for TransportError {
    fn from(err: ApiError) -> Self {
        Self::new(err.to_string())
    }
}

/// Fatal failures while loading commands.
///
/// When this is returned no command was produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoaderError {
    /// One of the three datasets could not be fetched.
    #[error("Failed to fetch command data: {0}")]
    Fetch(#[from] ApiError),
}
