// ABOUTME: Unified error handling with standard error codes and HTTP response formatting
// ABOUTME: Defines AppError, ErrorCode and the JSON error body shared by all route handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling
//!
//! Centralized error types for the camps API. Every route handler returns
//! `Result<Response, AppError>`; the `IntoResponse` impl below turns an
//! `AppError` into a JSON error body with the status code mandated by its
//! `ErrorCode`.
//!
//! Status policy: 404 for absent resources, 400 for caller-caused conditions
//! (moniker conflict, unresolvable location, malformed input), 500 for
//! anything a collaborator fails at (database errors, commit failure).

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,

    // Resource management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "MONIKER_IN_USE")]
    MonikerInUse = 4001,
    #[serde(rename = "UNRESOLVABLE_LOCATION")]
    UnresolvableLocation = 4002,

    // Internal errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    #[serde(rename = "COMMIT_FAILURE")]
    CommitFailure = 9002,
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            // 400 Bad Request: caller-caused conditions
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::MonikerInUse
            | Self::UnresolvableLocation => StatusCode::BAD_REQUEST,

            // 404 Not Found
            Self::ResourceNotFound => StatusCode::NOT_FOUND,

            // 500 Internal Server Error: collaborator failures
            Self::InternalError | Self::DatabaseError | Self::CommitFailure | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::MonikerInUse => "A camp with this moniker already exists",
            Self::UnresolvableLocation => "Could not resolve a location for the resource",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::CommitFailure => "The repository failed to commit staged changes",
            Self::ConfigError => "Configuration error encountered",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Moniker already taken by an existing camp
    pub fn moniker_in_use(moniker: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MonikerInUse,
            format!("Moniker {} is in use", moniker.into()),
        )
    }

    /// Location resolver produced no path for the resource
    pub fn unresolvable_location(moniker: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnresolvableLocation,
            format!("Could not resolve location for moniker {}", moniker.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Repository commit reported failure without raising an error
    pub fn commit_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CommitFailure, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error envelope
    pub error: ErrorResponseDetails,
}

/// Error details inside the response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, "{}", self.message);
        } else {
            tracing::debug!(code = ?self.code, "{}", self.message);
        }
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

/// Conversion from `serde_json::Error` for repository serialization paths
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::InternalError, "Serialization failed").with_source(error)
    }
}

/// Conversion from `anyhow::Error` at the binary boundary
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}
