//! Unified error types for the Crystal API
//!
//! This module defines error types for each layer:
//! - `ValidationError`: report parameter validation failures
//! - `GatewayError`: data access gateway failures
//! - `RegistryError`: startup-time category registration failures
//! - `AuthError`: legacy login failures
//! - `AppError`: application layer errors (wraps the above for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use thiserror::Error;

use crate::app::envelope::ResponseEnvelope;
use crate::domain::reports::Domain;

/// Report parameter validation failures.
///
/// Always recoverable: surfaced to the caller as a failed envelope and
/// never reaches the gateway.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unknown category `{category}` for domain {domain}")]
    UnknownCategory { domain: Domain, category: String },

    #[error("missing required parameter `{field}`")]
    MissingParameter { field: &'static str },

    #[error("from_date {from} is after to_date {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ValidationError {
    /// Stable kind tag used in failed-envelope payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::UnknownCategory { .. } => "unknown_category",
            ValidationError::MissingParameter { .. } => "missing_parameter",
            ValidationError::InvalidRange { .. } => "invalid_range",
            ValidationError::InvalidValue { .. } => "invalid_value",
        }
    }

    /// The offending field, where one can be named.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::UnknownCategory { .. } => Some("category"),
            ValidationError::MissingParameter { field } => Some(field),
            ValidationError::InvalidRange { .. } => None,
            ValidationError::InvalidValue { field, .. } => Some(field),
        }
    }
}

/// Data access gateway failures, propagated up from the adapter.
///
/// The dispatcher never retries these; it converts them into a failed
/// envelope with a generic message and logs the detail out-of-band.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("query failed: {0}")]
    QueryFailed(String),

    #[error("query timed out")]
    Timeout,
}

/// Category registration failures.
///
/// Fatal at process start, never encountered at request time.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("duplicate category `{category}` registered for domain {domain}")]
    Duplicate {
        domain: Domain,
        category: &'static str,
    },
}

/// Legacy login failures.
///
/// Messages mirror the system being replaced; existing clients match on them.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid Email Address!")]
    InvalidEmail,

    #[error("Your password must be at least 4 characters long!")]
    PasswordTooShort,

    #[error("Invalid Password!")]
    InvalidPassword,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Auth(#[from] AuthError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope) = match &self {
            AppError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ResponseEnvelope::validation_failure(e),
            ),
            AppError::Gateway(e) => {
                // Internal detail is logged, never echoed to the caller.
                tracing::error!(error = %e, "report query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ResponseEnvelope::execution_failure(),
                )
            }
            AppError::Auth(AuthError::Gateway(e)) => {
                tracing::error!(error = %e, "login lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ResponseEnvelope::execution_failure(),
                )
            }
            AppError::Auth(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ResponseEnvelope::failure(e.to_string()),
            ),
        };

        (status, Json(envelope)).into_response()
    }
}
