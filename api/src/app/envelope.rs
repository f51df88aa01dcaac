//! Response envelope builder
//!
//! Every response leaving the API - success or failure - is wrapped in the
//! same `{success, data, message, timestamp}` shape. Internal failure
//! detail never appears in `message`; it is logged where the failure is
//! caught.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::domain::reports::ReportData;
use crate::error::ValidationError;

/// The uniform response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseEnvelope {
    /// Wrap a report result.
    pub fn success(data: ReportData, message: impl Into<String>) -> Self {
        let data = serde_json::to_value(data).unwrap_or(serde_json::Value::Null);
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Wrap a validation failure, with the field-level problem in `data`.
    pub fn validation_failure(err: &ValidationError) -> Self {
        let problems = json!([{
            "field": err.field(),
            "kind": err.kind(),
            "detail": err.to_string(),
        }]);
        Self {
            success: false,
            data: Some(problems),
            message: format!("invalid report request: {err}"),
            timestamp: Utc::now(),
        }
    }

    /// Wrap an execution failure with a generic message.
    pub fn execution_failure() -> Self {
        Self::failure("report could not be generated")
    }

    /// A failed envelope with no payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
