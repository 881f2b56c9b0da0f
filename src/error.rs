//! Gateway error types.
//!
//! [`GatewayError`] covers the HTTP surface and maps each variant to a
//! status code and a structured JSON body. [`FrameError`] is why an inbound
//! WebSocket frame was rejected before it reached matchmaking.
//! [`ConfigError`] is returned while loading configuration.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ParticipantEvent;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 3002,
///     "message": "participant capacity reached (500)",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// HTTP-facing error enum with status code mapping.
///
/// Codes in the 3000 range are server-side conditions.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The configured participant limit has been reached.
    #[error("participant capacity reached ({limit})")]
    CapacityReached {
        /// Configured maximum number of concurrent participants.
        limit: usize,
    },
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::CapacityReached { .. } => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::CapacityReached { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

/// Why an inbound frame was rejected at the WebSocket boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Not valid JSON, or a known event with a missing/ill-typed field.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// The `event` name is not part of the protocol.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Only text frames are accepted.
    #[error("binary frames are not supported")]
    Binary,

    /// Chat text longer than the configured limit.
    #[error("chat message exceeds {limit} characters")]
    MessageTooLong {
        /// Configured maximum in characters.
        limit: usize,
    },
}

impl FrameError {
    /// Returns the numeric code sent back to the client.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::Malformed(_) | Self::Binary => 400,
            Self::UnknownEvent(_) => 404,
            Self::MessageTooLong { .. } => 413,
        }
    }

    /// Converts the rejection into the event sent back to the sender.
    #[must_use]
    pub fn into_event(self) -> ParticipantEvent {
        ParticipantEvent::Error {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to a value that could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Environment variable name.
        key: &'static str,
        /// Offending raw value.
        value: String,
    },
}
