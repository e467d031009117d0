//! HTTP access to the blog backend.
//!
//! Every endpoint answers with an envelope `{"data": ..., "message": ...}`;
//! failures carry a `message` that is surfaced verbatim when present.

mod auth;
mod blog;
mod client;

use std::fmt;

pub use auth::AuthApi;
pub use blog::BlogApi;
pub use client::ApiClient;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::TokenRefresh;

/// Categories of API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Non-success HTTP status other than 401
    HttpStatus,
    /// HTTP 401 that survived the refresh attempt
    Unauthorized,
    /// Request or connect timeout
    Timeout,
    /// Connection or transport failure
    Network,
    /// Response body didn't match the expected shape
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from the backend or the transport.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// One-line summary suitable for display
    pub message: String,
    /// Raw body or transport error
    pub details: Option<String>,
    server_message: bool,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            details: None,
            server_message: false,
        }
    }

    /// Builds an error from a non-success response, preferring the
    /// backend's own `message`.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = if status == 401 {
            ApiErrorKind::Unauthorized
        } else {
            ApiErrorKind::HttpStatus
        };
        let details = (!body.is_empty()).then(|| body.to_string());

        if let Ok(json) = serde_json::from_str::<Value>(body)
            && let Some(msg) = json
                .get("message")
                .or_else(|| json.get("error").and_then(|e| e.get("message")))
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
        {
            return Self {
                kind,
                status: Some(status),
                message: msg.to_string(),
                details,
                server_message: true,
            };
        }

        Self {
            kind,
            status: Some(status),
            message: format!("HTTP {status}"),
            details,
            server_message: false,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Whether the message came from the backend.
    pub fn has_server_message(&self) -> bool {
        self.server_message
    }

    /// Replaces a generic message with `default`, keeping the original as
    /// details. Backend messages are left alone.
    #[must_use]
    pub fn or_message(mut self, default: &str) -> Self {
        if !self.server_message {
            let previous = std::mem::replace(&mut self.message, default.to_string());
            if self.details.is_none() {
                self.details = Some(previous);
            }
        }
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Token lifecycle changes made by the client on its own.
///
/// A UI holding its own copy of the auth state mirrors these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A 401 was recovered with a refresh.
    Refreshed(TokenRefresh),
    /// The refresh failed or no refresh token was stored.
    Cleared,
}

/// Classifies a reqwest error into an `ApiError`.
pub(crate) fn classify_reqwest_error(e: &reqwest::Error) -> ApiError {
    let error = if e.is_timeout() {
        ApiError::new(ApiErrorKind::Timeout, format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ApiError::new(ApiErrorKind::Network, format!("Connection failed: {e}"))
    } else if e.is_decode() {
        ApiError::parse(format!("Invalid response body: {e}"))
    } else {
        ApiError::new(ApiErrorKind::Network, format!("Network error: {e}"))
    };
    ApiError {
        status: e.status().map(|s| s.as_u16()),
        ..error
    }
}

/// Extracts `data` (or `data.<field>`) from an envelope.
pub(crate) fn extract<T: DeserializeOwned>(body: Value, field: Option<&str>) -> ApiResult<T> {
    let Value::Object(mut envelope) = body else {
        return Err(ApiError::parse("Expected a JSON object in response"));
    };
    let mut data = envelope.remove("data").unwrap_or(Value::Null);
    if let Some(field) = field {
        data = match data {
            Value::Object(mut inner) => inner.remove(field).unwrap_or(Value::Null),
            _ => Value::Null,
        };
    }
    let path = field.map_or_else(|| "data".to_string(), |f| format!("data.{f}"));
    serde_json::from_value(data).map_err(|e| ApiError {
        details: Some(e.to_string()),
        ..ApiError::parse(format!("Unexpected shape of `{path}`"))
    })
}
