use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Conflict,
    RateLimited,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 | 406 => ErrorCode::NotFound,
            400 | 422 => ErrorCode::Validation,
            409 => ErrorCode::Conflict,
            429 => ErrorCode::RateLimited,
            _ => ErrorCode::Internal,
        }
    }
}

/// Error payload reported by the table service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Raw shape of the JSON error body returned by the table service.
#[derive(Debug, Default, Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            backend_code: None,
            details: None,
            hint: None,
        }
    }

    /// Builds an error from an HTTP status and response body, keeping the raw body when it is not
    /// the service's JSON error shape.
    pub fn from_response(status: u16, body: &str) -> Self {
        let code = ErrorCode::from_status(status);
        match serde_json::from_str::<BackendErrorBody>(body) {
            Ok(parsed) if parsed.message.is_some() => Self {
                code,
                message: parsed.message.unwrap_or_default(),
                backend_code: parsed.code,
                details: parsed.details,
                hint: parsed.hint,
            },
            _ => {
                let trimmed = body.trim();
                let message = if trimmed.is_empty() {
                    format!("request failed with status {status}")
                } else {
                    trimmed.to_string()
                };
                Self::new(code, message)
            }
        }
    }
}

/// Reasons a form draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("fact text is empty")]
    EmptyText,
    #[error("fact text is {len} characters long (limit {max})")]
    TextTooLong { len: usize, max: usize },
    #[error("source '{0}' is not an absolute http(s) URL")]
    InvalidSource(String),
    #[error("no category selected")]
    MissingCategory,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}
