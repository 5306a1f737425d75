use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Message shown when the server gives nothing better.
pub const FALLBACK_MESSAGE: &str = "Something went wrong, please try again later.";

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Per-field validation messages, as returned under `errors` in a failed response.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http {
        status: u16,
        message: String,
        errors: FieldErrors,
    },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: FieldErrors,
}

impl ApiError {
    /// Builds an HTTP error from a raw response body.
    ///
    /// JSON bodies of the form `{message, errors}` are decoded; anything else is
    /// trimmed and truncated so it is safe to show.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Self::Http {
                status,
                message: parsed
                    .message
                    .map(|message| sanitize_body(&message))
                    .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
                errors: parsed.errors,
            },
            Err(_) => Self::Http {
                status,
                message: sanitize_body(body),
                errors: FieldErrors::new(),
            },
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server throttled the caller (HTTP 429).
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// First validation message for `field`, if the server sent one.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        match self {
            Self::Http { errors, .. } => errors
                .get(field)
                .and_then(|messages| messages.first())
                .map(String::as_str),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_field_errors(&self) -> bool {
        matches!(self, Self::Http { errors, .. } if !errors.is_empty())
    }

    /// Message suitable for a toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            Self::Network(message) | Self::Timeout(message) => message.clone(),
            Self::Config(_) | Self::Parse(_) | Self::Serialization(_) => {
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}

/// Trims and truncates bodies for user-facing messages.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
