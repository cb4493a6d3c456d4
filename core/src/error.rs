//! Error types for the lvlup API client.
//!
//! # Design
//! Every failure is reported to the immediate caller; nothing is retried.
//! Transport failures keep the transport's own error boxed inside
//! `ApiError::Transport` so callers can downcast it. Non-200 responses land
//! in `ApiError::Http`; the service endpoints also carry the raw body text,
//! the payment endpoints only the status.

use crate::transport::TransportError;

/// Errors returned by `LvlRequests` and `LvlClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// `base_url + path` did not parse as a URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The server answered with a status other than 200.
    #[error("status: {status} {reason}{}", message_suffix(.message))]
    Http {
        status: u16,
        reason: String,
        message: Option<String>,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status of an `Http` error, `None` for every other variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(", message: {message}"),
        None => String::new(),
    }
}

/// Errors raised while loading `ClientConfig` from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidVar { name: &'static str, value: String },
}
