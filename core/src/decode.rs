//! Status checks and JSON decoding shared by every endpoint.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// How much of a failed response ends up in `ApiError::Http`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDetail {
    /// Status line only (payment endpoints).
    StatusOnly,
    /// Status line plus the raw body text (service endpoints).
    WithBody,
}

/// Accept exactly 200; map anything else to `ApiError::Http`.
pub fn expect_ok(response: &HttpResponse, detail: ErrorDetail) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    tracing::debug!(status = response.status, "unexpected response status");
    Err(ApiError::Http {
        status: response.status,
        reason: reason_phrase(response.status).to_string(),
        message: match detail {
            ErrorDetail::StatusOnly => None,
            ErrorDetail::WithBody => Some(response.text().into_owned()),
        },
    })
}

pub fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body).map_err(ApiError::Deserialization)
}

/// `expect_ok` followed by `decode_json`.
pub fn decode_ok<T: DeserializeOwned>(
    response: &HttpResponse,
    detail: ErrorDetail,
) -> Result<T, ApiError> {
    expect_ok(response, detail)?;
    decode_json(response)
}

fn reason_phrase(status: u16) -> &'static str {
    ::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown Status")
}
