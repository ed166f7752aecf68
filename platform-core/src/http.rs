//! Helpers shared by the services' HTTP clients.
//!
//! Successful responses decode as JSON; error responses decode as
//! [`ErrorBody`](crate::error::ErrorBody) so the original error kind
//! survives the HTTP hop. Transport failures are internal errors.

use crate::error::{Error, ErrorBody, Result};
use serde::de::DeserializeOwned;

/// Decode a JSON response, recovering the platform error kind from error
/// bodies.
///
/// # Errors
///
/// Returns the remote error when the response is unsuccessful, or an
/// internal error when the body cannot be decoded.
pub async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::internal(format!("{context}: malformed response")).with_source(e))
    } else {
        Err(decode_error(response, context).await)
    }
}

/// Decode an empty (no-content) response.
///
/// # Errors
///
/// Returns the remote error when the response is unsuccessful.
pub async fn decode_empty(response: reqwest::Response, context: &str) -> Result<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(decode_error(response, context).await)
    }
}

async fn decode_error(response: reqwest::Response, context: &str) -> Error {
    match response.json::<ErrorBody>().await {
        Ok(body) => Error::from(body),
        Err(e) => Error::internal(format!("{context}: unreadable error response")).with_source(e),
    }
}

/// Wrap a transport-level failure as an internal error.
#[must_use]
pub fn transport_error(context: &str, err: reqwest::Error) -> Error {
    Error::internal(format!("{context}: transport failure")).with_source(err)
}
