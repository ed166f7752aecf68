//! Error taxonomy shared by all platform services.
//!
//! Four kinds cover the whole user-visible failure surface:
//! invalid-argument (rejected before any store access), not-found,
//! resource-exhausted (insufficient stock) and internal (store or transport
//! failure). Each error carries a kind and a human-readable message; the
//! axum projection maps kinds onto HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Convenience alias used throughout the platform crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a platform error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input, detected before any store access.
    InvalidArgument,
    /// The referenced entity does not exist.
    NotFound,
    /// Insufficient stock to satisfy the request.
    ResourceExhausted,
    /// Store or transport failure, or an unexpected condition.
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code for the wire representation.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::Internal => "INTERNAL",
        }
    }

    /// Recover a kind from its wire code; unknown codes collapse to
    /// internal.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "INVALID_ARGUMENT" => Self::InvalidArgument,
            "NOT_FOUND" => Self::NotFound,
            "RESOURCE_EXHAUSTED" => Self::ResourceExhausted,
            _ => Self::Internal,
        }
    }

    const fn status(self) -> StatusCode {
        match self {
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Platform error: a kind plus a user-facing message.
///
/// The original cause (when any) is kept for logging only and never exposed
/// to clients.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create an error with an explicit kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause, kept for logs only.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Invalid-argument error naming the offending field.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Not-found error for a named entity.
    #[must_use]
    pub fn not_found(entity: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(ErrorKind::NotFound, format!("{entity} {id} not found"))
    }

    /// Resource-exhausted error (insufficient stock).
    #[must_use]
    pub fn resource_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceExhausted, message)
    }

    /// Internal error wrapping an unexpected condition.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// The error's classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Classify a database error: an empty result is not-found, everything else
/// is internal. Classification is structural, never by message matching.
pub fn from_sqlx(entity: &str, err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::RowNotFound => Error::new(ErrorKind::NotFound, format!("{entity} not found")),
        other => Error::internal(format!("{entity} store failure")).with_source(other),
    }
}

/// Wire representation of an error, `{ "error": { "code", "message" } }`.
///
/// Serialized by the axum projection below; service clients deserialize it
/// to recover the original kind across an HTTP hop.
#[derive(Serialize, serde::Deserialize)]
pub struct ErrorBody {
    /// The error payload.
    pub error: ErrorDetail,
}

/// Code and message carried inside [`ErrorBody`].
#[derive(Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable kind code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl From<ErrorBody> for Error {
    fn from(body: ErrorBody) -> Self {
        Self::new(ErrorKind::from_code(&body.error.code), body.error.message)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.kind == ErrorKind::Internal {
            tracing::error!(error = %self, source = ?self.source, "internal error");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.kind.code().to_string(),
                message: self.message,
            },
        };
        (self.kind.status(), Json(body)).into_response()
    }
}
