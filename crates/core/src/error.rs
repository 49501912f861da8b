//! Error taxonomy shared by every layer.
//!
//! Four recoverable kinds plus an unclassified fallback. Each carries a
//! human-readable cause that the HTTP boundary returns verbatim.

use thiserror::Error;

/// Result type used across usecases.
pub type AppResult<T> = Result<T, AppError>;

/// Classification of an [`AppError`], independent of the cause text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    /// Anything that was not classified into one of the four kinds above.
    Internal,
}

impl ErrorKind {
    /// HTTP status code the boundary answers with.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }

    /// Canonical reason phrase, used as the `status` field of error bodies.
    pub fn status_text(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Internal => "Internal Server Error",
        }
    }
}

/// Application-level error: a kind plus a cause.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Malformed input or failed field validation.
    #[error("{0}")]
    BadRequest(String),

    /// Missing, invalid or expired credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Referenced entity does not exist in the caller's scope.
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or referential-conflict violation.
    #[error("{0}")]
    Conflict(String),

    /// Unclassified internal failure (connectivity, serialization, ...).
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::Unauthorized(_) => ErrorKind::Unauthorized,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest(m)
            | AppError::Unauthorized(m)
            | AppError::NotFound(m)
            | AppError::Conflict(m)
            | AppError::Internal(m) => m,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn status_text(&self) -> &'static str {
        self.kind().status_text()
    }

    /// Prefix the cause with additional context, keeping the kind.
    pub fn context(self, ctx: impl core::fmt::Display) -> Self {
        let wrap = |m: String| format!("{ctx}: {m}");
        match self {
            AppError::BadRequest(m) => AppError::BadRequest(wrap(m)),
            AppError::Unauthorized(m) => AppError::Unauthorized(wrap(m)),
            AppError::NotFound(m) => AppError::NotFound(wrap(m)),
            AppError::Conflict(m) => AppError::Conflict(wrap(m)),
            AppError::Internal(m) => AppError::Internal(wrap(m)),
        }
    }
}
