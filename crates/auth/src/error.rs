use thiserror::Error;

use workforce_core::AppError;

use crate::TokenValidationError;

/// Authentication gate failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing auth token")]
    MissingToken,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("unexpected signing algorithm")]
    AlgorithmMismatch,

    #[error(transparent)]
    Expired(#[from] TokenValidationError),

    #[error("failed to create auth token: {0}")]
    Issue(String),

    #[error("{0}")]
    Hash(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Issue(_) | AuthError::Hash(_) => AppError::internal(err.to_string()),
            _ => AppError::unauthorized(err.to_string()),
        }
    }
}
