//! Error → response mapping.
//!
//! Every error body is `{ "status": <reason phrase>, "message": <cause> }`.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use workforce_auth::AuthError;
use workforce_core::{AppError, ErrorKind};

pub(crate) const REDACTED: &str = "internal server error";

/// Handler error: an [`AppError`] rendered with its taxonomy status.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::bad_request(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::bad_request(rejection.body_text()))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        warn!(error = %err, "multipart body rejected");
        Self(AppError::bad_request("file is invalid"))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        warn!(error = %rejection.body_text(), "multipart request rejected");
        Self(AppError::bad_request("file is invalid"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.0.kind() == ErrorKind::Internal {
            error!(error = %self.0, "request failed");
        }
        json_error(status, self.0.message())
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "status": status.canonical_reason().unwrap_or_default(),
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Response mapper that hides the cause of unclassified failures.
pub async fn redact_internal(response: Response) -> Response {
    if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, REDACTED);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body(res: Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn taxonomy_maps_to_status_and_body() {
        let res = ApiError(AppError::conflict("email is exist")).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(body(res).await, json!({"status": "Conflict", "message": "email is exist"}));

        let res = ApiError::from(AuthError::MissingToken).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body(res).await["message"], "missing auth token");
    }

    #[tokio::test]
    async fn internal_causes_pass_through_unless_redacted() {
        let res = ApiError(AppError::internal("pool timed out")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let redacted = redact_internal(res).await;
        assert_eq!(
            body(redacted).await,
            json!({"status": "Internal Server Error", "message": "internal server error"})
        );

        let passthrough = redact_internal(ApiError(AppError::not_found("x")).into_response()).await;
        assert_eq!(passthrough.status(), StatusCode::NOT_FOUND);
    }
}
