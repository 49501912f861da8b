use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode};

use workforce_directory::Credentials;

use crate::app::AppState;
use crate::app::dto::{AuthRequest, AuthResponse, JsonBody};
use crate::app::errors::ApiError;

/// Signup (`action = create`) or login (`action = login`).
pub async fn authenticate(
    Extension(state): Extension<Arc<AppState>>,
    JsonBody(body): JsonBody<AuthRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let credentials = Credentials::try_new(&body.email, &body.password, &body.action)?;
    let session = state.users.authenticate(credentials).await?;

    let status = if session.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(AuthResponse {
            email: session.email,
            token: session.token,
        }),
    ))
}
