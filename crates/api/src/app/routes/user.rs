use std::sync::Arc;

use axum::{Json, extract::Extension};

use workforce_auth::Principal;
use workforce_directory::UserPatch;

use crate::app::AppState;
use crate::app::dto::{JsonBody, ProfileResponse, UpdateProfileRequest};
use crate::app::errors::ApiError;

pub async fn get_profile(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state.users.profile(&principal).await?;
    Ok(Json(user.into()))
}

pub async fn update_profile(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let patch = UserPatch::try_new(
        body.email.as_deref(),
        body.name.as_deref(),
        body.user_image_uri.as_deref(),
        body.company_name.as_deref(),
        body.company_image_uri.as_deref(),
    )?;
    let user = state.users.update_profile(&principal, patch).await?;
    Ok(Json(user.into()))
}
