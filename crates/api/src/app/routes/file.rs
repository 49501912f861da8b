use std::sync::Arc;

use axum::{Json, extract::Extension};

use workforce_core::AppError;

use crate::app::AppState;
use crate::app::dto::{FileResponse, MultipartBody};
use crate::app::errors::ApiError;

/// Accept the multipart field `file` and return its public URI.
pub async fn upload_file(
    Extension(state): Extension<Arc<AppState>>,
    MultipartBody(mut multipart): MultipartBody,
) -> Result<Json<FileResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field.bytes().await?;
        let uri = state.files.upload(bytes.to_vec()).await?;
        return Ok(Json(FileResponse { uri }));
    }

    Err(AppError::bad_request("file is invalid").into())
}
