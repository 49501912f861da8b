use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};

use workforce_auth::Principal;
use workforce_core::{AppError, DepartmentId, Page, parse_text_filter};
use workforce_directory::{Department, DepartmentFilter, DepartmentPatch, NewDepartment, Resource};

use crate::app::AppState;
use crate::app::dto::{
    CreateDepartmentRequest, DepartmentResponse, JsonBody, ListDepartmentsQuery, QueryPairs, StatusBody,
    UpdateDepartmentRequest,
};
use crate::app::errors::ApiError;

/// Path ids that are not positive integers cannot name a department.
fn department_id(raw: &str) -> Result<DepartmentId, ApiError> {
    raw.parse::<DepartmentId>()
        .map_err(|_| AppError::not_found(Department::KIND.not_found()).into())
}

pub async fn list_departments(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    pairs: QueryPairs,
) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
    let query = ListDepartmentsQuery::from(pairs);
    let page = Page::from_raw(query.limit.as_deref(), query.offset.as_deref());
    let filter = DepartmentFilter {
        name: parse_text_filter(query.name.as_deref()),
    };

    let departments = state.departments.list(&principal, filter, page).await?;
    Ok(Json(departments.into_iter().map(Into::into).collect()))
}

pub async fn create_department(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<DepartmentResponse>), ApiError> {
    let draft = NewDepartment::try_new(&body.name)?;
    let department = state.departments.create(&principal, draft).await?;
    Ok((StatusCode::CREATED, Json(department.into())))
}

pub async fn update_department(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(raw_id): Path<String>,
    JsonBody(body): JsonBody<UpdateDepartmentRequest>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let id = department_id(&raw_id)?;
    let patch = DepartmentPatch::try_new(body.name.as_deref())?;
    let department = state.departments.update(&principal, &id, patch).await?;
    Ok(Json(department.into()))
}

pub async fn delete_department(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(raw_id): Path<String>,
) -> Result<Json<StatusBody>, ApiError> {
    let id = department_id(&raw_id)?;
    state.departments.delete(&principal, &id).await?;
    Ok(Json(StatusBody {
        status: "OK",
        message: "deleted",
    }))
}
