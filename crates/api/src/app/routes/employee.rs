use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};

use workforce_auth::Principal;
use workforce_core::Page;
use workforce_directory::{EmployeeFilter, EmployeePatch, IdentityNumber, NewEmployee};

use crate::app::AppState;
use crate::app::dto::{
    CreateEmployeeRequest, EmployeeResponse, JsonBody, ListEmployeesQuery, QueryPairs, StatusBody,
    UpdateEmployeeRequest,
};
use crate::app::errors::ApiError;

pub async fn list_employees(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    pairs: QueryPairs,
) -> Result<Json<Vec<EmployeeResponse>>, ApiError> {
    let query = ListEmployeesQuery::from(pairs);
    let page = Page::from_raw(query.limit.as_deref(), query.offset.as_deref());
    let filter = EmployeeFilter::from_query(
        query.identity_number.as_deref(),
        query.name.as_deref(),
        query.gender.as_deref(),
        query.department_id.as_deref(),
    );

    let employees = state.employees.list(&principal, filter, page).await?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

pub async fn create_employee(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeResponse>), ApiError> {
    let draft = NewEmployee::try_new(
        &body.identity_number,
        &body.name,
        &body.gender,
        &body.department_id,
        &body.employee_image_uri,
    )?;
    let employee = state.employees.create(&principal, draft).await?;
    Ok((StatusCode::CREATED, Json(employee.into())))
}

pub async fn update_employee(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(identity_number): Path<String>,
    JsonBody(body): JsonBody<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    let patch = EmployeePatch::try_new(
        body.identity_number.as_deref(),
        body.name.as_deref(),
        body.gender.as_deref(),
        body.department_id.as_deref(),
        body.employee_image_uri.as_deref(),
    )?;
    let key = IdentityNumber::new(identity_number);
    let employee = state.employees.update(&principal, &key, patch).await?;
    Ok(Json(employee.into()))
}

pub async fn delete_employee(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(identity_number): Path<String>,
) -> Result<Json<StatusBody>, ApiError> {
    let key = IdentityNumber::new(identity_number);
    state.employees.delete(&principal, &key).await?;
    Ok(Json(StatusBody {
        status: "OK",
        message: "deleted",
    }))
}
