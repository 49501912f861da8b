use axum::{
    Router,
    routing::{get, patch, post},
};

pub mod auth;
pub mod department;
pub mod employee;
pub mod file;
pub mod system;
pub mod user;

/// Router for all authenticated (owner-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/v1/user", get(user::get_profile).patch(user::update_profile))
        .route(
            "/v1/department",
            get(department::list_departments).post(department::create_department),
        )
        .route(
            "/v1/department/:department_id",
            patch(department::update_department).delete(department::delete_department),
        )
        .route(
            "/v1/employee",
            get(employee::list_employees).post(employee::create_employee),
        )
        .route(
            "/v1/employee/:identity_number",
            patch(employee::update_employee).delete(employee::delete_employee),
        )
        .route("/v1/file", post(file::upload_file))
}

/// Router for endpoints that need no token.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(system::health))
        .route("/v1/auth", post(auth::authenticate))
}
