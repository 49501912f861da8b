//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP handlers, one file per resource
//! - `dto.rs`: request/response bodies and extractors
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    BoxError, Extension, Router,
    error_handling::HandleErrorLayer,
    http::{Method, StatusCode, header},
    response::Response,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use workforce_auth::{BcryptHasher, Hs256TokenService, TokenService};
use workforce_directory::{
    BlobStore, Department, DepartmentService, Employee, EmployeeService, FileService, ResourceStore, StoreResult,
    UserService, UserStore,
};
use workforce_infra::{InMemoryDirectory, LocalBlobStore, PostgresDirectory};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Services shared by every handler.
pub struct AppState {
    pub users: UserService,
    pub departments: DepartmentService,
    pub employees: EmployeeService,
    pub files: FileService,
}

struct Stores {
    users: Arc<dyn UserStore>,
    departments: Arc<dyn ResourceStore<Department>>,
    employees: Arc<dyn ResourceStore<Employee>>,
}

impl Stores {
    fn shared<S>(store: Arc<S>) -> Self
    where
        S: UserStore + ResourceStore<Department> + ResourceStore<Employee> + 'static,
    {
        Self {
            users: store.clone(),
            departments: store.clone(),
            employees: store,
        }
    }
}

async fn build_stores(config: &AppConfig) -> StoreResult<Stores> {
    match &config.database_url {
        Some(url) => {
            let pg = PostgresDirectory::connect(url, config.database_max_connections).await?;
            pg.migrate().await?;
            info!("using postgres stores");
            Ok(Stores::shared(Arc::new(pg)))
        }
        None => {
            info!("DATABASE_URL not set; using in-memory stores");
            Ok(Stores::shared(Arc::new(InMemoryDirectory::new())))
        }
    }
}

fn handle_timeout(err: BoxError, redact_internal: bool) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        return errors::json_error(StatusCode::SERVICE_UNAVAILABLE, "Timeout");
    }

    error!(error = %err, "request pipeline failed");
    let message = if redact_internal {
        errors::REDACTED.to_string()
    } else {
        err.to_string()
    };
    errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Wrap `app` in the request pipeline: redaction, tracing, CORS and the whole-request timeout.
fn request_pipeline(app: Router, config: &AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_allowed_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let redact = config.redact_internal_errors;
    let app = if redact {
        app.layer(axum::middleware::map_response(errors::redact_internal))
    } else {
        app
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                handle_timeout(err, redact)
            }))
            .timeout(config.request_timeout),
    )
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> StoreResult<Router> {
    let tokens: Arc<dyn TokenService> = Arc::new(Hs256TokenService::with_ttl(
        config.jwt_secret.as_bytes(),
        config.token_ttl,
    ));
    let auth_state = middleware::AuthState {
        tokens: tokens.clone(),
    };

    let stores = build_stores(config).await?;
    let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(
        config.blob_dir.clone(),
        config.blob_public_base_url.clone(),
    ));

    let state = Arc::new(AppState {
        users: UserService::new(stores.users, Arc::new(BcryptHasher::new()), tokens),
        departments: DepartmentService::new(stores.departments.clone()),
        employees: EmployeeService::new(stores.employees).with_departments(stores.departments),
        files: FileService::new(blobs),
    });

    // Protected routes: require a valid bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    let app = routes::public_router()
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(&config.blob_dir))
        .layer(Extension(state));

    Ok(request_pipeline(app, config))
}
