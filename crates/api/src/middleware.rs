use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use workforce_auth::{AuthError, TokenService};

use crate::app::errors::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenService>,
}

/// Verify the bearer token and attach the [`workforce_auth::Principal`] to the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let principal = state.tokens.verify(token, Utc::now()).map_err(|e| {
        debug!(error = %e, "bearer token rejected");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let header = header
        .to_str()
        .map_err(|_| AuthError::Malformed("authorization header is not ascii".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn missing_or_wrong_scheme_is_rejected() {
        assert_eq!(extract_bearer(&HeaderMap::new()).unwrap_err(), AuthError::MissingToken);
        assert_eq!(extract_bearer(&headers("Basic abc")).unwrap_err(), AuthError::MissingToken);
        assert_eq!(extract_bearer(&headers("Bearer   ")).unwrap_err(), AuthError::MissingToken);
    }
}
