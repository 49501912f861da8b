//! Process configuration.
//!
//! Built once at startup from the environment (and `.env` when present),
//! then passed by reference into constructors. Nothing reads the
//! environment after this point.

use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone)]
pub struct AppConfig {
    /// `host:port` to bind.
    pub bind_addr: String,
    /// PostgreSQL URL. `None` selects the in-memory stores.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub request_timeout: Duration,
    pub cors_allowed_origin: HeaderValue,
    pub blob_dir: PathBuf,
    pub blob_public_base_url: String,
    /// Replace 500 causes with a generic message in responses.
    pub redact_internal_errors: bool,
    pub log_level: String,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database", &self.database_url.as_ref().map(|_| "<set>"))
            .field("database_max_connections", &self.database_max_connections)
            .field("token_ttl", &self.token_ttl)
            .field("request_timeout", &self.request_timeout)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("blob_dir", &self.blob_dir)
            .field("blob_public_base_url", &self.blob_public_base_url)
            .field("redact_internal_errors", &self.redact_internal_errors)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let origin = get("CORS_ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());
        let cors_allowed_origin = HeaderValue::from_str(&origin).map_err(|e| ConfigError::Invalid {
            key: "CORS_ALLOWED_ORIGIN",
            value: origin.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            bind_addr: bind_addr(get("PORT"))?,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_positive("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), 10)?,
            jwt_secret,
            token_ttl: chrono::Duration::hours(parse_positive("TOKEN_TTL_HOURS", get("TOKEN_TTL_HOURS"), 8)?),
            request_timeout: Duration::from_secs(parse_positive(
                "REQUEST_TIMEOUT_SECS",
                get("REQUEST_TIMEOUT_SECS"),
                30,
            )?),
            cors_allowed_origin,
            blob_dir: PathBuf::from(get("BLOB_DIR").unwrap_or_else(|| "./uploads".to_string())),
            blob_public_base_url: get("BLOB_PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8080/uploads".to_string()),
            redact_internal_errors: parse_bool("REDACT_INTERNAL_ERRORS", get("REDACT_INTERNAL_ERRORS"))?,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "debug".to_string()),
        })
    }
}

/// Accepts `8080`, `:8080` or `host:port`.
fn bind_addr(raw: Option<String>) -> Result<String, ConfigError> {
    let Some(raw) = raw else {
        return Ok("0.0.0.0:8080".to_string());
    };

    let (host, port) = match raw.rsplit_once(':') {
        Some(("", port)) => ("0.0.0.0", port),
        Some((host, port)) => (host, port),
        None => ("0.0.0.0", raw.as_str()),
    };
    port.parse::<u16>().map_err(|e| ConfigError::Invalid {
        key: "PORT",
        value: raw.clone(),
        reason: e.to_string(),
    })?;

    Ok(format!("{host}:{port}"))
}

fn parse_positive<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: core::str::FromStr + PartialOrd + Default,
    T::Err: core::fmt::Display,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    let parsed = raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })?;
    if parsed <= T::default() {
        return Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(parsed)
}

fn parse_bool(key: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None => Ok(false),
        Some("1" | "true" | "TRUE" | "yes") => Ok(true),
        Some("0" | "false" | "FALSE" | "no") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            key,
            value: other.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
