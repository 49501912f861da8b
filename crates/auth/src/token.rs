//! Stateless bearer tokens (HS256 JWT).
//!
//! Nothing is stored server-side; revocation is not supported.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};

use workforce_core::UserId;

use crate::{AuthError, Principal, TokenClaims, validate_claims};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 8;

/// Issues and verifies bearer tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: UserId, email: &str, now: DateTime<Utc>) -> Result<String, AuthError>;

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, AuthError>;
}

/// HMAC-SHA256 token service. Tokens signed with any other algorithm are rejected.
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);
        validation
    }
}

impl core::fmt::Debug for Hs256TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService for Hs256TokenService {
    fn issue(&self, user_id: UserId, email: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims::new(user_id, email, now, self.ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Issue(e.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, AuthError> {
        let header = jsonwebtoken::decode_header(token).map_err(|e| AuthError::Malformed(e.to_string()))?;
        if header.alg != Algorithm::HS256 {
            return Err(AuthError::AlgorithmMismatch);
        }

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &Self::validation())
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => AuthError::AlgorithmMismatch,
                _ => AuthError::Malformed(e.to_string()),
            })?;

        validate_claims(&data.claims, now)?;

        Ok(Principal::new(data.claims.id, data.claims.email))
    }
}
