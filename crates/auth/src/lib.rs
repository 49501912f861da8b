//! `workforce-auth` — authentication gate.
//!
//! Issues and verifies stateless bearer tokens and hashes credentials. This
//! crate is decoupled from HTTP and storage; there is no role model, all
//! authorization is ownership filtering by [`Principal::user_id`].

pub mod claims;
pub mod error;
pub mod password;
pub mod principal;
pub mod token;

pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use error::AuthError;
pub use password::{BcryptHasher, PasswordHasher};
pub use principal::Principal;
pub use token::{DEFAULT_TOKEN_TTL_HOURS, Hs256TokenService, TokenService};
