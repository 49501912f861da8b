//! User usecases: signup/login and the self-only profile.
//!
//! Users have no owner scope beyond themselves and are never deleted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use workforce_auth::{PasswordHasher, Principal, TokenService};
use workforce_core::{AppError, AppResult, Merge, present};

use crate::ports::UserStore;
use crate::user::{AuthAction, Credentials, User, UserPatch};

const EMAIL_TAKEN: &str = "email is exist";
const USER_NOT_FOUND: &str = "User not found";

/// Outcome of a successful authentication action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub token: String,
    /// `true` when the action created the account.
    pub created: bool,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>, tokens: Arc<dyn TokenService>) -> Self {
        Self { store, hasher, tokens }
    }

    pub async fn authenticate(&self, credentials: Credentials) -> AppResult<Session> {
        match credentials.action {
            AuthAction::Create => self.register(credentials).await,
            AuthAction::Login => self.login(credentials).await,
        }
    }

    async fn register(&self, credentials: Credentials) -> AppResult<Session> {
        if self.store.email_exists(&credentials.email).await? {
            debug!(email = %credentials.email, "signup rejected: email taken");
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let digest = self.hash(credentials.password).await?;
        let user = self.store.create(&credentials.email, &digest).await?;
        let token = self.tokens.issue(user.id, &user.email, Utc::now())?;

        info!(user_id = %user.id, "user registered");
        Ok(Session {
            email: user.email,
            token,
            created: true,
        })
    }

    async fn login(&self, credentials: Credentials) -> AppResult<Session> {
        let user = self
            .store
            .find_by_email(&credentials.email)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

        if !self.verify(credentials.password, user.password_digest.clone()).await? {
            debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(AppError::bad_request("password is wrong"));
        }

        let token = self.tokens.issue(user.id, &user.email, Utc::now())?;
        info!(user_id = %user.id, "user logged in");
        Ok(Session {
            email: user.email,
            token,
            created: false,
        })
    }

    pub async fn profile(&self, principal: &Principal) -> AppResult<User> {
        self.store
            .find_by_id(principal.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    pub async fn update_profile(&self, principal: &Principal, patch: UserPatch) -> AppResult<User> {
        let current = self.profile(principal).await?;

        if let Some(email) = present(patch.email.as_ref()) {
            if *email != current.email && self.store.email_exists(email).await? {
                debug!(user_id = %current.id, "profile update rejected: email taken");
                return Err(AppError::conflict(EMAIL_TAKEN));
            }
        }

        let updated = self.store.update(current.merge(&patch)).await?;
        info!(user_id = %updated.id, "profile updated");
        Ok(updated)
    }

    // Hashing runs on the blocking pool.
    async fn hash(&self, password: String) -> AppResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::internal(format!("hashing task failed: {e}")))?
            .map_err(AppError::from)
    }

    async fn verify(&self, password: String, digest: String) -> AppResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AppError::internal(format!("hashing task failed: {e}")))
    }
}
