//! Storage ports: the narrow contract the usecases need from adapters.
//!
//! Adapters map their failures into [`StoreError`] so usecases never see
//! driver-specific errors. Everything an adapter cannot classify is
//! `Backend` and surfaces as an unclassified (500) failure.

use async_trait::async_trait;
use thiserror::Error;

use workforce_core::{AppError, Page, UserId};

use crate::{ImageType, Resource, User};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A store-enforced uniqueness constraint rejected the write.
    #[error("{0}")]
    Conflict(String),

    /// The row (or a row it references) is gone.
    #[error("{0}")]
    NotFound(String),

    /// Connectivity, driver or serialization failure.
    #[error("{0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

/// Owner-scoped persistence for one resource kind.
///
/// Every method filters by `owner`; a row owned by someone else behaves
/// exactly like a missing row.
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    async fn exists(&self, owner: UserId, key: &R::Key) -> StoreResult<bool>;

    async fn find(&self, owner: UserId, key: &R::Key) -> StoreResult<Option<R::Record>>;

    async fn create(&self, owner: UserId, draft: R::Draft) -> StoreResult<R::Record>;

    /// Overwrite the row at `key` with an already merged record.
    async fn update(&self, owner: UserId, key: &R::Key, merged: R::Record) -> StoreResult<R::Record>;

    async fn delete(&self, owner: UserId, key: &R::Key) -> StoreResult<()>;

    async fn list(&self, owner: UserId, filter: &R::Filter, page: Page) -> StoreResult<Vec<R::Record>>;

    /// Whether any other row references `key` (employees of a department).
    async fn exists_referencing(&self, owner: UserId, key: &R::Key) -> StoreResult<bool>;
}

/// Persistence for user accounts. Users are never deleted.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, email: &str, password_digest: &str) -> StoreResult<User>;

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    async fn update(&self, merged: User) -> StoreResult<User>;
}

/// Blob storage for uploaded images. Returns the public URL of the stored object.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, bytes: Vec<u8>, image_type: ImageType) -> StoreResult<String>;
}
