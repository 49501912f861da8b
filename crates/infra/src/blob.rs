//! Blob store adapters for uploaded images.
//!
//! Objects are named `<uuid>.<ext>` and addressed by a public base URL.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

use workforce_directory::{BlobStore, ImageType, StoreError, StoreResult};

fn object_name(image_type: ImageType) -> String {
    format!("{}.{}", Uuid::new_v4(), image_type.extension())
}

fn public_url(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), name)
}

/// Writes objects into a local directory served under `public_base_url`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()), err)]
    async fn put(&self, bytes: Vec<u8>, image_type: ImageType) -> StoreResult<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to create blob dir: {e}")))?;

        let name = object_name(image_type);
        tokio::fs::write(self.dir.join(&name), &bytes)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to write blob: {e}")))?;

        debug!(%name, "blob written");
        Ok(public_url(&self.public_base_url, &name))
    }
}

/// Keeps objects in memory. Used by tests.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    public_base_url: String,
}

impl InMemoryBlobStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.read().ok()?.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, bytes: Vec<u8>, image_type: ImageType) -> StoreResult<String> {
        let name = object_name(image_type);
        self.objects
            .write()
            .map_err(|_| StoreError::Backend("blob store lock poisoned".to_string()))?
            .insert(name.clone(), bytes);
        Ok(public_url(&self.public_base_url, &name))
    }
}
