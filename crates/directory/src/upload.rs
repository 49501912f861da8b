//! Image uploads.
//!
//! The content type is sniffed from the bytes; the client-declared type is
//! not trusted.

use std::sync::Arc;

use tracing::{error, info};

use workforce_core::{AppError, AppResult};

use crate::ports::BlobStore;

/// Uploads larger than this are rejected.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ImageType {
    Jpeg,
    Png,
}

impl ImageType {
    const JPEG_MAGIC: &'static [u8] = &[0xFF, 0xD8, 0xFF];
    const PNG_MAGIC: &'static [u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(Self::JPEG_MAGIC) {
            Some(ImageType::Jpeg)
        } else if bytes.starts_with(Self::PNG_MAGIC) {
            Some(ImageType::Png)
        } else {
            None
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageType::Jpeg => "jpeg",
            ImageType::Png => "png",
        }
    }
}

/// Validates uploaded images and hands them to the blob store.
#[derive(Clone)]
pub struct FileService {
    blobs: Arc<dyn BlobStore>,
}

impl FileService {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Store `bytes` and return the public URI.
    pub async fn upload(&self, bytes: Vec<u8>) -> AppResult<String> {
        if bytes.is_empty() || bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::bad_request("file is invalid"));
        }
        let image_type = ImageType::sniff(&bytes).ok_or_else(|| AppError::bad_request("file is invalid"))?;

        let size = bytes.len();
        let uri = self.blobs.put(bytes, image_type).await.map_err(|e| {
            error!(error = %e, "blob store rejected upload");
            AppError::internal(format!("failed to upload file: {e}"))
        })?;

        info!(size, content_type = image_type.content_type(), %uri, "file uploaded");
        Ok(uri)
    }
}
