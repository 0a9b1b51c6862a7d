//! File-storage port for the external media host.

use crate::task::domain::{AttachmentType, FileName, StorageKey};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for file storage operations.
pub type FileStorageResult<T> = Result<T, FileStorageError>;

/// Outbound upload payload handed to the storage host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Original file name.
    pub file_name: FileName,
    /// Folder hint for the storage host (e.g. a task-scoped path).
    pub path_hint: String,
    /// Classification of the file, forwarded for host-side foldering.
    pub attachment_type: AttachmentType,
    /// MIME type of the payload.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Storage host response for an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Public delivery URL.
    pub file_url: String,
    /// TLS delivery URL.
    pub secure_url: String,
    /// Opaque reference used for later deletion and download.
    pub public_id: StorageKey,
    /// Stored blob size in bytes.
    pub file_size: u64,
}

/// Media host contract.
///
/// Treated as a black box; every failure surfaces as a persistence-class
/// error the caller may retry or report.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Uploads a blob and returns its delivery metadata.
    ///
    /// # Errors
    ///
    /// Returns [`FileStorageError::Persistence`] when the host rejects or
    /// fails the upload.
    async fn upload(&self, upload: FileUpload) -> FileStorageResult<StoredFile>;

    /// Deletes a previously stored blob.
    ///
    /// # Errors
    ///
    /// Returns [`FileStorageError::NotFound`] when no blob exists for the
    /// key.
    async fn delete(&self, public_id: &StorageKey) -> FileStorageResult<()>;

    /// Retrieves the bytes of a previously stored blob.
    ///
    /// # Errors
    ///
    /// Returns [`FileStorageError::NotFound`] when no blob exists for the
    /// key.
    async fn download(&self, public_id: &StorageKey) -> FileStorageResult<Vec<u8>>;
}

/// Errors returned by file storage implementations.
#[derive(Debug, Clone, Error)]
pub enum FileStorageError {
    /// No blob exists for the storage key.
    #[error("stored file not found: {0}")]
    NotFound(StorageKey),

    /// Storage-host failure. Transient; the request may be re-issued.
    #[error("file storage error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FileStorageError {
    /// Wraps a storage-host error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Upload limits applied before a blob is sent to the storage host.
///
/// A plain configuration object; hosts embed and override it rather than
/// reading an external configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentLimits {
    /// Maximum accepted file size in bytes.
    pub max_file_size_bytes: u64,
}

impl AttachmentLimits {
    /// Default maximum upload size.
    pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

    /// Creates limits with an explicit maximum size.
    #[must_use]
    pub const fn new(max_file_size_bytes: u64) -> Self {
        Self {
            max_file_size_bytes,
        }
    }
}

impl Default for AttachmentLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_FILE_SIZE_BYTES)
    }
}
