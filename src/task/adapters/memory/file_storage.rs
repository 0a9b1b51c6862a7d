//! In-memory file storage for attachment tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::task::{
    domain::{StorageKey, TaskDomainError},
    ports::{FileStorage, FileStorageError, FileStorageResult, FileUpload, StoredFile},
};

/// Thread-safe in-memory blob store.
///
/// Mimics the media host contract: uploads are assigned an opaque public ID
/// and can be deleted or fetched by it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileStorage {
    blobs: Arc<RwLock<HashMap<StorageKey, Vec<u8>>>>,
}

impl InMemoryFileStorage {
    /// Creates an empty in-memory blob store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored blobs.
    ///
    /// # Errors
    ///
    /// Returns [`FileStorageError::Persistence`] when the store lock is
    /// poisoned.
    pub fn blob_count(&self) -> FileStorageResult<usize> {
        let blobs = self
            .blobs
            .read()
            .map_err(|err| FileStorageError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(blobs.len())
    }
}

fn storage_key_for(upload: &FileUpload) -> Result<StorageKey, TaskDomainError> {
    StorageKey::new(format!(
        "{}/{}/{}",
        upload.path_hint,
        upload.attachment_type,
        Uuid::new_v4()
    ))
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn upload(&self, upload: FileUpload) -> FileStorageResult<StoredFile> {
        let public_id = storage_key_for(&upload).map_err(FileStorageError::persistence)?;
        let file_size = u64::try_from(upload.bytes.len()).unwrap_or(u64::MAX);
        let mut blobs = self
            .blobs
            .write()
            .map_err(|err| FileStorageError::persistence(std::io::Error::other(err.to_string())))?;
        blobs.insert(public_id.clone(), upload.bytes);

        Ok(StoredFile {
            file_url: format!("http://media.test/{public_id}"),
            secure_url: format!("https://media.test/{public_id}"),
            public_id,
            file_size,
        })
    }

    async fn delete(&self, public_id: &StorageKey) -> FileStorageResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|err| FileStorageError::persistence(std::io::Error::other(err.to_string())))?;
        blobs
            .remove(public_id)
            .map(|_| ())
            .ok_or_else(|| FileStorageError::NotFound(public_id.clone()))
    }

    async fn download(&self, public_id: &StorageKey) -> FileStorageResult<Vec<u8>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|err| FileStorageError::persistence(std::io::Error::other(err.to_string())))?;
        blobs
            .get(public_id)
            .cloned()
            .ok_or_else(|| FileStorageError::NotFound(public_id.clone()))
    }
}
