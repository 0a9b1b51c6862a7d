//! Service layer for attachment upload, deletion, visibility, and download.

use crate::task::{
    domain::{
        Actor, Attachment, AttachmentId, AttachmentType, FileName, NewAttachment, Task,
        TaskDomainError, TaskId, ensure_can_upload, is_visible,
    },
    ports::{
        AttachmentLimits, FileStorage, FileStorageError, FileUpload, TaskStore, TaskStoreError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for uploading an attachment to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAttachmentRequest {
    task_id: TaskId,
    file_name: String,
    attachment_type: AttachmentType,
    content_type: String,
    bytes: Vec<u8>,
}

impl UploadAttachmentRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        file_name: impl Into<String>,
        attachment_type: AttachmentType,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            task_id,
            file_name: file_name.into(),
            attachment_type,
            content_type: "application/octet-stream".to_owned(),
            bytes,
        }
    }

    /// Sets the MIME type of the payload.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Service-level errors for attachment operations.
#[derive(Debug, Error)]
pub enum AttachmentServiceError {
    /// Domain validation failed; nothing was written.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// Storage-host operation failed.
    #[error(transparent)]
    Storage(#[from] FileStorageError),
    /// No task exists for the requested identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Result type for attachment service operations.
pub type AttachmentServiceResult<T> = Result<T, AttachmentServiceError>;

/// Attachment orchestration service.
///
/// Enforces the upload, delete, and visibility matrices before any blob or
/// document write, and keeps the task document authoritative: the blob host
/// is only ever touched for files the matrix has already admitted.
#[derive(Clone)]
pub struct AttachmentService<S, F, C>
where
    S: TaskStore,
    F: FileStorage,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    files: Arc<F>,
    clock: Arc<C>,
    limits: AttachmentLimits,
}

impl<S, F, C> AttachmentService<S, F, C>
where
    S: TaskStore,
    F: FileStorage,
    C: Clock + Send + Sync,
{
    /// Creates a new attachment service with default upload limits.
    #[must_use]
    pub fn new(store: Arc<S>, files: Arc<F>, clock: Arc<C>) -> Self {
        Self::with_limits(store, files, clock, AttachmentLimits::default())
    }

    /// Creates a new attachment service with explicit upload limits.
    #[must_use]
    pub const fn with_limits(
        store: Arc<S>,
        files: Arc<F>,
        clock: Arc<C>,
        limits: AttachmentLimits,
    ) -> Self {
        Self {
            store,
            files,
            clock,
            limits,
        }
    }

    /// Uploads a blob and appends its attachment record to the task.
    ///
    /// The permission matrix and size limit are checked before the blob is
    /// sent to the storage host. When the document write fails after a
    /// successful blob upload, the blob is deleted on a best-effort basis
    /// and the store error is returned; the task document is never left
    /// referencing a blob that was not persisted.
    ///
    /// # Errors
    ///
    /// - [`AttachmentServiceError::NotFound`] when the task does not exist.
    /// - [`AttachmentServiceError::Domain`] when the upload matrix denies
    ///   the combination, the file name is empty, or the payload exceeds
    ///   the configured size limit.
    /// - [`AttachmentServiceError::Storage`] when the blob upload fails.
    /// - [`AttachmentServiceError::Store`] when the document write fails.
    pub async fn upload(
        &self,
        request: UploadAttachmentRequest,
        actor: &Actor,
    ) -> AttachmentServiceResult<Task> {
        let task = self
            .store
            .find_by_id(request.task_id)
            .await?
            .ok_or(AttachmentServiceError::NotFound(request.task_id))?;

        ensure_can_upload(request.attachment_type, actor, task.status())?;
        let file_name = FileName::new(request.file_name)?;
        let payload_size = u64::try_from(request.bytes.len()).unwrap_or(u64::MAX);
        if payload_size > self.limits.max_file_size_bytes {
            return Err(TaskDomainError::FileTooLarge {
                actual_bytes: payload_size,
                limit_bytes: self.limits.max_file_size_bytes,
            }
            .into());
        }

        let stored = self
            .files
            .upload(FileUpload {
                file_name: file_name.clone(),
                path_hint: format!("tasks/{}", task.id()),
                attachment_type: request.attachment_type,
                content_type: request.content_type.clone(),
                bytes: request.bytes,
            })
            .await?;

        let attachment = Attachment::new(
            NewAttachment {
                file_name,
                file_url: stored.file_url,
                secure_url: stored.secure_url,
                public_id: stored.public_id.clone(),
                file_size: stored.file_size,
                file_type: request.content_type,
                attachment_type: request.attachment_type,
                uploaded_by: actor.uid(),
                uploaded_by_role: actor.role(),
            },
            &*self.clock,
        );

        let attachment_id = attachment.id();
        let mut updated = task;
        updated.add_attachment(attachment, actor, &*self.clock)?;

        if let Err(err) = self.store.update(&updated).await {
            if let Err(cleanup_err) = self.files.delete(&stored.public_id).await {
                tracing::warn!(
                    public_id = %stored.public_id,
                    error = %cleanup_err,
                    "failed to release blob after document write failure"
                );
            }
            return Err(err.into());
        }

        tracing::info!(
            task_id = %updated.id(),
            attachment_id = %attachment_id,
            attachment_type = %request.attachment_type,
            actor = %actor,
            "attachment uploaded"
        );
        Ok(updated)
    }

    /// Deletes an attachment record and releases its blob.
    ///
    /// The document write happens first; a blob the host fails to release
    /// afterwards is orphaned and logged, never resurrected.
    ///
    /// # Errors
    ///
    /// - [`AttachmentServiceError::NotFound`] when the task does not exist.
    /// - [`AttachmentServiceError::Domain`] when the attachment is missing
    ///   or the delete matrix denies the combination.
    /// - [`AttachmentServiceError::Store`] when the document write fails.
    pub async fn delete(
        &self,
        task_id: TaskId,
        attachment_id: AttachmentId,
        actor: &Actor,
    ) -> AttachmentServiceResult<Task> {
        let task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or(AttachmentServiceError::NotFound(task_id))?;

        let mut updated = task;
        let removed = updated.remove_attachment(attachment_id, actor, &*self.clock)?;
        self.store.update(&updated).await?;

        if let Err(err) = self.files.delete(removed.public_id()).await {
            tracing::warn!(
                public_id = %removed.public_id(),
                error = %err,
                "blob release failed after attachment delete"
            );
        }
        tracing::info!(
            task_id = %updated.id(),
            attachment_id = %attachment_id,
            actor = %actor,
            "attachment deleted"
        );
        Ok(updated)
    }

    /// Returns the attachments shown to the actor at the task's current
    /// status.
    ///
    /// # Errors
    ///
    /// - [`AttachmentServiceError::NotFound`] when the task does not exist.
    /// - [`AttachmentServiceError::Store`] when the lookup fails.
    pub async fn visible_attachments(
        &self,
        task_id: TaskId,
        actor: &Actor,
    ) -> AttachmentServiceResult<Vec<Attachment>> {
        let task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or(AttachmentServiceError::NotFound(task_id))?;
        Ok(task
            .visible_attachments(actor)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Retrieves the bytes of an attachment the actor is allowed to see.
    ///
    /// # Errors
    ///
    /// - [`AttachmentServiceError::NotFound`] when the task does not exist.
    /// - [`AttachmentServiceError::Domain`] when the attachment is missing
    ///   or not visible to the actor at the current status.
    /// - [`AttachmentServiceError::Storage`] when the blob fetch fails.
    pub async fn download(
        &self,
        task_id: TaskId,
        attachment_id: AttachmentId,
        actor: &Actor,
    ) -> AttachmentServiceResult<Vec<u8>> {
        let task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or(AttachmentServiceError::NotFound(task_id))?;

        let attachment =
            task.find_attachment(attachment_id)
                .ok_or(TaskDomainError::AttachmentNotFound {
                    task_id,
                    attachment_id,
                })?;
        if !is_visible(attachment.attachment_type(), actor.role(), task.status()) {
            return Err(TaskDomainError::AttachmentNotVisible {
                attachment_id,
                role: actor.role(),
                status: task.status(),
            }
            .into());
        }

        Ok(self.files.download(attachment.public_id()).await?)
    }
}
