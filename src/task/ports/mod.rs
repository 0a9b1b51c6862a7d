//! Port contracts for task lifecycle and attachment management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod file_storage;
pub mod repository;

pub use file_storage::{
    AttachmentLimits, FileStorage, FileStorageError, FileStorageResult, FileUpload, StoredFile,
};
pub use repository::{TaskStore, TaskStoreError, TaskStoreResult};
