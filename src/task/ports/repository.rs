//! Document-store port for task persistence and lookup.

use crate::task::domain::{Task, TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task document persistence contract.
///
/// Implementations are atomic at the single-document level only; no
/// cross-document transaction is assumed. Services exploit the
/// single-document guarantee by persisting a status change together with its
/// comment and attachment side effects in one [`TaskStore::update`] call.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task document.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskStoreResult<()>;

    /// Persists the full current state of an existing task document in a
    /// single write.
    ///
    /// Last writer wins; no version check is performed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskStoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns all tasks whose active (first) assignee is the given user.
    async fn find_by_assignee(&self, assignee: UserId) -> TaskStoreResult<Vec<Task>>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure. Transient; the request may be re-issued.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
