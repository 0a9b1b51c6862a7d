//! Service layer for task creation and status transitions.

use crate::task::{
    domain::{
        Actor, NewTaskData, Priority, Task, TaskDomainError, TaskId, TaskStatus, TaskTitle, UserId,
    },
    ports::{TaskStore, TaskStoreError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    priority: Priority,
    assigned_to: Vec<UserId>,
    deadline: DateTime<Utc>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, priority: Priority, deadline: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            priority,
            assigned_to: Vec::new(),
            deadline,
        }
    }

    /// Sets the ordered assignee list.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = UserId>) -> Self {
        self.assigned_to = assignees.into_iter().collect();
        self
    }
}

/// Request payload for a status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    task_id: TaskId,
    target: TaskStatus,
    comment: Option<String>,
}

impl TransitionRequest {
    /// Creates a transition request without a comment.
    #[must_use]
    pub const fn new(task_id: TaskId, target: TaskStatus) -> Self {
        Self {
            task_id,
            target,
            comment: None,
        }
    }

    /// Attaches a free-text comment (submission note or review comment).
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed; nothing was written.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// No task exists for the requested identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// The sole write path for task status: every status change is validated by
/// the domain transition table and persisted as one atomic document update,
/// so a reader never observes a status without its comment side effect.
#[derive(Clone)]
pub struct TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a task in `backlog` on behalf of the actor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when input validation fails or the
    /// store rejects persistence.
    pub async fn create_task(
        &self,
        request: CreateTaskRequest,
        actor: &Actor,
    ) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let data = NewTaskData {
            title,
            priority: request.priority,
            assigned_to: request.assigned_to,
            deadline: request.deadline,
        };

        let task = Task::create(data, actor, &*self.clock)?;
        self.store.store(&task).await?;
        tracing::info!(task_id = %task.id(), actor = %actor, "task created");
        Ok(task)
    }

    /// Applies a requested status transition and persists the result.
    ///
    /// The document's prior state is untouched when validation or
    /// persistence fails; a persistence failure is transient and the same
    /// request may be re-issued.
    ///
    /// # Errors
    ///
    /// - [`TaskLifecycleError::NotFound`] when the task does not exist.
    /// - [`TaskLifecycleError::Domain`] when the transition table, assignee
    ///   guard, or review-comment requirement rejects the request.
    /// - [`TaskLifecycleError::Store`] when the document write fails.
    pub async fn request_transition(
        &self,
        request: TransitionRequest,
        actor: &Actor,
    ) -> TaskLifecycleResult<Task> {
        let task = self
            .store
            .find_by_id(request.task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(request.task_id))?;

        let previous = task.status();
        let mut updated = task;
        if let Err(err) =
            updated.transition_to(request.target, actor, request.comment, &*self.clock)
        {
            tracing::debug!(
                task_id = %request.task_id,
                from = %previous,
                to = %request.target,
                actor = %actor,
                error = %err,
                "transition rejected"
            );
            return Err(err.into());
        }

        self.store.update(&updated).await?;
        tracing::info!(
            task_id = %updated.id(),
            from = %previous,
            to = %updated.status(),
            actor = %actor,
            "task transition applied"
        );
        Ok(updated)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when no task exists for the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn find_by_id(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Returns all tasks actively assigned to the given user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn find_by_assignee(&self, assignee: UserId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.store.find_by_assignee(assignee).await?)
    }
}
