//! Error types for task domain validation and parsing.

use super::{AttachmentId, AttachmentType, Role, TaskId, TaskStatus, UserId};
use thiserror::Error;

/// Errors returned while validating task lifecycle and attachment operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The requested status change is not in the transition table for the
    /// actor's role.
    #[error("invalid transition for {role}: {from} -> {to} on task {task_id}")]
    InvalidTransition {
        /// Task the transition was requested on.
        task_id: TaskId,
        /// Status the task currently holds.
        from: TaskStatus,
        /// Requested target status.
        to: TaskStatus,
        /// Role of the requesting actor.
        role: Role,
    },

    /// A revision was requested without a review comment.
    #[error("transition to revision on task {task_id} requires a review comment")]
    MissingReviewComment {
        /// Task the revision was requested on.
        task_id: TaskId,
    },

    /// An employee action was attempted by someone other than the assignee.
    #[error("user {uid} is not the assignee of task {task_id}")]
    NotAssignee {
        /// Task the action was attempted on.
        task_id: TaskId,
        /// Acting user.
        uid: UserId,
    },

    /// An employee created a task not assigned to themselves.
    #[error("employee {uid} may only create tasks assigned to themselves")]
    SelfAssignmentRequired {
        /// Acting user.
        uid: UserId,
    },

    /// The upload matrix denies this attachment type for the role and status.
    #[error("{role} may not upload {attachment_type} attachments while task is {status}")]
    UploadNotPermitted {
        /// Classification of the rejected upload.
        attachment_type: AttachmentType,
        /// Role of the requesting actor.
        role: Role,
        /// Status the task currently holds.
        status: TaskStatus,
    },

    /// The delete matrix denies removing this attachment for the role and
    /// status.
    #[error("{role} may not delete {attachment_type} attachment {attachment_id} while task is {status}")]
    DeleteNotPermitted {
        /// Identifier of the attachment.
        attachment_id: AttachmentId,
        /// Classification of the attachment.
        attachment_type: AttachmentType,
        /// Role of the requesting actor.
        role: Role,
        /// Status the task currently holds.
        status: TaskStatus,
    },

    /// The attachment is not shown to the role at the current status.
    #[error("attachment {attachment_id} is not visible to {role} while task is {status}")]
    AttachmentNotVisible {
        /// Identifier of the attachment.
        attachment_id: AttachmentId,
        /// Role of the requesting actor.
        role: Role,
        /// Status the task currently holds.
        status: TaskStatus,
    },

    /// No attachment with the given identifier exists on the task.
    #[error("attachment {attachment_id} not found on task {task_id}")]
    AttachmentNotFound {
        /// Task the lookup ran against.
        task_id: TaskId,
        /// Requested attachment identifier.
        attachment_id: AttachmentId,
    },

    /// The uploaded file exceeds the configured size limit.
    #[error("file of {actual_bytes} bytes exceeds the {limit_bytes} byte limit")]
    FileTooLarge {
        /// Size of the rejected file.
        actual_bytes: u64,
        /// Configured maximum.
        limit_bytes: u64,
    },

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The attachment file name is empty after trimming.
    #[error("file name must not be empty")]
    EmptyFileName,

    /// The external storage reference is empty after trimming.
    #[error("storage key must not be empty")]
    EmptyStorageKey,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing attachment types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown attachment type: {0}")]
pub struct ParseAttachmentTypeError(pub String);

/// Error returned while parsing priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);
