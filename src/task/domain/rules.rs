//! Attachment permission rules.
//!
//! Each rule is a pure function over the three permission axes — actor role,
//! attachment type, and current task status — plus, for deletion, the role
//! the file was uploaded under. The predicates return plain booleans; the
//! `ensure_` wrappers convert a denial into a specific domain error for use
//! at the service boundary.

use super::{Actor, Attachment, AttachmentType, Role, TaskDomainError, TaskStatus};

/// Returns `true` when the actor may add a new attachment of the given type
/// at the current task status.
///
/// Context material is an admin concern and only accepted while work has
/// not progressed past the backlog (or has been sent back); result files
/// are employee deliverables accepted during active work and review
/// submission; feedback files are admin review artefacts accepted during
/// the review window.
#[must_use]
pub const fn can_upload(
    attachment_type: AttachmentType,
    actor: &Actor,
    status: TaskStatus,
) -> bool {
    match attachment_type {
        AttachmentType::Context => {
            actor.is_admin()
                && !matches!(
                    status,
                    TaskStatus::InProgress | TaskStatus::Completed | TaskStatus::Done
                )
        }
        AttachmentType::Result => {
            matches!(actor.role(), Role::Employee)
                && matches!(status, TaskStatus::InProgress | TaskStatus::Completed)
        }
        AttachmentType::Feedback => {
            actor.is_admin()
                && matches!(
                    status,
                    TaskStatus::Completed | TaskStatus::Revision | TaskStatus::Rejected
                )
        }
    }
}

/// Returns `true` when the actor may delete the attachment at the current
/// task status.
///
/// Deletion is narrower than upload: each clause requires the deleting role
/// to match the uploading role, and no clause survives task approval — a
/// `done` task's files are immutable. There is no override.
#[must_use]
pub const fn can_delete(attachment: &Attachment, actor: &Actor, status: TaskStatus) -> bool {
    match (attachment.attachment_type(), attachment.uploaded_by_role()) {
        (AttachmentType::Context, Role::Admin) => {
            actor.is_admin() && !matches!(status, TaskStatus::Done)
        }
        (AttachmentType::Result, Role::Employee) => {
            matches!(actor.role(), Role::Employee)
                && matches!(
                    status,
                    TaskStatus::InProgress | TaskStatus::Revision | TaskStatus::Rejected
                )
        }
        (AttachmentType::Feedback, Role::Admin) => {
            actor.is_admin() && matches!(status, TaskStatus::Revision | TaskStatus::Rejected)
        }
        _ => false,
    }
}

/// Returns `true` when attachments of the given type are shown to the role
/// at the current task status.
///
/// Visibility is independent of upload and delete rights: context material
/// is always shown, deliverables surface to admins only once submitted, and
/// feedback surfaces to both roles only once a review decision exists.
#[must_use]
pub const fn is_visible(
    attachment_type: AttachmentType,
    role: Role,
    status: TaskStatus,
) -> bool {
    match attachment_type {
        AttachmentType::Context => true,
        AttachmentType::Result => match role {
            Role::Employee => !matches!(status, TaskStatus::Backlog),
            Role::Admin => matches!(
                status,
                TaskStatus::Completed
                    | TaskStatus::Revision
                    | TaskStatus::Rejected
                    | TaskStatus::Done
            ),
        },
        AttachmentType::Feedback => matches!(
            status,
            TaskStatus::Revision | TaskStatus::Rejected | TaskStatus::Done
        ),
    }
}

/// Validates that the actor may upload an attachment of the given type.
///
/// # Errors
///
/// Returns [`TaskDomainError::UploadNotPermitted`] when the upload matrix
/// denies the combination.
pub const fn ensure_can_upload(
    attachment_type: AttachmentType,
    actor: &Actor,
    status: TaskStatus,
) -> Result<(), TaskDomainError> {
    if can_upload(attachment_type, actor, status) {
        return Ok(());
    }
    Err(TaskDomainError::UploadNotPermitted {
        attachment_type,
        role: actor.role(),
        status,
    })
}

/// Validates that the actor may delete the attachment.
///
/// # Errors
///
/// Returns [`TaskDomainError::DeleteNotPermitted`] when the delete matrix
/// denies the combination.
pub const fn ensure_can_delete(
    attachment: &Attachment,
    actor: &Actor,
    status: TaskStatus,
) -> Result<(), TaskDomainError> {
    if can_delete(attachment, actor, status) {
        return Ok(());
    }
    Err(TaskDomainError::DeleteNotPermitted {
        attachment_id: attachment.id(),
        attachment_type: attachment.attachment_type(),
        role: actor.role(),
        status,
    })
}
