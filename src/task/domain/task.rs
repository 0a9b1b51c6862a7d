//! Task aggregate root and the lifecycle transition entry point.

use super::{
    Actor, ApprovalStatus, Attachment, AttachmentId, Priority, Role, TaskDomainError, TaskId,
    TaskStatus, TaskTitle, UserId, ensure_can_delete, ensure_can_upload, is_visible,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Task title.
    pub title: TaskTitle,
    /// Priority level.
    pub priority: Priority,
    /// Ordered assignee list; lifecycle guards consult only the first entry.
    pub assigned_to: Vec<UserId>,
    /// Due date for the work.
    pub deadline: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted assignee list.
    pub assigned_to: Vec<UserId>,
    /// Persisted submission note, if any.
    pub employee_comment: Option<String>,
    /// Persisted review note, if any.
    pub review_comment: Option<String>,
    /// Persisted attachment records.
    pub attachments: Vec<Attachment>,
    /// Persisted deadline.
    pub deadline: DateTime<Utc>,
    /// Persisted creating user.
    pub created_by: UserId,
    /// Persisted creating role.
    pub created_by_role: Role,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root.
///
/// The task document is the only shared mutable resource in the system; all
/// status mutation goes through [`Task::transition_to`] so the transition
/// table remains the single source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    priority: Priority,
    status: TaskStatus,
    assigned_to: Vec<UserId>,
    employee_comment: Option<String>,
    review_comment: Option<String>,
    attachments: Vec<Attachment>,
    deadline: DateTime<Utc>,
    created_by: UserId,
    created_by_role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in `backlog`.
    ///
    /// Admins may assign anyone; employees may only create work assigned to
    /// themselves (the first assignee must be the creating user).
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SelfAssignmentRequired`] when an employee
    /// creates a task whose first assignee is not themselves.
    pub fn create(
        data: NewTaskData,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        if matches!(actor.role(), Role::Employee)
            && data.assigned_to.first() != Some(&actor.uid())
        {
            return Err(TaskDomainError::SelfAssignmentRequired { uid: actor.uid() });
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: data.title,
            priority: data.priority,
            status: TaskStatus::Backlog,
            assigned_to: data.assigned_to,
            employee_comment: None,
            review_comment: None,
            attachments: Vec::new(),
            deadline: data.deadline,
            created_by: actor.uid(),
            created_by_role: actor.role(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            priority: data.priority,
            status: data.status,
            assigned_to: data.assigned_to,
            employee_comment: data.employee_comment,
            review_comment: data.review_comment,
            attachments: data.attachments,
            deadline: data.deadline,
            created_by: data.created_by,
            created_by_role: data.created_by_role,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the priority level.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the task lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the ordered assignee list.
    #[must_use]
    pub fn assigned_to(&self) -> &[UserId] {
        &self.assigned_to
    }

    /// Returns the active assignee, when one exists.
    ///
    /// Only the first entry of the assignee list participates in lifecycle
    /// guards.
    #[must_use]
    pub fn assignee(&self) -> Option<UserId> {
        self.assigned_to.first().copied()
    }

    /// Returns the submission note attached by the assignee, if any.
    #[must_use]
    pub fn employee_comment(&self) -> Option<&str> {
        self.employee_comment.as_deref()
    }

    /// Returns the review note attached by an admin, if any.
    #[must_use]
    pub fn review_comment(&self) -> Option<&str> {
        self.review_comment.as_deref()
    }

    /// Returns all attachment records, regardless of visibility.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the role the creator held at creation time.
    #[must_use]
    pub const fn created_by_role(&self) -> Role {
        self.created_by_role
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the derived approval reading of the current status.
    #[must_use]
    pub const fn approval_status(&self) -> Option<ApprovalStatus> {
        self.status.approval_status()
    }

    /// Applies a requested status change for the given actor.
    ///
    /// Validates the transition against the role-gated table, enforces the
    /// assignee guard on employee actions and the review-comment requirement
    /// on revisions, then applies the change and its comment side effect.
    /// The task is left untouched on any failure.
    ///
    /// # Errors
    ///
    /// - [`TaskDomainError::InvalidTransition`] when the `(from, to, role)`
    ///   triple is not in the transition table.
    /// - [`TaskDomainError::NotAssignee`] when an employee other than the
    ///   first assignee requests an employee-gated transition.
    /// - [`TaskDomainError::MissingReviewComment`] when a revision is
    ///   requested without a non-blank comment.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        actor: &Actor,
        comment: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.transition_allowed(target, actor.role()) {
            return Err(TaskDomainError::InvalidTransition {
                task_id: self.id,
                from: self.status,
                to: target,
                role: actor.role(),
            });
        }
        if matches!(actor.role(), Role::Employee) && self.assignee() != Some(actor.uid()) {
            return Err(TaskDomainError::NotAssignee {
                task_id: self.id,
                uid: actor.uid(),
            });
        }

        let note = normalize_comment(comment);
        if TaskStatus::requires_review_comment(target) && note.is_none() {
            return Err(TaskDomainError::MissingReviewComment { task_id: self.id });
        }

        match target {
            TaskStatus::Completed => self.employee_comment = note,
            TaskStatus::Revision => self.review_comment = note,
            _ => {}
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Appends an attachment after validating the upload matrix.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::UploadNotPermitted`] when the actor may
    /// not upload this attachment type at the current status.
    pub fn add_attachment(
        &mut self,
        attachment: Attachment,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        ensure_can_upload(attachment.attachment_type(), actor, self.status)?;
        self.attachments.push(attachment);
        self.touch(clock);
        Ok(())
    }

    /// Removes an attachment after validating the delete matrix.
    ///
    /// Returns the removed record so the caller can release the stored blob.
    ///
    /// # Errors
    ///
    /// - [`TaskDomainError::AttachmentNotFound`] when no attachment with the
    ///   identifier exists on this task.
    /// - [`TaskDomainError::DeleteNotPermitted`] when the delete matrix
    ///   denies the combination.
    pub fn remove_attachment(
        &mut self,
        attachment_id: AttachmentId,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<Attachment, TaskDomainError> {
        let (position, found) = self
            .attachments
            .iter()
            .enumerate()
            .find(|(_, attachment)| attachment.id() == attachment_id)
            .ok_or(TaskDomainError::AttachmentNotFound {
                task_id: self.id,
                attachment_id,
            })?;
        ensure_can_delete(found, actor, self.status)?;

        let removed = self.attachments.remove(position);
        self.touch(clock);
        Ok(removed)
    }

    /// Returns the attachment with the given identifier, if present.
    #[must_use]
    pub fn find_attachment(&self, attachment_id: AttachmentId) -> Option<&Attachment> {
        self.attachments
            .iter()
            .find(|attachment| attachment.id() == attachment_id)
    }

    /// Returns the attachments shown to the actor at the current status.
    #[must_use]
    pub fn visible_attachments(&self, actor: &Actor) -> Vec<&Attachment> {
        self.attachments
            .iter()
            .filter(|attachment| {
                is_visible(attachment.attachment_type(), actor.role(), self.status)
            })
            .collect()
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Trims a free-text note, mapping blank input to absence.
fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}
