//! Task status, priority, and the role-gated transition table.

use super::{ParsePriorityError, ParseTaskStatusError, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Backlog,
    /// Task is being worked by its assignee.
    InProgress,
    /// Task has been submitted and awaits review.
    Completed,
    /// Review requested changes; the assignee must rework the task.
    Revision,
    /// Review approved the submission.
    Done,
    /// Review rejected the submission.
    Rejected,
    /// Task is blocked on an external dependency.
    ///
    /// Present in the status vocabulary but absent from the transition
    /// table; the lifecycle never moves tasks into or out of it.
    Blocked,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Revision => "revision",
            Self::Done => "done",
            Self::Rejected => "rejected",
            Self::Blocked => "blocked",
        }
    }

    /// Returns `true` when no outgoing transition exists for any role.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Blocked)
    }

    /// Returns `true` when the requested status change is listed in the
    /// transition table for the given role.
    ///
    /// The table is the single source of truth for lifecycle legality;
    /// every status mutation goes through it. Note the role asymmetry on
    /// `backlog`: resuming work is exclusively an employee action, so an
    /// admin-initiated `backlog -> in_progress` is rejected rather than
    /// silently ignored.
    #[must_use]
    pub const fn transition_allowed(self, target: Self, role: Role) -> bool {
        matches!(
            (self, target, role),
            (Self::Backlog, Self::InProgress, Role::Employee)
                | (Self::InProgress, Self::Completed, Role::Employee)
                | (Self::Completed, Self::Done | Self::Revision, Role::Admin)
                | (Self::Revision | Self::Rejected, Self::InProgress, Role::Employee)
        )
    }

    /// Returns `true` when entering `target` requires a review comment.
    #[must_use]
    pub const fn requires_review_comment(target: Self) -> bool {
        matches!(target, Self::Revision)
    }

    /// Returns the derived approval projection for this status.
    ///
    /// A pure read-time projection; it is never stored independently of the
    /// status, so the two cannot diverge. Statuses outside the review flow
    /// have no approval reading.
    #[must_use]
    pub const fn approval_status(self) -> Option<ApprovalStatus> {
        match self {
            Self::Completed => Some(ApprovalStatus::Pending),
            Self::Done => Some(ApprovalStatus::Approved),
            Self::Revision | Self::Rejected => Some(ApprovalStatus::Rejected),
            Self::Backlog | Self::InProgress | Self::Blocked => None,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "revision" => Ok(Self::Revision),
            "done" => Ok(Self::Done),
            "rejected" => Ok(Self::Rejected),
            "blocked" => Ok(Self::Blocked),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived approval reading of a task status for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Submission awaits a review decision.
    Pending,
    /// Submission was approved.
    Approved,
    /// Submission was sent back or rejected.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the canonical display representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority work.
    Low,
    /// Default priority.
    Medium,
    /// Urgent work.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
