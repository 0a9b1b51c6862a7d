//! Domain model for the task review lifecycle.
//!
//! The task domain models role-gated status transitions, attachment
//! classification and permissions, and the derived approval projection while
//! keeping all infrastructure concerns outside of the domain boundary.

mod actor;
mod attachment;
mod error;
mod ids;
mod rules;
mod status;
mod task;

pub use actor::{Actor, Role};
pub use attachment::{Attachment, AttachmentType, NewAttachment};
pub use error::{
    ParseAttachmentTypeError, ParsePriorityError, ParseRoleError, ParseTaskStatusError,
    TaskDomainError,
};
pub use ids::{AttachmentId, FileName, StorageKey, TaskId, TaskTitle, UserId};
pub use rules::{can_delete, can_upload, ensure_can_delete, ensure_can_upload, is_visible};
pub use status::{ApprovalStatus, Priority, TaskStatus};
pub use task::{NewTaskData, PersistedTaskData, Task};
