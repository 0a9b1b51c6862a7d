//! Application services for task lifecycle and attachment orchestration.

mod attachments;
mod lifecycle;

pub use attachments::{
    AttachmentService, AttachmentServiceError, AttachmentServiceResult, UploadAttachmentRequest,
};
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    TransitionRequest,
};
