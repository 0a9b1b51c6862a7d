//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use teamsync::task::{
    adapters::memory::{InMemoryFileStorage, InMemoryTaskStore},
    domain::{Actor, Priority, Role, UserId},
    services::{AttachmentService, CreateTaskRequest, TaskLifecycleService},
};

/// Lifecycle and attachment services wired over one shared store and blob
/// host, mirroring how a server boundary would embed the crate.
pub struct TestEnv {
    /// Task lifecycle service under test.
    pub lifecycle: TaskLifecycleService<InMemoryTaskStore, DefaultClock>,
    /// Attachment service under test.
    pub attachments: AttachmentService<InMemoryTaskStore, InMemoryFileStorage, DefaultClock>,
    /// Handle on the blob host for orphan checks.
    pub files: Arc<InMemoryFileStorage>,
}

/// Provides a fresh environment for each test.
#[fixture]
pub fn env() -> TestEnv {
    let store = Arc::new(InMemoryTaskStore::new());
    let files = Arc::new(InMemoryFileStorage::new());
    let clock = Arc::new(DefaultClock);
    TestEnv {
        lifecycle: TaskLifecycleService::new(Arc::clone(&store), Arc::clone(&clock)),
        attachments: AttachmentService::new(store, Arc::clone(&files), clock),
        files,
    }
}

/// Returns an admin actor with a fresh identity.
#[must_use]
pub fn admin() -> Actor {
    Actor::new(UserId::new(), Role::Admin)
}

/// Returns an employee actor with a fresh identity.
#[must_use]
pub fn employee() -> Actor {
    Actor::new(UserId::new(), Role::Employee)
}

/// Builds a creation request assigning the task to the given user.
#[must_use]
pub fn create_request(assignee: UserId) -> CreateTaskRequest {
    CreateTaskRequest::new(
        "Prepare quarterly report",
        Priority::Medium,
        Utc::now() + Duration::days(7),
    )
    .with_assignees(vec![assignee])
}
