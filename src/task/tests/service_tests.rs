//! Service orchestration tests for task creation and transitions.

use std::sync::Arc;

use super::fixtures::{admin, employee, task_in_status};
use crate::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Priority, Task, TaskDomainError, TaskId, TaskStatus, UserId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
    services::{CreateTaskRequest, TaskLifecycleError, TaskLifecycleService, TransitionRequest},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use eyre::ensure;
use mockable::DefaultClock;
use mockall::mock;
use rstest::{fixture, rstest};

type TestService = TaskLifecycleService<InMemoryTaskStore, DefaultClock>;

mock! {
    Store {}

    #[async_trait]
    impl TaskStore for Store {
        async fn store(&self, task: &Task) -> TaskStoreResult<()>;
        async fn update(&self, task: &Task) -> TaskStoreResult<()>;
        async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;
        async fn find_by_assignee(&self, assignee: UserId) -> TaskStoreResult<Vec<Task>>;
    }
}

#[fixture]
fn service() -> TestService {
    TaskLifecycleService::new(Arc::new(InMemoryTaskStore::new()), Arc::new(DefaultClock))
}

fn create_request(assignee: UserId) -> CreateTaskRequest {
    CreateTaskRequest::new(
        "Prepare quarterly report",
        Priority::Medium,
        Utc::now() + Duration::days(7),
    )
    .with_assignees(vec![assignee])
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_persists_and_is_retrievable(service: TestService) {
    let creator = admin();
    let assignee = UserId::new();

    let created = service
        .create_task(create_request(assignee), &creator)
        .await
        .expect("task creation should succeed");
    let fetched = service
        .find_by_id(created.id())
        .await
        .expect("lookup should succeed");

    assert_eq!(fetched, Some(created.clone()));
    assert_eq!(created.status(), TaskStatus::Backlog);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_blank_title(service: TestService) {
    let result = service
        .create_task(
            CreateTaskRequest::new("   ", Priority::Low, Utc::now()),
            &admin(),
        )
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::EmptyTaskTitle))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transition_is_applied_and_persisted(service: TestService) {
    let assignee = employee();
    let created = service
        .create_task(create_request(assignee.uid()), &admin())
        .await
        .expect("task creation should succeed");

    let updated = service
        .request_transition(
            TransitionRequest::new(created.id(), TaskStatus::InProgress),
            &assignee,
        )
        .await
        .expect("transition should succeed");
    assert_eq!(updated.status(), TaskStatus::InProgress);

    let fetched = service
        .find_by_id(created.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched.map(|task| task.status()), Some(TaskStatus::InProgress));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transition_on_unknown_task_reports_not_found(service: TestService) {
    let missing = TaskId::new();
    let result = service
        .request_transition(
            TransitionRequest::new(missing, TaskStatus::InProgress),
            &employee(),
        )
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::NotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_transition_leaves_stored_task_unchanged(service: TestService) {
    let assignee = employee();
    let created = service
        .create_task(create_request(assignee.uid()), &admin())
        .await
        .expect("task creation should succeed");

    let result = service
        .request_transition(
            TransitionRequest::new(created.id(), TaskStatus::Done),
            &admin(),
        )
        .await;
    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidTransition { .. }
        ))
    ));

    let fetched = service
        .find_by_id(created.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, Some(created));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_comment_lands_with_status_in_one_write(service: TestService) {
    let assignee = employee();
    let created = service
        .create_task(create_request(assignee.uid()), &admin())
        .await
        .expect("task creation should succeed");

    service
        .request_transition(
            TransitionRequest::new(created.id(), TaskStatus::InProgress),
            &assignee,
        )
        .await
        .expect("start should succeed");
    service
        .request_transition(
            TransitionRequest::new(created.id(), TaskStatus::Completed)
                .with_comment("finished the draft"),
            &assignee,
        )
        .await
        .expect("submission should succeed");
    service
        .request_transition(
            TransitionRequest::new(created.id(), TaskStatus::Revision)
                .with_comment("needs more detail"),
            &admin(),
        )
        .await
        .expect("revision request should succeed");

    let fetched = service
        .find_by_id(created.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(fetched.status(), TaskStatus::Revision);
    assert_eq!(fetched.employee_comment(), Some("finished the draft"));
    assert_eq!(fetched.review_comment(), Some("needs more detail"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_by_assignee_returns_active_assignments(service: TestService) {
    let assignee = employee();
    let other = UserId::new();
    let created = service
        .create_task(create_request(assignee.uid()), &admin())
        .await
        .expect("first task creation should succeed");
    service
        .create_task(create_request(other), &admin())
        .await
        .expect("second task creation should succeed");

    let found = service
        .find_by_assignee(assignee.uid())
        .await
        .expect("lookup should succeed");

    assert_eq!(found.len(), 1);
    assert!(found.iter().all(|task| task.id() == created.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn persistence_failure_is_transient_and_retryable() -> eyre::Result<()> {
    let assignee = employee();
    let task = task_in_status(TaskStatus::Backlog, assignee.uid())?;
    let task_id = task.id();

    let mut store = MockStore::new();
    store
        .expect_find_by_id()
        .returning(move |_| Ok(Some(task.clone())));
    store
        .expect_update()
        .times(2)
        .returning(|_| Err(TaskStoreError::persistence(std::io::Error::other("outage"))));
    let flaky = TaskLifecycleService::new(Arc::new(store), Arc::new(DefaultClock));

    for _ in 0..2 {
        let result = flaky
            .request_transition(
                TransitionRequest::new(task_id, TaskStatus::InProgress),
                &assignee,
            )
            .await;
        ensure!(
            matches!(
                result,
                Err(TaskLifecycleError::Store(TaskStoreError::Persistence(_)))
            ),
            "write failure should surface as a store error"
        );
    }
    Ok(())
}
