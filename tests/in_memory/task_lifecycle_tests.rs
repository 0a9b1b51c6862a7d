//! In-memory integration tests for end-to-end review cycles.

use super::helpers::{TestEnv, admin, create_request, employee, env};
use rstest::rstest;
use teamsync::task::{
    domain::{ApprovalStatus, AttachmentType, TaskDomainError, TaskStatus},
    services::{TaskLifecycleError, TransitionRequest, UploadAttachmentRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_review_cycle_ends_approved(env: TestEnv) {
    let reviewer = admin();
    let assignee = employee();
    let task = env
        .lifecycle
        .create_task(create_request(assignee.uid()), &reviewer)
        .await
        .expect("task creation should succeed");

    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::InProgress),
            &assignee,
        )
        .await
        .expect("start should succeed");
    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::Completed)
                .with_comment("finished the draft"),
            &assignee,
        )
        .await
        .expect("submission should succeed");
    let approved = env
        .lifecycle
        .request_transition(TransitionRequest::new(task.id(), TaskStatus::Done), &reviewer)
        .await
        .expect("approval should succeed");

    assert_eq!(approved.status(), TaskStatus::Done);
    assert_eq!(approved.approval_status(), Some(ApprovalStatus::Approved));
    assert_eq!(approved.employee_comment(), Some("finished the draft"));

    // The task is terminal; nothing moves it again.
    for (target, actor) in [
        (TaskStatus::InProgress, &assignee),
        (TaskStatus::Revision, &reviewer),
        (TaskStatus::Completed, &assignee),
    ] {
        let result = env
            .lifecycle
            .request_transition(TransitionRequest::new(task.id(), target), actor)
            .await;
        assert!(matches!(
            result,
            Err(TaskLifecycleError::Domain(
                TaskDomainError::InvalidTransition { .. }
            ))
        ));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn revision_cycle_returns_work_to_assignee(env: TestEnv) {
    let reviewer = admin();
    let assignee = employee();
    let task = env
        .lifecycle
        .create_task(create_request(assignee.uid()), &reviewer)
        .await
        .expect("task creation should succeed");

    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::InProgress),
            &assignee,
        )
        .await
        .expect("start should succeed");
    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::Completed),
            &assignee,
        )
        .await
        .expect("submission should succeed");

    // The reviewer attaches a feedback file and sends the work back.
    env.attachments
        .upload(
            UploadAttachmentRequest::new(
                task.id(),
                "annotated.pdf",
                AttachmentType::Feedback,
                b"margin notes".to_vec(),
            )
            .with_content_type("application/pdf"),
            &reviewer,
        )
        .await
        .expect("feedback upload should succeed");
    let sent_back = env
        .lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::Revision)
                .with_comment("needs more detail"),
            &reviewer,
        )
        .await
        .expect("revision request should succeed");

    assert_eq!(sent_back.status(), TaskStatus::Revision);
    assert_eq!(sent_back.review_comment(), Some("needs more detail"));
    assert_eq!(sent_back.approval_status(), Some(ApprovalStatus::Rejected));
    let feedback: Vec<_> = sent_back
        .attachments()
        .iter()
        .filter(|attachment| attachment.attachment_type() == AttachmentType::Feedback)
        .collect();
    assert_eq!(feedback.len(), 1);

    let resumed = env
        .lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::InProgress),
            &assignee,
        )
        .await
        .expect("resume should succeed");
    assert_eq!(resumed.status(), TaskStatus::InProgress);
    assert_eq!(resumed.approval_status(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_drag_onto_the_board_is_rejected(env: TestEnv) {
    let reviewer = admin();
    let task = env
        .lifecycle
        .create_task(create_request(employee().uid()), &reviewer)
        .await
        .expect("task creation should succeed");

    let result = env
        .lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::InProgress),
            &reviewer,
        )
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidTransition { .. }
        ))
    ));
    let fetched = env
        .lifecycle
        .find_by_id(task.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched.map(|stored| stored.status()), Some(TaskStatus::Backlog));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employee_cannot_approve_their_own_submission(env: TestEnv) {
    let assignee = employee();
    let task = env
        .lifecycle
        .create_task(create_request(assignee.uid()), &admin())
        .await
        .expect("task creation should succeed");

    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::InProgress),
            &assignee,
        )
        .await
        .expect("start should succeed");
    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::Completed),
            &assignee,
        )
        .await
        .expect("submission should succeed");

    let result = env
        .lifecycle
        .request_transition(TransitionRequest::new(task.id(), TaskStatus::Done), &assignee)
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidTransition { .. }
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employee_self_assigned_work_flows_through_the_board(env: TestEnv) {
    let assignee = employee();
    let task = env
        .lifecycle
        .create_task(create_request(assignee.uid()), &assignee)
        .await
        .expect("self-assigned creation should succeed");

    let started = env
        .lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::InProgress),
            &assignee,
        )
        .await
        .expect("start should succeed");
    assert_eq!(started.status(), TaskStatus::InProgress);

    let mine = env
        .lifecycle
        .find_by_assignee(assignee.uid())
        .await
        .expect("lookup should succeed");
    assert_eq!(mine.len(), 1);
}
