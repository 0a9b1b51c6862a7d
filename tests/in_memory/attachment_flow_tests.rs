//! In-memory integration tests for attachment flows across the lifecycle.

use super::helpers::{TestEnv, admin, create_request, employee, env};
use rstest::rstest;
use teamsync::task::{
    domain::{AttachmentType, TaskDomainError, TaskStatus},
    services::{AttachmentServiceError, TransitionRequest, UploadAttachmentRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn context_material_is_added_before_work_and_always_shown(env: TestEnv) {
    let reviewer = admin();
    let assignee = employee();
    let task = env
        .lifecycle
        .create_task(create_request(assignee.uid()), &reviewer)
        .await
        .expect("task creation should succeed");

    env.attachments
        .upload(
            UploadAttachmentRequest::new(
                task.id(),
                "briefing.md",
                AttachmentType::Context,
                b"# Goals".to_vec(),
            )
            .with_content_type("text/markdown"),
            &reviewer,
        )
        .await
        .expect("context upload should succeed");

    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::InProgress),
            &assignee,
        )
        .await
        .expect("start should succeed");

    // Once work is underway further context is locked out.
    let late_context = env
        .attachments
        .upload(
            UploadAttachmentRequest::new(
                task.id(),
                "late.md",
                AttachmentType::Context,
                b"addendum".to_vec(),
            ),
            &reviewer,
        )
        .await;
    assert!(matches!(
        late_context,
        Err(AttachmentServiceError::Domain(
            TaskDomainError::UploadNotPermitted { .. }
        ))
    ));

    // The original briefing stays visible to both roles.
    for actor in [&reviewer, &assignee] {
        let view = env
            .attachments
            .visible_attachments(task.id(), actor)
            .await
            .expect("visibility lookup should succeed");
        assert_eq!(view.len(), 1);
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deliverable_surfaces_to_the_reviewer_at_submission(env: TestEnv) {
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

    env.attachments
        .upload(
            UploadAttachmentRequest::new(
                task.id(),
                "report.pdf",
                AttachmentType::Result,
                b"final draft".to_vec(),
            )
            .with_content_type("application/pdf"),
            &assignee,
        )
        .await
        .expect("deliverable upload should succeed");

    let hidden = env
        .attachments
        .visible_attachments(task.id(), &reviewer)
        .await
        .expect("visibility lookup should succeed");
    assert!(hidden.is_empty(), "deliverable hidden until submission");

    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::Completed),
            &assignee,
        )
        .await
        .expect("submission should succeed");

    let shown = env
        .attachments
        .visible_attachments(task.id(), &reviewer)
        .await
        .expect("visibility lookup should succeed");
    assert_eq!(shown.len(), 1);
    let downloaded = env
        .attachments
        .download(
            task.id(),
            shown.first().map(|attachment| attachment.id()).expect("record"),
            &reviewer,
        )
        .await
        .expect("download should succeed");
    assert_eq!(downloaded, b"final draft".to_vec());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_reworks_deliverable_during_revision(env: TestEnv) {
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
    let with_deliverable = env
        .attachments
        .upload(
            UploadAttachmentRequest::new(
                task.id(),
                "report.pdf",
                AttachmentType::Result,
                b"first attempt".to_vec(),
            ),
            &assignee,
        )
        .await
        .expect("deliverable upload should succeed");
    let deliverable_id = with_deliverable
        .attachments()
        .first()
        .map(teamsync::task::domain::Attachment::id)
        .expect("record");

    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::Completed),
            &assignee,
        )
        .await
        .expect("submission should succeed");

    // Locked while the review is pending.
    let locked = env
        .attachments
        .delete(task.id(), deliverable_id, &assignee)
        .await;
    assert!(matches!(
        locked,
        Err(AttachmentServiceError::Domain(
            TaskDomainError::DeleteNotPermitted { .. }
        ))
    ));

    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::Revision).with_comment("redo section 2"),
            &reviewer,
        )
        .await
        .expect("revision request should succeed");

    // Unlocked once the work is back with the assignee.
    let after_delete = env
        .attachments
        .delete(task.id(), deliverable_id, &assignee)
        .await
        .expect("delete should succeed during revision");
    assert!(after_delete.attachments().is_empty());
    assert_eq!(env.files.blob_count().expect("blob count"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn feedback_is_hidden_until_a_review_decision_exists(env: TestEnv) {
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

    env.attachments
        .upload(
            UploadAttachmentRequest::new(
                task.id(),
                "annotated.pdf",
                AttachmentType::Feedback,
                b"margin notes".to_vec(),
            ),
            &reviewer,
        )
        .await
        .expect("feedback upload should succeed");

    // Pending review: the assignee does not see the feedback yet.
    let pending_view = env
        .attachments
        .visible_attachments(task.id(), &assignee)
        .await
        .expect("visibility lookup should succeed");
    assert!(
        pending_view
            .iter()
            .all(|attachment| attachment.attachment_type() != AttachmentType::Feedback)
    );

    env.lifecycle
        .request_transition(
            TransitionRequest::new(task.id(), TaskStatus::Revision).with_comment("see notes"),
            &reviewer,
        )
        .await
        .expect("revision request should succeed");

    let revision_view = env
        .attachments
        .visible_attachments(task.id(), &assignee)
        .await
        .expect("visibility lookup should succeed");
    assert!(
        revision_view
            .iter()
            .any(|attachment| attachment.attachment_type() == AttachmentType::Feedback)
    );
}
