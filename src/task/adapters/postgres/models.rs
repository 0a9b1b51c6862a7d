//! Diesel row models for task document persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task documents.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Task title.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Priority level.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub priority: String,
    /// Lifecycle status.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Ordered assignee list as a JSON array.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub assigned_to: Value,
    /// Submission note from the assignee.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub employee_comment: Option<String>,
    /// Review note from an admin.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub review_comment: Option<String>,
    /// Attachment records as a JSON array.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub attachments: Value,
    /// Due date for the work.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub deadline: DateTime<Utc>,
    /// Creating user.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub created_by: uuid::Uuid,
    /// Role the creator held at creation time.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub created_by_role: String,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task documents.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Priority level.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Ordered assignee list as a JSON array.
    pub assigned_to: Value,
    /// Submission note from the assignee.
    pub employee_comment: Option<String>,
    /// Review note from an admin.
    pub review_comment: Option<String>,
    /// Attachment records as a JSON array.
    pub attachments: Value,
    /// Due date for the work.
    pub deadline: DateTime<Utc>,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Role the creator held at creation time.
    pub created_by_role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied on document update.
///
/// Creation-time columns are immutable; everything the lifecycle may touch
/// lands in one atomic write.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Priority level.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Ordered assignee list as a JSON array.
    pub assigned_to: Value,
    /// Submission note from the assignee.
    pub employee_comment: Option<Option<String>>,
    /// Review note from an admin.
    pub review_comment: Option<Option<String>>,
    /// Attachment records as a JSON array.
    pub attachments: Value,
    /// Due date for the work.
    pub deadline: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
