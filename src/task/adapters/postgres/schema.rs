//! Diesel schema for task document persistence.

diesel::table! {
    /// Task documents with embedded assignee and attachment payloads.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Priority level.
        #[max_length = 20]
        priority -> Varchar,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Ordered assignee list.
        assigned_to -> Jsonb,
        /// Submission note from the assignee.
        employee_comment -> Nullable<Text>,
        /// Review note from an admin.
        review_comment -> Nullable<Text>,
        /// Attachment records.
        attachments -> Jsonb,
        /// Due date for the work.
        deadline -> Timestamptz,
        /// Creating user.
        created_by -> Uuid,
        /// Role the creator held at creation time.
        #[max_length = 20]
        created_by_role -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
