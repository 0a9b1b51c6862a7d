//! `PostgreSQL` store implementation for task documents.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        Attachment, PersistedTaskData, Priority, Role, Task, TaskId, TaskStatus, TaskTitle, UserId,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn store(&self, task: &Task) -> TaskStoreResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskStoreError::DuplicateTask(task_id)
                    }
                    _ => TaskStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskStoreResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&changeset)
                .execute(connection)
                .map_err(TaskStoreError::persistence)?;
            if affected == 0 {
                return Err(TaskStoreError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_assignee(&self, assignee: UserId) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = find_rows_by_assignee(connection, assignee)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskStoreResult<NewTaskRow> {
    let assigned_to = serde_json::to_value(task.assigned_to()).map_err(TaskStoreError::persistence)?;
    let attachments = serde_json::to_value(task.attachments()).map_err(TaskStoreError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        assigned_to,
        employee_comment: task.employee_comment().map(str::to_owned),
        review_comment: task.review_comment().map(str::to_owned),
        attachments,
        deadline: task.deadline(),
        created_by: task.created_by().into_inner(),
        created_by_role: task.created_by_role().as_str().to_owned(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> TaskStoreResult<TaskChangeset> {
    let assigned_to = serde_json::to_value(task.assigned_to()).map_err(TaskStoreError::persistence)?;
    let attachments = serde_json::to_value(task.attachments()).map_err(TaskStoreError::persistence)?;

    Ok(TaskChangeset {
        title: task.title().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        assigned_to,
        employee_comment: Some(task.employee_comment().map(str::to_owned)),
        review_comment: Some(task.review_comment().map(str::to_owned)),
        attachments,
        deadline: task.deadline(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        title: persisted_title,
        priority: persisted_priority,
        status: persisted_status,
        assigned_to: persisted_assignees,
        employee_comment,
        review_comment,
        attachments: persisted_attachments,
        deadline,
        created_by,
        created_by_role: persisted_role,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskStoreError::persistence)?;
    let priority =
        Priority::try_from(persisted_priority.as_str()).map_err(TaskStoreError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskStoreError::persistence)?;
    let created_by_role =
        Role::try_from(persisted_role.as_str()).map_err(TaskStoreError::persistence)?;
    let assigned_to = serde_json::from_value::<Vec<UserId>>(persisted_assignees)
        .map_err(TaskStoreError::persistence)?;
    let attachments = serde_json::from_value::<Vec<Attachment>>(persisted_attachments)
        .map_err(TaskStoreError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        priority,
        status,
        assigned_to,
        employee_comment,
        review_comment,
        attachments,
        deadline,
        created_by: UserId::from_uuid(created_by),
        created_by_role,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn find_rows_by_assignee(
    connection: &mut PgConnection,
    assignee: UserId,
) -> TaskStoreResult<Vec<TaskRow>> {
    // Lifecycle guards only consult the first assignee, so the lookup
    // matches on element zero of the JSONB array.
    let query = diesel::sql_query(concat!(
        "SELECT id, title, priority, status, assigned_to, employee_comment, review_comment, ",
        "attachments, deadline, created_by, created_by_role, created_at, updated_at ",
        "FROM tasks WHERE assigned_to->>0 = $1 ",
        "ORDER BY created_at",
    ))
    .bind::<diesel::sql_types::Text, _>(assignee.into_inner().to_string());

    query
        .get_results::<TaskRow>(connection)
        .map_err(TaskStoreError::persistence)
}
