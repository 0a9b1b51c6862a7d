//! In-memory task store for lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId, UserId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    assignee_index: HashMap<UserId, Vec<TaskId>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn index_assignee(state: &mut InMemoryTaskState, task: &Task) {
    if let Some(assignee) = task.assignee() {
        state
            .assignee_index
            .entry(assignee)
            .or_default()
            .push(task.id());
    }
}

/// Removes a task ID from the assignee index, cleaning up the entry if empty.
fn remove_from_index(index: &mut HashMap<UserId, Vec<TaskId>>, task_id: TaskId, key: UserId) {
    if let Some(ids) = index.get_mut(&key) {
        ids.retain(|id| *id != task_id);
        if ids.is_empty() {
            index.remove(&key);
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn store(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id()));
        }

        index_assignee(&mut state, task);
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;

        let old_task = state
            .tasks
            .get(&task.id())
            .ok_or(TaskStoreError::NotFound(task.id()))?
            .clone();

        // Re-index only when the active assignee actually changed.
        if old_task.assignee() != task.assignee() {
            if let Some(old_assignee) = old_task.assignee() {
                remove_from_index(&mut state.assignee_index, task.id(), old_assignee);
            }
            index_assignee(&mut state, task);
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_assignee(&self, assignee: UserId) -> TaskStoreResult<Vec<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        let tasks = state
            .assignee_index
            .get(&assignee)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(tasks)
    }
}
