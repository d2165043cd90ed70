use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::board::{BoardView, filter_tasks};
use crate::error::AppError;
use crate::models::{NewTaskRequest, Status, SubtaskList, Task, TaskId, UpdateTaskRequest};
use crate::repository;
use crate::store::DocumentStore;
use crate::validation;

/// Result of a subtask toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The subtask changed lists and the two lists were written.
    Moved,
    /// Task or subtask text not found; nothing was written.
    Missing,
    /// Another toggle was still in flight; this one was dropped.
    Busy,
}

/// Board state shared by every request: the task cache, the task being
/// dragged and the toggle guard.
pub struct BoardSession {
    store: Arc<dyn DocumentStore>,
    tasks: RwLock<Vec<Task>>,
    dragged: Mutex<Option<TaskId>>,
    toggle_guard: Mutex<()>,
}

impl BoardSession {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            tasks: RwLock::new(Vec::new()),
            dragged: Mutex::new(None),
            toggle_guard: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Replaces the cache with the current tasks collection.
    pub async fn load_tasks(&self) -> Result<Vec<Task>, AppError> {
        let tasks: Vec<Task> = repository::fetch_tasks(self.store.as_ref())
            .await?
            .into_iter()
            .map(|keyed| keyed.record)
            .collect();

        *self.tasks.write().await = tasks.clone();
        debug!("Loaded {} tasks into board cache", tasks.len());
        Ok(tasks)
    }

    pub async fn cached_tasks(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Reloads and lays out the board, narrowed to `search` when it is not
    /// blank.
    pub async fn board(&self, search: Option<&str>) -> Result<BoardView, AppError> {
        let tasks = self.load_tasks().await?;
        let visible = match search {
            Some(query) => filter_tasks(&tasks, query),
            None => tasks,
        };
        Ok(BoardView::build(&visible))
    }

    pub async fn start_dragging(&self, id: TaskId) {
        *self.dragged.lock().await = Some(id);
        debug!("Dragging task {}", id);
    }

    pub async fn dragged(&self) -> Option<TaskId> {
        *self.dragged.lock().await
    }

    /// Drops the dragged task onto `status` and writes the whole record back.
    /// The dragged id is kept; the next drag overwrites it.
    pub async fn move_to(&self, status: Status) -> Result<Task, AppError> {
        let Some(id) = self.dragged().await else {
            error!("Drop onto {} without a dragged task", status);
            return Err(AppError::NotFound);
        };

        let task = {
            let mut tasks = self.tasks.write().await;
            let Some(cached) = tasks.iter_mut().find(|task| task.id == id) else {
                error!("Task {} not found in board cache", id);
                return Err(AppError::NotFound);
            };
            cached.status = status;
            cached.clone()
        };

        let Some(stored) = repository::find_task(self.store.as_ref(), id).await? else {
            error!("Task {} not found in store", id);
            return Err(AppError::NotFound);
        };

        repository::overwrite_task(self.store.as_ref(), &stored.key, &task).await?;
        info!("Moved task {} to {}", id, status);

        self.load_tasks().await?;
        Ok(task)
    }

    /// Moves one subtask between lists. Only one toggle runs at a time;
    /// calls arriving meanwhile are dropped rather than queued.
    pub async fn toggle_subtask(
        &self,
        id: TaskId,
        text: &str,
        from: SubtaskList,
        to: SubtaskList,
    ) -> Result<ToggleOutcome, AppError> {
        if from == to {
            return Err(AppError::BadRequest(
                "source and destination lists must differ".to_string(),
            ));
        }

        let outcome = {
            let Ok(_guard) = self.toggle_guard.try_lock() else {
                debug!("Toggle for task {} dropped, another one is in flight", id);
                return Ok(ToggleOutcome::Busy);
            };
            self.move_subtask_between_lists(id, text, from, to).await?
        };

        if outcome == ToggleOutcome::Moved {
            self.load_tasks().await?;
        }
        Ok(outcome)
    }

    async fn move_subtask_between_lists(
        &self,
        id: TaskId,
        text: &str,
        from: SubtaskList,
        to: SubtaskList,
    ) -> Result<ToggleOutcome, AppError> {
        let Some(mut stored) = repository::find_task(self.store.as_ref(), id).await? else {
            debug!("Task {} not in store, toggle skipped", id);
            return Ok(ToggleOutcome::Missing);
        };

        if !stored.record.move_subtask(text, from, to) {
            debug!("Subtask {:?} not in {} of task {}", text, from.field(), id);
            return Ok(ToggleOutcome::Missing);
        }

        repository::patch_subtask_lists(self.store.as_ref(), &stored.key, &stored.record).await?;
        info!(
            "Moved subtask {:?} of task {} from {} to {}",
            text.trim(),
            id,
            from.field(),
            to.field()
        );
        Ok(ToggleOutcome::Moved)
    }

    pub async fn create_task(&self, req: NewTaskRequest) -> Result<Task, AppError> {
        validation::validate_new_task(&req)?;

        let task = Task {
            id: generate_time_based_id(),
            title: req.title,
            description: req.description,
            date: req.date,
            priority: req.priority,
            category: req.category,
            assigned_to: req.assigned_to,
            sub_tasks_open: clean_subtasks(req.sub_tasks_open),
            sub_tasks_closed: Vec::new(),
            status: req.status,
        };

        let key = repository::insert_task(self.store.as_ref(), &task).await?;
        info!("Created task {} ({}) under {}", task.id, task.title, key);

        self.load_tasks().await?;
        Ok(task)
    }

    /// Full overwrite from the edit overlay. Id, category, status and the
    /// closed subtasks come from the stored record.
    pub async fn update_task(&self, id: TaskId, req: UpdateTaskRequest) -> Result<Task, AppError> {
        validation::validate_task_edit(&req)?;

        let stored = repository::find_task(self.store.as_ref(), id)
            .await?
            .ok_or(AppError::NotFound)?;

        let task = Task {
            id: stored.record.id,
            title: req.title,
            description: req.description,
            date: req.date,
            priority: req.priority,
            category: stored.record.category,
            assigned_to: req.assigned_to,
            sub_tasks_open: clean_subtasks(req.sub_tasks_open),
            sub_tasks_closed: stored.record.sub_tasks_closed,
            status: stored.record.status,
        };

        repository::overwrite_task(self.store.as_ref(), &stored.key, &task).await?;
        info!("Updated task {}", id);

        self.load_tasks().await?;
        Ok(task)
    }

    pub async fn delete_task(&self, id: TaskId) -> Result<(), AppError> {
        let stored = repository::find_task(self.store.as_ref(), id)
            .await?
            .ok_or(AppError::NotFound)?;

        repository::delete_task(self.store.as_ref(), &stored.key).await?;
        info!("Deleted task {}", id);

        self.load_tasks().await?;
        Ok(())
    }
}

/// Millisecond timestamp plus up to 999 of jitter. Not guaranteed unique.
pub fn generate_time_based_id() -> TaskId {
    let jitter = (Uuid::new_v4().as_u128() % 1000) as TaskId;
    Utc::now().timestamp_millis() + jitter
}

fn clean_subtasks(subtasks: Vec<String>) -> Vec<String> {
    subtasks
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_based_id_is_close_to_now() {
        let before = Utc::now().timestamp_millis();
        let id = generate_time_based_id();
        let after = Utc::now().timestamp_millis();

        assert!(id >= before);
        assert!(id < after + 1000);
    }

    #[test]
    fn test_clean_subtasks_drops_blank_entries() {
        let cleaned = clean_subtasks(vec![" a ".into(), "".into(), "   ".into(), "b".into()]);
        assert_eq!(cleaned, vec!["a".to_string(), "b".to_string()]);
    }
}
