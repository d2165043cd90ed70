use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Status, Task, TaskId};

/// Tasks split into the four board columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusColumns {
    #[serde(rename = "To do")]
    pub to_do: Vec<Task>,
    #[serde(rename = "In progress")]
    pub in_progress: Vec<Task>,
    #[serde(rename = "Await feedback")]
    pub await_feedback: Vec<Task>,
    #[serde(rename = "Done")]
    pub done: Vec<Task>,
}

impl StatusColumns {
    pub fn column(&self, status: Status) -> &[Task] {
        match status {
            Status::ToDo => &self.to_do,
            Status::InProgress => &self.in_progress,
            Status::AwaitFeedback => &self.await_feedback,
            Status::Done => &self.done,
        }
    }

    fn column_mut(&mut self, status: Status) -> &mut Vec<Task> {
        match status {
            Status::ToDo => &mut self.to_do,
            Status::InProgress => &mut self.in_progress,
            Status::AwaitFeedback => &mut self.await_feedback,
            Status::Done => &mut self.done,
        }
    }

    pub fn len(&self) -> usize {
        Status::ALL.iter().map(|status| self.column(*status).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stable partition by status. Every task lands in exactly one column and
/// keeps its relative order.
pub fn partition_by_status(tasks: &[Task]) -> StatusColumns {
    let mut columns = StatusColumns::default();
    for task in tasks {
        columns.column_mut(task.status).push(task.clone());
    }
    columns
}

/// Case-insensitive search over title and description. A blank query keeps
/// everything.
pub fn filter_tasks(tasks: &[Task], query: &str) -> Vec<Task> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return tasks.to_vec();
    }

    tasks
        .iter()
        .filter(|task| {
            task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubtaskProgress {
    pub closed: usize,
    pub total: usize,
    pub percent: u8,
}

/// `None` when the task has no subtasks at all; the card hides its bar then.
pub fn subtask_progress(task: &Task) -> Option<SubtaskProgress> {
    let closed = task.sub_tasks_closed.len();
    let total = task.sub_tasks_open.len() + closed;
    if total == 0 {
        return None;
    }

    let percent = ((closed as f64 / total as f64) * 100.0).round() as u8;
    Some(SubtaskProgress {
        closed,
        total,
        percent,
    })
}

/// Everything the board page needs for one render.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub columns: StatusColumns,
    pub progress: BTreeMap<TaskId, SubtaskProgress>,
}

impl BoardView {
    pub fn build(tasks: &[Task]) -> Self {
        let progress = tasks
            .iter()
            .filter_map(|task| subtask_progress(task).map(|p| (task.id, p)))
            .collect();

        Self {
            columns: partition_by_status(tasks),
            progress,
        }
    }
}
