use std::fmt;

use serde::{Deserialize, Serialize};

pub type TaskId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "To do")]
    ToDo,
    #[serde(rename = "In progress")]
    InProgress,
    #[serde(rename = "Await feedback")]
    AwaitFeedback,
    #[serde(rename = "Done")]
    Done,
}

impl Status {
    /// Column order on the board.
    pub const ALL: [Status; 4] = [
        Status::ToDo,
        Status::InProgress,
        Status::AwaitFeedback,
        Status::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::ToDo => "To do",
            Status::InProgress => "In progress",
            Status::AwaitFeedback => "Await feedback",
            Status::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    Medium,
    Low,
    /// The add-task form stores an empty string when no priority was picked.
    #[default]
    #[serde(rename = "")]
    Unset,
}

/// Which of a task's two subtask lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtaskList {
    Open,
    Closed,
}

impl SubtaskList {
    /// Field name of the list in the stored record.
    pub fn field(&self) -> &'static str {
        match self {
            SubtaskList::Open => "subTasksOpen",
            SubtaskList::Closed => "subTasksClosed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub sub_tasks_open: Vec<String>,
    #[serde(default)]
    pub sub_tasks_closed: Vec<String>,
    #[serde(default)]
    pub status: Status,
}

impl Task {
    pub fn subtasks(&self, list: SubtaskList) -> &Vec<String> {
        match list {
            SubtaskList::Open => &self.sub_tasks_open,
            SubtaskList::Closed => &self.sub_tasks_closed,
        }
    }

    pub fn subtasks_mut(&mut self, list: SubtaskList) -> &mut Vec<String> {
        match list {
            SubtaskList::Open => &mut self.sub_tasks_open,
            SubtaskList::Closed => &mut self.sub_tasks_closed,
        }
    }

    /// Moves the first subtask in `from` whose trimmed text equals `text`
    /// to the end of `to`. Returns false and leaves the task untouched when
    /// no entry matches.
    pub fn move_subtask(&mut self, text: &str, from: SubtaskList, to: SubtaskList) -> bool {
        let wanted = text.trim();
        let Some(index) = self
            .subtasks(from)
            .iter()
            .position(|entry| entry.trim() == wanted)
        else {
            return false;
        };

        let moved = self.subtasks_mut(from).remove(index);
        self.subtasks_mut(to).push(moved);
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub priority: Priority,
    pub category: String,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub sub_tasks_open: Vec<String>,
    #[serde(default)]
    pub status: Status,
}

/// Fields the edit overlay owns. Everything else is carried over from the
/// stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub sub_tasks_open: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleSubtaskRequest {
    pub text: String,
    pub from: SubtaskList,
    pub to: SubtaskList,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DropRequest {
    pub status: Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task_with(open: &[&str], closed: &[&str]) -> Task {
        Task {
            id: 1,
            title: "Ship release".to_string(),
            description: String::new(),
            date: "2026-01-10".to_string(),
            priority: Priority::Medium,
            category: "Technical Task".to_string(),
            assigned_to: Vec::new(),
            sub_tasks_open: open.iter().map(|s| s.to_string()).collect(),
            sub_tasks_closed: closed.iter().map(|s| s.to_string()).collect(),
            status: Status::ToDo,
        }
    }

    #[test]
    fn test_move_subtask_open_to_closed() {
        let mut task = task_with(&["a", "b"], &[]);

        assert!(task.move_subtask("a", SubtaskList::Open, SubtaskList::Closed));
        assert_eq!(task.sub_tasks_open, vec!["b".to_string()]);
        assert_eq!(task.sub_tasks_closed, vec!["a".to_string()]);
    }

    #[test]
    fn test_move_subtask_missing_text_leaves_task_unchanged() {
        let mut task = task_with(&["a"], &["b"]);
        let before = task.clone();

        assert!(!task.move_subtask("c", SubtaskList::Open, SubtaskList::Closed));
        assert_eq!(task, before);
    }

    #[test]
    fn test_move_subtask_matches_trimmed_text_and_first_duplicate() {
        let mut task = task_with(&[" a ", "x", "a"], &["done"]);

        assert!(task.move_subtask("a", SubtaskList::Open, SubtaskList::Closed));
        assert_eq!(task.sub_tasks_open, vec!["x".to_string(), "a".to_string()]);
        assert_eq!(task.sub_tasks_closed, vec!["done".to_string(), " a ".to_string()]);
        assert_eq!(task.sub_tasks_open.len() + task.sub_tasks_closed.len(), 4);
    }

    #[test]
    fn test_task_deserializes_sparse_store_record() {
        let json = serde_json::json!({
            "id": 1718000000123i64,
            "title": "Write docs",
            "description": "",
            "date": "2026-02-01",
            "priority": "",
            "category": "User Story",
            "status": "Await feedback"
        });

        let task: Task = serde_json::from_value(json).expect("task should parse");
        assert_eq!(task.priority, Priority::Unset);
        assert_eq!(task.status, Status::AwaitFeedback);
        assert!(task.assigned_to.is_empty());
        assert!(task.sub_tasks_open.is_empty());
        assert!(task.sub_tasks_closed.is_empty());
    }

    #[test]
    fn test_task_serializes_store_field_names() {
        let task = task_with(&["a"], &[]);
        let value = serde_json::to_value(&task).expect("task should serialize");

        assert_eq!(value["status"], "To do");
        assert_eq!(value["priority"], "medium");
        assert_eq!(value["subTasksOpen"], serde_json::json!(["a"]));
        assert!(value.get("assignedTo").is_some());
    }
}
