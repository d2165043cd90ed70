use chrono::{Local, NaiveDate, Timelike};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{Priority, Status, Task};
use crate::repository;
use crate::store::DocumentStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub to_do: usize,
    pub in_progress: usize,
    pub await_feedback: usize,
    pub done: usize,
    pub total: usize,
    pub urgent: usize,
    /// Earliest urgent due date, e.g. "January 5, 2026". Empty when there
    /// is none.
    pub upcoming_deadline: String,
    pub greeting: String,
}

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good Morning",
        12..=17 => "Good Afternoon",
        _ => "Good Evening",
    }
}

pub fn format_deadline(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn summarize(tasks: &[Task], hour: u32) -> Summary {
    let count = |status: Status| tasks.iter().filter(|t| t.status == status).count();

    let urgent: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.priority == Priority::Urgent)
        .collect();

    let upcoming_deadline = urgent
        .iter()
        .filter_map(|t| NaiveDate::parse_from_str(&t.date, "%Y-%m-%d").ok())
        .min()
        .map(format_deadline)
        .unwrap_or_default();

    Summary {
        to_do: count(Status::ToDo),
        in_progress: count(Status::InProgress),
        await_feedback: count(Status::AwaitFeedback),
        done: count(Status::Done),
        total: tasks.len(),
        urgent: urgent.len(),
        upcoming_deadline,
        greeting: greeting(hour).to_string(),
    }
}

pub async fn load_summary(store: &dyn DocumentStore) -> Result<Summary, AppError> {
    let tasks: Vec<Task> = repository::fetch_tasks(store)
        .await?
        .into_iter()
        .map(|keyed| keyed.record)
        .collect();

    Ok(summarize(&tasks, Local::now().hour()))
}
