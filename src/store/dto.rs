use serde::{Deserialize, Serialize};

/// Body returned by a POST against a collection.
#[derive(Debug, Deserialize)]
pub struct PostResponse {
    pub name: String,
}

/// Partial update sent when a subtask changes lists. Both lists are always
/// written together.
#[derive(Debug, Serialize)]
pub struct SubtaskListsPatch<'a> {
    #[serde(rename = "subTasksOpen")]
    pub open: &'a [String],
    #[serde(rename = "subTasksClosed")]
    pub closed: &'a [String],
}
