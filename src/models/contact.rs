use serde::{Deserialize, Serialize};

/// Id given to the logged-in user when they are not in the contact list yet.
pub const CURRENT_USER_TEMP_ID: &str = "currentUser_temp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, rename = "isTemporary", skip_serializing_if = "std::ops::Not::not")]
    pub is_temporary: bool,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
}
