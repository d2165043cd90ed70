pub mod contact;
pub mod task;
pub mod user;

pub use contact::{Contact, CURRENT_USER_TEMP_ID, NewContactRequest};
pub use task::{
    DropRequest, NewTaskRequest, Priority, Status, SubtaskList, Task, TaskId, ToggleSubtaskRequest,
    UpdateTaskRequest,
};
pub use user::{LoginRequest, LoginResponse, LoginStatus, SignUpRequest, User};
