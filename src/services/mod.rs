pub mod auth_service;
pub mod board_service;
pub mod contact_service;
pub mod summary_service;

pub use board_service::{BoardSession, ToggleOutcome};
pub use contact_service::ContactCard;
pub use summary_service::Summary;
