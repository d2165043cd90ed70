pub mod api;
pub mod board;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
