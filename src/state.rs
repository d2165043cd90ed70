use std::sync::Arc;

use crate::services::BoardSession;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub board: Arc<BoardSession>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let board = Arc::new(BoardSession::new(store.clone()));
        Self { store, board }
    }
}
