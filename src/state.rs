use std::sync::Arc;

use crate::store::BookStore;

/// Shared handler state, owned by the composition root / 共享状态
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}
