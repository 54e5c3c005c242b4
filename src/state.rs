//! Shared state for the local HTTP surface.

use crate::handler::ItemStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Backend the items routes dispatch against; memory or DynamoDB.
    pub store: Arc<dyn ItemStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        AppState { store }
    }
}
