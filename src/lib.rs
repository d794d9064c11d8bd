pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use crate::services::posting_service::PostingService;
use crate::store::PostingStore;

#[derive(Clone)]
pub struct AppState {
    pub posting_service: PostingService,
}

impl AppState {
    pub fn new(store: Arc<dyn PostingStore>, store_timeout: Duration) -> Self {
        Self {
            posting_service: PostingService::new(store, store_timeout),
        }
    }
}
