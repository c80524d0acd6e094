//! Ouvrages library catalog
//!
//! Administration server for a library catalog of books and periodicals,
//! providing a REST JSON API over a document collection.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state around an already opened store
    pub fn new(config: AppConfig, store: Arc<dyn repository::DocumentStore>) -> Self {
        let repository = repository::Repository::new(store);
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
        }
    }
}
