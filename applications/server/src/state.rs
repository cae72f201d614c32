/// Shared application state
use crate::services::{AuthService, ImageStore};
use cadence_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub image_store: Arc<dyn ImageStore>,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        auth_service: Arc<AuthService>,
        image_store: Arc<dyn ImageStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            db,
            auth_service,
            image_store,
            max_upload_bytes,
        }
    }
}
