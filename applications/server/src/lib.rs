//! Cadence Server Library
//!
//! HTTP service for the Cadence media catalog: authentication, playlist and
//! album management, and image uploads.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, file_storage::FileStorage, ImageStore};
pub use state::AppState;
