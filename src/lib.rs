//! EventFlow
//!
//! A REST backend for community event management. This library provides
//! modular components for event lifecycle handling, guest RSVP tracking,
//! direct messaging between organizers and guests, content moderation,
//! and push notification delivery.

pub mod api;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventFlowError, Result};

// Re-export main components for easy access
pub use api::AppState;
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
