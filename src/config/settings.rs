//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub fcm: Option<FcmConfig>,
    pub google: Option<GoogleConfig>,
    pub moderation: ModerationConfig,
    pub archiver: ArchiverConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub cookie_name: String,
}

/// Firebase Cloud Messaging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FcmConfig {
    pub server_key: String,
    pub api_url: String,
    pub timeout_seconds: u64,
}

/// Google sign-in configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub tokeninfo_url: String,
}

/// Moderation thresholds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModerationConfig {
    pub report_hide_threshold: i32,
    pub penalty_ban_threshold: i64,
}

/// Archiver job configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiverConfig {
    pub enabled: bool,
    pub interval_hours: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("EVENTFLOW").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::EventFlowError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec![],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/eventflow".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_ttl_hours: 24,
                cookie_name: "eventflow_token".to_string(),
            },
            fcm: None,
            google: None,
            moderation: ModerationConfig {
                report_hide_threshold: 5,
                penalty_ban_threshold: 3,
            },
            archiver: ArchiverConfig {
                enabled: true,
                interval_hours: 24,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
        }
    }
}
