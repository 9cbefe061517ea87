//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{EventFlowError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_moderation_config(&settings.moderation)?;
    validate_logging_config(&settings.logging)?;

    if let Some(ref fcm_config) = settings.fcm {
        validate_fcm_config(fcm_config)?;
    }

    if let Some(ref google_config) = settings.google {
        validate_google_config(google_config)?;
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventFlowError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(EventFlowError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(EventFlowError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate authentication configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.is_empty() {
        return Err(EventFlowError::Config("JWT secret is required".to_string()));
    }

    if config.jwt_secret.len() < 32 {
        return Err(EventFlowError::Config(
            "JWT secret must be at least 32 bytes".to_string(),
        ));
    }

    if config.token_ttl_hours <= 0 {
        return Err(EventFlowError::Config(
            "Token TTL must be greater than 0".to_string(),
        ));
    }

    if config.cookie_name.is_empty() {
        return Err(EventFlowError::Config("Cookie name is required".to_string()));
    }

    Ok(())
}

/// Validate moderation thresholds
fn validate_moderation_config(config: &super::ModerationConfig) -> Result<()> {
    if config.report_hide_threshold <= 0 {
        return Err(EventFlowError::Config(
            "Report hide threshold must be greater than 0".to_string(),
        ));
    }

    if config.penalty_ban_threshold <= 0 {
        return Err(EventFlowError::Config(
            "Penalty ban threshold must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate FCM configuration
fn validate_fcm_config(config: &super::FcmConfig) -> Result<()> {
    if config.server_key.is_empty() {
        return Err(EventFlowError::Config("FCM server key is required".to_string()));
    }

    if config.api_url.is_empty() {
        return Err(EventFlowError::Config("FCM API URL is required".to_string()));
    }

    if config.timeout_seconds == 0 {
        return Err(EventFlowError::Config(
            "FCM timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate Google sign-in configuration
fn validate_google_config(config: &super::GoogleConfig) -> Result<()> {
    if config.client_id.is_empty() {
        return Err(EventFlowError::Config(
            "Google client ID is required".to_string(),
        ));
    }

    if config.tokeninfo_url.is_empty() {
        return Err(EventFlowError::Config(
            "Google tokeninfo URL is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventFlowError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EventFlowError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "short".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_bad_connection_bounds_rejected() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        settings.database.max_connections = 10;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_thresholds_rejected() {
        let mut settings = valid_settings();
        settings.moderation.report_hide_threshold = 0;
        assert!(validate_settings(&settings).is_err());
    }
}
