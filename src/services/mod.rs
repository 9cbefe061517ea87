//! Services module
//!
//! This module contains business logic services

pub mod archiver;
pub mod auth;
pub mod event;
pub mod google;
pub mod lifecycle;
pub mod message;
pub mod moderation;
pub mod push;

// Re-export commonly used services
pub use archiver::ArchiverJob;
pub use auth::{AuthService, Claims};
pub use event::EventService;
pub use google::{GoogleAuthService, GoogleIdentity};
pub use message::MessageService;
pub use moderation::ModerationService;
pub use push::PushService;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub google_service: GoogleAuthService,
    pub event_service: EventService,
    pub message_service: MessageService,
    pub moderation_service: ModerationService,
    pub push_service: PushService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: &DatabaseService, settings: &Settings) -> Result<Self> {
        let push_service = PushService::new(db.notifications.clone(), settings.fcm.clone());
        let auth_service = AuthService::new(
            db.users.clone(),
            db.guests.clone(),
            settings.auth.clone(),
        );
        let google_service = GoogleAuthService::new(settings.google.clone());
        let event_service = EventService::new(
            db.events.clone(),
            db.guests.clone(),
            db.messages.clone(),
            push_service.clone(),
        );
        let message_service = MessageService::new(
            db.messages.clone(),
            db.events.clone(),
            db.users.clone(),
        );
        let moderation_service = ModerationService::new(
            db.moderation.clone(),
            db.events.clone(),
            db.users.clone(),
            push_service.clone(),
            settings.moderation.clone(),
        );

        Ok(Self {
            auth_service,
            google_service,
            event_service,
            message_service,
            moderation_service,
            push_service,
        })
    }

    /// Build the archiver job from settings
    pub fn archiver(&self, db: &DatabaseService, settings: &Settings) -> ArchiverJob {
        let interval =
            std::time::Duration::from_secs(settings.archiver.interval_hours.max(1) * 3600);
        ArchiverJob::new(db.events.clone(), interval)
    }

    /// Health check for all services
    pub async fn health_check(&self, db: &DatabaseService) -> ServiceHealthStatus {
        ServiceHealthStatus {
            database_healthy: db.health_check().await,
            push_enabled: self.push_service.is_enabled(),
            google_enabled: self.google_service.is_enabled(),
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone, serde::Serialize)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    pub push_enabled: bool,
    pub google_enabled: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }
}
