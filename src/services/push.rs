//! Push notification service
//!
//! Device token registration and delivery through Firebase Cloud Messaging.
//! Delivery is fire-and-forget: failures are logged per token and never
//! retried by us.

use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::FcmConfig;
use crate::database::repositories::NotificationRepository;
use crate::models::notification::DeviceToken;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct PushService {
    client: reqwest::Client,
    config: Option<FcmConfig>,
    tokens: NotificationRepository,
}

impl PushService {
    pub fn new(tokens: NotificationRepository, config: Option<FcmConfig>) -> Self {
        let timeout = config
            .as_ref()
            .map(|c| Duration::from_secs(c.timeout_seconds))
            .unwrap_or(Duration::from_secs(5));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            config,
            tokens,
        }
    }

    /// Whether FCM delivery is configured
    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Register a device token for a user
    pub async fn subscribe(
        &self,
        user_id: i64,
        token: &str,
        platform: &str,
    ) -> Result<DeviceToken> {
        let device_token = self.tokens.upsert_token(user_id, token, platform).await?;
        info!(user_id = user_id, platform = platform, "Device token registered");
        Ok(device_token)
    }

    /// Remove a device token registration
    pub async fn unsubscribe(&self, user_id: i64, token: &str) -> Result<()> {
        let removed = self.tokens.delete_token(user_id, token).await?;
        info!(user_id = user_id, removed = removed, "Device token unregistered");
        Ok(())
    }

    /// Push a notification to every device of a user.
    ///
    /// A missing FCM configuration or a delivery failure never fails the
    /// triggering request; both are logged and dropped.
    pub async fn notify_user(&self, user_id: i64, title: &str, body: &str) {
        let Some(config) = self.config.as_ref() else {
            debug!(user_id = user_id, "Push disabled, dropping notification");
            return;
        };

        let tokens = match self.tokens.tokens_for_user(user_id).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(user_id = user_id, error = %e, "Failed to load device tokens");
                return;
            }
        };

        for device in tokens {
            let payload = json!({
                "to": device.token,
                "notification": { "title": title, "body": body },
            });

            let result = self
                .client
                .post(&config.api_url)
                .header("Authorization", format!("key={}", config.server_key))
                .json(&payload)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    debug!(user_id = user_id, platform = %device.platform, "Push delivered");
                }
                Ok(response) => {
                    warn!(
                        user_id = user_id,
                        status = %response.status(),
                        "FCM rejected push notification"
                    );
                }
                Err(e) => {
                    warn!(user_id = user_id, error = %e, "Failed to reach FCM");
                }
            }
        }
    }
}
