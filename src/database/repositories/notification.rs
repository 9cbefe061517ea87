//! Device token repository implementation

use crate::models::notification::DeviceToken;
use crate::utils::errors::EventFlowError;
use chrono::Utc;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a device token, idempotent per (user, token)
    pub async fn upsert_token(
        &self,
        user_id: i64,
        token: &str,
        platform: &str,
    ) -> Result<DeviceToken, EventFlowError> {
        let device_token = sqlx::query_as::<_, DeviceToken>(
            r#"
            INSERT INTO device_tokens (user_id, token, platform, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, token) DO UPDATE SET platform = EXCLUDED.platform
            RETURNING id, user_id, token, platform, created_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(platform)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(device_token)
    }

    /// Drop a device token registration
    pub async fn delete_token(&self, user_id: i64, token: &str) -> Result<u64, EventFlowError> {
        let result = sqlx::query("DELETE FROM device_tokens WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// All registered tokens for a user
    pub async fn tokens_for_user(&self, user_id: i64) -> Result<Vec<DeviceToken>, EventFlowError> {
        let tokens = sqlx::query_as::<_, DeviceToken>(
            "SELECT id, user_id, token, platform, created_at FROM device_tokens \
             WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens)
    }
}
