//! Push notification device token model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub platform: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(length(min = 1, max = 4096))]
    pub token: String,
    #[validate(length(min = 1, max = 32))]
    pub platform: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UnsubscribeRequest {
    #[validate(length(min = 1, max = 4096))]
    pub token: String,
}
