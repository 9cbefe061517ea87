//! Message and announcement models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub event_id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub body: String,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub recipient_id: i64,
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}

/// One row of the conversations listing: the counterparty plus the most
/// recent message exchanged with them and how many of theirs are unread.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub counterparty_id: i64,
    pub counterparty_name: String,
    pub last_body: String,
    pub last_at: DateTime<Utc>,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: i64,
    pub event_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}
