//! Message and announcement repository implementation

use crate::models::message::{Announcement, Conversation, Message};
use crate::utils::errors::EventFlowError;
use chrono::Utc;
use sqlx::PgPool;

const MESSAGE_COLUMNS: &str =
    "id, event_id, sender_id, recipient_id, body, read_at, created_at";

#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new message
    pub async fn create(
        &self,
        event_id: i64,
        sender_id: i64,
        recipient_id: i64,
        body: &str,
    ) -> Result<Message, EventFlowError> {
        let message = sqlx::query_as::<_, Message>(&format!(
            r#"
            INSERT INTO messages (event_id, sender_id, recipient_id, body, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(sender_id)
        .bind(recipient_id)
        .bind(body)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// Distinct counterparties for a user within an event, newest message
    /// first, with the unread count of messages they sent to the user.
    pub async fn conversations(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Vec<Conversation>, EventFlowError> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT DISTINCT ON (counterparty_id)
                   counterparty_id,
                   u.name AS counterparty_name,
                   m.body AS last_body,
                   m.created_at AS last_at,
                   (SELECT COUNT(*) FROM messages
                    WHERE event_id = $1 AND recipient_id = $2
                      AND sender_id = counterparty_id AND read_at IS NULL) AS unread_count
            FROM (
                SELECT *, CASE WHEN sender_id = $2 THEN recipient_id ELSE sender_id END
                       AS counterparty_id
                FROM messages
                WHERE event_id = $1 AND (sender_id = $2 OR recipient_id = $2)
            ) m
            JOIN users u ON u.id = m.counterparty_id
            ORDER BY counterparty_id, m.created_at DESC
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(conversations)
    }

    /// Full thread between two users within an event, oldest first
    pub async fn thread(
        &self,
        event_id: i64,
        user_id: i64,
        counterparty_id: i64,
    ) -> Result<Vec<Message>, EventFlowError> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE event_id = $1
              AND ((sender_id = $2 AND recipient_id = $3)
                OR (sender_id = $3 AND recipient_id = $2))
            ORDER BY created_at ASC
            "#
        ))
        .bind(event_id)
        .bind(user_id)
        .bind(counterparty_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Mark every message from a sender to a recipient as read
    pub async fn mark_read(
        &self,
        event_id: i64,
        recipient_id: i64,
        sender_id: i64,
    ) -> Result<u64, EventFlowError> {
        let result = sqlx::query(
            "UPDATE messages SET read_at = NOW() \
             WHERE event_id = $1 AND recipient_id = $2 AND sender_id = $3 AND read_at IS NULL",
        )
        .bind(event_id)
        .bind(recipient_id)
        .bind(sender_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Post an announcement to an event
    pub async fn create_announcement(
        &self,
        event_id: i64,
        author_id: i64,
        body: &str,
    ) -> Result<Announcement, EventFlowError> {
        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            INSERT INTO announcements (event_id, author_id, body, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_id, author_id, body, created_at
            "#,
        )
        .bind(event_id)
        .bind(author_id)
        .bind(body)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(announcement)
    }

    /// List announcements of an event, newest first
    pub async fn list_announcements(
        &self,
        event_id: i64,
    ) -> Result<Vec<Announcement>, EventFlowError> {
        let announcements = sqlx::query_as::<_, Announcement>(
            "SELECT id, event_id, author_id, body, created_at FROM announcements \
             WHERE event_id = $1 ORDER BY created_at DESC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(announcements)
    }
}
