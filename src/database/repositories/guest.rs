//! Guest repository implementation

use crate::models::guest::{CreateGuestRequest, Guest, RsvpStatus};
use crate::utils::errors::EventFlowError;
use chrono::Utc;
use sqlx::PgPool;

const GUEST_COLUMNS: &str =
    "id, event_id, name, email, status, decline_reason, user_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a guest to an event, linking a registered user by email if one exists.
    ///
    /// An email already on the guest list trips the unique constraint, which
    /// is surfaced as an input error rather than a database failure.
    pub async fn create(
        &self,
        event_id: i64,
        request: CreateGuestRequest,
    ) -> Result<Guest, EventFlowError> {
        let guest = sqlx::query_as::<_, Guest>(&format!(
            r#"
            INSERT INTO guests (event_id, name, email, status, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, 'PENDING',
                    (SELECT id FROM users WHERE email = $3), $4, $4)
            RETURNING {GUEST_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(request.name)
        .bind(request.email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_invite_error)?;

        Ok(guest)
    }

    /// Find guest by ID within an event
    pub async fn find_by_id(
        &self,
        event_id: i64,
        guest_id: i64,
    ) -> Result<Option<Guest>, EventFlowError> {
        let guest = sqlx::query_as::<_, Guest>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE id = $1 AND event_id = $2"
        ))
        .bind(guest_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(guest)
    }

    /// Update a guest's RSVP status and decline reason
    pub async fn update_rsvp(
        &self,
        guest_id: i64,
        status: RsvpStatus,
        decline_reason: Option<String>,
    ) -> Result<Guest, EventFlowError> {
        let guest = sqlx::query_as::<_, Guest>(&format!(
            r#"
            UPDATE guests
            SET status = $2, decline_reason = $3, updated_at = $4
            WHERE id = $1
            RETURNING {GUEST_COLUMNS}
            "#
        ))
        .bind(guest_id)
        .bind(status)
        .bind(decline_reason)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(guest)
    }

    /// Remove a guest
    pub async fn delete(&self, guest_id: i64) -> Result<(), EventFlowError> {
        sqlx::query("DELETE FROM guests WHERE id = $1")
            .bind(guest_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove every guest of an event (precedes event deletion)
    pub async fn delete_by_event(&self, event_id: i64) -> Result<u64, EventFlowError> {
        let result = sqlx::query("DELETE FROM guests WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// List guests of an event
    pub async fn list_by_event(&self, event_id: i64) -> Result<Vec<Guest>, EventFlowError> {
        let guests = sqlx::query_as::<_, Guest>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE event_id = $1 ORDER BY created_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(guests)
    }

    /// Count guests of an event with a confirmed (YES) reply
    pub async fn count_confirmed(&self, event_id: i64) -> Result<i64, EventFlowError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM guests WHERE event_id = $1 AND status = 'YES'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Link unclaimed guest rows to a freshly registered user by email match
    pub async fn link_user_by_email(
        &self,
        user_id: i64,
        email: &str,
    ) -> Result<u64, EventFlowError> {
        let result = sqlx::query(
            "UPDATE guests SET user_id = $1, updated_at = NOW() \
             WHERE email = $2 AND user_id IS NULL",
        )
        .bind(user_id)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Translate the guests unique-constraint violation into an input error
fn map_invite_error(e: sqlx::Error) -> EventFlowError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => EventFlowError::InvalidInput(
            "This email is already on the guest list".to_string(),
        ),
        _ => e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::borrow::Cow;
    use std::error::Error as StdError;

    #[derive(Debug)]
    struct DuplicateKey;

    impl std::fmt::Display for DuplicateKey {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl StdError for DuplicateKey {}

    impl sqlx::error::DatabaseError for DuplicateKey {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some("23505".into())
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn test_duplicate_invite_maps_to_invalid_input() {
        let err = map_invite_error(sqlx::Error::Database(Box::new(DuplicateKey)));
        assert_matches!(err, EventFlowError::InvalidInput(_));
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        let err = map_invite_error(sqlx::Error::RowNotFound);
        assert_matches!(err, EventFlowError::Database(_));
    }
}
