//! Event repository implementation

use crate::models::event::{CreateEventRequest, Event, EventListQuery, EventVisibility};
use crate::utils::errors::EventFlowError;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};

const EVENT_COLUMNS: &str = "id, title, description, event_date, end_date, rsvp_deadline, \
     timezone, visibility, state, capacity, allow_waitlist, show_guest_list, cancelled_reason, \
     owner_id, report_count, is_hidden, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event, always in DRAFT state
    pub async fn create(
        &self,
        owner_id: i64,
        request: CreateEventRequest,
    ) -> Result<Event, EventFlowError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, event_date, end_date, rsvp_deadline, timezone,
                                visibility, state, capacity, allow_waitlist, show_guest_list,
                                owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'DRAFT', $8, $9, $10, $11, $12, $12)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.title)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.end_date)
        .bind(request.rsvp_deadline)
        .bind(request.timezone.unwrap_or_else(|| "UTC".to_string()))
        .bind(request.visibility.unwrap_or(EventVisibility::Public))
        .bind(request.capacity)
        .bind(request.allow_waitlist.unwrap_or(false))
        .bind(request.show_guest_list.unwrap_or(true))
        .bind(owner_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, EventFlowError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Persist the full mutable column set of an already-merged event.
    ///
    /// The lifecycle validator produces the final field values, so this is a
    /// single unconditional write rather than a per-field COALESCE update.
    pub async fn save(&self, event: &Event) -> Result<Event, EventFlowError> {
        let saved = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = $2,
                description = $3,
                event_date = $4,
                end_date = $5,
                rsvp_deadline = $6,
                timezone = $7,
                visibility = $8,
                state = $9,
                capacity = $10,
                allow_waitlist = $11,
                show_guest_list = $12,
                cancelled_reason = $13,
                updated_at = $14
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date)
        .bind(event.end_date)
        .bind(event.rsvp_deadline)
        .bind(&event.timezone)
        .bind(event.visibility)
        .bind(event.state)
        .bind(event.capacity)
        .bind(event.allow_waitlist)
        .bind(event.show_guest_list)
        .bind(&event.cancelled_reason)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// Delete event
    pub async fn delete(&self, id: i64) -> Result<(), EventFlowError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List events visible to a viewer, with optional filters and pagination
    pub async fn list(
        &self,
        viewer_id: i64,
        query: &EventListQuery,
    ) -> Result<Vec<Event>, EventFlowError> {
        let mut builder = QueryBuilder::new(format!("SELECT {EVENT_COLUMNS} FROM events WHERE 1=1"));

        if query.owned {
            builder.push(" AND owner_id = ").push_bind(viewer_id);
        } else {
            // Non-owners only see public, non-hidden events.
            builder
                .push(" AND (owner_id = ")
                .push_bind(viewer_id)
                .push(" OR (visibility = 'PUBLIC' AND is_hidden = false))");
        }

        if let Some(state) = query.state {
            builder.push(" AND state = ").push_bind(state);
        }
        if let Some(visibility) = query.visibility {
            builder.push(" AND visibility = ").push_bind(visibility);
        }
        if query.upcoming {
            builder.push(" AND event_date > NOW()");
        }

        builder
            .push(" ORDER BY event_date ASC LIMIT ")
            .push_bind(query.limit.unwrap_or(50).min(100))
            .push(" OFFSET ")
            .push_bind(query.offset.unwrap_or(0).max(0));

        let events = builder.build_query_as::<Event>().fetch_all(&self.pool).await?;

        Ok(events)
    }

    /// Bulk-complete published events whose date has passed the cutoff.
    ///
    /// One batched write, no per-row validation; failed runs are retried by
    /// the next scheduled sweep since matching rows stay PUBLISHED.
    pub async fn complete_overdue(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, EventFlowError> {
        let result = sqlx::query(
            "UPDATE events SET state = 'COMPLETED', updated_at = NOW() \
             WHERE state = 'PUBLISHED' AND event_date < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Increment the denormalized report counter, returning the new value
    pub async fn increment_report_count(&self, id: i64) -> Result<i32, EventFlowError> {
        let (count,): (i32,) = sqlx::query_as(
            "UPDATE events SET report_count = report_count + 1 WHERE id = $1 RETURNING report_count",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Decrement the denormalized report counter, returning the new value
    pub async fn decrement_report_count(&self, id: i64) -> Result<i32, EventFlowError> {
        let (count,): (i32,) = sqlx::query_as(
            "UPDATE events SET report_count = GREATEST(report_count - 1, 0) \
             WHERE id = $1 RETURNING report_count",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Set the moderation hidden flag
    pub async fn set_hidden(&self, id: i64, hidden: bool) -> Result<(), EventFlowError> {
        sqlx::query("UPDATE events SET is_hidden = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(hidden)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

}
