//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Event lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_state", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum EventState {
    Draft,
    Published,
    Cancelled,
    Completed,
    Archived,
}

impl EventState {
    /// Terminal states freeze the event: only narrow corrections remain legal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EventState::Cancelled | EventState::Completed | EventState::Archived
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::Draft => "DRAFT",
            EventState::Published => "PUBLISHED",
            EventState::Cancelled => "CANCELLED",
            EventState::Completed => "COMPLETED",
            EventState::Archived => "ARCHIVED",
        }
    }
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_visibility", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum EventVisibility {
    Public,
    Private,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub rsvp_deadline: Option<DateTime<Utc>>,
    pub timezone: String,
    pub visibility: EventVisibility,
    pub state: EventState,
    pub capacity: Option<i32>,
    pub allow_waitlist: bool,
    pub show_guest_list: bool,
    pub cancelled_reason: Option<String>,
    pub owner_id: i64,
    pub report_count: i32,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub rsvp_deadline: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    pub visibility: Option<EventVisibility>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    pub allow_waitlist: Option<bool>,
    pub show_guest_list: Option<bool>,
}

/// Partial update body for an event.
///
/// Nullable columns use a double `Option` so an absent field is
/// distinguishable from an explicit `null`: absent keeps the stored value,
/// `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub rsvp_deadline: Option<Option<DateTime<Utc>>>,
    pub timezone: Option<String>,
    pub visibility: Option<EventVisibility>,
    pub state: Option<EventState>,
    #[serde(default, deserialize_with = "double_option")]
    pub capacity: Option<Option<i32>>,
    pub allow_waitlist: Option<bool>,
    pub show_guest_list: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub cancelled_reason: Option<Option<String>>,
}

/// Maps a present-but-possibly-null JSON field to `Some(Option<T>)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Query filters for the event list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    pub state: Option<EventState>,
    pub visibility: Option<EventVisibility>,
    #[serde(default)]
    pub owned: bool,
    #[serde(default)]
    pub upcoming: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(EventState::Cancelled.is_terminal());
        assert!(EventState::Completed.is_terminal());
        assert!(EventState::Archived.is_terminal());
        assert!(!EventState::Draft.is_terminal());
        assert!(!EventState::Published.is_terminal());
    }

    #[test]
    fn test_update_request_null_vs_absent() {
        let body: UpdateEventRequest =
            serde_json::from_str(r#"{"capacity": null, "title": "x"}"#).unwrap();
        assert_eq!(body.capacity, Some(None));
        assert_eq!(body.title.as_deref(), Some("x"));
        assert_eq!(body.description, None);

        let body: UpdateEventRequest = serde_json::from_str(r#"{"capacity": 10}"#).unwrap();
        assert_eq!(body.capacity, Some(Some(10)));
    }

    #[test]
    fn test_state_wire_format() {
        let state: EventState = serde_json::from_str(r#""PUBLISHED""#).unwrap();
        assert_eq!(state, EventState::Published);
        assert_eq!(serde_json::to_string(&EventState::Draft).unwrap(), r#""DRAFT""#);
    }
}
