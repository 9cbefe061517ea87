//! Event lifecycle validation
//!
//! Stateless guard over event updates: given the stored event, the current
//! confirmed-guest count and a proposed partial change, either reject the
//! change or produce the fully merged record to persist. Transitions are
//! evaluated fresh from current + proposed on every call; no state machine
//! object lives outside the stored `state` column.
//!
//! The archiver's system-initiated transition is declared here too, so the
//! user path and the scheduled sweep are governed by one rule set. Guest
//! RSVP changes run through the same kind of guard: `apply_rsvp` resolves
//! the final reply from the stored guest row and the proposed change.

use crate::models::event::{Event, EventState, UpdateEventRequest};
use crate::models::guest::{Guest, RsvpStatus, UpdateGuestRequest};
use crate::utils::errors::{EventFlowError, Result};
use chrono::{DateTime, Utc};

/// The one transition the system performs on its own: stale published
/// events are demoted to completed by the archiver sweep.
pub fn auto_completion_transition() -> (EventState, EventState) {
    (EventState::Published, EventState::Completed)
}

/// Validate a proposed update against the stored event and merge it.
///
/// `confirmed_count` is the number of guests with a YES reply at the time of
/// the request. Ownership is the caller's precondition; this function only
/// decides legality and computes the final field values. Exactly one write
/// should follow an `Ok` result.
pub fn apply_update(
    existing: &Event,
    confirmed_count: i64,
    request: &UpdateEventRequest,
    now: DateTime<Utc>,
) -> Result<Event> {
    // Frozen events still need minor corrections: everything except the
    // description and the guest-list visibility flag is silently dropped.
    if existing.state.is_terminal() {
        let mut merged = existing.clone();
        if let Some(description) = &request.description {
            merged.description = description.clone();
        }
        if let Some(show_guest_list) = request.show_guest_list {
            merged.show_guest_list = show_guest_list;
        }
        return Ok(merged);
    }

    let next_state = request.state.unwrap_or(existing.state);
    let next_date = request.event_date.unwrap_or(existing.event_date);

    if next_state == EventState::Published && next_date <= now {
        return Err(EventFlowError::InvalidInput(
            "Event date must be in the future to publish".to_string(),
        ));
    }

    if existing.state == EventState::Draft && request.state == Some(EventState::Cancelled) {
        return Err(EventFlowError::InvalidStateTransition {
            from: existing.state.to_string(),
            to: EventState::Cancelled.to_string(),
        });
    }

    let next_cancelled_reason = match &request.cancelled_reason {
        Some(reason) => reason.clone(),
        None => existing.cancelled_reason.clone(),
    };
    if next_state == EventState::Cancelled
        && next_cancelled_reason
            .as_deref()
            .map_or(true, |r| r.trim().is_empty())
    {
        return Err(EventFlowError::InvalidInput(
            "A cancellation reason is required".to_string(),
        ));
    }

    if let Some(Some(capacity)) = request.capacity {
        if capacity <= 0 {
            return Err(EventFlowError::InvalidInput(
                "Capacity must be a positive integer".to_string(),
            ));
        }
        if i64::from(capacity) < confirmed_count {
            return Err(EventFlowError::InvalidInput(format!(
                "Capacity {capacity} is below the {confirmed_count} confirmed guests"
            )));
        }
    }

    let mut merged = existing.clone();
    if let Some(title) = &request.title {
        merged.title = title.clone();
    }
    if let Some(description) = &request.description {
        merged.description = description.clone();
    }
    merged.event_date = next_date;
    if let Some(end_date) = request.end_date {
        merged.end_date = end_date;
    }
    if let Some(rsvp_deadline) = request.rsvp_deadline {
        merged.rsvp_deadline = rsvp_deadline;
    }
    if let Some(timezone) = &request.timezone {
        merged.timezone = timezone.clone();
    }
    if let Some(visibility) = request.visibility {
        merged.visibility = visibility;
    }
    merged.state = next_state;
    if let Some(capacity) = request.capacity {
        merged.capacity = capacity;
    }
    if let Some(allow_waitlist) = request.allow_waitlist {
        merged.allow_waitlist = allow_waitlist;
    }
    if let Some(show_guest_list) = request.show_guest_list {
        merged.show_guest_list = show_guest_list;
    }
    merged.cancelled_reason = next_cancelled_reason;

    Ok(merged)
}

/// Validate a proposed RSVP change and resolve the final reply.
///
/// Allowed for the event owner and for the registered user linked to the
/// guest row. A status change after the RSVP deadline is rejected, and a
/// new YES is rejected at capacity unless the event allows a waitlist.
/// `confirmed_count` is the number of guests with a YES reply at the time
/// of the request.
pub fn apply_rsvp(
    event: &Event,
    guest: &Guest,
    caller_id: i64,
    confirmed_count: i64,
    request: &UpdateGuestRequest,
    now: DateTime<Utc>,
) -> Result<(RsvpStatus, Option<String>)> {
    if event.owner_id != caller_id && guest.user_id != Some(caller_id) {
        return Err(EventFlowError::PermissionDenied(
            "Only the event owner or the invited guest may change this RSVP".to_string(),
        ));
    }

    let status = request.status.unwrap_or(guest.status);

    if let Some(deadline) = event.rsvp_deadline {
        if status != guest.status && now > deadline {
            return Err(EventFlowError::InvalidInput(
                "The RSVP deadline for this event has passed".to_string(),
            ));
        }
    }

    // Confirming a spot counts against capacity unless a waitlist is
    // allowed; the guest's own current YES does not.
    if status == RsvpStatus::Yes && guest.status != RsvpStatus::Yes {
        if let Some(capacity) = event.capacity {
            if confirmed_count >= i64::from(capacity) && !event.allow_waitlist {
                return Err(EventFlowError::InvalidInput(
                    "This event is at capacity".to_string(),
                ));
            }
        }
    }

    let decline_reason = if status == RsvpStatus::No {
        request
            .decline_reason
            .clone()
            .or_else(|| guest.decline_reason.clone())
    } else {
        None
    };

    Ok((status, decline_reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventVisibility;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use proptest::prelude::*;

    fn base_event(state: EventState, event_date: DateTime<Utc>) -> Event {
        let now = Utc::now();
        Event {
            id: 1,
            title: "Spring meetup".to_string(),
            description: Some("A meetup".to_string()),
            event_date,
            end_date: None,
            rsvp_deadline: None,
            timezone: "UTC".to_string(),
            visibility: EventVisibility::Public,
            state,
            capacity: Some(10),
            allow_waitlist: false,
            show_guest_list: true,
            cancelled_reason: None,
            owner_id: 42,
            report_count: 0,
            is_hidden: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_publish_with_past_date_rejected() {
        let now = Utc::now();
        let existing = base_event(EventState::Draft, now - Duration::days(1));
        let request = UpdateEventRequest {
            state: Some(EventState::Published),
            ..Default::default()
        };

        let result = apply_update(&existing, 0, &request, now);
        assert_matches!(result, Err(EventFlowError::InvalidInput(_)));
    }

    #[test]
    fn test_draft_cannot_be_cancelled_directly() {
        let now = Utc::now();
        let existing = base_event(EventState::Draft, now + Duration::days(7));
        let request = UpdateEventRequest {
            state: Some(EventState::Cancelled),
            cancelled_reason: Some(Some("venue unavailable".to_string())),
            ..Default::default()
        };

        let result = apply_update(&existing, 0, &request, now);
        assert_matches!(result, Err(EventFlowError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_capacity_below_confirmed_guests_rejected() {
        let now = Utc::now();
        let existing = base_event(EventState::Published, now + Duration::days(7));
        let request = UpdateEventRequest {
            capacity: Some(Some(5)),
            ..Default::default()
        };

        // 8 guests have already replied YES.
        let result = apply_update(&existing, 8, &request, now);
        assert_matches!(result, Err(EventFlowError::InvalidInput(_)));
    }

    #[test]
    fn test_cancel_published_with_reason_accepted() {
        let now = Utc::now();
        let existing = base_event(EventState::Published, now + Duration::days(1));
        let request = UpdateEventRequest {
            state: Some(EventState::Cancelled),
            cancelled_reason: Some(Some("venue unavailable".to_string())),
            ..Default::default()
        };

        let merged = apply_update(&existing, 0, &request, now).unwrap();
        assert_eq!(merged.state, EventState::Cancelled);
        assert_eq!(merged.cancelled_reason.as_deref(), Some("venue unavailable"));
    }

    #[test]
    fn test_cancel_without_reason_rejected() {
        let now = Utc::now();
        let existing = base_event(EventState::Published, now + Duration::days(1));
        let request = UpdateEventRequest {
            state: Some(EventState::Cancelled),
            ..Default::default()
        };

        let result = apply_update(&existing, 0, &request, now);
        assert_matches!(result, Err(EventFlowError::InvalidInput(_)));

        // An explicit null clears the stored reason and is rejected the same way.
        let mut existing = base_event(EventState::Published, now + Duration::days(1));
        existing.cancelled_reason = Some("old reason".to_string());
        let request = UpdateEventRequest {
            state: Some(EventState::Cancelled),
            cancelled_reason: Some(None),
            ..Default::default()
        };
        let result = apply_update(&existing, 0, &request, now);
        assert_matches!(result, Err(EventFlowError::InvalidInput(_)));
    }

    #[test]
    fn test_cancel_falls_back_to_stored_reason() {
        let now = Utc::now();
        let mut existing = base_event(EventState::Published, now + Duration::days(1));
        existing.cancelled_reason = Some("storm warning".to_string());
        let request = UpdateEventRequest {
            state: Some(EventState::Cancelled),
            ..Default::default()
        };

        let merged = apply_update(&existing, 0, &request, now).unwrap();
        assert_eq!(merged.cancelled_reason.as_deref(), Some("storm warning"));
    }

    #[test]
    fn test_terminal_event_only_description_and_guest_list_change() {
        let now = Utc::now();
        let existing = base_event(EventState::Completed, now - Duration::days(7));
        let request = UpdateEventRequest {
            title: Some("new title".to_string()),
            description: Some(Some("new desc".to_string())),
            state: Some(EventState::Published),
            capacity: Some(Some(1)),
            show_guest_list: Some(false),
            ..Default::default()
        };

        let merged = apply_update(&existing, 0, &request, now).unwrap();
        assert_eq!(merged.title, existing.title);
        assert_eq!(merged.description.as_deref(), Some("new desc"));
        assert_eq!(merged.state, EventState::Completed);
        assert_eq!(merged.capacity, existing.capacity);
        assert!(!merged.show_guest_list);
    }

    #[test]
    fn test_null_clears_nullable_fields() {
        let now = Utc::now();
        let existing = base_event(EventState::Draft, now + Duration::days(7));
        let request = UpdateEventRequest {
            capacity: Some(None),
            description: Some(None),
            ..Default::default()
        };

        let merged = apply_update(&existing, 0, &request, now).unwrap();
        assert_eq!(merged.capacity, None);
        assert_eq!(merged.description, None);
    }

    #[test]
    fn test_absent_fields_preserved() {
        let now = Utc::now();
        let existing = base_event(EventState::Draft, now + Duration::days(7));
        let request = UpdateEventRequest::default();

        let merged = apply_update(&existing, 0, &request, now).unwrap();
        assert_eq!(merged.title, existing.title);
        assert_eq!(merged.capacity, existing.capacity);
        assert_eq!(merged.state, existing.state);
    }

    fn base_guest(event_id: i64, status: RsvpStatus) -> Guest {
        let now = Utc::now();
        Guest {
            id: 7,
            event_id,
            name: "Bea".to_string(),
            email: "bea@example.com".to_string(),
            status,
            decline_reason: None,
            user_id: Some(99),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_rsvp_change_after_deadline_rejected() {
        let now = Utc::now();
        let mut event = base_event(EventState::Published, now + Duration::days(7));
        event.rsvp_deadline = Some(now - Duration::hours(1));
        let guest = base_guest(event.id, RsvpStatus::Pending);
        let request = UpdateGuestRequest {
            status: Some(RsvpStatus::Yes),
            decline_reason: None,
        };

        let result = apply_rsvp(&event, &guest, 99, 0, &request, now);
        assert_matches!(result, Err(EventFlowError::InvalidInput(_)));
    }

    #[test]
    fn test_rsvp_unchanged_status_after_deadline_allowed() {
        let now = Utc::now();
        let mut event = base_event(EventState::Published, now + Duration::days(7));
        event.rsvp_deadline = Some(now - Duration::hours(1));
        let guest = base_guest(event.id, RsvpStatus::Yes);
        let request = UpdateGuestRequest {
            status: Some(RsvpStatus::Yes),
            decline_reason: None,
        };

        let (status, _) = apply_rsvp(&event, &guest, 99, 0, &request, now).unwrap();
        assert_eq!(status, RsvpStatus::Yes);
    }

    #[test]
    fn test_rsvp_yes_at_capacity_without_waitlist_rejected() {
        let now = Utc::now();
        let event = base_event(EventState::Published, now + Duration::days(7));
        let guest = base_guest(event.id, RsvpStatus::Pending);
        let request = UpdateGuestRequest {
            status: Some(RsvpStatus::Yes),
            decline_reason: None,
        };

        // Capacity is 10 and 10 guests have already confirmed.
        let result = apply_rsvp(&event, &guest, 99, 10, &request, now);
        assert_matches!(result, Err(EventFlowError::InvalidInput(_)));
    }

    #[test]
    fn test_rsvp_yes_at_capacity_with_waitlist_allowed() {
        let now = Utc::now();
        let mut event = base_event(EventState::Published, now + Duration::days(7));
        event.allow_waitlist = true;
        let guest = base_guest(event.id, RsvpStatus::Pending);
        let request = UpdateGuestRequest {
            status: Some(RsvpStatus::Yes),
            decline_reason: None,
        };

        let (status, _) = apply_rsvp(&event, &guest, 99, 10, &request, now).unwrap();
        assert_eq!(status, RsvpStatus::Yes);
    }

    #[test]
    fn test_rsvp_existing_yes_not_counted_against_capacity() {
        let now = Utc::now();
        let event = base_event(EventState::Published, now + Duration::days(7));
        let guest = base_guest(event.id, RsvpStatus::Yes);
        let request = UpdateGuestRequest {
            status: Some(RsvpStatus::Yes),
            decline_reason: None,
        };

        assert!(apply_rsvp(&event, &guest, 99, 10, &request, now).is_ok());
    }

    #[test]
    fn test_rsvp_caller_must_be_owner_or_linked_guest() {
        let now = Utc::now();
        let event = base_event(EventState::Published, now + Duration::days(7));
        let guest = base_guest(event.id, RsvpStatus::Pending);
        let request = UpdateGuestRequest {
            status: Some(RsvpStatus::Maybe),
            decline_reason: None,
        };

        // The owner (42) and the linked user (99) may change the reply.
        assert!(apply_rsvp(&event, &guest, 42, 0, &request, now).is_ok());
        assert!(apply_rsvp(&event, &guest, 99, 0, &request, now).is_ok());

        let result = apply_rsvp(&event, &guest, 12345, 0, &request, now);
        assert_matches!(result, Err(EventFlowError::PermissionDenied(_)));
    }

    #[test]
    fn test_rsvp_decline_reason_only_kept_for_no() {
        let now = Utc::now();
        let event = base_event(EventState::Published, now + Duration::days(7));
        let guest = base_guest(event.id, RsvpStatus::Pending);

        let request = UpdateGuestRequest {
            status: Some(RsvpStatus::No),
            decline_reason: Some("out of town".to_string()),
        };
        let (status, reason) = apply_rsvp(&event, &guest, 99, 0, &request, now).unwrap();
        assert_eq!(status, RsvpStatus::No);
        assert_eq!(reason.as_deref(), Some("out of town"));

        let request = UpdateGuestRequest {
            status: Some(RsvpStatus::Maybe),
            decline_reason: Some("out of town".to_string()),
        };
        let (_, reason) = apply_rsvp(&event, &guest, 99, 0, &request, now).unwrap();
        assert_eq!(reason, None);
    }

    #[test]
    fn test_auto_completion_transition() {
        let (from, to) = auto_completion_transition();
        assert_eq!(from, EventState::Published);
        assert_eq!(to, EventState::Completed);
        assert!(to.is_terminal());
    }

    fn arb_state() -> impl Strategy<Value = EventState> {
        prop_oneof![
            Just(EventState::Draft),
            Just(EventState::Published),
            Just(EventState::Cancelled),
            Just(EventState::Completed),
            Just(EventState::Archived),
        ]
    }

    fn arb_terminal_state() -> impl Strategy<Value = EventState> {
        prop_oneof![
            Just(EventState::Cancelled),
            Just(EventState::Completed),
            Just(EventState::Archived),
        ]
    }

    proptest! {
        // Terminal events never change state, title or capacity, whatever
        // the request proposes.
        #[test]
        fn prop_terminal_fields_frozen(
            state in arb_terminal_state(),
            proposed in arb_state(),
            title in ".{1,40}",
            capacity in proptest::option::of(-5i32..50),
        ) {
            let now = Utc::now();
            let existing = base_event(state, now - Duration::days(3));
            let request = UpdateEventRequest {
                title: Some(title),
                state: Some(proposed),
                capacity: Some(capacity),
                ..Default::default()
            };

            let merged = apply_update(&existing, 0, &request, now).unwrap();
            prop_assert_eq!(merged.state, existing.state);
            prop_assert_eq!(merged.title, existing.title);
            prop_assert_eq!(merged.capacity, existing.capacity);
        }

        // Publishing never succeeds with a date at or before now.
        #[test]
        fn prop_publish_requires_future_date(offset_minutes in -10_000i64..0) {
            let now = Utc::now();
            let existing = base_event(EventState::Draft, now + Duration::days(30));
            let request = UpdateEventRequest {
                state: Some(EventState::Published),
                event_date: Some(now + Duration::minutes(offset_minutes)),
                ..Default::default()
            };

            prop_assert!(apply_update(&existing, 0, &request, now).is_err());
        }

        // Non-positive capacity is always rejected outside terminal states.
        #[test]
        fn prop_non_positive_capacity_rejected(capacity in -100i32..=0) {
            let now = Utc::now();
            let existing = base_event(EventState::Draft, now + Duration::days(7));
            let request = UpdateEventRequest {
                capacity: Some(Some(capacity)),
                ..Default::default()
            };

            prop_assert!(apply_update(&existing, 0, &request, now).is_err());
        }

        // Capacity below the confirmed-guest count is always rejected, at or
        // above it always passes the capacity guard.
        #[test]
        fn prop_capacity_vs_confirmed(capacity in 1i32..100, confirmed in 0i64..100) {
            let now = Utc::now();
            let existing = base_event(EventState::Published, now + Duration::days(7));
            let request = UpdateEventRequest {
                capacity: Some(Some(capacity)),
                ..Default::default()
            };

            let result = apply_update(&existing, confirmed, &request, now);
            if i64::from(capacity) < confirmed {
                prop_assert!(result.is_err());
            } else {
                prop_assert!(result.is_ok());
            }
        }
    }
}
