//! Event service implementation
//!
//! Owner-scoped event CRUD routed through the lifecycle validator, plus
//! guest management with RSVP-deadline and capacity enforcement, and
//! per-event announcements.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::database::repositories::{EventRepository, GuestRepository, MessageRepository};
use crate::models::event::{
    CreateEventRequest, Event, EventListQuery, EventVisibility, UpdateEventRequest,
};
use crate::models::guest::{CreateGuestRequest, Guest, UpdateGuestRequest};
use crate::models::message::{Announcement, CreateAnnouncementRequest};
use crate::models::user::{User, UserRole};
use crate::services::lifecycle;
use crate::services::push::PushService;
use crate::utils::errors::{EventFlowError, Result};

#[derive(Clone)]
pub struct EventService {
    events: EventRepository,
    guests: GuestRepository,
    messages: MessageRepository,
    push: PushService,
}

impl EventService {
    pub fn new(
        events: EventRepository,
        guests: GuestRepository,
        messages: MessageRepository,
        push: PushService,
    ) -> Self {
        Self {
            events,
            guests,
            messages,
            push,
        }
    }

    /// Create a new event owned by the caller, always starting in DRAFT
    pub async fn create(&self, owner: &User, request: CreateEventRequest) -> Result<Event> {
        let event = self.events.create(owner.id, request).await?;
        info!(event_id = event.id, owner_id = owner.id, "Event created");
        Ok(event)
    }

    /// Fetch an event the viewer is allowed to see.
    ///
    /// Hidden or private events resolve to not-found for everyone except the
    /// owner and admins, so their existence is not leaked.
    pub async fn get(&self, viewer: &User, event_id: i64) -> Result<Event> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventFlowError::EventNotFound { event_id })?;

        if !Self::can_view(viewer, &event) {
            return Err(EventFlowError::EventNotFound { event_id });
        }

        Ok(event)
    }

    /// List events visible to the viewer
    pub async fn list(&self, viewer: &User, query: &EventListQuery) -> Result<Vec<Event>> {
        self.events.list(viewer.id, query).await
    }

    /// Apply a partial update through the lifecycle validator. Owner-only.
    pub async fn update(
        &self,
        caller: &User,
        event_id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        let event = self.get(caller, event_id).await?;
        self.require_owner(caller, &event)?;

        let confirmed = self.guests.count_confirmed(event_id).await?;
        let merged = lifecycle::apply_update(&event, confirmed, &request, Utc::now())?;
        let saved = self.events.save(&merged).await?;

        info!(
            event_id = event_id,
            state = %saved.state,
            "Event updated"
        );
        Ok(saved)
    }

    /// Delete an event and its guests. Owner-only.
    ///
    /// Guests are removed first with an explicit call so the count can be
    /// logged; the remaining related rows go through the schema cascade.
    pub async fn delete(&self, caller: &User, event_id: i64) -> Result<()> {
        let event = self.get(caller, event_id).await?;
        self.require_owner(caller, &event)?;

        let removed_guests = self.guests.delete_by_event(event_id).await?;
        self.events.delete(event_id).await?;

        info!(
            event_id = event_id,
            removed_guests = removed_guests,
            "Event deleted"
        );
        Ok(())
    }

    /// List guests of an event. Non-owners only see the list when the event
    /// exposes it.
    pub async fn list_guests(&self, viewer: &User, event_id: i64) -> Result<Vec<Guest>> {
        let event = self.get(viewer, event_id).await?;

        if event.owner_id != viewer.id && !event.show_guest_list {
            return Err(EventFlowError::PermissionDenied(
                "The guest list of this event is not public".to_string(),
            ));
        }

        self.guests.list_by_event(event_id).await
    }

    /// Invite a guest. Owner-only.
    pub async fn add_guest(
        &self,
        caller: &User,
        event_id: i64,
        request: CreateGuestRequest,
    ) -> Result<Guest> {
        let event = self.get(caller, event_id).await?;
        self.require_owner(caller, &event)?;

        let guest = self.guests.create(event_id, request).await?;
        debug!(event_id = event_id, guest_id = guest.id, "Guest added");
        Ok(guest)
    }

    /// Update a guest's RSVP. Allowed for the event owner and for the
    /// registered user linked to the guest row.
    pub async fn update_guest(
        &self,
        caller: &User,
        event_id: i64,
        guest_id: i64,
        request: UpdateGuestRequest,
    ) -> Result<Guest> {
        let event = self.get(caller, event_id).await?;
        let guest = self
            .guests
            .find_by_id(event_id, guest_id)
            .await?
            .ok_or(EventFlowError::GuestNotFound { guest_id })?;

        let confirmed = self.guests.count_confirmed(event_id).await?;
        let (status, decline_reason) =
            lifecycle::apply_rsvp(&event, &guest, caller.id, confirmed, &request, Utc::now())?;

        let updated = self.guests.update_rsvp(guest_id, status, decline_reason).await?;

        if updated.status != guest.status {
            self.push
                .notify_user(
                    event.owner_id,
                    "RSVP update",
                    &format!("{} replied to {}", updated.name, event.title),
                )
                .await;
        }

        Ok(updated)
    }

    /// Remove a guest. Owner-only.
    pub async fn remove_guest(&self, caller: &User, event_id: i64, guest_id: i64) -> Result<()> {
        let event = self.get(caller, event_id).await?;
        self.require_owner(caller, &event)?;

        let guest = self
            .guests
            .find_by_id(event_id, guest_id)
            .await?
            .ok_or(EventFlowError::GuestNotFound { guest_id })?;

        self.guests.delete(guest.id).await?;
        debug!(event_id = event_id, guest_id = guest_id, "Guest removed");
        Ok(())
    }

    /// Post an announcement. Owner-only.
    pub async fn post_announcement(
        &self,
        caller: &User,
        event_id: i64,
        request: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        let event = self.get(caller, event_id).await?;
        self.require_owner(caller, &event)?;

        let announcement = self
            .messages
            .create_announcement(event_id, caller.id, &request.body)
            .await?;

        info!(event_id = event_id, "Announcement posted");
        Ok(announcement)
    }

    /// List announcements of a visible event
    pub async fn list_announcements(
        &self,
        viewer: &User,
        event_id: i64,
    ) -> Result<Vec<Announcement>> {
        self.get(viewer, event_id).await?;
        self.messages.list_announcements(event_id).await
    }

    fn can_view(viewer: &User, event: &Event) -> bool {
        if event.owner_id == viewer.id || viewer.role == UserRole::Admin {
            return true;
        }
        !event.is_hidden && event.visibility == EventVisibility::Public
    }

    fn require_owner(&self, caller: &User, event: &Event) -> Result<()> {
        if event.owner_id != caller.id {
            warn!(
                event_id = event.id,
                caller_id = caller.id,
                "Rejected mutation by non-owner"
            );
            return Err(EventFlowError::PermissionDenied(
                "Only the event owner may do this".to_string(),
            ));
        }
        Ok(())
    }
}
