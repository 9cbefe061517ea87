//! Event, guest and announcement endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::extract::{CurrentUser, ValidatedJson};
use crate::api::AppState;
use crate::models::event::{CreateEventRequest, Event, EventListQuery, UpdateEventRequest};
use crate::models::guest::{CreateGuestRequest, Guest, UpdateGuestRequest};
use crate::models::message::{Announcement, CreateAnnouncementRequest};
use crate::utils::errors::Result;

/// GET /events
pub async fn list_events(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<Event>>> {
    let events = state.services.event_service.list(&user, &query).await?;
    Ok(Json(events))
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = state.services.event_service.create(&user, body).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /events/:id
pub async fn get_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<Event>> {
    let event = state.services.event_service.get(&user, event_id).await?;
    Ok(Json(event))
}

/// PATCH /events/:id
pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<i64>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .event_service
        .update(&user, event_id, body)
        .await?;
    Ok(Json(event))
}

/// DELETE /events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<StatusCode> {
    state.services.event_service.delete(&user, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /events/:id/guests
pub async fn list_guests(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<Guest>>> {
    let guests = state
        .services
        .event_service
        .list_guests(&user, event_id)
        .await?;
    Ok(Json(guests))
}

/// POST /events/:id/guests
pub async fn add_guest(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<CreateGuestRequest>,
) -> Result<(StatusCode, Json<Guest>)> {
    let guest = state
        .services
        .event_service
        .add_guest(&user, event_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(guest)))
}

/// PATCH /events/:id/guests/:guest_id
pub async fn update_guest(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((event_id, guest_id)): Path<(i64, i64)>,
    Json(body): Json<UpdateGuestRequest>,
) -> Result<Json<Guest>> {
    let guest = state
        .services
        .event_service
        .update_guest(&user, event_id, guest_id, body)
        .await?;
    Ok(Json(guest))
}

/// DELETE /events/:id/guests/:guest_id
pub async fn remove_guest(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((event_id, guest_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    state
        .services
        .event_service
        .remove_guest(&user, event_id, guest_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /events/:id/announcements
pub async fn list_announcements(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<Announcement>>> {
    let announcements = state
        .services
        .event_service
        .list_announcements(&user, event_id)
        .await?;
    Ok(Json(announcements))
}

/// POST /events/:id/announcements
pub async fn post_announcement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    let announcement = state
        .services
        .event_service
        .post_announcement(&user, event_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}
