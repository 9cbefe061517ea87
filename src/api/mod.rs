//! HTTP API module
//!
//! Router assembly and request handling. Handlers stay thin: they extract
//! the caller, hand off to a service, and shape the response.

pub mod auth;
pub mod events;
pub mod extract;
pub mod messages;
pub mod moderation;
pub mod notifications;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::services::{ServiceFactory, ServiceHealthStatus};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub settings: Settings,
}

/// GET /health
async fn health(State(state): State<AppState>) -> (StatusCode, Json<ServiceHealthStatus>) {
    let status = state.services.health_check(&state.db).await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/google", post(auth::google_login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/profile", get(auth::profile))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/events/{id}/guests",
            get(events::list_guests).post(events::add_guest),
        )
        .route(
            "/events/{id}/guests/{guest_id}",
            patch(events::update_guest).delete(events::remove_guest),
        )
        .route(
            "/events/{id}/announcements",
            get(events::list_announcements).post(events::post_announcement),
        )
        .route("/events/{id}/messages", post(messages::send_message))
        .route(
            "/events/{id}/messages/conversations",
            get(messages::list_conversations),
        )
        .route(
            "/events/{id}/messages/{user_id}",
            get(messages::get_thread),
        )
        .route(
            "/moderation/reports",
            post(moderation::submit_report).get(moderation::list_reports),
        )
        .route(
            "/moderation/reports/{id}/review",
            patch(moderation::review_report),
        )
        .route("/moderation/users/{id}/ban", post(moderation::ban_user))
        .route("/moderation/users/{id}/unban", post(moderation::unban_user))
        .route("/notifications/subscribe", post(notifications::subscribe))
        .route(
            "/notifications/unsubscribe",
            post(notifications::unsubscribe),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
