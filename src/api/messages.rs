//! Messaging endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::extract::{CurrentUser, ValidatedJson};
use crate::api::AppState;
use crate::models::message::{Conversation, Message, SendMessageRequest};
use crate::utils::errors::Result;

/// POST /events/:id/messages
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>)> {
    let message = state
        .services
        .message_service
        .send(&user, event_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /events/:id/messages/conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<Conversation>>> {
    let conversations = state
        .services
        .message_service
        .conversations(&user, event_id)
        .await?;
    Ok(Json(conversations))
}

/// GET /events/:id/messages/:user_id
pub async fn get_thread(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((event_id, counterparty_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<Message>>> {
    let messages = state
        .services
        .message_service
        .thread(&user, event_id, counterparty_id)
        .await?;
    Ok(Json(messages))
}
