//! Push notification endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::api::extract::{CurrentUser, ValidatedJson};
use crate::api::AppState;
use crate::models::notification::{DeviceToken, SubscribeRequest, UnsubscribeRequest};
use crate::utils::errors::Result;

/// POST /notifications/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<SubscribeRequest>,
) -> Result<(StatusCode, Json<DeviceToken>)> {
    let token = state
        .services
        .push_service
        .subscribe(user.id, &body.token, &body.platform)
        .await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /notifications/unsubscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<UnsubscribeRequest>,
) -> Result<Json<Value>> {
    state
        .services
        .push_service
        .unsubscribe(user.id, &body.token)
        .await?;
    Ok(Json(json!({ "ok": true })))
}
