//! Moderation endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::extract::{AdminUser, CurrentUser, ValidatedJson};
use crate::api::AppState;
use crate::models::moderation::{
    BanUserRequest, CreateReportRequest, Report, ReportStatus, ReviewReportRequest,
};
use crate::models::user::UserProfile;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct ReportListQuery {
    pub status: Option<ReportStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /moderation/reports
pub async fn submit_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateReportRequest>,
) -> Result<(StatusCode, Json<Report>)> {
    let report = state
        .services
        .moderation_service
        .submit_report(&user, body.event_id, &body.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /moderation/reports (admin)
pub async fn list_reports(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<Vec<Report>>> {
    let reports = state
        .services
        .moderation_service
        .list_reports(
            query.status,
            query.limit.unwrap_or(50),
            query.offset.unwrap_or(0),
        )
        .await?;
    Ok(Json(reports))
}

/// PATCH /moderation/reports/:id/review (admin)
pub async fn review_report(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(report_id): Path<i64>,
    Json(body): Json<ReviewReportRequest>,
) -> Result<Json<Report>> {
    let report = state
        .services
        .moderation_service
        .review_report(&admin, report_id, body.accept)
        .await?;
    Ok(Json(report))
}

/// POST /moderation/users/:id/ban (admin)
pub async fn ban_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<BanUserRequest>,
) -> Result<Json<UserProfile>> {
    let user = state
        .services
        .moderation_service
        .ban_user(&admin, user_id, &body.reason)
        .await?;
    Ok(Json(user.profile()))
}

/// POST /moderation/users/:id/unban (admin)
pub async fn unban_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserProfile>> {
    let user = state
        .services
        .moderation_service
        .unban_user(&admin, user_id)
        .await?;
    Ok(Json(user.profile()))
}
