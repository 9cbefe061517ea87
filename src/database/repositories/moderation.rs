//! Report and penalty repository implementation

use crate::models::moderation::{Penalty, Report, ReportStatus};
use crate::utils::errors::EventFlowError;
use chrono::Utc;
use sqlx::PgPool;

const REPORT_COLUMNS: &str =
    "id, event_id, reporter_id, reason, status, reviewed_by, reviewed_at, created_at";

#[derive(Debug, Clone)]
pub struct ModerationRepository {
    pool: PgPool,
}

impl ModerationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// File a report against an event
    pub async fn create_report(
        &self,
        event_id: i64,
        reporter_id: i64,
        reason: &str,
    ) -> Result<Report, EventFlowError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports (event_id, reporter_id, reason, status, created_at)
            VALUES ($1, $2, $3, 'PENDING', $4)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(reporter_id)
        .bind(reason)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }

    /// Find report by ID
    pub async fn find_report(&self, id: i64) -> Result<Option<Report>, EventFlowError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    /// Find an existing report by the same reporter on the same event
    pub async fn find_by_event_and_reporter(
        &self,
        event_id: i64,
        reporter_id: i64,
    ) -> Result<Option<Report>, EventFlowError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE event_id = $1 AND reporter_id = $2"
        ))
        .bind(event_id)
        .bind(reporter_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    /// List reports, optionally filtered by status, newest first
    pub async fn list_reports(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report>, EventFlowError> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            r#"
            SELECT {REPORT_COLUMNS} FROM reports
            WHERE ($1::report_status IS NULL OR status = $1)
            ORDER BY created_at DESC LIMIT $2 OFFSET $3
            "#
        ))
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }

    /// Record a review decision on a report
    pub async fn review_report(
        &self,
        id: i64,
        status: ReportStatus,
        reviewer_id: i64,
    ) -> Result<Report, EventFlowError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            UPDATE reports
            SET status = $2, reviewed_by = $3, reviewed_at = $4
            WHERE id = $1
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(reviewer_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }

    /// Issue a penalty against a user
    pub async fn create_penalty(
        &self,
        user_id: i64,
        issued_by: i64,
        reason: &str,
    ) -> Result<Penalty, EventFlowError> {
        let penalty = sqlx::query_as::<_, Penalty>(
            r#"
            INSERT INTO penalties (user_id, issued_by, reason, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, issued_by, reason, created_at
            "#,
        )
        .bind(user_id)
        .bind(issued_by)
        .bind(reason)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(penalty)
    }

    /// Count penalties issued against a user
    pub async fn count_penalties(&self, user_id: i64) -> Result<i64, EventFlowError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM penalties WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
