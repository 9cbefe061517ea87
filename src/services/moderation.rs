//! Moderation service implementation
//!
//! Report filing with duplicate protection and auto-hide, admin review with
//! penalties, and the penalty-driven ban escalation.

use tracing::{info, warn};

use crate::config::ModerationConfig;
use crate::database::repositories::{EventRepository, ModerationRepository, UserRepository};
use crate::models::moderation::{Report, ReportStatus};
use crate::models::user::User;
use crate::services::push::PushService;
use crate::utils::errors::{EventFlowError, Result};

#[derive(Clone)]
pub struct ModerationService {
    reports: ModerationRepository,
    events: EventRepository,
    users: UserRepository,
    push: PushService,
    config: ModerationConfig,
}

impl ModerationService {
    pub fn new(
        reports: ModerationRepository,
        events: EventRepository,
        users: UserRepository,
        push: PushService,
        config: ModerationConfig,
    ) -> Self {
        Self {
            reports,
            events,
            users,
            push,
            config,
        }
    }

    /// File a report against an event. One report per reporter per event;
    /// crossing the hide threshold takes the event out of public listings.
    pub async fn submit_report(
        &self,
        reporter: &User,
        event_id: i64,
        reason: &str,
    ) -> Result<Report> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventFlowError::EventNotFound { event_id })?;

        if event.owner_id == reporter.id {
            return Err(EventFlowError::InvalidInput(
                "You cannot report your own event".to_string(),
            ));
        }

        if self
            .reports
            .find_by_event_and_reporter(event_id, reporter.id)
            .await?
            .is_some()
        {
            return Err(EventFlowError::InvalidInput(
                "You have already reported this event".to_string(),
            ));
        }

        let report = self
            .reports
            .create_report(event_id, reporter.id, reason)
            .await?;
        let count = self.events.increment_report_count(event_id).await?;

        if count >= self.config.report_hide_threshold && !event.is_hidden {
            self.events.set_hidden(event_id, true).await?;
            warn!(
                event_id = event_id,
                report_count = count,
                "Event auto-hidden after crossing report threshold"
            );
        }

        info!(report_id = report.id, event_id = event_id, "Report filed");
        Ok(report)
    }

    /// List reports for the admin queue
    pub async fn list_reports(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report>> {
        self.reports
            .list_reports(status, limit.min(100), offset.max(0))
            .await
    }

    /// Review a pending report.
    ///
    /// Accepting issues a penalty against the event owner and keeps the
    /// event hidden; enough penalties ban the owner. Dismissing walks the
    /// report count back and unhides the event when it drops below the
    /// threshold.
    pub async fn review_report(
        &self,
        reviewer: &User,
        report_id: i64,
        accept: bool,
    ) -> Result<Report> {
        let report = self
            .reports
            .find_report(report_id)
            .await?
            .ok_or(EventFlowError::ReportNotFound { report_id })?;

        if report.status != ReportStatus::Pending {
            return Err(EventFlowError::InvalidInput(
                "This report has already been reviewed".to_string(),
            ));
        }

        let event = self
            .events
            .find_by_id(report.event_id)
            .await?
            .ok_or(EventFlowError::EventNotFound {
                event_id: report.event_id,
            })?;

        let status = if accept {
            ReportStatus::Accepted
        } else {
            ReportStatus::Dismissed
        };
        let reviewed = self
            .reports
            .review_report(report_id, status, reviewer.id)
            .await?;

        if accept {
            self.events.set_hidden(event.id, true).await?;
            self.reports
                .create_penalty(event.owner_id, reviewer.id, &report.reason)
                .await?;

            let penalties = self.reports.count_penalties(event.owner_id).await?;
            if penalties >= self.config.penalty_ban_threshold {
                self.users
                    .set_ban_status(event.owner_id, true, Some("Repeated moderation penalties"))
                    .await?;
                warn!(
                    user_id = event.owner_id,
                    penalties = penalties,
                    "User banned after crossing penalty threshold"
                );
            }

            self.push
                .notify_user(
                    event.owner_id,
                    "Moderation notice",
                    &format!("Your event \"{}\" received a moderation penalty", event.title),
                )
                .await;
        } else {
            let count = self.events.decrement_report_count(event.id).await?;
            if count < self.config.report_hide_threshold && event.is_hidden {
                self.events.set_hidden(event.id, false).await?;
            }
        }

        info!(
            report_id = report_id,
            accepted = accept,
            reviewer_id = reviewer.id,
            "Report reviewed"
        );
        Ok(reviewed)
    }

    /// Ban a user
    pub async fn ban_user(&self, admin: &User, user_id: i64, reason: &str) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(EventFlowError::UserNotFound { user_id })?;

        let user = self.users.set_ban_status(user_id, true, Some(reason)).await?;
        warn!(user_id = user_id, admin_id = admin.id, "User banned");
        Ok(user)
    }

    /// Lift a user's ban
    pub async fn unban_user(&self, admin: &User, user_id: i64) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(EventFlowError::UserNotFound { user_id })?;

        let user = self.users.set_ban_status(user_id, false, None).await?;
        info!(user_id = user_id, admin_id = admin.id, "User unbanned");
        Ok(user)
    }
}
