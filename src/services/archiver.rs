//! Archiver job
//!
//! Daily sweep that demotes stale published events to completed. Runs
//! unattended: any error is logged and swallowed, and the next tick simply
//! re-attempts since eligible rows remain PUBLISHED. The write is one
//! batched UPDATE, so a failed run leaves no partial state behind.

use crate::database::EventRepository;
use crate::models::event::EventState;
use crate::services::lifecycle;
use crate::utils::errors::Result;
use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use std::time::Duration;
use tracing::{error, info};

#[derive(Clone)]
pub struct ArchiverJob {
    events: EventRepository,
    interval: Duration,
}

/// Events dated before the end of yesterday are overdue.
pub fn completion_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    let yesterday = (now - ChronoDuration::days(1)).date_naive();
    let end_of_day = yesterday
        .and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| yesterday.and_time(NaiveTime::MIN));
    end_of_day.and_utc()
}

/// Selection predicate of the sweep, kept pure for testing.
pub fn sweep_eligible(state: EventState, event_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let (from, _) = lifecycle::auto_completion_transition();
    state == from && event_date < completion_cutoff(now)
}

impl ArchiverJob {
    pub fn new(events: EventRepository, interval: Duration) -> Self {
        Self { events, interval }
    }

    /// Single sweep: one batched write, errors propagate to the caller
    pub async fn run_once(&self) -> Result<u64> {
        let cutoff = completion_cutoff(Utc::now());
        let completed = self.events.complete_overdue(cutoff).await?;

        if completed > 0 {
            info!(completed = completed, cutoff = %cutoff, "Archiver completed overdue events");
        }

        Ok(completed)
    }

    /// Run the sweep on a fixed schedule until the task is dropped
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if let Err(e) = self.run_once().await {
                    // Swallowed on purpose: the next tick retries naturally.
                    error!(error = %e, "Archiver sweep failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_completion_cutoff_is_end_of_yesterday() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap();
        let cutoff = completion_cutoff(now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_sweep_selects_only_overdue_published() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap();
        let three_days_ago = now - ChronoDuration::days(3);
        let tomorrow = now + ChronoDuration::days(1);

        assert!(sweep_eligible(EventState::Published, three_days_ago, now));
        assert!(!sweep_eligible(EventState::Published, tomorrow, now));
        assert!(!sweep_eligible(EventState::Draft, three_days_ago, now));
        assert!(!sweep_eligible(EventState::Completed, three_days_ago, now));
        assert!(!sweep_eligible(EventState::Cancelled, three_days_ago, now));
    }

    #[test]
    fn test_sweep_is_idempotent_by_construction() {
        // A swept event lands in the COMPLETED state, which is never
        // eligible again, so a second run selects nothing.
        let now = Utc::now();
        let old_date = now - ChronoDuration::days(3);
        assert!(sweep_eligible(EventState::Published, old_date, now));

        let (_, swept_into) = lifecycle::auto_completion_transition();
        assert!(!sweep_eligible(swept_into, old_date, now));
    }
}
