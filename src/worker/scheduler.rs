use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::deliver::SharedDigestService;
use crate::errors::DigestError;

/// Fixed wall-clock time of the daily broadcast.
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    pub at: NaiveTime,
    pub timezone: Option<Tz>,
}

impl DailySchedule {
    #[must_use]
    pub fn new(at: NaiveTime, timezone: Option<Tz>) -> Self {
        Self { at, timezone }
    }

    #[must_use]
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.timezone {
            Some(tz) => next_occurrence(now, self.at, &tz),
            None => next_occurrence(now, self.at, &Local),
        }
    }

    #[must_use]
    pub fn duration_until_next(&self, now: DateTime<Utc>) -> Duration {
        (self.next_run_after(now) - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    #[must_use]
    pub fn display_time(&self) -> String {
        self.at.format("%H:%M").to_string()
    }
}

/// First instant strictly after `now` whose wall-clock time in `tz` is `at`.
/// Days where `at` falls in a DST gap are skipped.
#[must_use]
pub fn next_occurrence<Z: TimeZone>(now: DateTime<Utc>, at: NaiveTime, tz: &Z) -> DateTime<Utc> {
    let local_today = now.with_timezone(tz).date_naive();
    for offset in 0..=2 {
        let Some(day) = local_today.checked_add_days(Days::new(offset)) else {
            continue;
        };
        if let Some(candidate) = tz.from_local_datetime(&day.and_time(at)).earliest() {
            let candidate = candidate.with_timezone(&Utc);
            if candidate > now {
                return candidate;
            }
        }
    }
    now + chrono::Duration::days(1)
}

/// Runs the broadcast once a day for the lifetime of the process.
pub fn spawn_daily_job(service: SharedDigestService, schedule: DailySchedule) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Scheduled daily summary at {}", schedule.display_time());
        loop {
            let now = Utc::now();
            let wait = schedule.duration_until_next(now);
            info!(
                "Next daily summary at {} (in {}s)",
                schedule.next_run_after(now),
                wait.as_secs()
            );
            tokio::time::sleep(wait).await;

            info!("Running scheduled daily summary");
            match service.broadcast_daily_summary().await {
                Ok(report) if report.attempted() == 0 => {}
                Ok(report) => info!(
                    "Daily summary job complete: {} delivered, {} failed",
                    report.delivered.len(),
                    report.failed.len()
                ),
                Err(e) if e.is_not_yet_published() => {
                    warn!("Daily summary skipped: {}", e);
                }
                Err(DigestError::BroadcastInProgress) => {}
                Err(e) => error!("Daily summary job failed at {} stage: {}", e.stage(), e),
            }
        }
    })
}
