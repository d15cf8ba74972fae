//! Purge schedules.
//!
//! Each purge task runs on its own schedule, either a cron expression or a
//! fixed interval.

use chrono::{DateTime, Duration, Utc};
use photobook_error::ScheduleError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Longest accepted interval (ten years).
pub const MAX_INTERVAL_SECS: u64 = 10 * 365 * 24 * 3600;

/// When a purge task runs.
///
/// ```toml
/// [purge.photos]
/// type = "Cron"
/// expression = "0 0 3 * * *"
///
/// [purge.staging]
/// type = "Interval"
/// seconds = 3600
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, derive_more::Display)]
#[serde(tag = "type")]
pub enum PurgeSchedule {
    /// Cron expression (6 or 7 fields: sec min hour day month weekday [year])
    ///
    /// Example: "0 0 3 * * *" = 3 AM daily
    #[display("cron({expression})")]
    Cron {
        /// Cron expression string
        expression: String,
    },

    /// Fixed interval in seconds
    #[display("every {seconds}s")]
    Interval {
        /// Interval duration in seconds
        seconds: u64,
    },
}

impl PurgeSchedule {
    /// Cron schedule from an expression.
    pub fn cron(expression: impl Into<String>) -> Self {
        PurgeSchedule::Cron {
            expression: expression.into(),
        }
    }

    /// Fixed-interval schedule.
    pub fn every(seconds: u64) -> Self {
        PurgeSchedule::Interval { seconds }
    }

    /// Check that the schedule will ever fire.
    ///
    /// # Errors
    ///
    /// Returns a `ScheduleError` for unparsable cron expressions, cron
    /// expressions with no future occurrence, and intervals that are zero or
    /// longer than [`MAX_INTERVAL_SECS`].
    pub fn validate(&self) -> Result<(), ScheduleError> {
        match self {
            PurgeSchedule::Cron { expression } => {
                let schedule = cron::Schedule::from_str(expression)
                    .map_err(|e| ScheduleError::new(expression.clone(), e.to_string()))?;
                if schedule.upcoming(Utc).next().is_none() {
                    return Err(ScheduleError::new(
                        expression.clone(),
                        "no future executions",
                    ));
                }
                Ok(())
            }
            PurgeSchedule::Interval { seconds: 0 } => {
                Err(ScheduleError::new("0s", "interval must be positive"))
            }
            PurgeSchedule::Interval { seconds } if *seconds > MAX_INTERVAL_SECS => {
                Err(ScheduleError::new(
                    format!("{}s", seconds),
                    format!("interval exceeds {}s", MAX_INTERVAL_SECS),
                ))
            }
            PurgeSchedule::Interval { .. } => Ok(()),
        }
    }

    /// Next execution strictly after `after`, or `None` if the schedule is
    /// exhausted or invalid.
    pub fn next_execution(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            PurgeSchedule::Interval { seconds: 0 } => None,
            PurgeSchedule::Interval { seconds } => {
                let step = Duration::try_seconds(i64::try_from(*seconds).ok()?)?;
                after.checked_add_signed(step)
            }
            PurgeSchedule::Cron { expression } => cron::Schedule::from_str(expression)
                .ok()?
                .after(&after)
                .next(),
        }
    }

    /// How long to wait from `now` until the next execution.
    pub fn delay_from(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        let next = self.next_execution(now)?;
        Some((next - now).to_std().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn cron_next_is_after_reference() {
        let schedule = PurgeSchedule::cron("0 0 3 * * *");
        let after = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let next = schedule.next_execution(after).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 2, 3, 0, 0).unwrap());
    }

    #[test]
    fn cron_exact_match_moves_forward() {
        let schedule = PurgeSchedule::cron("0 0 3 * * *");
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 3, 0, 0).unwrap();

        let next = schedule.next_execution(at).unwrap();
        assert!(next > at);
    }

    #[test]
    fn interval_adds_seconds() {
        let schedule = PurgeSchedule::every(90);
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(
            schedule.next_execution(after),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 30).unwrap())
        );
        assert_eq!(
            schedule.delay_from(after),
            Some(std::time::Duration::from_secs(90))
        );
    }

    #[test]
    fn invalid_schedules_rejected() {
        assert!(PurgeSchedule::cron("not a cron").validate().is_err());
        assert!(PurgeSchedule::every(0).validate().is_err());
        assert!(PurgeSchedule::cron("0 0 3 * * *").validate().is_ok());
        assert!(PurgeSchedule::every(0).next_execution(Utc::now()).is_none());
    }

    #[test]
    fn huge_intervals_rejected_without_panicking() {
        let huge = PurgeSchedule::every(1 << 62);
        assert!(huge.validate().is_err());
        assert!(huge.next_execution(Utc::now()).is_none());
        assert!(huge.delay_from(Utc::now()).is_none());
        assert!(PurgeSchedule::every(u64::MAX).next_execution(Utc::now()).is_none());

        assert!(PurgeSchedule::every(MAX_INTERVAL_SECS).validate().is_ok());
        assert!(PurgeSchedule::every(MAX_INTERVAL_SECS + 1).validate().is_err());
        assert!(
            PurgeSchedule::every(MAX_INTERVAL_SECS)
                .next_execution(Utc::now())
                .is_some()
        );
    }

    #[test]
    fn display_names_schedule() {
        assert_eq!(PurgeSchedule::cron("0 0 3 * * *").to_string(), "cron(0 0 3 * * *)");
        assert_eq!(PurgeSchedule::every(60).to_string(), "every 60s");
    }
}
