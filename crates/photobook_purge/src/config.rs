//! Purge configuration.

use crate::{PurgeSchedule, PurgeTask};
use derive_getters::Getters;
use photobook_error::ScheduleError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Schedules for every purge task plus the staging grace period.
///
/// ```toml
/// [purge]
/// staging_max_age_secs = 86400
///
/// [purge.photos]
/// type = "Cron"
/// expression = "0 0 3 * * *"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PurgeConfig {
    /// When unreferenced photos are deleted
    #[serde(default = "default_photos")]
    photos: PurgeSchedule,

    /// When unreferenced avatars are deleted
    #[serde(default = "default_avatars")]
    avatars: PurgeSchedule,

    /// When abandoned staged uploads are swept
    #[serde(default = "default_staging")]
    staging: PurgeSchedule,

    /// Age after which a staged or `.tmp` upload counts as abandoned (seconds)
    #[serde(default = "default_staging_max_age_secs")]
    staging_max_age_secs: u64,
}

fn default_photos() -> PurgeSchedule {
    PurgeSchedule::cron("0 0 3 * * *")
}

fn default_avatars() -> PurgeSchedule {
    PurgeSchedule::cron("0 30 3 * * *")
}

fn default_staging() -> PurgeSchedule {
    PurgeSchedule::every(3600)
}

fn default_staging_max_age_secs() -> u64 {
    24 * 3600
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            photos: default_photos(),
            avatars: default_avatars(),
            staging: default_staging(),
            staging_max_age_secs: default_staging_max_age_secs(),
        }
    }
}

impl PurgeConfig {
    /// Configuration with explicit schedules.
    pub fn new(
        photos: PurgeSchedule,
        avatars: PurgeSchedule,
        staging: PurgeSchedule,
        staging_max_age: Duration,
    ) -> Self {
        Self {
            photos,
            avatars,
            staging,
            staging_max_age_secs: staging_max_age.as_secs(),
        }
    }

    /// Staging grace period.
    pub fn staging_max_age(&self) -> Duration {
        Duration::from_secs(self.staging_max_age_secs)
    }

    /// Schedule driving a task.
    pub fn schedule_for(&self, task: PurgeTask) -> &PurgeSchedule {
        match task {
            PurgeTask::Photos => &self.photos,
            PurgeTask::Avatars => &self.avatars,
            PurgeTask::Staging => &self.staging,
        }
    }

    /// Validate every schedule.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        self.photos.validate()?;
        self.avatars.validate()?;
        self.staging.validate()
    }
}
