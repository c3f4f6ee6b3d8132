use serde::{Deserialize, Serialize};

use super::{EntityId, Platform};

/// Posting schedule for one platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default, alias = "_id")]
    pub id: Option<EntityId>,
    pub platform: Platform,
    /// Times of day as `HH:MM`
    #[serde(default, alias = "postingTimes")]
    pub times: Vec<String>,
    /// Lowercase weekday names; empty means every day
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Schedule {
    pub fn days_display(&self) -> String {
        if self.days.is_empty() || self.days.len() == 7 {
            "every day".to_string()
        } else {
            self.days.join(", ")
        }
    }

    pub fn times_display(&self) -> String {
        if self.times.is_empty() {
            "-".to_string()
        } else {
            self.times.join(", ")
        }
    }
}

/// Body for creating or updating a schedule.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    pub platform: Platform,
    pub times: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SchedulesEnvelope {
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ScheduleEnvelope {
    pub schedule: Schedule,
}
