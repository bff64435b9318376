//! Data model: tasks, daily progress records, and habit groups.
//!
//! All types serialize with camelCase field names so the persisted blob
//! matches the historical record shape (`streakThreshold`, `completedAt`,
//! `dailyProgress`, ...). Records written by older versions may lack the
//! `streakThreshold` and `dailyProgress` fields; both default on load.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::Clock;

/// Minimum daily completion goal. Thresholds are clamped to this on every
/// write path before reaching the engine.
pub const MIN_STREAK_THRESHOLD: u32 = 1;

/// A single task within a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub completed: bool,

    pub created_at: DateTime<Utc>,

    /// Set when the task is completed, cleared when it is toggled back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new, uncompleted task.
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
            created_at,
            completed_at: None,
        }
    }
}

/// Per-day completion record for a group.
///
/// At most one entry exists per calendar day; the entry is appended on the
/// first reconciliation that touches the day and updated in place after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    /// Calendar day this record covers (serialized as `YYYY-MM-DD`).
    pub date: NaiveDate,

    /// Number of tasks completed on that day, as of the last reconciliation.
    pub completed_tasks: u32,

    /// Whether the day's completion goal was met and counted toward the
    /// streak.
    #[serde(default)]
    pub streak_earned: bool,
}

/// A named group of tasks with a daily completion goal and streak counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Count of consecutive days the goal was met, ending at
    /// `last_streak_date`. Carried forward as authoritative state; history
    /// older than the retention window is pruned, so it is not wholesale
    /// re-derivable.
    #[serde(default)]
    pub streak: u32,

    /// Minimum completed tasks per day for the day to count. Always >= 1.
    #[serde(default = "default_streak_threshold")]
    pub streak_threshold: u32,

    pub created_at: DateTime<Utc>,

    /// Most recent day that earned the streak, if a streak is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_streak_date: Option<NaiveDate>,

    /// Trailing 30-day window of per-day records.
    #[serde(default)]
    pub daily_progress: Vec<DailyProgress>,
}

fn default_streak_threshold() -> u32 {
    MIN_STREAK_THRESHOLD
}

impl Group {
    /// Create an empty group with the given daily goal (clamped to >= 1).
    pub fn new(name: impl Into<String>, streak_threshold: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            tasks: Vec::new(),
            streak: 0,
            streak_threshold: streak_threshold.max(MIN_STREAK_THRESHOLD),
            created_at,
            last_streak_date: None,
            daily_progress: Vec::new(),
        }
    }

    /// Number of tasks whose completion falls on the given calendar day.
    pub fn completed_on(&self, day: NaiveDate, clock: &dyn Clock) -> u32 {
        self.tasks
            .iter()
            .filter(|t| t.completed)
            .filter_map(|t| t.completed_at)
            .filter(|ts| clock.day_of(*ts) == day)
            .count() as u32
    }

    /// The progress record for the given day, if one exists.
    pub fn progress_for(&self, day: NaiveDate) -> Option<&DailyProgress> {
        self.daily_progress.iter().find(|p| p.date == day)
    }
}
