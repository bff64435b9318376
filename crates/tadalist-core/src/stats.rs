//! Read-only aggregates over the group collection.
//!
//! Everything here is derived on demand from the groups and the clock; no
//! state is kept and nothing is persisted.

use serde::Serialize;

use crate::dates::Clock;
use crate::model::Group;

/// Collection-wide summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total_groups: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Percentage of all tasks currently completed (0 when there are none).
    pub completion_rate: f64,
    /// Sum of all groups' current streaks.
    pub total_streak_days: u32,
    /// Groups with a streak currently running.
    pub active_streaks: usize,
    pub longest_streak: u32,
    /// Groups whose daily goal is already met today.
    pub today_goals_met: usize,
}

/// One group's standing against its daily goal today.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupToday {
    pub group_id: String,
    pub name: String,
    pub completed_today: u32,
    pub threshold: u32,
    pub streak: u32,
    pub goal_met: bool,
}

/// Compute the collection-wide summary.
pub fn collection_stats(groups: &[Group], clock: &dyn Clock) -> CollectionStats {
    let total_tasks: usize = groups.iter().map(|g| g.tasks.len()).sum();
    let completed_tasks: usize = groups
        .iter()
        .map(|g| g.tasks.iter().filter(|t| t.completed).count())
        .sum();
    let completion_rate = if total_tasks > 0 {
        completed_tasks as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };

    let today = clock.today();
    let today_goals_met = groups
        .iter()
        .filter(|g| g.completed_on(today, clock) >= g.streak_threshold)
        .count();

    CollectionStats {
        total_groups: groups.len(),
        total_tasks,
        completed_tasks,
        completion_rate,
        total_streak_days: groups.iter().map(|g| g.streak).sum(),
        active_streaks: groups.iter().filter(|g| g.streak > 0).count(),
        longest_streak: groups.iter().map(|g| g.streak).max().unwrap_or(0),
        today_goals_met,
    }
}

/// Per-group standing against today's goal, in collection order.
pub fn today_progress(groups: &[Group], clock: &dyn Clock) -> Vec<GroupToday> {
    let today = clock.today();
    groups
        .iter()
        .map(|g| {
            let completed_today = g.completed_on(today, clock);
            GroupToday {
                group_id: g.id.clone(),
                name: g.name.clone(),
                completed_today,
                threshold: g.streak_threshold,
                streak: g.streak,
                goal_met: completed_today >= g.streak_threshold,
            }
        })
        .collect()
}

/// Groups with a running streak, longest first, capped at `limit`.
pub fn streak_leaders(groups: &[Group], limit: usize) -> Vec<&Group> {
    let mut leaders: Vec<&Group> = groups.iter().filter(|g| g.streak > 0).collect();
    leaders.sort_by(|a, b| b.streak.cmp(&a.streak));
    leaders.truncate(limit);
    leaders
}
