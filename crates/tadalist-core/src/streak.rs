//! Streak reconciliation engine.
//!
//! [`reconcile`] is the sole authority over a group's `streak`,
//! `last_streak_date`, and `daily_progress` fields. It must run after every
//! structural mutation to a group's tasks or threshold (task add, toggle,
//! delete, threshold change) and never on rename or plain reads.
//!
//! The function is pure and infallible: it takes a group snapshot taken
//! after the task mutation and returns a snapshot with the derived streak
//! state made consistent with the current task list. The caller applies the
//! result and persists it; the engine performs no I/O.

use chrono::{Duration, NaiveDate};

use crate::dates::{are_consecutive_days, yesterday, Clock};
use crate::model::{DailyProgress, Group};

/// Days of daily-progress history retained relative to "today". Entries
/// strictly older are pruned on every reconciliation.
pub const RETENTION_DAYS: i64 = 30;

/// Recompute a group's streak state from its current task list.
///
/// The streak continues when yesterday earned it, starts over at 1 after a
/// gap, and is revoked and recomputed from the remaining history when today
/// previously qualified but no longer does (a completion was undone or the
/// threshold was raised).
pub fn reconcile(mut group: Group, clock: &dyn Clock) -> Group {
    let today = clock.today();
    let yesterday = yesterday(today);

    let today_completed = group.completed_on(today, clock);

    // Find or create today's progress entry, refreshing the count but
    // preserving an existing streak_earned flag.
    let entry_earned = match group.daily_progress.iter_mut().find(|p| p.date == today) {
        Some(entry) => {
            entry.completed_tasks = today_completed;
            entry.streak_earned
        }
        None => {
            group.daily_progress.push(DailyProgress {
                date: today,
                completed_tasks: today_completed,
                streak_earned: false,
            });
            false
        }
    };

    let qualifies = today_completed >= group.streak_threshold;

    if qualifies && !entry_earned {
        match group.last_streak_date {
            // Unbroken chain from yesterday
            Some(last) if last == yesterday => group.streak += 1,
            // Already counted today; unreachable while the earned flag
            // guards this branch, kept so a desynced flag cannot inflate
            // the streak
            Some(last) if last == today => {}
            // No prior streak, or a gap since the last qualifying day
            _ => group.streak = 1,
        }
        group.last_streak_date = Some(today);
        mark_today(&mut group, today, true);
    } else if !qualifies && group.last_streak_date == Some(today) {
        // Today previously qualified but no longer does. Revoke it and
        // recompute from the unbroken tail of remaining earned days.
        mark_today(&mut group, today, false);

        let mut earned: Vec<_> = group
            .daily_progress
            .iter()
            .filter(|p| p.streak_earned && p.date != today)
            .map(|p| p.date)
            .collect();
        earned.sort_unstable_by(|a, b| b.cmp(a));

        if let Some(&most_recent) = earned.first() {
            group.last_streak_date = Some(most_recent);
            let mut run = 1u32;
            for pair in earned.windows(2) {
                if are_consecutive_days(pair[0], pair[1]) {
                    run += 1;
                } else {
                    break;
                }
            }
            group.streak = run;
        } else {
            group.streak = 0;
            group.last_streak_date = None;
        }
    }

    let cutoff = today - Duration::days(RETENTION_DAYS);
    group.daily_progress.retain(|p| p.date >= cutoff);

    group
}

fn mark_today(group: &mut Group, today: NaiveDate, earned: bool) {
    if let Some(entry) = group.daily_progress.iter_mut().find(|p| p.date == today) {
        entry.streak_earned = earned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::FixedClock;
    use crate::model::Task;
    use chrono::{DateTime, NaiveDate, Utc};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at_noon(day: NaiveDate) -> DateTime<Utc> {
        day.and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    fn clock_on(day: NaiveDate) -> FixedClock {
        FixedClock::at(at_noon(day))
    }

    fn completed_task(day: NaiveDate) -> Task {
        let mut task = Task::new("done", at_noon(day));
        task.completed = true;
        task.completed_at = Some(at_noon(day));
        task
    }

    fn group_with(threshold: u32, tasks: Vec<Task>) -> Group {
        let mut group = Group::new("test", threshold, at_noon(date(2024, 3, 1)));
        group.tasks = tasks;
        group
    }

    #[test]
    fn first_qualifying_day_starts_streak_at_one() {
        let today = date(2024, 3, 15);
        let group = group_with(1, vec![completed_task(today)]);

        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.streak, 1);
        assert_eq!(group.last_streak_date, Some(today));
        let entry = group.progress_for(today).unwrap();
        assert_eq!(entry.completed_tasks, 1);
        assert!(entry.streak_earned);
    }

    #[test]
    fn below_threshold_day_does_not_earn() {
        let today = date(2024, 3, 15);
        let group = group_with(2, vec![completed_task(today)]);

        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.streak, 0);
        assert_eq!(group.last_streak_date, None);
        let entry = group.progress_for(today).unwrap();
        assert_eq!(entry.completed_tasks, 1);
        assert!(!entry.streak_earned);
    }

    #[test]
    fn qualifying_at_exact_threshold() {
        let today = date(2024, 3, 15);
        let group = group_with(2, vec![completed_task(today), completed_task(today)]);

        let group = reconcile(group, &clock_on(today));
        assert_eq!(group.streak, 1);
        assert!(group.progress_for(today).unwrap().streak_earned);
    }

    #[test]
    fn continues_streak_from_yesterday() {
        // dailyProgress = [{day-2, earned}, {day-1, earned}], streak = 2
        let today = date(2024, 3, 15);
        let mut group = group_with(1, vec![completed_task(today)]);
        group.daily_progress = vec![
            DailyProgress { date: date(2024, 3, 13), completed_tasks: 1, streak_earned: true },
            DailyProgress { date: date(2024, 3, 14), completed_tasks: 1, streak_earned: true },
        ];
        group.last_streak_date = Some(date(2024, 3, 14));
        group.streak = 2;

        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.streak, 3);
        assert_eq!(group.last_streak_date, Some(today));
    }

    #[test]
    fn gap_resets_streak_to_one() {
        // Last qualifying day was five days ago; stale carried streak
        let today = date(2024, 3, 15);
        let mut group = group_with(1, vec![completed_task(today)]);
        group.daily_progress = vec![DailyProgress {
            date: date(2024, 3, 10),
            completed_tasks: 1,
            streak_earned: true,
        }];
        group.last_streak_date = Some(date(2024, 3, 10));
        group.streak = 7;

        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.streak, 1);
        assert_eq!(group.last_streak_date, Some(today));
    }

    #[test]
    fn reconcile_is_idempotent_same_day() {
        let today = date(2024, 3, 15);
        let group = group_with(2, vec![completed_task(today), completed_task(today)]);

        let once = reconcile(group, &clock_on(today));
        let twice = reconcile(once.clone(), &clock_on(today));

        assert_eq!(once, twice);
    }

    #[test]
    fn already_earned_day_is_not_counted_twice() {
        let today = date(2024, 3, 15);
        let group = group_with(1, vec![completed_task(today)]);

        // Earn today, then complete a second task and reconcile again
        let mut group = reconcile(group, &clock_on(today));
        group.tasks.push(completed_task(today));
        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.streak, 1);
        assert_eq!(group.progress_for(today).unwrap().completed_tasks, 2);
    }

    #[test]
    fn revocation_with_no_history_clears_streak() {
        // threshold=2, two done today -> streak 1; then one task deleted
        let today = date(2024, 3, 15);
        let group = group_with(2, vec![completed_task(today), completed_task(today)]);
        let mut group = reconcile(group, &clock_on(today));
        assert_eq!(group.streak, 1);

        group.tasks.pop();
        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.streak, 0);
        assert_eq!(group.last_streak_date, None);
        let entry = group.progress_for(today).unwrap();
        assert_eq!(entry.completed_tasks, 1);
        assert!(!entry.streak_earned);
    }

    #[test]
    fn revocation_falls_back_to_consecutive_tail() {
        // Earned: day-2 and day-1 (consecutive). Today earned then revoked.
        let today = date(2024, 3, 15);
        let group = group_with(1, vec![completed_task(today)]);
        let mut group = reconcile(group, &clock_on(today));
        group.daily_progress.insert(
            0,
            DailyProgress { date: date(2024, 3, 13), completed_tasks: 1, streak_earned: true },
        );
        group.daily_progress.insert(
            1,
            DailyProgress { date: date(2024, 3, 14), completed_tasks: 1, streak_earned: true },
        );

        group.tasks[0].completed = false;
        group.tasks[0].completed_at = None;
        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.last_streak_date, Some(date(2024, 3, 14)));
        assert_eq!(group.streak, 2);
        assert!(!group.progress_for(today).unwrap().streak_earned);
    }

    #[test]
    fn revocation_tail_stops_at_first_gap() {
        // Earned: day-1, day-3, day-4. Only day-1 is in the unbroken tail.
        let today = date(2024, 3, 15);
        let group = group_with(1, vec![completed_task(today)]);
        let mut group = reconcile(group, &clock_on(today));
        for d in [date(2024, 3, 11), date(2024, 3, 12), date(2024, 3, 14)] {
            group.daily_progress.insert(
                0,
                DailyProgress { date: d, completed_tasks: 1, streak_earned: true },
            );
        }

        group.tasks[0].completed = false;
        group.tasks[0].completed_at = None;
        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.last_streak_date, Some(date(2024, 3, 14)));
        assert_eq!(group.streak, 1);
    }

    #[test]
    fn raising_threshold_revokes_today() {
        let today = date(2024, 3, 15);
        let group = group_with(1, vec![completed_task(today)]);
        let mut group = reconcile(group, &clock_on(today));
        assert_eq!(group.streak, 1);

        group.streak_threshold = 3;
        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.streak, 0);
        assert_eq!(group.last_streak_date, None);
    }

    #[test]
    fn lowering_threshold_earns_today_retroactively() {
        let today = date(2024, 3, 15);
        let group = group_with(5, vec![completed_task(today)]);
        let mut group = reconcile(group, &clock_on(today));
        assert_eq!(group.streak, 0);

        group.streak_threshold = 1;
        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.streak, 1);
        assert_eq!(group.last_streak_date, Some(today));
    }

    #[test]
    fn non_anchor_day_below_threshold_only_refreshes_count() {
        // Streak anchored at yesterday; today's partial progress must not
        // disturb it
        let today = date(2024, 3, 15);
        let mut group = group_with(2, vec![completed_task(today)]);
        group.daily_progress = vec![DailyProgress {
            date: date(2024, 3, 14),
            completed_tasks: 2,
            streak_earned: true,
        }];
        group.last_streak_date = Some(date(2024, 3, 14));
        group.streak = 4;

        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.streak, 4);
        assert_eq!(group.last_streak_date, Some(date(2024, 3, 14)));
        assert_eq!(group.progress_for(today).unwrap().completed_tasks, 1);
    }

    #[test]
    fn prunes_entries_older_than_retention_window() {
        let today = date(2024, 3, 31);
        let mut group = group_with(1, vec![]);
        let at_boundary = today - Duration::days(RETENTION_DAYS);
        let beyond = today - Duration::days(RETENTION_DAYS + 1);
        group.daily_progress = vec![
            DailyProgress { date: beyond, completed_tasks: 1, streak_earned: true },
            DailyProgress { date: at_boundary, completed_tasks: 1, streak_earned: true },
        ];

        let group = reconcile(group, &clock_on(today));

        assert!(group.progress_for(beyond).is_none());
        assert!(group.progress_for(at_boundary).is_some());
    }

    #[test]
    fn streak_survives_pruning_of_its_history() {
        // A long streak relies on the carried integer, not on history
        let today = date(2024, 6, 1);
        let mut group = group_with(1, vec![completed_task(today)]);
        group.daily_progress = vec![DailyProgress {
            date: yesterday(today),
            completed_tasks: 1,
            streak_earned: true,
        }];
        group.last_streak_date = Some(yesterday(today));
        group.streak = 45;

        let group = reconcile(group, &clock_on(today));
        assert_eq!(group.streak, 46);
    }

    #[test]
    fn yesterday_completions_do_not_count_today() {
        let today = date(2024, 3, 15);
        let group = group_with(1, vec![completed_task(date(2024, 3, 14))]);

        let group = reconcile(group, &clock_on(today));

        assert_eq!(group.progress_for(today).unwrap().completed_tasks, 0);
        assert_eq!(group.streak, 0);
    }

    proptest! {
        #[test]
        fn qualifies_iff_count_meets_threshold(
            threshold in 1u32..=5,
            completed in 0u32..=6,
        ) {
            let today = date(2024, 3, 15);
            let tasks = (0..completed).map(|_| completed_task(today)).collect();
            let group = group_with(threshold, tasks);

            let group = reconcile(group, &clock_on(today));

            let earned = group.progress_for(today).unwrap().streak_earned;
            prop_assert_eq!(earned, completed >= threshold);
            prop_assert_eq!(group.streak, u32::from(completed >= threshold));
        }

        #[test]
        fn reconcile_twice_equals_reconcile_once(
            threshold in 1u32..=3,
            completed in 0u32..=4,
            earned_offsets in proptest::collection::btree_set(1i64..=12, 0..6),
            stale_streak in 0u32..=10,
        ) {
            let today = date(2024, 3, 20);
            let tasks = (0..completed).map(|_| completed_task(today)).collect();
            let mut group = group_with(threshold, tasks);

            for offset in &earned_offsets {
                group.daily_progress.push(DailyProgress {
                    date: today - Duration::days(*offset),
                    completed_tasks: threshold,
                    streak_earned: true,
                });
            }
            group.last_streak_date =
                earned_offsets.iter().min().map(|o| today - Duration::days(*o));
            group.streak = stale_streak;

            let once = reconcile(group, &clock_on(today));
            let twice = reconcile(once.clone(), &clock_on(today));
            prop_assert_eq!(once, twice);
        }
    }
}
