//! Group collection state container.
//!
//! [`AppStore`] owns the in-memory group collection and is the single
//! mutation path: every operation that touches a group's tasks or threshold
//! funnels through the pure [`reconcile`] engine and then persists the whole
//! collection. Persistence is an explicit effect after the in-memory update,
//! never a side channel inside the engine.
//!
//! Failure policy, by design asymmetric:
//! - load failure or a missing blob starts an empty collection, never an
//!   error surfaced to the caller;
//! - a persist failure is logged and swallowed, and the in-memory state
//!   remains authoritative.

use crate::dates::{Clock, LocalClock};
use crate::error::{CoreError, Result};
use crate::model::{Group, Task, MIN_STREAK_THRESHOLD};
use crate::storage::BlobStore;
use crate::streak::reconcile;

/// Fixed key under which the whole collection is stored.
pub const STORAGE_KEY: &str = "tada-list-data";

/// Owner of the group collection and its single mutation path.
pub struct AppStore<S: BlobStore> {
    groups: Vec<Group>,
    blobs: S,
    clock: Box<dyn Clock>,
}

impl<S: BlobStore> AppStore<S> {
    /// Load the collection from the blob store with the production clock.
    pub fn load(blobs: S) -> Self {
        Self::with_clock(blobs, Box::new(LocalClock))
    }

    /// Load the collection with an explicit clock (tests simulate "today"
    /// through this).
    pub fn with_clock(blobs: S, clock: Box<dyn Clock>) -> Self {
        let groups = match blobs.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(groups) => groups,
                Err(e) => {
                    eprintln!("tadalist: stored data is malformed, starting empty: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                eprintln!("tadalist: failed to read stored data, starting empty: {e}");
                Vec::new()
            }
        };
        Self { groups, blobs, clock }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Create a group with the given daily goal (clamped to >= 1).
    /// Returns the new group's id.
    pub fn add_group(&mut self, name: &str, streak_threshold: u32) -> String {
        let group = Group::new(name, streak_threshold, self.clock.now());
        let id = group.id.clone();
        self.groups.push(group);
        self.persist();
        id
    }

    pub fn delete_group(&mut self, id: &str) -> Result<()> {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        if self.groups.len() == before {
            return Err(CoreError::GroupNotFound(id.to_string()));
        }
        self.persist();
        Ok(())
    }

    /// Rename a group. Renames are not structural, so no reconciliation
    /// runs and no progress entry is created.
    pub fn rename_group(&mut self, id: &str, name: &str) -> Result<()> {
        self.update_group(id, false, |group| {
            group.name = name.to_string();
            Ok(())
        })
    }

    /// Change a group's daily goal. Reconciles immediately: lowering the
    /// threshold can retroactively earn today's streak, raising it can
    /// retroactively lose it.
    pub fn update_streak_threshold(&mut self, id: &str, streak_threshold: u32) -> Result<()> {
        self.update_group(id, true, |group| {
            group.streak_threshold = streak_threshold.max(MIN_STREAK_THRESHOLD);
            Ok(())
        })
    }

    /// Clear a group back to a blank slate: streak, anchor date, task
    /// completions, and all progress history.
    pub fn reset_group(&mut self, id: &str) -> Result<()> {
        self.update_group(id, false, |group| {
            group.streak = 0;
            group.last_streak_date = None;
            for task in &mut group.tasks {
                task.completed = false;
                task.completed_at = None;
            }
            group.daily_progress.clear();
            Ok(())
        })
    }

    /// Add a task to a group. Returns the new task's id.
    pub fn add_task(&mut self, group_id: &str, title: &str) -> Result<String> {
        let task = Task::new(title, self.clock.now());
        let task_id = task.id.clone();
        self.update_group(group_id, true, move |group| {
            group.tasks.push(task);
            Ok(())
        })?;
        Ok(task_id)
    }

    /// Flip a task's completion state, stamping or clearing `completed_at`.
    pub fn toggle_task(&mut self, group_id: &str, task_id: &str) -> Result<()> {
        let now = self.clock.now();
        self.update_group(group_id, true, |group| {
            let task = group
                .tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| CoreError::TaskNotFound(task_id.to_string()))?;
            task.completed = !task.completed;
            task.completed_at = task.completed.then_some(now);
            Ok(())
        })
    }

    pub fn delete_task(&mut self, group_id: &str, task_id: &str) -> Result<()> {
        self.update_group(group_id, true, |group| {
            let before = group.tasks.len();
            group.tasks.retain(|t| t.id != task_id);
            if group.tasks.len() == before {
                return Err(CoreError::TaskNotFound(task_id.to_string()));
            }
            Ok(())
        })
    }

    /// Apply a mutation to one group, reconcile if the mutation was
    /// structural, and persist the collection.
    fn update_group<F>(&mut self, id: &str, structural: bool, f: F) -> Result<()>
    where
        F: FnOnce(&mut Group) -> Result<()>,
    {
        let idx = self
            .groups
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| CoreError::GroupNotFound(id.to_string()))?;

        let mut group = self.groups[idx].clone();
        f(&mut group)?;
        if structural {
            group = reconcile(group, self.clock.as_ref());
        }
        self.groups[idx] = group;
        self.persist();
        Ok(())
    }

    fn persist(&mut self) {
        let raw = match serde_json::to_string_pretty(&self.groups) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("tadalist: failed to serialize groups: {e}");
                return;
            }
        };
        if let Err(e) = self.blobs.set(STORAGE_KEY, &raw) {
            // In-memory state stays authoritative; the next successful
            // persist catches the blob up.
            eprintln!("tadalist: failed to persist groups: {e}");
        }
    }
}
