//! Task commands for CLI.

use clap::Subcommand;

use super::open_store;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a group
    Add {
        /// Group ID
        group_id: String,
        /// Task title
        title: String,
    },
    /// List a group's tasks
    List {
        /// Group ID
        group_id: String,
    },
    /// Toggle a task's completion
    Toggle {
        /// Group ID
        group_id: String,
        /// Task ID
        task_id: String,
    },
    /// Delete a task
    Delete {
        /// Group ID
        group_id: String,
        /// Task ID
        task_id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;

    match action {
        TaskAction::Add { group_id, title } => {
            let task_id = store.add_task(&group_id, &title)?;
            println!("Task created: {task_id}");
        }
        TaskAction::List { group_id } => {
            let group = store
                .group(&group_id)
                .ok_or_else(|| format!("Group not found: {group_id}"))?;
            println!("{}", serde_json::to_string_pretty(&group.tasks)?);
        }
        TaskAction::Toggle { group_id, task_id } => {
            store.toggle_task(&group_id, &task_id)?;
            let group = store.group(&group_id).ok_or("group vanished after toggle")?;
            let task = group
                .tasks
                .iter()
                .find(|t| t.id == task_id)
                .ok_or("task vanished after toggle")?;
            let state = if task.completed { "completed" } else { "pending" };
            println!("Task {task_id} is now {state} (streak {})", group.streak);
        }
        TaskAction::Delete { group_id, task_id } => {
            store.delete_task(&group_id, &task_id)?;
            println!("Task deleted: {task_id}");
        }
    }

    Ok(())
}
