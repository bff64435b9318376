//! Habit group commands for CLI.

use clap::Subcommand;

use super::open_store;

#[derive(Subcommand)]
pub enum GroupAction {
    /// Create a new group
    Add {
        /// Group name
        name: String,
        /// Daily completion goal (minimum 1)
        #[arg(long, default_value = "1")]
        threshold: u32,
    },
    /// List all groups
    List,
    /// Get group details
    Show {
        /// Group ID
        id: String,
    },
    /// Rename a group
    Rename {
        /// Group ID
        id: String,
        /// New name
        name: String,
    },
    /// Change a group's daily completion goal
    Threshold {
        /// Group ID
        id: String,
        /// New goal (minimum 1)
        value: u32,
    },
    /// Clear a group's streak, completions, and history
    Reset {
        /// Group ID
        id: String,
    },
    /// Delete a group
    Delete {
        /// Group ID
        id: String,
    },
}

pub fn run(action: GroupAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;

    match action {
        GroupAction::Add { name, threshold } => {
            let id = store.add_group(&name, threshold);
            let group = store.group(&id).ok_or("group vanished after add")?;
            println!("Group created: {id}");
            println!("{}", serde_json::to_string_pretty(group)?);
        }
        GroupAction::List => {
            println!("{}", serde_json::to_string_pretty(store.groups())?);
        }
        GroupAction::Show { id } => match store.group(&id) {
            Some(group) => println!("{}", serde_json::to_string_pretty(group)?),
            None => println!("Group not found: {id}"),
        },
        GroupAction::Rename { id, name } => {
            store.rename_group(&id, &name)?;
            println!("Group renamed: {id}");
        }
        GroupAction::Threshold { id, value } => {
            store.update_streak_threshold(&id, value)?;
            let group = store.group(&id).ok_or("group vanished after update")?;
            println!(
                "Threshold set to {} (streak now {})",
                group.streak_threshold, group.streak
            );
        }
        GroupAction::Reset { id } => {
            store.reset_group(&id)?;
            println!("Group reset: {id}");
        }
        GroupAction::Delete { id } => {
            store.delete_group(&id)?;
            println!("Group deleted: {id}");
        }
    }

    Ok(())
}
