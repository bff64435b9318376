//! Statistics commands for CLI.

use clap::Subcommand;
use tadalist_core::{stats, LocalClock};

use super::open_store;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Collection-wide summary
    Summary,
    /// Each group's standing against today's goal
    Today,
    /// Groups with the longest running streaks
    Leaders {
        /// Maximum number of groups to show
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let clock = LocalClock;

    match action {
        StatsAction::Summary => {
            let summary = stats::collection_stats(store.groups(), &clock);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Today => {
            let progress = stats::today_progress(store.groups(), &clock);
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        StatsAction::Leaders { limit } => {
            let leaders = stats::streak_leaders(store.groups(), limit);
            println!("{}", serde_json::to_string_pretty(&leaders)?);
        }
    }

    Ok(())
}
