use chrono::Utc;
use clap::Subcommand;
use lifedash_core::{Config, StreakState};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today/week/all-time session counts
    Counts,
    /// Streak status with the boundary countdown
    Streak,
    /// Paginated session history
    History {
        #[arg(long, default_value = "0")]
        page: u32,
        #[arg(long, default_value = "20")]
        size: u32,
    },
}

pub fn run(action: StatsAction) -> CliResult {
    let config = Config::load()?;
    let client = common::api_client(&config)?;
    let runtime = common::runtime()?;

    match action {
        StatsAction::Counts => {
            let counts = runtime.block_on(client.session_counts())?;
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
        StatsAction::Streak => {
            let summary = runtime.block_on(client.streak_summary())?;
            let state = StreakState::derive(
                summary.streak_count,
                summary.has_completed_today,
                Utc::now(),
                config.reference_tz(),
            );
            println!("{}", serde_json::to_string_pretty(&state)?);
            println!("{}", state.message);
        }
        StatsAction::History { page, size } => {
            let history = runtime.block_on(client.session_history(page, size))?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
    }
    Ok(())
}
