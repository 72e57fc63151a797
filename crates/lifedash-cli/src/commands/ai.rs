use clap::Subcommand;
use lifedash_core::Config;

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum AiAction {
    /// Generate an insight from recent sessions (consumes one use)
    Analyze,
    /// Show remaining analysis uses
    Remaining,
}

pub fn run(action: AiAction) -> CliResult {
    let config = Config::load()?;
    let client = common::api_client(&config)?;
    let runtime = common::runtime()?;

    match action {
        AiAction::Analyze => {
            let insight = runtime.block_on(client.request_analysis())?;
            println!("{}", insight.insight);
            if let Some(remaining) = insight.remaining_uses {
                println!("({remaining} uses remaining)");
            }
        }
        AiAction::Remaining => {
            let usage = runtime.block_on(client.ai_remaining())?;
            println!("{}", serde_json::to_string_pretty(&usage)?);
        }
    }
    Ok(())
}
