use clap::Subcommand;
use lifedash_core::dashboard::{CardSelection, CARD_CATALOG};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum CardsAction {
    /// Show the selected cards and the full catalog
    List,
    /// Add a card to the dashboard
    Add { id: String },
    /// Remove a card from the dashboard
    Remove { id: String },
}

pub fn run(action: CardsAction) -> CliResult {
    let path = common::cards_path()?;
    let mut selection = CardSelection::load(&path);

    match action {
        CardsAction::List => {
            println!("selected:");
            for card in selection.cards() {
                println!("  {} - {} ({})", card.id, card.title, card.route);
            }
            println!("catalog:");
            for card in CARD_CATALOG {
                println!("  {} - {}", card.id, card.title);
            }
        }
        CardsAction::Add { id } => {
            selection.add(&id)?;
            selection.save(&path)?;
            println!("added {id}");
        }
        CardsAction::Remove { id } => {
            if selection.remove(&id) {
                selection.save(&path)?;
                println!("removed {id}");
            } else {
                println!("{id} was not selected");
            }
        }
    }
    Ok(())
}
