//! Dashboard card catalog and the user's chosen subset.
//!
//! The catalog is static; the selection is a small JSON file in the data
//! directory (the desktop stand-in for the browser's local storage).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One feature shortcut available on the home dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub route: &'static str,
}

/// Every card the application offers.
pub const CARD_CATALOG: &[CardInfo] = &[
    CardInfo {
        id: "finance",
        title: "Finance Tracker",
        route: "/finance",
    },
    CardInfo {
        id: "subscriptions",
        title: "Subscriptions",
        route: "/finance/subscriptions",
    },
    CardInfo {
        id: "pomodoro",
        title: "Pomodoro Timer",
        route: "/pomodoro",
    },
    CardInfo {
        id: "todo",
        title: "To-Do List",
        route: "/todo",
    },
    CardInfo {
        id: "insights",
        title: "AI Insights",
        route: "/pomodoro/insights",
    },
];

pub fn card_by_id(id: &str) -> Option<&'static CardInfo> {
    CARD_CATALOG.iter().find(|c| c.id == id)
}

/// The user's chosen cards, in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSelection {
    ids: Vec<String>,
}

impl CardSelection {
    /// Cards shown before the user customizes anything.
    pub fn default_selection() -> Self {
        Self {
            ids: vec!["pomodoro".into(), "todo".into(), "finance".into()],
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn cards(&self) -> Vec<&'static CardInfo> {
        self.ids.iter().filter_map(|id| card_by_id(id)).collect()
    }

    /// Add a card to the end of the selection. Unknown ids are rejected;
    /// re-adding a selected card is a no-op.
    pub fn add(&mut self, id: &str) -> Result<(), ValidationError> {
        if card_by_id(id).is_none() {
            return Err(ValidationError::UnknownCard(id.to_string()));
        }
        if !self.ids.iter().any(|existing| existing == id) {
            self.ids.push(id.to_string());
        }
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn load(path: &PathBuf) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_else(Self::default_selection)
    }

    pub fn save(&self, path: &PathBuf) -> Result<(), std::io::Error> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)
    }
}

impl Default for CardSelection {
    fn default() -> Self {
        Self::default_selection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        for (i, a) in CARD_CATALOG.iter().enumerate() {
            for b in &CARD_CATALOG[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn add_remove() {
        let mut selection = CardSelection::default_selection();
        selection.add("insights").unwrap();
        assert!(selection.ids().contains(&"insights".to_string()));

        // Duplicate add does not grow the list.
        let len = selection.ids().len();
        selection.add("insights").unwrap();
        assert_eq!(selection.ids().len(), len);

        assert!(selection.remove("insights"));
        assert!(!selection.remove("insights"));
    }

    #[test]
    fn unknown_card_rejected() {
        let mut selection = CardSelection::default_selection();
        assert_eq!(
            selection.add("weather"),
            Err(ValidationError::UnknownCard("weather".into()))
        );
    }

    #[test]
    fn persists_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");

        let mut selection = CardSelection::default_selection();
        selection.add("subscriptions").unwrap();
        selection.save(&path).unwrap();

        let loaded = CardSelection::load(&path);
        assert_eq!(loaded.ids(), selection.ids());
    }

    #[test]
    fn missing_file_yields_default_selection() {
        let path = PathBuf::from("/nonexistent/cards.json");
        let loaded = CardSelection::load(&path);
        assert_eq!(loaded.ids(), CardSelection::default_selection().ids());
    }
}
