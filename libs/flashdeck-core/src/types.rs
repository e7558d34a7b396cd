//! Core types for the study engine.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetError};

/// Minimum number of cards a valid study set must hold.
pub const MIN_CARDS: usize = 2;

/// A single term/definition flashcard.
///
/// Immutable during a study session except for the star flag, which is
/// owned by the set, not the session engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub is_starred: bool,
}

impl Card {
    pub fn new(
        id: impl Into<String>,
        term: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            definition: definition.into(),
            is_starred: false,
        }
    }
}

/// A named collection of cards. The topic is the unique key within a library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySet {
    pub topic: String,
    pub cards: Vec<Card>,
}

impl StudySet {
    /// Check the shape constraints for a newly created or edited set.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(SetError::EmptyTopic);
        }
        if self.cards.len() < MIN_CARDS {
            return Err(SetError::TooFewCards {
                min: MIN_CARDS,
                found: self.cards.len(),
            });
        }
        Ok(())
    }

    /// The card list a session is seeded with, optionally filtered to
    /// starred cards only.
    pub fn snapshot(&self, starred_only: bool) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|c| !starred_only || c.is_starred)
            .cloned()
            .collect()
    }

    /// Flip the star flag on a card. Returns the new flag, or `None` if
    /// the id is unknown.
    pub fn toggle_star(&mut self, card_id: &str) -> Option<bool> {
        let card = self.cards.iter_mut().find(|c| c.id == card_id)?;
        card.is_starred = !card.is_starred;
        Some(card.is_starred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set() -> StudySet {
        StudySet {
            topic: "Biology".to_string(),
            cards: vec![
                Card::new("a", "cell", "basic unit of life"),
                Card::new("b", "mitosis", "cell division"),
            ],
        }
    }

    #[test]
    fn valid_set_passes() {
        assert!(set().validate().is_ok());
    }

    #[test]
    fn blank_topic_rejected() {
        let mut s = set();
        s.topic = "   ".to_string();
        assert!(matches!(s.validate(), Err(SetError::EmptyTopic)));
    }

    #[test]
    fn single_card_rejected() {
        let mut s = set();
        s.cards.truncate(1);
        assert!(matches!(
            s.validate(),
            Err(SetError::TooFewCards { min: 2, found: 1 })
        ));
    }

    #[test]
    fn starred_snapshot_filters() {
        let mut s = set();
        s.toggle_star("b");
        let snap = s.snapshot(true);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, "b");
        assert_eq!(s.snapshot(false).len(), 2);
    }

    #[test]
    fn toggle_star_unknown_id() {
        assert_eq!(set().toggle_star("missing"), None);
    }
}
