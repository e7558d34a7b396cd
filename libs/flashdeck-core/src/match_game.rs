//! Match-pairs minigame over a small random selection of cards.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Card;

/// Cards drawn per game; the grid holds twice this many tiles.
pub const PAIR_COUNT: usize = 6;

/// Caller-owned duration of the "incorrect" flash on a mismatched pair.
/// Display only; the flash must be cancelled if the game is reset.
pub const MISMATCH_FLASH: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Term,
    Definition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub card_id: String,
    pub kind: TileKind,
    pub text: String,
}

/// Result of selecting a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectOutcome {
    /// First tile of a pair is now held.
    Picked,
    /// The held tile and this one reference the same card with different
    /// tile kinds; the pair is matched.
    Matched,
    /// The pair did not match. Display-only: the caller flashes both
    /// tiles for [`MISMATCH_FLASH`] and clears; matched state is untouched.
    Mismatched,
    /// Already-matched tile, out-of-range index, or finished game.
    Ignored,
}

/// Pairing state machine: a held tile, a set of matched card ids, and
/// the time from first interaction to completion.
#[derive(Debug, Clone)]
pub struct MatchGame {
    tiles: Vec<Tile>,
    selected: Option<usize>,
    matched: HashSet<String>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
}

impl MatchGame {
    /// Draw up to [`PAIR_COUNT`] cards at random and lay out a shuffled
    /// grid with one term tile and one definition tile per card.
    pub fn new<R: Rng + ?Sized>(snapshot: &[Card], rng: &mut R) -> Self {
        let mut picked: Vec<&Card> = snapshot.iter().collect();
        picked.shuffle(rng);
        picked.truncate(PAIR_COUNT);

        let mut tiles = Vec::with_capacity(picked.len() * 2);
        for card in &picked {
            tiles.push(Tile {
                card_id: card.id.clone(),
                kind: TileKind::Term,
                text: card.term.clone(),
            });
            tiles.push(Tile {
                card_id: card.id.clone(),
                kind: TileKind::Definition,
                text: card.definition.clone(),
            });
        }
        tiles.shuffle(rng);

        Self {
            tiles,
            selected: None,
            matched: HashSet::new(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn matched_ids(&self) -> &HashSet<String> {
        &self.matched
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// The index of the held tile, if one is selected.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_complete(&self) -> bool {
        self.matched.len() * 2 == self.tiles.len()
    }

    /// Time from first selection until completion, or elapsed so far for
    /// a game in progress. `None` before the first interaction.
    pub fn elapsed(&self) -> Option<Duration> {
        let started = self.started_at?;
        Some(match self.finished_at {
            Some(finished) => finished.duration_since(started),
            None => started.elapsed(),
        })
    }

    /// Select the tile at `index`, pairing it with a previously held
    /// tile if there is one.
    pub fn select(&mut self, index: usize) -> SelectOutcome {
        if self.finished_at.is_some() {
            return SelectOutcome::Ignored;
        }
        let Some(tile) = self.tiles.get(index) else {
            return SelectOutcome::Ignored;
        };
        if self.matched.contains(&tile.card_id) {
            return SelectOutcome::Ignored;
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }

        match self.selected {
            None => {
                self.selected = Some(index);
                SelectOutcome::Picked
            }
            Some(held) if held == index => SelectOutcome::Picked,
            Some(held) => {
                self.selected = None;
                let first = &self.tiles[held];
                let second = &self.tiles[index];
                let is_match = first.card_id == second.card_id && first.kind != second.kind;
                let card_id = second.card_id.clone();
                if is_match {
                    self.matched.insert(card_id);
                    if self.is_complete() {
                        self.finished_at = Some(Instant::now());
                    }
                    SelectOutcome::Matched
                } else {
                    SelectOutcome::Mismatched
                }
            }
        }
    }
}
