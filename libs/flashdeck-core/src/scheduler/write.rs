//! Two-pool retry scheduler for write-style sessions.

use std::collections::VecDeque;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::Card;

/// Caller-owned delay before advancing after a correct answer.
pub const CORRECT_ADVANCE_DELAY: Duration = Duration::from_millis(1200);

/// Caller-owned delay before advancing after an incorrect answer, long
/// enough to read the expected term. Must be cancelled on session reset.
pub const INCORRECT_ADVANCE_DELAY: Duration = Duration::from_millis(2500);

/// Cards are consumed from the front of `remaining`; misses collect in
/// `missed` and are reshuffled into a new round once `remaining` drains.
/// The session completes when every card has been answered correctly in
/// the round it was last presented.
#[derive(Debug, Clone)]
pub struct WriteSession {
    remaining: VecDeque<Card>,
    missed: Vec<Card>,
    round: u32,
}

impl WriteSession {
    /// Start a session over a snapshot. An empty snapshot yields an
    /// already-complete session rather than an error.
    pub fn new<R: Rng + ?Sized>(mut cards: Vec<Card>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        Self {
            remaining: cards.into(),
            missed: Vec::new(),
            round: 1,
        }
    }

    /// The card currently being asked, if any. Peeks without removal;
    /// the card leaves the pool only when an answer is recorded.
    pub fn current(&self) -> Option<&Card> {
        self.remaining.front()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty() && self.missed.is_empty()
    }

    /// Round number, starting at 1. Each reshuffle of misses begins a
    /// new round.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining.len()
    }

    pub fn missed_count(&self) -> usize {
        self.missed.len()
    }

    /// Record the grading outcome for the current card and advance.
    /// Returns `false` when there was no current card.
    pub fn record<R: Rng + ?Sized>(&mut self, correct: bool, rng: &mut R) -> bool {
        let Some(card) = self.remaining.pop_front() else {
            return false;
        };
        if !correct {
            self.missed.push(card);
        }
        if self.remaining.is_empty() && !self.missed.is_empty() {
            let mut next = std::mem::take(&mut self.missed);
            next.shuffle(rng);
            self.remaining = next.into();
            self.round += 1;
        }
        true
    }
}
