//! Three-pool mastery scheduler for learn-style sessions.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grading::exact_match;
use crate::types::Card;

/// The user's mastery call after seeing the advisory grade.
///
/// The multiple-choice check is shown as feedback only; this explicit
/// self-report is what actually moves the card between pools. The user
/// may override the automatic result in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfReport {
    Knew,
    StillLearning,
}

/// Rotates cards through `unseen` -> `learning` -> `known` until every
/// card is mastered. The current card is held in flight, outside all
/// three pools; every other card sits in exactly one pool.
#[derive(Debug, Clone)]
pub struct LearnSession {
    unseen: VecDeque<Card>,
    learning: Vec<Card>,
    known: Vec<Card>,
    current: Option<Card>,
}

impl LearnSession {
    /// Start a session over a snapshot. An empty snapshot yields an
    /// already-complete session.
    pub fn new<R: Rng + ?Sized>(mut cards: Vec<Card>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        let mut unseen: VecDeque<Card> = cards.into();
        let current = unseen.pop_front();
        Self {
            unseen,
            learning: Vec::new(),
            known: Vec::new(),
            current,
        }
    }

    pub fn current(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    /// Advisory grade for the current card: exact, case-insensitive.
    /// Display-only; does not move the card.
    pub fn check(&self, answer: &str) -> Option<bool> {
        self.current.as_ref().map(|c| exact_match(answer, &c.term))
    }

    /// Apply the user's self-report to the current card and advance to
    /// the next one. Returns `false` when the session was already
    /// complete.
    pub fn report<R: Rng + ?Sized>(&mut self, report: SelfReport, rng: &mut R) -> bool {
        let Some(card) = self.current.take() else {
            return false;
        };
        match report {
            SelfReport::Knew => self.known.push(card),
            SelfReport::StillLearning => self.learning.push(card),
        }
        self.current = self.next_card(rng);
        true
    }

    /// Prefer a random pick from the retry bag; fall back to the next
    /// unseen card.
    fn next_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if !self.learning.is_empty() {
            let idx = rng.gen_range(0..self.learning.len());
            Some(self.learning.swap_remove(idx))
        } else {
            self.unseen.pop_front()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current.is_none()
    }

    pub fn unseen_count(&self) -> usize {
        self.unseen.len()
    }

    pub fn learning_count(&self) -> usize {
        self.learning.len()
    }

    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    /// Total cards in the snapshot this session was seeded with.
    pub fn total(&self) -> usize {
        self.unseen.len()
            + self.learning.len()
            + self.known.len()
            + usize::from(self.current.is_some())
    }
}
