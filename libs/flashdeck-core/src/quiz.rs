//! Test-mode question paper: built once from a snapshot, graded exactly.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grading::exact_match;
use crate::types::Card;

/// Options per multiple-choice question, including the correct term.
pub const CHOICE_COUNT: usize = 4;

/// How a question is presented and answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Prompt {
    /// Pick the term among shuffled options. The correct term appears
    /// exactly once.
    MultipleChoice { options: Vec<String> },
    /// Type the term.
    FreeText,
}

/// One question of the paper. Built once per session, immutable after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub card: Card,
    pub prompt: Prompt,
}

/// Build the question paper: shuffle the snapshot, make the first
/// `floor(N/2)` cards multiple-choice and the rest free-text, then
/// shuffle the combined list for presentation order.
pub fn build_questions<R: Rng + ?Sized>(snapshot: &[Card], rng: &mut R) -> Vec<Question> {
    let mut cards: Vec<Card> = snapshot.to_vec();
    cards.shuffle(rng);

    let choice_count = cards.len() / 2;
    let mut questions: Vec<Question> = cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let prompt = if i < choice_count {
                Prompt::MultipleChoice {
                    options: build_options(card, &cards, rng),
                }
            } else {
                Prompt::FreeText
            };
            Question {
                card: card.clone(),
                prompt,
            }
        })
        .collect();

    questions.shuffle(rng);
    questions
}

/// Distractors are terms of other cards, drawn uniformly without
/// replacement and clamped to what the snapshot can provide. Cards
/// sharing the correct term are excluded by text, not just by id, so
/// the correct term shows up exactly once even in sets with duplicate
/// terms.
fn build_options<R: Rng + ?Sized>(card: &Card, all: &[Card], rng: &mut R) -> Vec<String> {
    let mut pool: Vec<&Card> = all
        .iter()
        .filter(|c| c.id != card.id && !c.term.eq_ignore_ascii_case(&card.term))
        .collect();
    pool.shuffle(rng);
    pool.truncate(CHOICE_COUNT - 1);

    let mut options: Vec<String> = pool.iter().map(|c| c.term.clone()).collect();
    options.push(card.term.clone());
    options.shuffle(rng);
    options
}

/// Walks a built paper once, grading each submission exactly
/// (case-insensitive, trimmed; typos are not forgiven in test mode).
#[derive(Debug, Clone)]
pub struct TestSession {
    questions: Vec<Question>,
    index: usize,
    correct: usize,
}

impl TestSession {
    pub fn new<R: Rng + ?Sized>(snapshot: &[Card], rng: &mut R) -> Self {
        Self {
            questions: build_questions(snapshot, rng),
            index: 0,
            correct: 0,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// Grade the submission against the current question and advance.
    /// Returns `None` once the paper is finished.
    pub fn submit(&mut self, answer: &str) -> Option<bool> {
        let question = self.questions.get(self.index)?;
        let correct = exact_match(answer, &question.card.term);
        if correct {
            self.correct += 1;
        }
        self.index += 1;
        Some(correct)
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.questions.len()
    }

    /// Questions answered so far.
    pub fn answered(&self) -> usize {
        self.index
    }

    /// (correct, total) answered so far.
    pub fn score(&self) -> (usize, usize) {
        (self.correct, self.questions.len())
    }
}
