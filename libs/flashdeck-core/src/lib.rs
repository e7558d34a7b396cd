//! Core study engine shared by the backend application.
//!
//! Provides:
//! - Typo-tolerant answer grading (Levenshtein distance)
//! - Session schedulers for write mode (two-pool retry queue) and
//!   learn mode (three-pool mastery queue)
//! - Test-mode question building and exact grading
//! - The match-pairs minigame
//! - JSON import/export for study sets
//!
//! Everything here is pure and synchronous; randomness comes from an
//! injected `rand::Rng` and persistence from an injected key-value
//! capability.

pub mod error;
pub mod grading;
pub mod match_game;
pub mod persist;
pub mod quiz;
pub mod scheduler;
pub mod store;
pub mod types;

pub use error::{Result, SetError};
pub use grading::{exact_match, grade_typed, levenshtein_distance};
pub use match_game::{MatchGame, SelectOutcome, Tile, TileKind, PAIR_COUNT};
pub use quiz::{build_questions, Prompt, Question, TestSession, CHOICE_COUNT};
pub use scheduler::{LearnSession, SelfReport, WriteSession};
pub use store::{record_best_time, KeyValueStore, MemoryStore, BEST_TIME_KEY};
pub use types::{Card, StudySet, MIN_CARDS};
