//! Request and response bodies for the API.

use flashdeck_core::{Card, Prompt, SelfReport, StudySet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A term/definition pair without an id yet, as produced by the card
/// generator or submitted on set creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftCard {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSetRequest {
    pub topic: String,
    pub cards: Vec<DraftCard>,
}

#[derive(Debug, Serialize)]
pub struct SetSummary {
    pub topic: String,
    pub card_count: usize,
    pub starred_count: usize,
}

impl From<&StudySet> for SetSummary {
    fn from(set: &StudySet) -> Self {
        Self {
            topic: set.topic.clone(),
            card_count: set.cards.len(),
            starred_count: set.cards.iter().filter(|c| c.is_starred).count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub filename: String,
    pub content: String,
}

/// One file of an import batch.
#[derive(Debug, Deserialize)]
pub struct ImportFile {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub files: Vec<ImportFile>,
}

#[derive(Debug, Serialize)]
pub struct ImportSkip {
    pub name: String,
    pub reason: String,
}

/// Per-file outcome of an import batch; bad files never abort the rest.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub skipped: Vec<ImportSkip>,
}

#[derive(Debug, Serialize)]
pub struct StarResponse {
    pub is_starred: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCardsRequest {
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateCardsResponse {
    pub cards: Vec<DraftCard>,
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub topic: String,
    #[serde(default)]
    pub starred_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// A card as presented mid-session. The term is the expected answer,
/// so it is withheld; grading happens server-side.
#[derive(Debug, Serialize)]
pub struct CardView {
    pub id: String,
    pub definition: String,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            definition: card.definition.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WriteStateResponse {
    pub session_id: Uuid,
    pub current: Option<CardView>,
    pub round: u32,
    pub remaining: usize,
    pub missed: usize,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct WriteAnswerResponse {
    pub correct: bool,
    /// The expected term, for the post-answer feedback screen.
    pub expected: String,
    #[serde(flatten)]
    pub state: WriteStateResponse,
}

#[derive(Debug, Serialize)]
pub struct LearnStateResponse {
    pub session_id: Uuid,
    pub current: Option<CardView>,
    /// Shuffled options for the current card (correct term included).
    pub options: Vec<String>,
    pub unseen: usize,
    pub learning: usize,
    pub known: usize,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct LearnCheckResponse {
    pub correct: bool,
}

#[derive(Debug, Deserialize)]
pub struct LearnReportRequest {
    pub report: SelfReport,
}

/// A question as presented to the client. The term is withheld;
/// grading happens server-side.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub card_id: String,
    pub definition: String,
    #[serde(flatten)]
    pub prompt: Prompt,
}

impl From<&flashdeck_core::Question> for QuestionView {
    fn from(question: &flashdeck_core::Question) -> Self {
        Self {
            card_id: question.card.id.clone(),
            definition: question.card.definition.clone(),
            prompt: question.prompt.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TestStateResponse {
    pub session_id: Uuid,
    pub current: Option<QuestionView>,
    pub answered: usize,
    pub total: usize,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct TestAnswerResponse {
    pub correct: bool,
    pub expected: String,
    pub score: usize,
    #[serde(flatten)]
    pub state: TestStateResponse,
}

#[derive(Debug, Serialize)]
pub struct MatchStateResponse {
    pub session_id: Uuid,
    pub tiles: Vec<flashdeck_core::Tile>,
    pub matched: usize,
    pub complete: bool,
    pub best_time_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct MatchSelectRequest {
    pub index: usize,
}

#[derive(Debug, Serialize)]
pub struct MatchSelectResponse {
    pub outcome: flashdeck_core::SelectOutcome,
    pub matched: usize,
    pub complete: bool,
    pub elapsed_ms: Option<u64>,
    /// True when completion set a new persisted best time.
    pub new_best: bool,
}
