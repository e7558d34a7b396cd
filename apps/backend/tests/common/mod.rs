//! Shared harness for API integration tests: an in-process server over
//! a temporary data directory, with the AI capability stubbed out.

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use flashdeck_backend::models::DraftCard;
use flashdeck_backend::services::ai::{CardGenerator, GenerationError};
use flashdeck_backend::services::library::{Library, ScoreStore};
use flashdeck_backend::{build_router, AppState};

/// Deterministic generator: cards derived from the notes, distractors
/// derived from the term.
pub struct StubGenerator;

#[async_trait]
impl CardGenerator for StubGenerator {
    async fn generate_cards(
        &self,
        notes: &str,
    ) -> Result<Vec<DraftCard>, GenerationError> {
        if notes.trim().is_empty() {
            return Err(GenerationError::EmptyNotes);
        }
        Ok(vec![
            DraftCard {
                term: "Mitosis".to_string(),
                definition: "Cell division producing identical daughters".to_string(),
            },
            DraftCard {
                term: "Osmosis".to_string(),
                definition: "Diffusion of water across a membrane".to_string(),
            },
        ])
    }

    async fn generate_distractors(
        &self,
        term: &str,
        _definition: &str,
        _known_terms: &[String],
    ) -> Result<Vec<String>, GenerationError> {
        Ok((1..=3).map(|i| format!("not-{term}-{i}")).collect())
    }
}

/// Generator whose every call fails, for exercising fallbacks.
pub struct FailingGenerator;

#[async_trait]
impl CardGenerator for FailingGenerator {
    async fn generate_cards(
        &self,
        _notes: &str,
    ) -> Result<Vec<DraftCard>, GenerationError> {
        Err(GenerationError::BadResponse("stubbed failure".to_string()))
    }

    async fn generate_distractors(
        &self,
        _term: &str,
        _definition: &str,
        _known_terms: &[String],
    ) -> Result<Vec<String>, GenerationError> {
        Err(GenerationError::BadResponse("stubbed failure".to_string()))
    }
}

pub struct TestContext {
    pub server: TestServer,
    // Keeps the data directory alive for the test's duration.
    _dir: TempDir,
}

pub fn spawn(generator: Arc<dyn CardGenerator>) -> TestContext {
    let dir = TempDir::new().unwrap();
    let library = Library::open(dir.path()).unwrap();
    let scores = ScoreStore::open(dir.path().join("scores.json"));
    let server = TestServer::new(build_router(AppState::new(library, scores, generator))).unwrap();
    TestContext { server, _dir: dir }
}

pub fn spawn_default() -> TestContext {
    spawn(Arc::new(StubGenerator))
}

/// Create a set of `n` cards named `term-0..n` via the API.
pub async fn create_set(server: &TestServer, topic: &str, n: usize) {
    let cards: Vec<Value> = (0..n)
        .map(|i| json!({ "term": format!("term-{i}"), "definition": format!("def-{i}") }))
        .collect();
    let response = server
        .post("/api/sets")
        .json(&json!({ "topic": topic, "cards": cards }))
        .await;
    response.assert_status_ok();
}
