//! AI card and distractor generation against the Google
//! generative-language API, behind a capability trait so the study
//! routes never depend on the provider directly.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DraftCard;

/// Base endpoint of the generative-language API.
pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Distractors per multiple-choice question.
pub const DISTRACTOR_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("notes must not be empty")]
    EmptyNotes,

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unusable model output: {0}")]
    BadResponse(String),
}

pub type Result<T> = std::result::Result<T, GenerationError>;

/// Capability interface for AI-assisted content generation. Both calls
/// may fail; callers either surface the error (card generation) or fall
/// back locally (distractors).
#[async_trait]
pub trait CardGenerator: Send + Sync {
    /// Turn raw notes into term/definition pairs. Rejects
    /// empty/whitespace-only notes before any network call.
    async fn generate_cards(&self, notes: &str) -> Result<Vec<DraftCard>>;

    /// Produce exactly [`DISTRACTOR_COUNT`] plausible wrong answers,
    /// none equal to `term` case-insensitively.
    async fn generate_distractors(
        &self,
        term: &str,
        definition: &str,
        known_terms: &[String],
    ) -> Result<Vec<String>>;
}

/// Uniform random sample of other terms, used whenever the upstream
/// distractor call fails. Clamped for small sets.
pub fn fallback_distractors<R: Rng + ?Sized>(
    term: &str,
    known_terms: &[String],
    rng: &mut R,
) -> Vec<String> {
    let mut pool: Vec<String> = known_terms
        .iter()
        .filter(|t| !t.eq_ignore_ascii_case(term))
        .cloned()
        .collect();
    pool.shuffle(rng);
    pool.truncate(DISTRACTOR_COUNT);
    pool
}

/// Client for the generative-language API. A missing API key is not an
/// error until a generation call is made, so the server can run without
/// AI features configured.
pub struct GeminiGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiGenerator {
    /// Build from `GEMINI_API_KEY` and `GEMINI_MODEL`.
    pub fn from_env() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: GEMINI_ENDPOINT.to_string(),
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or(GenerationError::MissingApiKey)?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::BadResponse(format!(
                "API error {status}: {text}"
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        body.candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| GenerationError::BadResponse("no candidates returned".to_string()))
    }
}

#[async_trait]
impl CardGenerator for GeminiGenerator {
    async fn generate_cards(&self, notes: &str) -> Result<Vec<DraftCard>> {
        if notes.trim().is_empty() {
            return Err(GenerationError::EmptyNotes);
        }

        let prompt = format!(
            "Extract study flashcards from the notes below. Respond with only a \
             JSON array of objects, each with string fields \"term\" and \
             \"definition\". No prose, no code fences.\n\nNotes:\n{notes}"
        );

        let text = self.complete(&prompt).await?;
        let cards: Vec<DraftCard> = serde_json::from_str(strip_code_fences(&text))
            .map_err(|e| GenerationError::BadResponse(format!("expected card array: {e}")))?;

        let cards: Vec<DraftCard> = cards
            .into_iter()
            .filter(|c| !c.term.trim().is_empty() && !c.definition.trim().is_empty())
            .collect();

        if cards.is_empty() {
            return Err(GenerationError::BadResponse(
                "no cards in model output".to_string(),
            ));
        }
        Ok(cards)
    }

    async fn generate_distractors(
        &self,
        term: &str,
        definition: &str,
        known_terms: &[String],
    ) -> Result<Vec<String>> {
        let prompt = format!(
            "A flashcard has the term {term:?} and the definition {definition:?}. \
             Produce {DISTRACTOR_COUNT} plausible but incorrect terms for a \
             multiple-choice question. None may equal {term:?}. Prefer terms \
             unlike these existing ones: {known_terms:?}. Respond with only a \
             JSON array of {DISTRACTOR_COUNT} strings."
        );

        let text = self.complete(&prompt).await?;
        let options: Vec<String> = serde_json::from_str(strip_code_fences(&text))
            .map_err(|e| GenerationError::BadResponse(format!("expected string array: {e}")))?;

        let mut options: Vec<String> = options
            .into_iter()
            .filter(|o| !o.trim().is_empty() && !o.trim().eq_ignore_ascii_case(term.trim()))
            .collect();
        options.truncate(DISTRACTOR_COUNT);

        if options.len() < DISTRACTOR_COUNT {
            return Err(GenerationError::BadResponse(format!(
                "expected {DISTRACTOR_COUNT} distractors, got {}",
                options.len()
            )));
        }
        Ok(options)
    }
}

/// Models often wrap JSON in markdown fences despite instructions.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences(" [1] "), "[1]");
    }

    #[test]
    fn fallback_excludes_the_term_itself() {
        let mut rng = StdRng::seed_from_u64(1);
        let terms: Vec<String> = ["Cell", "Mitosis", "Osmosis", "cell", "Enzyme"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let picks = fallback_distractors("CELL", &terms, &mut rng);
        assert_eq!(picks.len(), DISTRACTOR_COUNT);
        assert!(picks.iter().all(|p| !p.eq_ignore_ascii_case("cell")));
    }

    #[test]
    fn fallback_clamps_for_small_sets() {
        let mut rng = StdRng::seed_from_u64(1);
        let terms = vec!["a".to_string(), "b".to_string()];
        let picks = fallback_distractors("a", &terms, &mut rng);
        assert_eq!(picks, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn empty_notes_fail_before_any_request() {
        // Endpoint is unroutable; the guard must trip first.
        let generator = GeminiGenerator::from_env()
            .with_endpoint("http://127.0.0.1:1")
            .with_api_key("test");
        let err = generator.generate_cards("   ").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyNotes));
    }

    #[tokio::test]
    async fn missing_api_key_is_reported() {
        let generator = GeminiGenerator {
            client: reqwest::Client::new(),
            endpoint: GEMINI_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        };
        let err = generator.generate_cards("some notes").await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }
}
