//! Study session routes: one engine per session, advanced by user
//! answers. An empty snapshot starts an already-complete session so the
//! client can render a "nothing to study" state instead of erroring;
//! such sessions are never stored, and stored sessions are evicted by
//! the request that completes them.

use axum::extract::{Path, State};
use axum::Json;
use flashdeck_core::{
    grade_typed, record_best_time, Card, KeyValueStore, LearnSession, MatchGame, SelectOutcome,
    TestSession, WriteSession, BEST_TIME_KEY,
};
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{
    AnswerRequest, CardView, LearnCheckResponse, LearnReportRequest, LearnStateResponse,
    MatchSelectRequest, MatchSelectResponse, MatchStateResponse, QuestionView,
    StartSessionRequest, TestAnswerResponse, TestStateResponse, WriteAnswerResponse,
    WriteStateResponse,
};
use crate::services::ai::fallback_distractors;
use crate::services::sessions::{LearnView, Session};
use crate::AppState;

async fn snapshot(state: &AppState, request: &StartSessionRequest) -> Result<Vec<Card>> {
    let library = state.library.read().await;
    let set = library
        .get(&request.topic)
        .ok_or_else(|| ApiError::NotFound(format!("set {:?}", request.topic)))?;
    Ok(set.snapshot(request.starred_only))
}

fn session_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("session {id}"))
}

fn already_complete() -> ApiError {
    ApiError::BadRequest("session is already complete".to_string())
}

fn reject_blank(answer: &str) -> Result<()> {
    if answer.trim().is_empty() {
        return Err(ApiError::BadRequest("answer must not be empty".to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write mode
// ---------------------------------------------------------------------------

fn write_state(id: Uuid, session: &WriteSession) -> WriteStateResponse {
    WriteStateResponse {
        session_id: id,
        current: session.current().map(CardView::from),
        round: session.round(),
        remaining: session.remaining_count(),
        missed: session.missed_count(),
        complete: session.is_complete(),
    }
}

pub async fn start_write(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<WriteStateResponse>> {
    let cards = snapshot(&state, &request).await?;
    let session = WriteSession::new(cards, &mut rand::thread_rng());

    let id = if session.is_complete() {
        Uuid::new_v4()
    } else {
        let mut sessions = state.sessions.lock().await;
        sessions.insert(Session::Write(session.clone()))
    };
    tracing::info!(%id, "started write session");
    Ok(Json(write_state(id, &session)))
}

/// Grade a typed answer with typo tolerance and advance the retry queue.
pub async fn answer_write(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<WriteAnswerResponse>> {
    reject_blank(&request.answer)?;

    let mut sessions = state.sessions.lock().await;
    let Some(Session::Write(session)) = sessions.get_mut(&id) else {
        return Err(session_not_found(id));
    };
    let current = session.current().ok_or_else(already_complete)?;

    let expected = current.term.clone();
    let correct = grade_typed(&request.answer, &expected);
    session.record(correct, &mut rand::thread_rng());

    let response = WriteAnswerResponse {
        correct,
        expected,
        state: write_state(id, session),
    };
    if response.state.complete {
        sessions.remove(&id);
    }
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Learn mode
// ---------------------------------------------------------------------------

/// Options for the current learn card: three distractors from the
/// generation capability when it works, a local random sample when it
/// does not, plus the correct term, shuffled.
async fn build_learn_options(state: &AppState, card: Option<&Card>, terms: &[String]) -> Vec<String> {
    let Some(card) = card else {
        return Vec::new();
    };

    let distractors = match state
        .generator
        .generate_distractors(&card.term, &card.definition, terms)
        .await
    {
        Ok(distractors) => distractors,
        Err(e) => {
            tracing::debug!("distractor generation failed, using local fallback: {e}");
            fallback_distractors(&card.term, terms, &mut rand::thread_rng())
        }
    };

    let mut options = distractors;
    options.push(card.term.clone());
    options.shuffle(&mut rand::thread_rng());
    options
}

fn learn_state(id: Uuid, session: &LearnSession, options: &[String]) -> LearnStateResponse {
    LearnStateResponse {
        session_id: id,
        current: session.current().map(CardView::from),
        options: options.to_vec(),
        unseen: session.unseen_count(),
        learning: session.learning_count(),
        known: session.known_count(),
        complete: session.is_complete(),
    }
}

pub async fn start_learn(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<LearnStateResponse>> {
    let cards = snapshot(&state, &request).await?;
    let terms: Vec<String> = cards.iter().map(|c| c.term.clone()).collect();
    let session = LearnSession::new(cards, &mut rand::thread_rng());
    let options = build_learn_options(&state, session.current(), &terms).await;

    let id = if session.is_complete() {
        Uuid::new_v4()
    } else {
        let mut sessions = state.sessions.lock().await;
        sessions.insert(Session::Learn(LearnView {
            session: session.clone(),
            terms,
            options: options.clone(),
        }))
    };
    tracing::info!(%id, "started learn session");
    Ok(Json(learn_state(id, &session, &options)))
}

/// Advisory grade for the current card. Shown as feedback; pool
/// membership does not change until the user self-reports.
pub async fn check_learn(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<LearnCheckResponse>> {
    reject_blank(&request.answer)?;

    let mut sessions = state.sessions.lock().await;
    let Some(Session::Learn(view)) = sessions.get_mut(&id) else {
        return Err(session_not_found(id));
    };
    let correct = view
        .session
        .check(&request.answer)
        .ok_or_else(already_complete)?;
    Ok(Json(LearnCheckResponse { correct }))
}

/// Apply the user's self-report, advance the mastery queue, and build
/// options for the next card. The store lock is held across the
/// upstream call so concurrent reports cannot interleave on one session.
pub async fn report_learn(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LearnReportRequest>,
) -> Result<Json<LearnStateResponse>> {
    let mut sessions = state.sessions.lock().await;
    let Some(Session::Learn(view)) = sessions.get_mut(&id) else {
        return Err(session_not_found(id));
    };
    if !view.session.report(request.report, &mut rand::thread_rng()) {
        return Err(already_complete());
    }

    let current = view.session.current().cloned();
    let terms = view.terms.clone();
    let options = build_learn_options(&state, current.as_ref(), &terms).await;

    let Some(Session::Learn(view)) = sessions.get_mut(&id) else {
        return Err(session_not_found(id));
    };
    view.options = options;
    let response = learn_state(id, &view.session, &view.options);
    if response.complete {
        sessions.remove(&id);
    }
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Test mode
// ---------------------------------------------------------------------------

fn test_state(id: Uuid, session: &TestSession) -> TestStateResponse {
    let (_, total) = session.score();
    TestStateResponse {
        session_id: id,
        current: session.current().map(QuestionView::from),
        answered: session.answered(),
        total,
        complete: session.is_complete(),
    }
}

pub async fn start_test(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<TestStateResponse>> {
    let cards = snapshot(&state, &request).await?;
    let session = TestSession::new(&cards, &mut rand::thread_rng());

    let id = if session.is_complete() {
        Uuid::new_v4()
    } else {
        let mut sessions = state.sessions.lock().await;
        sessions.insert(Session::Test(session.clone()))
    };
    tracing::info!(%id, "started test session");
    Ok(Json(test_state(id, &session)))
}

/// Grade a submission exactly (no typo forgiveness) and advance.
pub async fn answer_test(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<TestAnswerResponse>> {
    reject_blank(&request.answer)?;

    let mut sessions = state.sessions.lock().await;
    let Some(Session::Test(session)) = sessions.get_mut(&id) else {
        return Err(session_not_found(id));
    };
    let expected = session
        .current()
        .map(|q| q.card.term.clone())
        .ok_or_else(already_complete)?;

    let correct = session.submit(&request.answer).unwrap_or(false);
    let (score, _) = session.score();

    let response = TestAnswerResponse {
        correct,
        expected,
        score,
        state: test_state(id, session),
    };
    if response.state.complete {
        sessions.remove(&id);
    }
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Match minigame
// ---------------------------------------------------------------------------

pub async fn start_match(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<MatchStateResponse>> {
    let cards = snapshot(&state, &request).await?;
    let game = MatchGame::new(&cards, &mut rand::thread_rng());

    let best_time_ms = {
        let scores = state.scores.lock().await;
        scores.get(BEST_TIME_KEY)
    };

    let tiles = game.tiles().to_vec();
    let matched = game.matched_count();
    let complete = game.is_complete();
    let id = if complete {
        Uuid::new_v4()
    } else {
        let mut sessions = state.sessions.lock().await;
        sessions.insert(Session::Match(game))
    };
    tracing::info!(%id, "started match game");

    Ok(Json(MatchStateResponse {
        session_id: id,
        tiles,
        matched,
        complete,
        best_time_ms,
    }))
}

/// Advance the pairing state machine. The completing selection records
/// a best time only when it strictly beats the stored one.
pub async fn select_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MatchSelectRequest>,
) -> Result<Json<MatchSelectResponse>> {
    let mut sessions = state.sessions.lock().await;
    let Some(Session::Match(game)) = sessions.get_mut(&id) else {
        return Err(session_not_found(id));
    };

    let outcome = game.select(request.index);
    let complete = game.is_complete();
    let elapsed_ms = game.elapsed().map(|d| d.as_millis() as u64);

    // `Matched` + complete identifies the selection that finished the
    // game; the game is evicted right after, so it can never re-record.
    let new_best = match (complete && outcome == SelectOutcome::Matched, elapsed_ms) {
        (true, Some(ms)) => {
            let mut scores = state.scores.lock().await;
            record_best_time(&mut *scores, ms)
        }
        _ => false,
    };

    let response = MatchSelectResponse {
        outcome,
        matched: game.matched_count(),
        complete,
        elapsed_ms,
        new_best,
    };
    if complete {
        sessions.remove(&id);
    }
    Ok(Json(response))
}
