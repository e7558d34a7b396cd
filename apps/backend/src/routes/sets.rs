//! Study set library routes.

use axum::extract::{Path, State};
use axum::Json;
use flashdeck_core::{Card, StudySet};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{
    CreateSetRequest, ExportResponse, ImportReport, ImportRequest, ImportSkip, SetSummary,
    StarResponse,
};
use crate::AppState;

/// List every set with its card counts.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SetSummary>>> {
    let library = state.library.read().await;
    Ok(Json(library.list().map(SetSummary::from).collect()))
}

/// Create a set from submitted cards. Blank cards are dropped before
/// validation; a set needs a title and at least two usable cards.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateSetRequest>,
) -> Result<Json<SetSummary>> {
    let cards: Vec<Card> = request
        .cards
        .into_iter()
        .filter(|c| !c.term.trim().is_empty() && !c.definition.trim().is_empty())
        .map(|c| Card::new(Uuid::new_v4().to_string(), c.term, c.definition))
        .collect();

    let set = StudySet {
        topic: request.topic.trim().to_string(),
        cards,
    };
    set.validate()?;

    let summary = SetSummary::from(&set);
    let mut library = state.library.write().await;
    library.create(set)?;
    Ok(Json(summary))
}

pub async fn get_set(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<Json<StudySet>> {
    let library = state.library.read().await;
    let set = library
        .get(&topic)
        .ok_or_else(|| ApiError::NotFound(format!("set {topic:?}")))?;
    Ok(Json(set.clone()))
}

/// Serialize a set for download, with its topic-derived filename.
pub async fn export(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<Json<ExportResponse>> {
    let library = state.library.read().await;
    let (filename, content) = library
        .export(&topic)
        .ok_or_else(|| ApiError::NotFound(format!("set {topic:?}")))??;
    Ok(Json(ExportResponse { filename, content }))
}

/// Import a batch of exported files. Each file is handled on its own:
/// invalid or duplicate files are reported as skipped and never abort
/// the rest of the batch.
pub async fn import(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportReport>> {
    let mut library = state.library.write().await;
    let mut report = ImportReport {
        imported: Vec::new(),
        skipped: Vec::new(),
    };

    for file in request.files {
        match library.import(&file.content) {
            Ok(topic) => report.imported.push(topic),
            Err(reason) => {
                tracing::warn!("skipping import of {}: {}", file.name, reason);
                report.skipped.push(ImportSkip {
                    name: file.name,
                    reason: reason.to_string(),
                });
            }
        }
    }

    Ok(Json(report))
}

/// Toggle the star flag on one card.
pub async fn toggle_star(
    State(state): State<AppState>,
    Path((topic, card_id)): Path<(String, String)>,
) -> Result<Json<StarResponse>> {
    let mut library = state.library.write().await;
    let is_starred = library
        .toggle_star(&topic, &card_id)?
        .ok_or_else(|| ApiError::NotFound(format!("card {card_id:?} in set {topic:?}")))?;
    Ok(Json(StarResponse { is_starred }))
}
