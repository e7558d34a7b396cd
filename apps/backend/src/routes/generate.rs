//! AI card generation route.

use axum::extract::State;
use axum::Json;

use crate::error::Result;
use crate::models::{GenerateCardsRequest, GenerateCardsResponse};
use crate::AppState;

/// Generate draft cards from raw notes. Failures surface as errors and
/// never touch the library; the client decides what to keep.
pub async fn cards(
    State(state): State<AppState>,
    Json(request): Json<GenerateCardsRequest>,
) -> Result<Json<GenerateCardsResponse>> {
    let cards = state.generator.generate_cards(&request.notes).await?;
    tracing::info!("generated {} draft cards", cards.len());
    Ok(Json(GenerateCardsResponse { cards }))
}
