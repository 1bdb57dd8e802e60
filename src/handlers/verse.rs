use axum::{Json, extract::State};
use tracing::warn;

use crate::error::ApiError;
use crate::router::AppState;
use crate::types::verse::Verse;

/// GET / -> a random verse from the upstream API, reshaped.
pub async fn random_verse(State(state): State<AppState>) -> Result<Json<Verse>, ApiError> {
    let verse = state
        .verse
        .random_verse()
        .await
        .inspect_err(|e| warn!(error = %e, "verse proxy failed"))?;
    Ok(Json(verse))
}
