/// Emotion reference data routes
use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};
use vibe_core::EmotionType;

/// GET /api/emotions/types
pub async fn list_emotion_types(State(app_state): State<AppState>) -> Result<Json<Vec<EmotionType>>> {
    let types = vibe_storage::emotion_types::get_all(&app_state.pool).await?;
    Ok(Json(types))
}
