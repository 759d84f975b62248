//! Emotion reference table

use crate::{from_unix, Result};
use sqlx::SqlitePool;
use vibe_core::types::{EmotionType, LabelResolution, DEFAULT_EMOTION};

#[derive(sqlx::FromRow)]
struct EmotionTypeRow {
    id: i64,
    name: String,
    display_name: String,
    description: Option<String>,
    created_at: i64,
}

impl TryFrom<EmotionTypeRow> for EmotionType {
    type Error = crate::StorageError;

    fn try_from(row: EmotionTypeRow) -> Result<Self> {
        Ok(EmotionType {
            id: row.id,
            name: row.name,
            display_name: row.display_name,
            description: row.description,
            created_at: from_unix(row.created_at)?,
        })
    }
}

/// Get all emotion labels, ordered by id
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<EmotionType>> {
    let rows: Vec<EmotionTypeRow> = sqlx::query_as(
        "SELECT id, name, display_name, description, created_at
         FROM emotion_types ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(EmotionType::try_from).collect()
}

/// Get a label by its machine name
pub async fn get_by_name(pool: &SqlitePool, name: &str) -> Result<Option<EmotionType>> {
    let row: Option<EmotionTypeRow> = sqlx::query_as(
        "SELECT id, name, display_name, description, created_at
         FROM emotion_types WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    row.map(EmotionType::try_from).transpose()
}

/// Resolve a candidate label, substituting the default label when unknown
///
/// # Errors
///
/// Returns `StorageError::NotFound` if even the default label is missing
/// from the reference table.
pub async fn resolve_or_default(pool: &SqlitePool, name: &str) -> Result<LabelResolution> {
    if let Some(emotion) = get_by_name(pool, name).await? {
        return Ok(LabelResolution::Resolved(emotion));
    }

    tracing::debug!(label = %name, fallback = DEFAULT_EMOTION, "Unknown emotion label");

    get_by_name(pool, DEFAULT_EMOTION)
        .await?
        .map(LabelResolution::DefaultedTo)
        .ok_or_else(|| crate::StorageError::not_found("emotion type", DEFAULT_EMOTION))
}
