//! Curated collection mappings (emotion label -> catalog collection)

use crate::{from_unix, Result, StorageError};
use sqlx::SqlitePool;
use vibe_core::types::CuratedCollection;

#[derive(sqlx::FromRow)]
struct CollectionRow {
    emotion: String,
    collection_id: String,
    name: String,
    description: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<CollectionRow> for CuratedCollection {
    type Error = StorageError;

    fn try_from(row: CollectionRow) -> Result<Self> {
        Ok(CuratedCollection {
            emotion: row.emotion,
            collection_id: row.collection_id,
            name: row.name,
            description: row.description,
            created_at: from_unix(row.created_at)?,
            updated_at: from_unix(row.updated_at)?,
        })
    }
}

const SELECT_COLLECTION: &str = "SELECT et.name AS emotion, cc.collection_id, cc.name,
        cc.description, cc.created_at, cc.updated_at
     FROM curated_collections cc
     JOIN emotion_types et ON et.id = cc.emotion_type_id";

/// Get the collection mapped to an emotion label
pub async fn get_by_emotion(pool: &SqlitePool, emotion: &str) -> Result<Option<CuratedCollection>> {
    let row: Option<CollectionRow> = sqlx::query_as(&format!("{SELECT_COLLECTION} WHERE et.name = ?"))
        .bind(emotion)
        .fetch_optional(pool)
        .await?;

    row.map(CuratedCollection::try_from).transpose()
}

/// Get all mappings, ordered by emotion id
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<CuratedCollection>> {
    let rows: Vec<CollectionRow> = sqlx::query_as(&format!("{SELECT_COLLECTION} ORDER BY et.id"))
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(CuratedCollection::try_from).collect()
}

/// Map an emotion to a collection, replacing any existing mapping
///
/// # Errors
///
/// Returns `StorageError::NotFound` if the emotion label does not exist
pub async fn upsert(
    pool: &SqlitePool,
    emotion: &str,
    collection_id: &str,
    name: &str,
    description: Option<&str>,
) -> Result<CuratedCollection> {
    let now = chrono::Utc::now().timestamp();

    let emotion_type_id: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM emotion_types WHERE name = ?")
            .bind(emotion)
            .fetch_optional(pool)
            .await?;
    let (emotion_type_id,) =
        emotion_type_id.ok_or_else(|| StorageError::not_found("emotion type", emotion))?;

    sqlx::query(
        "INSERT INTO curated_collections
            (emotion_type_id, collection_id, name, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(emotion_type_id) DO UPDATE SET
            collection_id = excluded.collection_id,
            name = excluded.name,
            description = excluded.description,
            updated_at = excluded.updated_at",
    )
    .bind(emotion_type_id)
    .bind(collection_id)
    .bind(name)
    .bind(description)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_by_emotion(pool, emotion)
        .await?
        .ok_or_else(|| StorageError::not_found("collection", emotion))
}
