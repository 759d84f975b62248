//! Emotion observations and their recommended tracks
//!
//! Every query is scoped to the owning user: an observation that exists but
//! belongs to someone else is indistinguishable from one that does not exist.

use crate::{from_unix, Result, StorageError};
use sqlx::SqlitePool;
use vibe_core::types::{
    CreateObservation, Observation, ObservationId, ObservationSource, RecommendedTrack, UserId,
};

#[derive(sqlx::FromRow)]
struct ObservationRow {
    id: i64,
    user_id: i64,
    emotion: String,
    confidence: f64,
    source: String,
    feedback: Option<bool>,
    collection_id: Option<String>,
    recorded_at: i64,
}

impl ObservationRow {
    fn into_observation(self, tracks: Vec<RecommendedTrack>) -> Result<Observation> {
        let source = ObservationSource::from_str(&self.source).ok_or_else(|| {
            StorageError::Corrupt(format!("observation {} has source {:?}", self.id, self.source))
        })?;

        Ok(Observation {
            id: ObservationId::new(self.id),
            user_id: UserId::new(self.user_id),
            emotion: self.emotion,
            confidence: self.confidence,
            source,
            feedback: self.feedback,
            collection_id: self.collection_id,
            timestamp: from_unix(self.recorded_at)?,
            tracks,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TrackRow {
    id: i64,
    position: i64,
    title: String,
    artist: String,
    catalog_id: String,
    preview_url: Option<String>,
    external_url: String,
    artwork_url: Option<String>,
}

impl From<TrackRow> for RecommendedTrack {
    fn from(row: TrackRow) -> Self {
        RecommendedTrack {
            id: row.id,
            position: row.position,
            title: row.title,
            artist: row.artist,
            catalog_id: row.catalog_id,
            preview_url: row.preview_url,
            external_url: row.external_url,
            artwork_url: row.artwork_url,
        }
    }
}

const SELECT_OBSERVATION: &str = "SELECT o.id, o.user_id, et.name AS emotion, o.confidence,
        o.source, o.feedback, o.collection_id, o.recorded_at
     FROM observations o
     JOIN emotion_types et ON et.id = o.emotion_type_id";

/// Persist an observation and its tracks in one transaction
///
/// If any track insert fails the observation row is rolled back as well.
pub async fn create(pool: &SqlitePool, observation: CreateObservation) -> Result<Observation> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO observations
            (user_id, emotion_type_id, confidence, source, feedback, collection_id, recorded_at)
         VALUES (?, ?, ?, ?, NULL, ?, ?)",
    )
    .bind(observation.user_id)
    .bind(observation.emotion_type_id)
    .bind(observation.confidence.value())
    .bind(observation.source.as_str())
    .bind(&observation.collection_id)
    .bind(observation.recorded_at.timestamp())
    .execute(&mut *tx)
    .await?;

    let observation_id = result.last_insert_rowid();

    for (position, track) in observation.tracks.iter().enumerate() {
        sqlx::query(
            "INSERT INTO recommended_tracks
                (observation_id, position, title, artist, catalog_id,
                 preview_url, external_url, artwork_url)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(observation_id)
        .bind(position as i64)
        .bind(&track.title)
        .bind(&track.artist)
        .bind(&track.catalog_id)
        .bind(&track.preview_url)
        .bind(&track.external_url)
        .bind(&track.artwork_url)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    get_by_id(pool, observation.user_id, ObservationId::new(observation_id))
        .await?
        .ok_or_else(|| StorageError::not_found("observation", observation_id.to_string()))
}

/// Get one of the user's observations, with tracks
pub async fn get_by_id(
    pool: &SqlitePool,
    user_id: UserId,
    id: ObservationId,
) -> Result<Option<Observation>> {
    let row: Option<ObservationRow> =
        sqlx::query_as(&format!("{SELECT_OBSERVATION} WHERE o.id = ? AND o.user_id = ?"))
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    match row {
        Some(row) => {
            let tracks = get_tracks(pool, id).await?;
            row.into_observation(tracks).map(Some)
        }
        None => Ok(None),
    }
}

/// Get a page of the user's observations, newest first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: UserId,
    limit: i64,
    offset: i64,
) -> Result<Vec<Observation>> {
    let rows: Vec<ObservationRow> = sqlx::query_as(&format!(
        "{SELECT_OBSERVATION} WHERE o.user_id = ?
         ORDER BY o.recorded_at DESC, o.id DESC
         LIMIT ? OFFSET ?"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let mut observations = Vec::with_capacity(rows.len());
    for row in rows {
        let tracks = get_tracks(pool, ObservationId::new(row.id)).await?;
        observations.push(row.into_observation(tracks)?);
    }

    Ok(observations)
}

/// Count all of the user's observations
pub async fn count_for_user(pool: &SqlitePool, user_id: UserId) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM observations WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Record (or overwrite) the user's agreement with a classification
///
/// Returns the updated observation, or `None` if the user owns no such
/// observation.
pub async fn set_feedback(
    pool: &SqlitePool,
    user_id: UserId,
    id: ObservationId,
    agrees: bool,
) -> Result<Option<Observation>> {
    let result = sqlx::query("UPDATE observations SET feedback = ? WHERE id = ? AND user_id = ?")
        .bind(agrees)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_by_id(pool, user_id, id).await
}

/// Delete one of the user's observations; its tracks cascade
pub async fn delete(pool: &SqlitePool, user_id: UserId, id: ObservationId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM observations WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

async fn get_tracks(pool: &SqlitePool, observation_id: ObservationId) -> Result<Vec<RecommendedTrack>> {
    let rows: Vec<TrackRow> = sqlx::query_as(
        "SELECT id, position, title, artist, catalog_id, preview_url, external_url, artwork_url
         FROM recommended_tracks WHERE observation_id = ? ORDER BY position",
    )
    .bind(observation_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(RecommendedTrack::from).collect())
}
