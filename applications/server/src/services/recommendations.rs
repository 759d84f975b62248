/// Emotion to track recommendations
use rand::{seq::SliceRandom, Rng};
use sqlx::SqlitePool;
use tracing::{debug, error, warn};
use vibe_core::{CatalogTrack, FallbackReason, MusicCatalog, TrackSelection};

/// Pick up to `count` tracks for `emotion` from its curated collection
///
/// Never fails: a missing mapping or any catalog error produces a
/// `TrackSelection::Fallback` with no tracks.
pub async fn recommend(
    pool: &SqlitePool,
    catalog: &dyn MusicCatalog,
    emotion: &str,
    count: usize,
) -> TrackSelection {
    let collection = match vibe_storage::collections::get_by_emotion(pool, emotion).await {
        Ok(Some(collection)) => collection,
        Ok(None) => {
            debug!(emotion, "No curated collection mapped");
            return TrackSelection::Fallback {
                reason: FallbackReason::NoCollection,
            };
        }
        Err(e) => {
            error!(emotion, error = %e, "Failed to look up curated collection");
            return TrackSelection::Fallback {
                reason: FallbackReason::CatalogUnavailable,
            };
        }
    };

    match catalog.collection_tracks(&collection.collection_id).await {
        Ok(tracks) => {
            let tracks = sample_tracks(&tracks, count, &mut rand::thread_rng());
            TrackSelection::Sampled {
                collection_id: collection.collection_id,
                tracks,
            }
        }
        Err(e) => {
            warn!(
                emotion,
                collection_id = %collection.collection_id,
                error = %e,
                "Catalog unavailable, returning no tracks"
            );
            TrackSelection::Fallback {
                reason: FallbackReason::CatalogUnavailable,
            }
        }
    }
}

/// Sample `count` distinct tracks, or return all of them when there are not more
pub fn sample_tracks<R: Rng + ?Sized>(
    tracks: &[CatalogTrack],
    count: usize,
    rng: &mut R,
) -> Vec<CatalogTrack> {
    if count >= tracks.len() {
        return tracks.to_vec();
    }
    tracks.choose_multiple(rng, count).cloned().collect()
}
