/// Music catalog types: external tracks, curated collections, selections
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A track as returned by the external catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub title: String,
    pub artist: String,
    /// Catalog-side track id
    pub catalog_id: String,
    pub preview_url: Option<String>,
    /// Link to the track on the catalog's own site
    pub external_url: String,
    pub artwork_url: Option<String>,
}

/// A recommended track stored against an observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedTrack {
    pub id: i64,
    pub position: i64,
    pub title: String,
    pub artist: String,
    pub catalog_id: String,
    pub preview_url: Option<String>,
    pub external_url: String,
    pub artwork_url: Option<String>,
}

/// Mapping from an emotion label to an external catalog collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedCollection {
    /// Emotion label name
    pub emotion: String,
    /// Catalog-side collection (playlist) id
    pub collection_id: String,
    /// Cached display name of the collection
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a recommendation came back without catalog data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No curated collection is mapped to the emotion
    NoCollection,
    /// The catalog call failed (auth, rate limit, not found, transport)
    CatalogUnavailable,
}

/// Result of asking for recommendations for one emotion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSelection {
    /// Tracks drawn from the mapped collection
    Sampled {
        collection_id: String,
        tracks: Vec<CatalogTrack>,
    },
    /// Degraded result: no tracks, endpoint stays available
    Fallback { reason: FallbackReason },
}

impl TrackSelection {
    /// Consume the selection into its parts
    pub fn into_parts(self) -> (Option<String>, Vec<CatalogTrack>) {
        match self {
            Self::Sampled {
                collection_id,
                tracks,
            } => (Some(collection_id), tracks),
            Self::Fallback { .. } => (None, Vec::new()),
        }
    }

    /// Wire tag used in API responses
    pub fn status(&self) -> &'static str {
        match self {
            Self::Sampled { .. } => "sampled",
            Self::Fallback {
                reason: FallbackReason::NoCollection,
            } => "no_collection",
            Self::Fallback {
                reason: FallbackReason::CatalogUnavailable,
            } => "catalog_unavailable",
        }
    }
}
