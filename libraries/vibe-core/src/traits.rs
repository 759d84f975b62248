/// Seams for the two external services the backend depends on
use crate::types::{CatalogTrack, Confidence};
use async_trait::async_trait;
use thiserror::Error;

/// Dominant emotion reported by the vision model for one face
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Label in the model's own vocabulary (e.g. `surprise`)
    pub raw_label: String,

    /// Score of the dominant label
    pub confidence: Confidence,
}

/// Reasons a classification produced no result
#[derive(Error, Debug)]
pub enum ClassificationError {
    /// Upload is not a recognizable image
    #[error("Uploaded file is not an image")]
    NotAnImage,

    /// The model found no face in the image
    #[error("No face detected in the image")]
    NoFace,

    /// The model service could not be reached or answered with an error
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    /// The model service answered with something we could not interpret
    #[error("Invalid classifier response: {0}")]
    InvalidResponse(String),
}

/// Face detection + emotion classification
///
/// Implementations fail closed: anything short of a face with scored
/// emotions is an error, never a guessed label.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classify the most prominent face in `image`
    async fn classify(&self, image: &[u8]) -> Result<Classification, ClassificationError>;
}

/// Failures talking to the music catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Credentials rejected
    #[error("Catalog authentication failed: {0}")]
    Auth(String),

    /// Too many requests
    #[error("Catalog rate limit exceeded")]
    RateLimited,

    /// Collection id does not exist
    #[error("Collection not found: {0}")]
    NotFound(String),

    /// Any other HTTP-level failure
    #[error("Catalog request failed: {0}")]
    Request(String),

    /// Body could not be decoded
    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// Read access to curated collections in an external music catalog
#[async_trait]
pub trait MusicCatalog: Send + Sync {
    /// All playable tracks of a collection, in catalog order
    async fn collection_tracks(&self, collection_id: &str) -> Result<Vec<CatalogTrack>, CatalogError>;
}
