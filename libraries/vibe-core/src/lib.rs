//! Vibe Tuner Core
//!
//! Domain types, adapter seams, and error handling shared by the storage
//! layer and the HTTP server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `EmotionType`, `Observation`, `RecommendedTrack`, etc.
//! - **Adapter Traits**: `EmotionClassifier` (vision model) and `MusicCatalog`
//!   (third-party catalog), so both external services can be swapped in tests
//! - **Error Handling**: `VibeError` for domain validation, plus one error type
//!   per adapter seam
//!
//! # Example
//!
//! ```rust
//! use vibe_core::types::{Confidence, ObservationSource};
//!
//! let confidence = Confidence::new(0.9).unwrap();
//! assert_eq!(confidence.value(), 0.9);
//!
//! // Classifier output is clamped rather than rejected
//! assert_eq!(Confidence::clamped(1.7).value(), 1.0);
//!
//! assert_eq!(ObservationSource::Manual.as_str(), "manual");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, VibeError};
pub use traits::{
    CatalogError, Classification, ClassificationError, EmotionClassifier, MusicCatalog,
};

pub use types::{
    // Analytics
    DailyBreakdown, Distribution, HourlyBreakdown,
    // Catalog
    CatalogTrack, CuratedCollection, FallbackReason, RecommendedTrack, TrackSelection,
    // Emotions
    EmotionType, LabelResolution, DEFAULT_EMOTION,
    // Observations
    Confidence, CreateObservation, Observation, ObservationSource,
    // Users
    ObservationId, User, UserId,
};
