//! Vibe Tuner Server Library
//!
//! Emotion-driven music recommendation backend: classifies a face or a
//! manual label, records the observation per user, and returns tracks from a
//! curated catalog collection.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, HttpEmotionClassifier, SpotifyCatalog};
pub use state::AppState;
