/// Shared application state
use crate::services::AuthService;
use sqlx::SqlitePool;
use std::sync::Arc;
use vibe_core::{EmotionClassifier, MusicCatalog};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub classifier: Arc<dyn EmotionClassifier>,
    pub catalog: Arc<dyn MusicCatalog>,
    /// How many tracks one recommendation samples
    pub tracks_per_recommendation: usize,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth_service: Arc<AuthService>,
        classifier: Arc<dyn EmotionClassifier>,
        catalog: Arc<dyn MusicCatalog>,
        tracks_per_recommendation: usize,
    ) -> Self {
        Self {
            pool,
            auth_service,
            classifier,
            catalog,
            tracks_per_recommendation,
        }
    }
}
