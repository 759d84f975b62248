//! Common test utilities and fixtures
//!
//! The router is driven in-process against a temp-file SQLite database, with
//! plain structs standing in for the classifier and the music catalog.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::{collections::HashMap, sync::Arc};
use tempfile::TempDir;
use tower::util::ServiceExt;
use vibe_core::{
    CatalogError, CatalogTrack, Classification, ClassificationError, Confidence,
    EmotionClassifier, MusicCatalog,
};
use vibe_server::{api, services::AuthService, state::AppState};

pub const TEST_SECRET: &str = "test-secret-key";
pub const TEST_EMAIL: &str = "a@b.com";
pub const TEST_PASSWORD: &str = "password1";
pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Classifier that always answers the same way
pub enum FakeClassifier {
    Label(&'static str, f64),
    NoFace,
}

#[async_trait]
impl EmotionClassifier for FakeClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Classification, ClassificationError> {
        match self {
            Self::Label(label, confidence) => Ok(Classification {
                raw_label: (*label).to_string(),
                confidence: Confidence::clamped(*confidence),
            }),
            Self::NoFace => Err(ClassificationError::NoFace),
        }
    }
}

/// In-memory catalog keyed by collection id
#[derive(Default)]
pub struct FakeCatalog {
    pub collections: HashMap<String, Vec<CatalogTrack>>,
    pub unavailable: bool,
}

impl FakeCatalog {
    pub fn with_collection(collection_id: &str, size: usize) -> Self {
        let mut collections = HashMap::new();
        collections.insert(collection_id.to_string(), tracks(size));
        Self {
            collections,
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            collections: HashMap::new(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl MusicCatalog for FakeCatalog {
    async fn collection_tracks(&self, collection_id: &str) -> Result<Vec<CatalogTrack>, CatalogError> {
        if self.unavailable {
            return Err(CatalogError::RateLimited);
        }
        self.collections
            .get(collection_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(collection_id.to_string()))
    }
}

pub fn tracks(n: usize) -> Vec<CatalogTrack> {
    (0..n)
        .map(|i| CatalogTrack {
            title: format!("Song {i}"),
            artist: format!("Artist {i}"),
            catalog_id: format!("track-{i}"),
            preview_url: None,
            external_url: format!("https://open.spotify.com/track/track-{i}"),
            artwork_url: Some(format!("https://i.scdn.co/image/{i}")),
        })
        .collect()
}

/// A router wired to a fresh database
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub state: AppState,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with(FakeClassifier::Label("happy", 0.9), FakeCatalog::default()).await
    }

    pub async fn with(classifier: FakeClassifier, catalog: FakeCatalog) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let pool = vibe_storage::create_pool(&db_url).await.unwrap();
        vibe_storage::run_migrations(&pool).await.unwrap();

        // Lowest bcrypt cost keeps the suite fast
        let auth_service = Arc::new(AuthService::new(TEST_SECRET.to_string(), 7, 4));

        let app_state = AppState::new(
            pool.clone(),
            Arc::clone(&auth_service),
            Arc::new(classifier),
            Arc::new(catalog),
            5,
        );

        Self {
            app: api::create_router(app_state.clone(), MAX_UPLOAD_BYTES),
            pool,
            state: app_state,
            auth_service,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request and decode the JSON body (Null when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn register(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(json_request(
            "POST",
            "/api/auth/register",
            None,
            &serde_json::json!({ "email": email, "password": password }),
        ))
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(json_request(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({ "email": email, "password": password }),
        ))
        .await
    }

    /// Register and log in, returning the bearer token
    pub async fn token_for(&self, email: &str) -> String {
        let (status, _) = self.register(email, TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self.login(email, TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    /// Record a manual observation and return its id
    pub async fn record(&self, token: &str, emotion: &str) -> i64 {
        let (status, body) = self
            .send(json_request(
                "POST",
                "/api/emotion/analyze",
                Some(token),
                &serde_json::json!({ "emotion": emotion }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "analyze failed: {body}");
        body["id"].as_i64().unwrap()
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    bare_request("GET", uri, token)
}

pub fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Build a `multipart/form-data` request carrying one file field
pub fn multipart_request(token: &str, field: &str, data: &[u8]) -> Request<Body> {
    let boundary = "vibe-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"face.png\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/emotion/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

/// Minimal PNG signature followed by an IHDR chunk header
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52,
];
