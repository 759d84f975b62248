/// Emotion observation API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::{classifier::normalize_label, recommendations},
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use vibe_core::{
    Confidence, CreateObservation, LabelResolution, Observation, ObservationId,
    ObservationSource, VibeError,
};

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ManualEntryRequest {
    pub emotion: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub observation: Observation,
    /// `resolved` or `defaulted`
    pub label_resolution: &'static str,
    /// `sampled`, `no_collection` or `catalog_unavailable`
    pub recommendations: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub records: Vec<Observation>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub agrees: bool,
}

/// POST /api/emotion/analyze
///
/// Accepts either an uploaded image (`multipart/form-data`, field `image`)
/// or a manual entry (`application/json`).
pub async fn analyze(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        analyze_image(&app_state, &auth, content_type, body).await
    } else if content_type.starts_with("application/json") {
        record_manual(&app_state, &auth, &body).await
    } else {
        Err(ServerError::BadRequest(
            "Expected multipart/form-data with an image or a JSON body".to_string(),
        ))
    }
}

async fn analyze_image(
    app_state: &AppState,
    auth: &AuthenticatedUser,
    content_type: &str,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>> {
    let image = read_image_field(content_type, body).await?;

    let classification = app_state.classifier.classify(&image).await.map_err(|e| {
        tracing::warn!(user_id = %auth.id(), error = %e, "Classification produced no result");
        ServerError::BadRequest("Could not detect face or emotion in the image".to_string())
    })?;

    let candidate =
        normalize_label(&classification.raw_label).unwrap_or(classification.raw_label.as_str());
    let resolution =
        vibe_storage::emotion_types::resolve_or_default(&app_state.pool, candidate).await?;
    if resolution.is_defaulted() {
        tracing::info!(raw_label = %classification.raw_label, "Classifier label defaulted");
    }

    persist(
        app_state,
        auth,
        resolution,
        classification.confidence,
        ObservationSource::Image,
    )
    .await
}

async fn record_manual(
    app_state: &AppState,
    auth: &AuthenticatedUser,
    body: &[u8],
) -> Result<Json<AnalyzeResponse>> {
    let req: ManualEntryRequest = serde_json::from_slice(body)
        .map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let confidence = match req.confidence {
        Some(value) => Confidence::new(value)?,
        None => Confidence::CERTAIN,
    };

    let name = req.emotion.trim();
    if name.is_empty() {
        return Err(VibeError::invalid_input("Emotion is required").into());
    }

    let emotion = vibe_storage::emotion_types::get_by_name(&app_state.pool, name)
        .await?
        .ok_or_else(|| VibeError::UnknownEmotion(name.to_string()))?;

    persist(
        app_state,
        auth,
        LabelResolution::Resolved(emotion),
        confidence,
        ObservationSource::Manual,
    )
    .await
}

/// Pull the `image` field out of a multipart body
async fn read_image_field(content_type: &str, body: Bytes) -> Result<Vec<u8>> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| ServerError::BadRequest("Missing boundary".to_string()))?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
    {
        if field.name() == Some("image") {
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Failed to read image: {}", e)))?;
            if data.is_empty() {
                return Err(ServerError::BadRequest("No image selected".to_string()));
            }
            return Ok(data.to_vec());
        }
    }

    Err(ServerError::BadRequest("No image provided".to_string()))
}

async fn persist(
    app_state: &AppState,
    auth: &AuthenticatedUser,
    resolution: LabelResolution,
    confidence: Confidence,
    source: ObservationSource,
) -> Result<Json<AnalyzeResponse>> {
    let label_resolution = resolution.as_str();
    let emotion = resolution.into_emotion();

    let selection = recommendations::recommend(
        &app_state.pool,
        app_state.catalog.as_ref(),
        &emotion.name,
        app_state.tracks_per_recommendation,
    )
    .await;
    let recommendations = selection.status();
    let (collection_id, tracks) = selection.into_parts();

    let observation = vibe_storage::observations::create(
        &app_state.pool,
        CreateObservation {
            user_id: auth.id(),
            emotion_type_id: emotion.id,
            confidence,
            source,
            collection_id,
            recorded_at: Utc::now(),
            tracks,
        },
    )
    .await?;

    tracing::info!(
        user_id = %auth.id(),
        observation_id = %observation.id,
        emotion = %observation.emotion,
        source = source.as_str(),
        "Observation recorded"
    );

    Ok(Json(AnalyzeResponse {
        observation,
        label_resolution,
        recommendations,
    }))
}

/// GET /api/emotion/history
pub async fn history(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    query: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(0, MAX_HISTORY_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let records =
        vibe_storage::observations::list_for_user(&app_state.pool, auth.id(), limit, offset)
            .await?;
    let total = vibe_storage::observations::count_for_user(&app_state.pool, auth.id()).await?;

    Ok(Json(HistoryResponse {
        records,
        total,
        limit,
        offset,
    }))
}

/// GET /api/emotion/:id
pub async fn get_observation(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Observation>> {
    let Path(id) = id?;
    let observation =
        vibe_storage::observations::get_by_id(&app_state.pool, auth.id(), ObservationId::new(id))
            .await?
            .ok_or_else(not_found)?;
    Ok(Json(observation))
}

/// DELETE /api/emotion/:id
pub async fn delete_observation(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>> {
    let Path(id) = id?;
    let deleted =
        vibe_storage::observations::delete(&app_state.pool, auth.id(), ObservationId::new(id))
            .await?;
    if !deleted {
        return Err(not_found());
    }

    Ok(Json(json!({ "message": "Emotion record deleted successfully" })))
}

/// POST /api/emotion/:id/feedback
pub async fn set_feedback(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<Observation>> {
    let Path(id) = id?;
    let Json(req) = payload?;

    let observation = vibe_storage::observations::set_feedback(
        &app_state.pool,
        auth.id(),
        ObservationId::new(id),
        req.agrees,
    )
    .await?
    .ok_or_else(not_found)?;

    Ok(Json(observation))
}

fn not_found() -> ServerError {
    ServerError::NotFound("Emotion record not found".to_string())
}
