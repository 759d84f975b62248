/// API route modules
pub mod analytics;
pub mod auth;
pub mod emotion;
pub mod emotion_types;
pub mod health;

use crate::{middleware, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router, with every route under `/api`
pub fn create_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/emotions/types", get(emotion_types::list_emotion_types));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/account", delete(auth::delete_account))
        // Observations
        .route("/emotion/analyze", post(emotion::analyze))
        .route("/emotion/history", get(emotion::history))
        .route(
            "/emotion/:id",
            get(emotion::get_observation).delete(emotion::delete_observation),
        )
        .route("/emotion/:id/feedback", post(emotion::set_feedback))
        // Analytics
        .route("/analytics/by-hour", get(analytics::by_hour))
        .route("/analytics/by-day", get(analytics::by_day))
        .route("/analytics/distribution", get(analytics::distribution))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
