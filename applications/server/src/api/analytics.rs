//! Per-user analytics routes.
//!
//! These never fail on a query error: the failure is logged and an empty
//! mapping is returned instead.

use crate::{middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, Json};
use serde::Serialize;
use vibe_core::{DailyBreakdown, Distribution, HourlyBreakdown};

#[derive(Debug, Serialize)]
pub struct ByHourResponse {
    pub by_hour: HourlyBreakdown,
}

#[derive(Debug, Serialize)]
pub struct ByDayResponse {
    pub by_day: DailyBreakdown,
}

#[derive(Debug, Serialize)]
pub struct DistributionResponse {
    pub distribution: Distribution,
}

/// GET /api/analytics/by-hour
pub async fn by_hour(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Json<ByHourResponse> {
    let by_hour = vibe_storage::analytics::by_hour(&app_state.pool, auth.id())
        .await
        .unwrap_or_else(|e| {
            tracing::error!(user_id = %auth.id(), error = %e, "Hourly analytics failed");
            HourlyBreakdown::new()
        });
    Json(ByHourResponse { by_hour })
}

/// GET /api/analytics/by-day
pub async fn by_day(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Json<ByDayResponse> {
    let by_day = vibe_storage::analytics::by_day(&app_state.pool, auth.id())
        .await
        .unwrap_or_else(|e| {
            tracing::error!(user_id = %auth.id(), error = %e, "Daily analytics failed");
            DailyBreakdown::new()
        });
    Json(ByDayResponse { by_day })
}

/// GET /api/analytics/distribution
pub async fn distribution(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Json<DistributionResponse> {
    let distribution = vibe_storage::analytics::distribution(&app_state.pool, auth.id())
        .await
        .unwrap_or_else(|e| {
            tracing::error!(user_id = %auth.id(), error = %e, "Emotion distribution failed");
            Distribution::new()
        });
    Json(DistributionResponse { distribution })
}
